use crate::error::BlobError;

/// Binary objects addressed by slash-separated keys, such as
/// `logos/0001_imagen_001.png`.
pub trait BlobStore: Send + Sync {
    /// Write `data` under `key`, replacing any previous object.
    fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError>;

    /// `None` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), BlobError>;

    fn exists(&self, key: &str) -> Result<bool, BlobError>;
}
