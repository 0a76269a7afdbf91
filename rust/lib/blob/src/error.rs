use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("blob {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),
}

impl BlobError {
    pub(crate) fn io(key: &str) -> impl FnOnce(std::io::Error) -> BlobError + '_ {
        move |source| BlobError::Io { key: key.to_string(), source }
    }
}
