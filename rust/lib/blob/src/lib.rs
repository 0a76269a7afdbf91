//! Logo storage.

pub mod error;
pub mod file;
pub mod traits;

pub use error::BlobError;
pub use file::FileStore;
pub use traits::BlobStore;
