//! Shared plumbing for the company directory: settings, storage paths,
//! the HTTP error type and list paging.

pub mod config;
pub mod error;
pub mod module;
pub mod settings;
pub mod types;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use settings::{Settings, SettingsError};
pub use types::{ListParams, ListResult, MAX_LIMIT, new_id, now_rfc3339};
