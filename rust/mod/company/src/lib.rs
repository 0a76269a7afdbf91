//! Company directory module.
//!
//! Records carry a unique zero-padded `code` assigned at creation (see
//! [`code`]), optional logos in blob storage, and contact fields. The
//! [`import`] submodule loads companies and logos from an xlsx workbook.

pub mod api;
pub mod code;
pub mod import;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use bizdir_core::Module;

use service::CompanyService;

pub use code::CodeOrdering;
pub use service::CompanyConfig;

/// Company records and logos as a server module.
pub struct CompanyModule {
    service: Arc<CompanyService>,
}

impl CompanyModule {
    pub fn new(service: Arc<CompanyService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<CompanyService> {
        &self.service
    }
}

impl Module for CompanyModule {
    fn name(&self) -> &str {
        "company"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
