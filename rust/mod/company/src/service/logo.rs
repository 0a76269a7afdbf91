use bizdir_blob::BlobError;
use bizdir_core::ServiceError;
use bizdir_sql::Value;

use crate::model::{Company, CompanyPatch};
use crate::service::CompanyService;

/// Blob key prefix for logos.
pub const LOGO_PREFIX: &str = "logos";

fn blob_error(e: BlobError) -> ServiceError {
    match e {
        BlobError::InvalidKey(key) => ServiceError::Validation(format!("invalid blob key: {}", key)),
        e @ BlobError::Io { .. } => ServiceError::Storage(e.to_string()),
    }
}

/// Final path segment of an uploaded file name.
fn base_name(file_name: &str) -> Result<&str, ServiceError> {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(ServiceError::Validation(format!("invalid logo file name: {:?}", file_name)));
    }
    Ok(name)
}

/// Blob key for a logo: `logos/{code}_{file}`, or `logos/{file}` without a code.
pub fn logo_key(code: &str, file_name: &str) -> Result<String, ServiceError> {
    let name = base_name(file_name)?;
    Ok(if code.is_empty() {
        format!("{}/{}", LOGO_PREFIX, name)
    } else {
        format!("{}/{}_{}", LOGO_PREFIX, code, name)
    })
}

/// MIME type guessed from the key's extension.
pub fn content_type(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "emf" => "image/emf",
        "wmf" => "image/wmf",
        _ => "application/octet-stream",
    }
}

impl CompanyService {
    /// Write logo bytes under `key`.
    pub fn store_logo(&self, key: &str, data: &[u8]) -> Result<(), ServiceError> {
        self.blob.put(key, data).map_err(blob_error)
    }

    /// Store an uploaded logo and point the company at it. A previous logo
    /// under a different key is released.
    pub fn set_logo(&self, id: i64, file_name: &str, data: &[u8]) -> Result<Company, ServiceError> {
        let company = self.get(id)?;
        self.attach_logo(&company, file_name, data, CompanyPatch::default())
    }

    /// Write `data` under the company's own key and apply `patch` together
    /// with the new `logo_path`.
    pub(crate) fn attach_logo(
        &self,
        company: &Company,
        file_name: &str,
        data: &[u8],
        mut patch: CompanyPatch,
    ) -> Result<Company, ServiceError> {
        let key = logo_key(&company.code, file_name)?;
        self.store_logo(&key, data)?;

        patch.logo_path = Some(key.clone());
        let updated = self.update(company.id, patch)?;

        if let Some(old) = company.logo_path.as_deref().filter(|old| *old != key) {
            self.release_logo(old);
        }
        tracing::info!(id = company.id, %key, bytes = data.len(), "logo stored");
        Ok(updated)
    }

    /// Delete the blob under `key` unless a company still points at it.
    /// Failures are logged; the blob is kept when in doubt.
    pub(crate) fn release_logo(&self, key: &str) {
        let refs = self
            .sql
            .query(
                "SELECT COUNT(*) AS refs FROM companies WHERE logo_path = ?1",
                &[Value::Text(key.to_string())],
            )
            .map(|rows| rows.first().and_then(|r| r.get_i64("refs")).unwrap_or(0));
        match refs {
            Ok(0) => {
                if let Err(e) = self.blob.delete(key) {
                    tracing::warn!(%key, error = %e, "failed to delete logo blob");
                }
            }
            Ok(refs) => tracing::debug!(%key, refs, "logo still referenced, kept"),
            Err(e) => tracing::warn!(%key, error = %e, "cannot count logo references, kept"),
        }
    }

    /// The company's logo key and bytes.
    pub fn get_logo(&self, id: i64) -> Result<(String, Vec<u8>), ServiceError> {
        let company = self.get(id)?;
        let key = company
            .logo_path
            .ok_or_else(|| ServiceError::NotFound(format!("companies/{}/logo", id)))?;
        let data = self
            .blob
            .get(&key)
            .map_err(blob_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("blob {}", key)))?;
        Ok((key, data))
    }
}
