//! Authorization policy: one decision point for every gated action.

use std::fmt;

use crate::model::Principal;
use crate::service::AuthError;

/// What a caller wants to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Add,
    Change,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Change => "change",
            Action::Delete => "delete",
        }
    }

    /// Permission string required for this action on `resource`.
    pub fn permission(&self, resource: &str) -> String {
        format!("{}:{}", resource, self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `principal` may perform `action` on `resource`.
///
/// - `View` is open to every authenticated caller.
/// - Writes need superuser status or the `resource:action` permission,
///   held directly or through a group.
pub fn authorize(principal: &Principal, resource: &str, action: Action) -> Result<(), AuthError> {
    if action == Action::View {
        return Ok(());
    }

    let required = action.permission(resource);
    if principal.has_permission(&required) {
        return Ok(());
    }

    tracing::debug!(user = %principal.username, %required, "permission denied");
    Err(AuthError::Forbidden(format!(
        "user {} lacks permission {}",
        principal.username, required
    )))
}
