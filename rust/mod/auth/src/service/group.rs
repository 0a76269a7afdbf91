use std::collections::BTreeSet;

use serde::Serialize;

use bizdir_core::{new_id, now_rfc3339};
use bizdir_sql::Value;

use crate::service::{AuthError, AuthService};

/// A named set of users sharing permissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// Permissions are `resource:action` strings.
fn validate_permission(permission: &str) -> Result<(), AuthError> {
    let mut parts = permission.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(r), Some(a), None) if !r.is_empty() && !a.is_empty() => Ok(()),
        _ => Err(AuthError::Validation(format!(
            "permission {:?} must look like resource:action",
            permission
        ))),
    }
}

impl AuthService {
    /// Get a group by name, creating it when missing.
    pub fn ensure_group(&self, name: &str) -> Result<Group, AuthError> {
        if let Some(group) = self.find_group(name)? {
            return Ok(group);
        }
        let group = Group {
            id: new_id(),
            name: name.to_string(),
            created_at: now_rfc3339(),
        };
        self.sql
            .exec(
                "INSERT INTO groups (id, name, created_at) VALUES (?1, ?2, ?3)",
                &[
                    Value::Text(group.id.clone()),
                    Value::Text(group.name.clone()),
                    Value::Text(group.created_at.clone()),
                ],
            )
            .map_err(AuthError::storage)?;
        tracing::info!(group = %group.name, "group created");
        Ok(group)
    }

    /// Find a group by exact name.
    pub fn find_group(&self, name: &str) -> Result<Option<Group>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id, name, created_at FROM groups WHERE name = ?1",
                &[Value::Text(name.to_string())],
            )
            .map_err(AuthError::storage)?;
        Ok(rows.first().map(|r| Group {
            id: r.text("id"),
            name: r.text("name"),
            created_at: r.text("created_at"),
        }))
    }

    /// Add a user to a group. Idempotent.
    pub fn add_group_member(&self, group_id: &str, user_id: &str) -> Result<(), AuthError> {
        self.sql
            .exec(
                "INSERT OR IGNORE INTO group_members (group_id, user_id, added_at) \
                 VALUES (?1, ?2, ?3)",
                &[
                    Value::Text(group_id.to_string()),
                    Value::Text(user_id.to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(AuthError::storage)?;
        Ok(())
    }

    /// Whether the user belongs to the named group.
    pub fn is_group_member(&self, group_name: &str, user_id: &str) -> Result<bool, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT 1 AS hit FROM group_members m JOIN groups g ON g.id = m.group_id \
                 WHERE g.name = ?1 AND m.user_id = ?2",
                &[
                    Value::Text(group_name.to_string()),
                    Value::Text(user_id.to_string()),
                ],
            )
            .map_err(AuthError::storage)?;
        Ok(!rows.is_empty())
    }

    /// Names of the groups a user belongs to, sorted.
    pub fn user_group_names(&self, user_id: &str) -> Result<Vec<String>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT g.name AS name FROM group_members m JOIN groups g ON g.id = m.group_id \
                 WHERE m.user_id = ?1 ORDER BY g.name",
                &[Value::Text(user_id.to_string())],
            )
            .map_err(AuthError::storage)?;
        Ok(rows.iter().map(|r| r.text("name")).collect())
    }

    /// Grant a permission to every member of a group.
    pub fn grant_group_permission(&self, group_name: &str, permission: &str) -> Result<(), AuthError> {
        validate_permission(permission)?;
        let group = self.ensure_group(group_name)?;
        self.sql
            .exec(
                "INSERT OR IGNORE INTO group_permissions (group_id, permission) VALUES (?1, ?2)",
                &[Value::Text(group.id), Value::Text(permission.to_string())],
            )
            .map_err(AuthError::storage)?;
        Ok(())
    }

    /// Grant a permission directly to a user (looked up by username).
    pub fn grant_user_permission(&self, username: &str, permission: &str) -> Result<(), AuthError> {
        validate_permission(permission)?;
        let user = self
            .find_user_by_username(username)?
            .ok_or_else(|| AuthError::NotFound(format!("user {}", username)))?;
        self.sql
            .exec(
                "INSERT OR IGNORE INTO user_permissions (user_id, permission) VALUES (?1, ?2)",
                &[Value::Text(user.id), Value::Text(permission.to_string())],
            )
            .map_err(AuthError::storage)?;
        tracing::info!(username, permission, "permission granted");
        Ok(())
    }

    /// Direct permissions plus those inherited from groups.
    pub fn effective_permissions(&self, user_id: &str) -> Result<BTreeSet<String>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT permission FROM user_permissions WHERE user_id = ?1 \
                 UNION \
                 SELECT p.permission AS permission FROM group_permissions p \
                 JOIN group_members m ON m.group_id = p.group_id WHERE m.user_id = ?1",
                &[Value::Text(user_id.to_string())],
            )
            .map_err(AuthError::storage)?;
        Ok(rows.iter().map(|r| r.text("permission")).collect())
    }
}
