//! Move accounts from the legacy `legacy_users` table into the user store.

use crate::model::{CreateUser, LegacyUser, MigrationReport};
use crate::service::{AuthError, AuthService, DEFAULT_GROUP};

impl AuthService {
    /// Read every legacy row and upsert it by case-insensitive username.
    ///
    /// Existing users get their email refreshed when the legacy one differs
    /// and are put in the default group unless they are superusers. New users
    /// keep the legacy password hash verbatim.
    pub fn migrate_legacy_users(&self) -> Result<MigrationReport, AuthError> {
        let group = self.ensure_group(DEFAULT_GROUP)?;
        let rows = self
            .sql
            .query(
                "SELECT username, email, password, created_at FROM legacy_users ORDER BY id",
                &[],
            )
            .map_err(AuthError::storage)?;

        let mut report = MigrationReport::default();
        for legacy in rows.iter().map(LegacyUser::from_row) {
            let username = legacy.username.trim().to_string();
            let email = legacy.email.trim().to_lowercase();

            if let Some(user) = self.find_user_by_username(&username)? {
                if !email.is_empty() && user.email != email {
                    self.set_user_email(&user.id, &email)?;
                    report.emails_updated += 1;
                }
                if !user.is_superuser && !self.is_group_member(DEFAULT_GROUP, &user.id)? {
                    self.add_group_member(&group.id, &user.id)?;
                }
                report.already_existing += 1;
                continue;
            }

            let user = self.create_user(CreateUser {
                username,
                email,
                password_hash: legacy.password,
                is_superuser: false,
                date_joined: legacy.created_at,
            })?;
            self.add_group_member(&group.id, &user.id)?;
            tracing::info!(username = %user.username, "legacy user migrated");
            report.created += 1;
        }

        Ok(report)
    }
}
