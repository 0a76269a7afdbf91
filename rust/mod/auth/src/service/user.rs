use bizdir_core::{new_id, now_rfc3339};
use bizdir_sql::Value;

use crate::model::{CreateUser, SignupRequest, User};
use crate::service::password::{MIN_PASSWORD_LEN, hash_password};
use crate::service::{AuthError, AuthService, DEFAULT_GROUP};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_superuser, is_active, date_joined, created_at, updated_at";

/// Usernames: letters, digits and `@.+-_`, at most 150 characters.
fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::Validation("username is required".into()));
    }
    if username.chars().count() > 150 {
        return Err(AuthError::Validation("username is longer than 150 characters".into()));
    }
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !ok {
        return Err(AuthError::Validation(format!(
            "username {:?} may only contain letters, digits and @.+-_",
            username
        )));
    }
    Ok(())
}

impl AuthService {
    /// Self-service registration. The new account joins the default group.
    pub fn signup(&self, input: SignupRequest) -> Result<User, AuthError> {
        let username = input.username.trim().to_string();
        validate_username(&username)?;

        let email = input.email.trim().to_lowercase();
        if !email.is_empty() {
            if !email.contains('@') {
                return Err(AuthError::Validation(format!("invalid email address: {}", email)));
            }
            if self.find_user_by_email(&email)?.is_some() {
                return Err(AuthError::Conflict(format!(
                    "email {} is already registered",
                    email
                )));
            }
        }

        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if input.password != input.confirm_password {
            return Err(AuthError::Validation("passwords do not match".into()));
        }

        let user = self.create_user(CreateUser {
            username,
            email,
            password_hash: hash_password(&input.password)?,
            is_superuser: false,
            date_joined: None,
        })?;

        let group = self.ensure_group(DEFAULT_GROUP)?;
        self.add_group_member(&group.id, &user.id)?;
        tracing::info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Insert a user row. Fails with `Conflict` when the username is taken
    /// (ignoring case).
    pub fn create_user(&self, input: CreateUser) -> Result<User, AuthError> {
        validate_username(&input.username)?;
        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            is_superuser: input.is_superuser,
            is_active: true,
            date_joined: input.date_joined.unwrap_or_else(|| now.clone()),
            created_at: now.clone(),
            updated_at: now,
        };

        self.sql
            .exec(
                "INSERT INTO users (id, username, username_key, email, password_hash, \
                 is_superuser, is_active, date_joined, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8, ?9)",
                &[
                    Value::Text(user.id.clone()),
                    Value::Text(user.username.clone()),
                    Value::Text(user.username.to_lowercase()),
                    Value::Text(user.email.clone()),
                    Value::Text(user.password_hash.clone()),
                    Value::Integer(user.is_superuser as i64),
                    Value::Text(user.date_joined.clone()),
                    Value::Text(user.created_at.clone()),
                    Value::Text(user.updated_at.clone()),
                ],
            )
            .map_err(|e| match AuthError::storage(e) {
                AuthError::Conflict(_) => {
                    AuthError::Conflict(format!("username {} is already taken", user.username))
                }
                other => other,
            })?;

        Ok(user)
    }

    /// Create a superuser account from a plaintext password.
    pub fn create_superuser(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let user = self.create_user(CreateUser {
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash: hash_password(password)?,
            is_superuser: true,
            date_joined: None,
        })?;
        tracing::info!(username = %user.username, "superuser created");
        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(AuthError::storage)?;
        rows.first()
            .map(User::from_row)
            .ok_or_else(|| AuthError::NotFound(format!("users/{}", id)))
    }

    /// Find a user by username, ignoring case.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {} FROM users WHERE username_key = ?1", USER_COLUMNS);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(username.trim().to_lowercase())])
            .map_err(AuthError::storage)?;
        Ok(rows.first().map(User::from_row))
    }

    /// Find a user by email, ignoring case.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let sql = format!(
            "SELECT {} FROM users WHERE lower(email) = ?1 LIMIT 1",
            USER_COLUMNS
        );
        let rows = self
            .sql
            .query(&sql, &[Value::Text(email.trim().to_lowercase())])
            .map_err(AuthError::storage)?;
        Ok(rows.first().map(User::from_row))
    }

    /// Replace a user's email.
    pub fn set_user_email(&self, id: &str, email: &str) -> Result<(), AuthError> {
        let affected = self
            .sql
            .exec(
                "UPDATE users SET email = ?1, updated_at = ?2 WHERE id = ?3",
                &[
                    Value::Text(email.to_string()),
                    Value::Text(now_rfc3339()),
                    Value::Text(id.to_string()),
                ],
            )
            .map_err(AuthError::storage)?;
        if affected == 0 {
            return Err(AuthError::NotFound(format!("users/{}", id)));
        }
        Ok(())
    }
}
