use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use bizdir_core::new_id;
use bizdir_sql::Value;

use crate::model::{Claims, Principal, Session, TokenResponse, User};
use crate::service::password::verify_password;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Authenticate with username (any case) and password, issuing a token.
    pub fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .find_user_by_username(username)?
            .filter(|u| u.is_active && verify_password(password, &u.password_hash))
            .ok_or_else(|| {
                tracing::warn!(username, "failed login");
                AuthError::Unauthorized("invalid username or password".into())
            })?;

        let token = self.issue_token(&user)?;
        tracing::info!(username = %user.username, "user logged in");
        Ok(token)
    }

    /// Issue a signed access token and record the session.
    pub fn issue_token(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let session_id = new_id();
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.username.clone(),
            superuser: user.is_superuser,
            perms: self.effective_permissions(&user.id)?.into_iter().collect(),
            sid: session_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))?;

        self.sql
            .exec(
                "INSERT INTO sessions (id, user_id, revoked, issued_at, expires_at) \
                 VALUES (?1, ?2, 0, ?3, ?4)",
                &[
                    Value::Text(session_id),
                    Value::Text(user.id.clone()),
                    Value::Text(now.to_rfc3339()),
                    Value::Text(exp.to_rfc3339()),
                ],
            )
            .map_err(AuthError::storage)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify a token and resolve the caller.
    /// Fails when the signature or expiry is invalid, or the session was revoked.
    pub fn verify_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))?
        .claims;

        match self.get_session(&claims.sid)? {
            Some(s) if !s.revoked => Ok(Principal::from(claims)),
            Some(_) => Err(AuthError::Unauthorized("session has been revoked".into())),
            None => Err(AuthError::Unauthorized("unknown session".into())),
        }
    }

    /// Revoke a session; its token stops verifying.
    pub fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        let affected = self
            .sql
            .exec(
                "UPDATE sessions SET revoked = 1 WHERE id = ?1",
                &[Value::Text(session_id.to_string())],
            )
            .map_err(AuthError::storage)?;
        if affected == 0 {
            return Err(AuthError::NotFound(format!("sessions/{}", session_id)));
        }
        Ok(())
    }

    fn get_session(&self, id: &str) -> Result<Option<Session>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id, user_id, revoked, issued_at, expires_at FROM sessions WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(AuthError::storage)?;
        Ok(rows.first().map(Session::from_row))
    }
}
