//! Authentication and authorization
//!
//! Bearer tokens are HS256 JWTs whose subject is the user's UUID. The
//! auth middleware validates the token and stores the [`Claims`] in the
//! request extensions; handlers pick them up through [`CurrentUser`] and
//! check role gates with [`CurrentUser::require_any_role`].

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use core_kernel::UserId;

use crate::error::ApiError;

/// Role names carried in tokens
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const MANAGER: &str = "manager";
    pub const STAFF: &str = "staff";

    /// Roles allowed to change the catalog, stock and payments
    pub const CATALOG_WRITERS: &[&str] = &[ADMIN, MANAGER];
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// The subject as a user id, if it is a UUID
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// Admin satisfies every role check
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role || r == roles::ADMIN)
    }

    pub fn has_any_role(&self, allowed: &[&str]) -> bool {
        allowed.iter().any(|role| self.has_role(role))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token could not be issued: {0}")]
    Encoding(String),
}

/// Creates a signed token for a user
pub fn create_token(
    user_id: UserId,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id.as_uuid().to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Encoding(e.to_string()))
}

/// Validates a token and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl CurrentUser {
    /// The caller's id, recorded as `created_by` on postings
    pub fn id(&self) -> Option<UserId> {
        self.0.user_id()
    }

    /// Fails with 403 unless the caller holds one of the roles
    pub fn require_any_role(&self, allowed: &[&str]) -> Result<(), ApiError> {
        if self.0.has_any_role(allowed) {
            Ok(())
        } else {
            warn!(user = %self.0.sub, required = ?allowed, "Role gate denied request");
            Err(ApiError::Forbidden(format!(
                "requires one of the roles: {}",
                allowed.join(", ")
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_subject_and_roles() {
        let user = UserId::new();
        let token = create_token(user, vec![roles::MANAGER.to_string()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(user));
        assert!(claims.has_role(roles::MANAGER));
        assert!(!claims.has_role(roles::ADMIN));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(UserId::new(), vec![], SECRET, 60).unwrap();
        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().as_uuid().to_string(),
            roles: vec![],
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_admin_passes_every_gate() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            roles: vec![roles::ADMIN.to_string()],
            exp: 0,
            iat: 0,
        };
        assert!(claims.has_any_role(roles::CATALOG_WRITERS));
        assert!(claims.has_role(roles::STAFF));
        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn test_staff_fails_writer_gate() {
        let user = CurrentUser(Claims {
            sub: UserId::new().as_uuid().to_string(),
            roles: vec![roles::STAFF.to_string()],
            exp: 0,
            iat: 0,
        });
        assert!(matches!(
            user.require_any_role(roles::CATALOG_WRITERS),
            Err(ApiError::Forbidden(_))
        ));
    }
}
