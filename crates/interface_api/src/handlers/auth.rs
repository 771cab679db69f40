//! Caller identity
//!
//! Tokens are issued elsewhere; the API only reads what they carry.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::CurrentUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub roles: Vec<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// The authenticated caller as seen by the role gates
pub async fn profile(CurrentUser(claims): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: claims.sub,
        roles: claims.roles,
        issued_at: DateTime::from_timestamp(claims.iat, 0),
        expires_at: DateTime::from_timestamp(claims.exp, 0),
    })
}
