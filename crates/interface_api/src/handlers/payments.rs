//! Payment handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{roles, CurrentUser};
use crate::dto::payment::*;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Posts a payment against a customer or supplier balance
pub async fn create_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    user.require_any_role(roles::CATALOG_WRITERS)?;
    let payment = state.services.payments.post_payment(request.into(), user.id()).await?;
    Ok((StatusCode::CREATED, Json(payment.into())))
}

/// Lists payments by payment date, newest first, with counterparties
pub async fn list_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = state.services.payments.list_payments().await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}
