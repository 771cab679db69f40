//! Invoice handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::SaleId;

use crate::auth::CurrentUser;
use crate::dto::sale::*;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Posts an invoice
///
/// Numbering, the customer balance and stock decrements commit together
/// with the invoice or not at all.
pub async fn create_sale(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    let sale = state.services.sales.create_sale(request.into(), user.id()).await?;
    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// Lists invoices, newest first
pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let sales = state.services.sales.list_sales().await?;
    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale = state.services.sales.get_sale(SaleId::from_uuid(id)).await?;
    Ok(Json(sale.into()))
}
