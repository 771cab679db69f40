//! Inventory log handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{roles, CurrentUser};
use crate::dto::product::{InventoryTransactionResponse, LogInventoryRequest};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Records a stock movement and returns its audit entry
pub async fn log_transaction(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<LogInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryTransactionResponse>), ApiError> {
    user.require_any_role(roles::CATALOG_WRITERS)?;
    let (product_id, movement) = request.into_parts();
    let transaction = state
        .services
        .inventory
        .log_transaction(product_id, movement, user.id())
        .await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// Lists the audit trail, newest first
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryTransactionResponse>>, ApiError> {
    let transactions = state.services.inventory.list_transactions().await?;
    Ok(Json(
        transactions
            .into_iter()
            .map(InventoryTransactionResponse::from)
            .collect(),
    ))
}
