//! Product handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum::extract::Query;
use uuid::Uuid;

use core_kernel::ProductId;

use crate::auth::{roles, CurrentUser};
use crate::dto::product::*;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Lists products by name, optionally filtered by `?search=`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearch>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.services.inventory.list_products(query.search).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

pub async fn create_product(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    user.require_any_role(roles::CATALOG_WRITERS)?;
    let product = state.services.inventory.create_product(request.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.services.inventory.get_product(ProductId::from_uuid(id)).await?;
    Ok(Json(product.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    user.require_any_role(roles::CATALOG_WRITERS)?;
    let product = state
        .services
        .inventory
        .update_product(ProductId::from_uuid(id), request.into())
        .await?;
    Ok(Json(product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_any_role(&[roles::ADMIN])?;
    state.services.inventory.delete_product(ProductId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Applies a stock movement and returns the updated product
///
/// Outbound movements never take stock below zero.
pub async fn adjust_stock(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AdjustStockRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    user.require_any_role(roles::CATALOG_WRITERS)?;
    let product = state
        .services
        .inventory
        .adjust_stock(ProductId::from_uuid(id), request.into(), user.id())
        .await?;
    Ok(Json(product.into()))
}
