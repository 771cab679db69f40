//! Supplier handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::SupplierId;

use crate::dto::party::*;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplierResponse>>, ApiError> {
    let suppliers = state.services.parties.list_suppliers().await?;
    Ok(Json(suppliers.into_iter().map(SupplierResponse::from).collect()))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<SupplierResponse>), ApiError> {
    let supplier = state.services.parties.create_supplier(request.into()).await?;
    Ok((StatusCode::CREATED, Json(supplier.into())))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierResponse>, ApiError> {
    let supplier = state.services.parties.get_supplier(SupplierId::from_uuid(id)).await?;
    Ok(Json(supplier.into()))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSupplierRequest>,
) -> Result<Json<SupplierResponse>, ApiError> {
    let supplier = state
        .services
        .parties
        .update_supplier(SupplierId::from_uuid(id), request.into())
        .await?;
    Ok(Json(supplier.into()))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.parties.delete_supplier(SupplierId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reconcile_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconciliationResponse>, ApiError> {
    let report = state
        .services
        .reports
        .reconcile_supplier(SupplierId::from_uuid(id))
        .await?;
    Ok(Json(report.into()))
}
