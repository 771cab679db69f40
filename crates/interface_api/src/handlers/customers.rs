//! Customer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::CustomerId;

use crate::dto::party::*;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.services.parties.list_customers().await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state.services.parties.create_customer(request.into()).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.services.parties.get_customer(CustomerId::from_uuid(id)).await?;
    Ok(Json(customer.into()))
}

/// Updates contact details; the balance is not writable here
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .services
        .parties
        .update_customer(CustomerId::from_uuid(id), request.into())
        .await?;
    Ok(Json(customer.into()))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.parties.delete_customer(CustomerId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Customers with pending or partial invoices, largest amount first
pub async fn pending_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingCustomerResponse>>, ApiError> {
    let pending = state.services.reports.pending_by_customer().await?;
    Ok(Json(pending.into_iter().map(PendingCustomerResponse::from).collect()))
}

pub async fn reconcile_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconciliationResponse>, ApiError> {
    let report = state
        .services
        .reports
        .reconcile_customer(CustomerId::from_uuid(id))
        .await?;
    Ok(Json(report.into()))
}
