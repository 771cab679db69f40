//! Dashboard and report handlers

use axum::{extract::State, Json};

use crate::auth::CurrentUser;
use crate::dto::report::*;
use crate::error::ApiError;
use crate::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let summary = state.services.reports.dashboard().await?;
    Ok(Json(DashboardResponse::new(user.0.sub, summary)))
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ApiError> {
    let overview = state.services.reports.overview().await?;
    Ok(Json(overview.into()))
}

/// Sales totals per calendar month, oldest first
pub async fn sales_by_month(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthlySalesResponse>>, ApiError> {
    let months = state.services.reports.sales_by_month().await?;
    Ok(Json(months.into_iter().map(MonthlySalesResponse::from).collect()))
}
