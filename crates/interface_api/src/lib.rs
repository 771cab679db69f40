//! HTTP API Layer
//!
//! The REST API of the back office, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per resource, calling the application services
//! - **Middleware**: JWT authentication and audit logging
//! - **DTOs**: camelCase request and response bodies
//! - **Error Handling**: domain errors mapped to status codes with a JSON body
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(services, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod extract;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_billing::BackOfficeServices;

use crate::config::ApiConfig;
use crate::handlers::{
    auth as auth_handlers, customers, health, inventory, payments, products, reports, sales, suppliers,
};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub services: BackOfficeServices,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(services: BackOfficeServices, config: ApiConfig) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
///
/// `/health` and `/health/ready` are public; everything under `/api`
/// requires a bearer token.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let product_routes = Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route(
            "/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/:id/adjust", post(products::adjust_stock));

    let inventory_routes = Router::new().route(
        "/",
        get(inventory::list_transactions).post(inventory::log_transaction),
    );

    let customer_routes = Router::new()
        .route("/", get(customers::list_customers).post(customers::create_customer))
        .route("/pending", get(customers::pending_customers))
        .route(
            "/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/:id/reconciliation", get(customers::reconcile_customer));

    let supplier_routes = Router::new()
        .route("/", get(suppliers::list_suppliers).post(suppliers::create_supplier))
        .route(
            "/:id",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route("/:id/reconciliation", get(suppliers::reconcile_supplier));

    let sales_routes = Router::new()
        .route("/", get(sales::list_sales).post(sales::create_sale))
        .route("/:id", get(sales::get_sale));

    let payment_routes = Router::new().route(
        "/",
        get(payments::list_payments).post(payments::create_payment),
    );

    let report_routes = Router::new()
        .route("/overview", get(reports::overview))
        .route("/sales-by-month", get(reports::sales_by_month));

    // Auth runs first so the audit log sees the caller
    let api_routes = Router::new()
        .nest("/products", product_routes)
        .nest("/inventory", inventory_routes)
        .nest("/customers", customer_routes)
        .nest("/suppliers", supplier_routes)
        .nest("/sales", sales_routes)
        .nest("/payments", payment_routes)
        .nest("/reports", report_routes)
        .route("/dashboard", get(reports::dashboard))
        .route("/auth/profile", get(auth_handlers::profile))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
