pub mod auth;
pub mod health;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod settings;

use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use axum::routing::{get, post};
use axum::{middleware, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self { repo, config }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Everything below requires a bearer token; auth and probes stay open.
    let protected = Router::new()
        .route(
            "/api/purchases",
            get(purchases::list_purchases).post(purchases::create_purchase),
        )
        .route("/api/purchases/:id", axum::routing::delete(purchases::delete_purchase))
        .route(
            "/api/sales",
            get(sales::list_sales).post(sales::create_sale),
        )
        .route("/api/sales/:id", axum::routing::delete(sales::delete_sale))
        .route("/api/stock", get(sales::get_stock))
        .route("/api/reports", get(reports::get_report))
        .route("/api/reports/export", get(reports::export_report))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .layer(cors)
        .with_state(state)
}

/// Shared entry-date validation for the purchase and sale create handlers.
pub(crate) fn parse_required_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(AppError::Validation("Date is required".into()));
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Date must be in YYYY-MM-DD format".into()))
}
