pub mod routes;
pub mod models;
pub mod errors;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::aggregator::Aggregator;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

pub fn create_app_state(aggregator: Aggregator) -> AppState {
    AppState {
        aggregator: Arc::new(aggregator),
    }
}

/// Any origin may call the relay with GET/POST and a JSON body.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/costs", post(routes::costs::get_costs))
        .route("/api/top-resources", post(routes::resources::get_top_resources))
        .route("/api/plans", get(routes::plans::get_plans))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
