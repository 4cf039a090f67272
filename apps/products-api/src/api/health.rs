//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_products::{ProductRepository, ProductService};
use serde_json::Value;

async fn ready<R: ProductRepository + 'static>(
    State(service): State<ProductService<R>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let store: HealthCheckFuture =
        Box::pin(async { service.health_check().await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("store", store)]).await
}

/// `/ready`: 200 while the product store answers, 503 otherwise
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/ready", get(ready::<R>))
        .with_state(service)
}
