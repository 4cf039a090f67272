//! API routes module

pub mod health;

use axum::Router;
use axum_helpers::{create_router, health_router};
use core_config::{AppInfo, server::ServerConfig};
use domain_products::{ProductRepository, ProductService, handlers};
use std::io;

use crate::openapi::ApiDoc;

/// Routes nested under `/api`
pub fn routes<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new().nest("/products", handlers::router(service))
}

/// Full application: API, documentation, `/health` and `/ready`
pub fn app<R: ProductRepository + 'static>(
    service: ProductService<R>,
    app_info: AppInfo,
    server: &ServerConfig,
) -> io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(service.clone()), server)?
        .merge(health_router(app_info))
        .merge(health::router(service));

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use domain_products::InMemoryProductRepository;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let service = ProductService::new(InMemoryProductRepository::seeded());
        app(service, core_config::app_info!(), &ServerConfig::default()).unwrap()
    }

    async fn get(uri: &str) -> Response {
        test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_products_are_mounted_under_api() {
        let response = get("/api/products").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let health = get("/health").await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(json_body(health).await["name"], "products_api");

        let ready = get("/ready").await;
        assert_eq!(ready.status(), StatusCode::OK);
        let body = json_body(ready).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["store"], "connected");
    }

    #[tokio::test]
    async fn test_openapi_lists_product_paths() {
        let response = get("/api-docs/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json_body(response).await;
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/products/search"));
        assert!(paths.contains_key("/api/products/{id}"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = get("/api/unknown").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], 1004);
    }
}
