//! Health check endpoints for Kubernetes liveness and readiness probes

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::Catalog;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub catalog: CatalogHealth,
}

#[derive(Serialize, ToSchema)]
pub struct CatalogHealth {
    pub products: usize,
    pub priced_tests: usize,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// Ready once the catalog holds at least one product; an empty catalog can never
/// produce a candidate.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Catalog is empty", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(catalog: web::Data<Arc<Catalog>>) -> impl Responder {
    let ready = !catalog.products.is_empty();

    let status = ReadinessStatus {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: CatalogHealth {
            products: catalog.products.len(),
            priced_tests: catalog.pricing.len(),
        },
    };

    if ready {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PricingTable, Product};
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_readiness_follows_catalog() {
        let empty = Arc::new(Catalog::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(empty))
                .configure(configure),
        )
        .await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let stocked = Arc::new(Catalog::new(
            vec![Product {
                id: "prod-001".to_string(),
                name: "CloudGuard".to_string(),
                specs: vec!["firewall".to_string()],
                base_price: 1000.0,
                required_tests: vec![],
            }],
            PricingTable::default(),
        ));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(stocked))
                .configure(configure),
        )
        .await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
