//! # Service Handlers
//!
//! The informational endpoints outside the camp scope: the API index at
//! `/` and the health probe at `/health`. The talk endpoints live in
//! [`super::talks`].

use std::sync::Arc;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::AppState;
use crate::models::{ApiResponse, HealthResponse};

/// API information endpoint.
///
/// Lists the available endpoints.
///
/// ## Endpoint
///
/// `GET /`
pub async fn api_info() -> HttpResponse {
    let info = json!({
        "name": "Code Camp API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Talks of a code camp, addressed by camp moniker",
        "endpoints": {
            "health": {
                "method": "GET",
                "path": "/health",
                "description": "Health check endpoint"
            },
            "talks": {
                "list": {
                    "method": "GET",
                    "path": "/api/camps/{moniker}/talks",
                    "description": "List the talks of a camp"
                },
                "get": {
                    "method": "GET",
                    "path": "/api/camps/{moniker}/talks/{id}",
                    "description": "Get one talk"
                },
                "create": {
                    "method": "POST",
                    "path": "/api/camps/{moniker}/talks",
                    "description": "Create a talk for an existing speaker"
                },
                "update": {
                    "method": "PUT",
                    "path": "/api/camps/{moniker}/talks/{id}",
                    "description": "Update the fields present in the body"
                },
                "delete": {
                    "method": "DELETE",
                    "path": "/api/camps/{moniker}/talks/{id}",
                    "description": "Delete a talk"
                }
            }
        }
    });

    HttpResponse::Ok().json(ApiResponse::success(info))
}

/// Health check endpoint.
///
/// ## Endpoint
///
/// `GET /health`
///
/// ## Example
///
/// ```bash
/// curl http://127.0.0.1:8080/health
/// ```
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "status": "healthy",
///         "storage": true,
///         "storageMode": "postgres",
///         "version": "0.1.0",
///         "timestamp": "2026-10-18T12:00:00Z"
///     }
/// }
/// ```
///
/// Responds 503 with `"status": "unhealthy"` when the repository does
/// not answer.
pub async fn health_check(
    state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    let storage_healthy = state.repository.is_healthy().await;

    if !storage_healthy {
        warn!("Health check failed: {} storage unavailable", state.config.storage_mode);
    }

    let response = HealthResponse {
        status: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
        storage: storage_healthy,
        storage_mode: state.config.storage_mode.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    let status_code = if storage_healthy {
        actix_web::http::StatusCode::OK
    } else {
        actix_web::http::StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code)
        .json(ApiResponse::success(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    use crate::config::AppConfig;
    use crate::db::InMemoryCampRepository;

    #[actix_web::test]
    async fn test_health_reports_memory_storage() {
        let state = web::Data::new(Arc::new(AppState {
            repository: Arc::new(InMemoryCampRepository::new()),
            config: AppConfig::for_tests(),
        }));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::api::configure_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["storageMode"], "memory");
    }

    #[actix_web::test]
    async fn test_api_info_lists_talk_routes() {
        let app = test::init_service(App::new().route("/", web::get().to(api_info))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["endpoints"]["talks"]["get"]["path"], "/api/camps/{moniker}/talks/{id}");
    }
}
