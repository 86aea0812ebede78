//! Router configuration for the API.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::any};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::config::Settings;
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Builds the application router.
///
/// Middleware is applied in reverse order of declaration, so request ids
/// are assigned before the logging span opens.
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let server = &settings.server;
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .merge(handlers::users::user_routes())
        .merge(handlers::stories::story_routes())
        .split_for_parts();

    router
        .route("/api/users/", any(handlers::empty_id))
        .route("/api/stories/", any(handlers::empty_id))
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, api))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(cors_layer(
            &server.cors_origins,
            settings.application.environment.is_production(),
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// A `*` entry allows any origin, as does an empty list outside production.
fn cors_layer(origins: &[String], production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.iter().any(|o| o == "*") || (origins.is_empty() && !production) {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn router() -> Router {
        let state = AppState::memory().await.unwrap();
        create_router(state, &Settings::default())
    }

    #[tokio::test]
    async fn test_openapi_document_lists_resources() {
        let response = router()
            .await
            .oneshot(Request::builder().uri(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/api/users"].is_object());
        assert!(doc["paths"]["/api/stories/{id}"].is_object());
        assert!(doc["paths"]["/health"].is_object());
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let mut settings = Settings::default();
        settings.server.cors_origins = vec!["https://app.example".to_string()];
        let app = create_router(AppState::memory().await.unwrap(), &settings);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/users")
                    .header(header::ORIGIN, "https://app.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );
    }

    #[test]
    fn test_cors_origin_list_skips_invalid_values() {
        // Construction must not panic on a value that is not a header value
        let _ = cors_layer(&["https://ok.example".to_string(), "bad\nvalue".to_string()], true);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .await
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
