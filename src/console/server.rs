// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{Router, middleware, response::IntoResponse, routing::get};
use http::{HeaderValue, Method, StatusCode, header, header::InvalidHeaderValue};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::ConsoleConfig;
use crate::console::{middleware::credentials, routes, state::AppState};
use crate::context::Context;

/// Starts the console HTTP server
pub async fn run(config: ConsoleConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting PDB console on port {}", config.port);

    let port = config.port;
    let app = build_router(AppState::new(config))?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Console server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  - GET  /api/v1/namespaces/{{namespace}}/poddisruptionbudgets");
    tracing::info!("  - GET  /api/v1/namespaces/{{namespace}}/violations");
    tracing::info!("  - GET  /api/v1/namespaces/{{namespace}}/workloads/{{kind}}/{{name}}/pdb");
    tracing::info!("  - GET  /healthz");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application with its middleware stack. Fails only when the
/// configured CORS origin is not a valid header value.
pub fn build_router(state: AppState) -> Result<Router, InvalidHeaderValue> {
    let origin = state.config.allowed_origin.parse::<HeaderValue>()?;

    Ok(Router::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(ready_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(middleware::from_fn(credentials::credentials_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        ))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(routes::pdb_routes())
        .merge(routes::workload_routes())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once a Kubernetes client can be configured.
async fn ready_check() -> impl IntoResponse {
    match Context::infer(None).await {
        Ok(_) => (StatusCode::OK, "Ready"),
        Err(e) => {
            tracing::warn!("not ready: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use http::{Request, request::Builder};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(ConsoleConfig::default())).unwrap()
    }

    fn authorized(builder: Builder) -> Builder {
        builder.header(header::AUTHORIZATION, "Bearer test-token")
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_without_token_is_unauthorized() {
        for request in [
            Request::get("/api/v1/namespaces/default/poddisruptionbudgets"),
            Request::delete("/api/v1/namespaces/default/poddisruptionbudgets/web-pdb"),
            Request::get("/api/v1/namespaces/default/workloads/deployments/web/pdb"),
        ] {
            let response = app()
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "Unauthorized");
        }

        let response = app()
            .oneshot(
                Request::get("/api/v1/namespaces/default/violations")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_workload_kind_is_bad_request() {
        let response = app()
            .oneshot(
                authorized(Request::get(
                    "/api/v1/namespaces/default/workloads/cronjobs/nightly/pdb",
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "BadRequest");
        assert!(json["message"].as_str().unwrap().contains("cronjobs"));
    }

    #[tokio::test]
    async fn test_malformed_form_is_rejected() {
        let response = app()
            .oneshot(
                authorized(Request::post("/api/v1/namespaces/default/poddisruptionbudgets"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_for_other_namespace_is_rejected() {
        let response = app()
            .oneshot(
                authorized(Request::post("/api/v1/namespaces/default/poddisruptionbudgets"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"web-pdb","namespace":"prod"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(
                authorized(Request::get("/api/v1/namespaces/default/deployments"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = ConsoleConfig {
            allowed_origin: "bad\norigin".to_owned(),
            ..Default::default()
        };
        assert!(build_router(AppState::new(config)).is_err());
    }
}
