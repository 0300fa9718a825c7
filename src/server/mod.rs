use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::audit::{AuditError, AuditReport, Auditor, ProContent};
use crate::profile::ProfileError;

#[derive(Clone)]
pub struct AppState {
    pub auditor: Arc<Auditor>,
}

pub enum ApiError {
    Audit(AuditError),
    /// Request body that is not JSON or does not match the request type.
    Body(JsonRejection),
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        Self::Audit(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Audit(err) => {
                let status = match err {
                    AuditError::Profile(ProfileError::InvalidHandle(_)) => StatusCode::BAD_REQUEST,
                    AuditError::Profile(ProfileError::NotFound(_)) => StatusCode::NOT_FOUND,
                    AuditError::Profile(_) => StatusCode::BAD_GATEWAY,
                    AuditError::MissingContext(_) => StatusCode::BAD_REQUEST,
                };
                if status.is_server_error() {
                    warn!(error = %err, "request failed upstream");
                }
                (status, err.to_string())
            }
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub handle: String,
    #[serde(default)]
    pub fresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProRequest {
    pub handle: String,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, ApiError> {
    let Json(body) = body?;
    let report = state.auditor.analyze(&body.handle, body.fresh).await?;
    Ok(Json(report))
}

async fn generate_pro_content(
    State(state): State<AppState>,
    body: Result<Json<ProRequest>, JsonRejection>,
) -> Result<Json<ProContent>, ApiError> {
    let Json(body) = body?;
    let content = state.auditor.generate_pro(&body.handle).await?;
    Ok(Json(content))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/generate-pro-content", post(generate_pro_content))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, auditor: Arc<Auditor>) -> Result<()> {
    let app = build_router(AppState { auditor });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::tests::stub_auditor;
    use crate::cache::ResultCache;
    use crate::scoring::ChecklistResult;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(cache: ResultCache) -> Router {
        let (auditor, _, _) = stub_auditor(1_000, Some(ChecklistResult::uniform(true)), cache);
        build_router(AppState {
            auditor: Arc::new(auditor),
        })
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn pro_request(handle: &str) -> Request<Body> {
        post_json(
            "/api/generate-pro-content",
            serde_json::json!({ "handle": handle }),
        )
    }

    async fn read_body(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let resp = app(ResultCache::disabled())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let resp = app(ResultCache::disabled())
            .oneshot(post_json("/api/analyze", serde_json::json!({ "handle": "Jane" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_body(resp).await;
        assert_eq!(body["analysis"]["totalScore"], 100);
        assert_eq!(body["analysis"]["keyScores"]["nicheClarity"], 100);
        assert_eq!(body["isCached"], false);
        assert_eq!(body["checklistFallback"], false);
        assert_eq!(body["profile"]["screenName"], "jane");
    }

    #[tokio::test]
    async fn test_analyze_error_statuses() {
        let cases = [
            ("bad handle!", StatusCode::BAD_REQUEST),
            ("ghost", StatusCode::NOT_FOUND),
            ("flaky", StatusCode::BAD_GATEWAY),
        ];
        for (handle, expected) in cases {
            let resp = app(ResultCache::disabled())
                .oneshot(post_json(
                    "/api/analyze",
                    serde_json::json!({ "handle": handle }),
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), expected, "handle {handle}");
            let body = read_body(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_pro_content_needs_prior_audit() {
        let dir = TempDir::new().unwrap();
        let router = app(ResultCache::new(dir.path().to_path_buf(), true));

        let resp = router
            .clone()
            .oneshot(pro_request("jane"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Run audit first"));

        let resp = router
            .clone()
            .oneshot(post_json("/api/analyze", serde_json::json!({ "handle": "jane" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = router
            .oneshot(pro_request("jane"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["isCached"], false);
        assert!(body["monetizationKit"]["projectedSponsorValue"].is_string());
        assert!(body["fixesGrowth"]["contentHook"].is_string());
    }

    #[tokio::test]
    async fn test_bad_body_returns_json_error() {
        let resp = app(ResultCache::disabled())
            .oneshot(
                Request::post("/api/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(read_body(resp).await["error"].is_string());

        let resp = app(ResultCache::disabled())
            .oneshot(post_json("/api/analyze", serde_json::json!({ "fresh": true })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("handle"));

        let resp = app(ResultCache::disabled())
            .oneshot(
                Request::post("/api/generate-pro-content")
                    .body(Body::from(r#"{"handle":"jane"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(read_body(resp).await["error"].is_string());
    }
}
