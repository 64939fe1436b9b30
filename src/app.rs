use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{analysis, auth, feedback, meals, profiles};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(profiles::router())
                .merge(meals::router())
                .merge(feedback::router())
                .merge(analysis::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::ai::testing::ScriptedAi;
    use crate::auth::tokens::{JwtKeys, TokenKind};
    use crate::state::testing::{fake, fake_with, fake_with_ai, test_config, FakeStorage};

    fn token(kind: TokenKind) -> String {
        JwtKeys::from_config(&test_config().jwt)
            .sign(Uuid::new_v4(), kind)
            .unwrap()
    }

    fn bearer() -> String {
        format!("Bearer {}", token(TokenKind::Access))
    }

    fn json_request(method: Method, uri: &str, body: Value, auth: Option<String>) -> Request<Body> {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(a) = auth {
            req = req.header(header::AUTHORIZATION, a);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn post_json(uri: &str, body: Value, auth: Option<String>) -> Request<Body> {
        json_request(Method::POST, uri, body, auth)
    }

    async fn status_of(state: AppState, req: Request<Body>) -> StatusCode {
        build_app(state).oneshot(req).await.unwrap().status()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = build_app(fake())
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn feedback_requires_a_token() {
        let req = post_json("/api/v1/feedback", json!({"meal": {"name": "Ensalada"}}), None);
        assert_eq!(status_of(fake(), req).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let req = post_json(
            "/api/v1/feedback",
            json!({"meal": {"name": "Ensalada"}}),
            Some(format!("Bearer {}", token(TokenKind::Refresh))),
        );
        assert_eq!(status_of(fake(), req).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_endpoint_rejects_access_tokens() {
        let req = post_json(
            "/api/v1/auth/refresh",
            json!({"refresh_token": token(TokenKind::Access)}),
            None,
        );
        assert_eq!(status_of(fake(), req).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_validates_credentials() {
        for body in [
            json!({"email": "ana@example", "password": "secreto"}),
            json!({"email": "ana@example.com", "password": "12345"}),
        ] {
            let req = post_json("/api/v1/auth/register", body, None);
            assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn feedback_rejects_non_numeric_amounts() {
        let req = post_json(
            "/api/v1/feedback",
            json!({"meal": {"name": "Ensalada", "energy": "mucho"}}),
            Some(bearer()),
        );
        assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn diary_requires_known_meal_type_and_name() {
        for body in [
            json!({"meal": {"name": "Avena"}, "meal_type": "Merienda"}),
            json!({"meal": {"name": "Avena"}}),
            json!({"meal": {"name": "   ", "energy": "150"}, "meal_type": "Desayuno"}),
            json!({"meal": {"name": "Avena", "fat": "-2"}, "meal_type": "Desayuno"}),
        ] {
            let req = post_json("/api/v1/diary", body, Some(bearer()));
            assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn template_requires_a_name() {
        let req = post_json(
            "/api/v1/meals/templates",
            json!({"name": "", "energy": "200"}),
            Some(bearer()),
        );
        assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn profile_validation_errors_are_bad_requests() {
        for body in [
            json!({"age": "30", "height": "300", "weight": "70"}),
            json!({"age": "1a", "height": "170", "weight": "70"}),
            json!({"age": "30", "height": "170", "weight": "401"}),
            json!({"age": "30", "sex": "Otro", "height": "170", "weight": "70"}),
        ] {
            let req = json_request(Method::PUT, "/api/v1/profile", body, Some(bearer()));
            assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn photo_analysis_rejects_bad_images() {
        for body in [
            json!({"image_base64": "%%%"}),
            json!({"image_base64": "aGVsbG8=", "content_type": "application/pdf"}),
            json!({"image_base64": ""}),
        ] {
            let req = post_json("/api/v1/analysis/photo", body, Some(bearer()));
            assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn failed_photo_analysis_stores_nothing() {
        let storage = Arc::new(FakeStorage::default());
        let state = fake_with(Arc::new(ScriptedAi::failing("timeout")), storage.clone());
        let req = post_json(
            "/api/v1/analysis/photo",
            json!({"image_base64": "aGVsbG8=", "content_type": "image/png"}),
            Some(bearer()),
        );
        assert_eq!(status_of(state, req).await, StatusCode::BAD_GATEWAY);
        assert!(storage.keys.lock().unwrap().is_empty());

        let storage = Arc::new(FakeStorage::default());
        let state = fake_with(Arc::new(ScriptedAi::replying("no es JSON")), storage.clone());
        let req = post_json(
            "/api/v1/analysis/photo",
            json!({"image_base64": "aGVsbG8="}),
            Some(bearer()),
        );
        assert_eq!(status_of(state, req).await, StatusCode::BAD_GATEWAY);
        assert!(storage.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn barcode_with_bad_base64_is_rejected() {
        let req = post_json(
            "/api/v1/analysis/barcode",
            json!({"image_base64": "%%%"}),
            Some(bearer()),
        );
        assert_eq!(status_of(fake(), req).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn barcode_reads_fenced_model_json() {
        let ai = ScriptedAi::replying(
            "Aquí está:\n```json\n{\"es_codigo_barras\": true, \"datos_comida\": {\"nombre\": \"Yogur natural\", \"cantidad\": 125, \"energia\": 75}}\n```",
        );
        let res = build_app(fake_with_ai(Arc::new(ai)))
            .oneshot(post_json(
                "/api/v1/analysis/barcode",
                json!({"image_base64": "aGVsbG8="}),
                Some(bearer()),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["is_barcode"], true);
        assert_eq!(body["meal"]["name"], "Yogur natural");
        assert_eq!(body["meal"]["quantity"], "125");
    }

    #[tokio::test]
    async fn barcode_model_failure_is_bad_gateway() {
        let req = post_json(
            "/api/v1/analysis/barcode",
            json!({"image_base64": "aGVsbG8="}),
            Some(bearer()),
        );
        let state = fake_with_ai(Arc::new(ScriptedAi::failing("timeout")));
        assert_eq!(status_of(state, req).await, StatusCode::BAD_GATEWAY);
    }
}
