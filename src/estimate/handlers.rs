use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    routing::post,
    Json, Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::instrument;

use super::dto::{CalorieEstimate, EstimateRequest};
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    state::AppState,
};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Every estimation response, errors included, carries the CORS headers even
/// without an `Origin` header. Preflight is answered by the app-wide CORS layer.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/estimate-calories", post(estimate))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
}

/// POST /estimate-calories { food, quantity }
#[instrument(skip(state, payload))]
pub async fn estimate(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> AppResult<Json<CalorieEstimate>> {
    let Json(req) = payload?;
    let (food, quantity) = (req.food.trim(), req.quantity.trim());
    if food.is_empty() || quantity.is_empty() {
        return Err(AppError::validation(
            "Please enter food name and quantity first",
        ));
    }

    let estimate = state.estimator.estimate(food, quantity).await?;
    Ok(Json(estimate))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{Method, Request, Response, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{
        auth::jwt::JwtKeys,
        config::EstimatorConfig,
        estimate::fixtures::tool_call_body,
        state::test_support::test_state_with_estimator,
    };

    fn app_for(base_url: String, api_key: Option<&str>) -> (Router, String) {
        let state = test_state_with_estimator(EstimatorConfig {
            api_key: api_key.map(str::to_string),
            base_url,
            model: "google/gemini-2.5-flash".into(),
            timeout_secs: 5,
        });
        let token = JwtKeys::from_ref(&state).sign_access(Uuid::new_v4()).unwrap();
        (crate::app::build_app(state), token)
    }

    fn post(token: &str, body: Value) -> Request<Body> {
        Request::post("/api/v1/estimate-calories")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(res: Response<Body>) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(res: &Response<Body>) {
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
    }

    #[tokio::test]
    async fn success_returns_estimate_with_cors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_body(json!(
                r#"{"estimatedCalories":180.4,"confidence":"medium","portionSuggestion":"2 medium appams"}"#
            ))))
            .expect(1)
            .mount(&server)
            .await;

        let (app, token) = app_for(server.uri(), Some("k"));
        let res = app
            .oneshot(post(&token, json!({ "food": "Appam", "quantity": "2 pieces" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_cors(&res);
        let body = json_body(res).await;
        assert_eq!(
            body,
            json!({
                "food": "Appam",
                "quantity": "2 medium appams",
                "estimatedCalories": 180,
                "confidence": "medium",
                "portionSuggestion": "2 medium appams"
            })
        );
    }

    #[tokio::test]
    async fn rate_limit_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let (app, token) = app_for(server.uri(), Some("k"));
        let res = app
            .oneshot(post(&token, json!({ "food": "Puttu", "quantity": "1 cup" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_cors(&res);
        assert_eq!(
            json_body(res).await["error"],
            "Rate limit exceeded. Please try again later."
        );
    }

    #[tokio::test]
    async fn exhausted_credits_are_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402))
            .mount(&server)
            .await;

        let (app, token) = app_for(server.uri(), Some("k"));
        let res = app
            .oneshot(post(&token, json!({ "food": "Puttu", "quantity": "1 cup" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            json_body(res).await["error"],
            "AI credits exhausted. Please add credits."
        );
    }

    #[tokio::test]
    async fn missing_key_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (app, token) = app_for(server.uri(), None);
        let res = app
            .oneshot(post(&token, json!({ "food": "Puttu", "quantity": "1 cup" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&res);
        assert_eq!(
            json_body(res).await["error"],
            "AI_GATEWAY_API_KEY is not configured"
        );
    }

    #[tokio::test]
    async fn blank_fields_never_reach_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (app, token) = app_for(server.uri(), Some("k"));
        let res = app
            .oneshot(post(&token, json!({ "food": "Puttu", "quantity": "  " })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn options_is_empty_with_cors() {
        let (app, _) = app_for("http://127.0.0.1:9".into(), None);
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/estimate-calories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let allowed = res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_string();
        for name in ["authorization", "x-client-info", "apikey", "content-type"] {
            assert!(allowed.contains(name), "{allowed}");
        }
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
