//! HTTP surface: health, locale catalog, correction requests and engine
//! lifecycle endpoints.

pub mod error;

use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::correction::client::OllamaClient;
use crate::correction::engine::CorrectionEngine;
use crate::error::EngineError;
use crate::locale;

use self::error::{ApiError, ErrorResponse};

/// Inputs of this length or more are rejected before sanitization.
pub const MAX_INPUT_CHARS: usize = 1000;

pub struct AppState {
    pub engine: RwLock<CorrectionEngine>,
    pub config: Config,
}

#[derive(Debug, Deserialize)]
pub struct CorrectionRequest {
    pub locale: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CorrectionResponse {
    pub success: bool,
    pub corrections: Vec<String>,
    pub original: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct LocaleEntry {
    code: &'static str,
    name: &'static str,
    sample: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct LocalesResponse {
    success: bool,
    locales: Vec<LocaleEntry>,
}

#[derive(Debug, Deserialize)]
pub struct InitializeRequest {
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
struct EngineStatusResponse {
    success: bool,
    state: String,
    backend: String,
}

#[get("/api/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[get("/api/locales")]
async fn locales() -> impl Responder {
    let locales = locale::all()
        .iter()
        .map(|entry| LocaleEntry {
            code: entry.code,
            name: entry.name,
            sample: locale::sample_text(entry.code),
        })
        .collect();

    HttpResponse::Ok().json(LocalesResponse {
        success: true,
        locales,
    })
}

#[post("/api/corrections")]
async fn corrections(
    state: web::Data<AppState>,
    request: web::Json<CorrectionRequest>,
) -> Result<HttpResponse, ApiError> {
    let CorrectionRequest { locale, text } = request.into_inner();

    if !locale::is_supported(&locale) {
        return Err(ApiError::BadRequest(format!("Unsupported locale: {locale}")));
    }
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide text to correct".to_string(),
        ));
    }
    if text.chars().count() >= MAX_INPUT_CHARS {
        return Err(ApiError::BadRequest(
            "Input text is too long. Please limit to 1000 characters or less.".to_string(),
        ));
    }

    // the generator client blocks, so the whole pipeline runs off the
    // async workers
    let outcome = web::block(move || state.engine.read().correct(&locale, &text))
        .await
        .map_err(|error| ApiError::Internal(error.to_string()))??;

    Ok(HttpResponse::Ok().json(CorrectionResponse {
        success: true,
        corrections: outcome.corrections,
        original: outcome.original,
    }))
}

#[post("/api/engine/initialize")]
async fn initialize_engine(
    state: web::Data<AppState>,
    request: Option<web::Json<InitializeRequest>>,
) -> Result<HttpResponse, ApiError> {
    let requested_model = request.and_then(|body| body.into_inner().model);

    let (state_label, backend) = web::block(move || {
        let mut engine = state.engine.write();

        if let Some(model) = requested_model {
            let client = OllamaClient::new(
                &state.config.generator_endpoint,
                &model,
                state.config.request_timeout(),
            )
            .map_err(|error| EngineError::Initialization {
                details: format!("{error:#}"),
            })?;
            engine.change_backend(Box::new(client));
        }

        engine.initialize()?;
        Ok::<_, EngineError>((engine.state().label(), engine.describe_backend()))
    })
    .await
    .map_err(|error| ApiError::Internal(error.to_string()))??;

    Ok(HttpResponse::Ok().json(EngineStatusResponse {
        success: true,
        state: state_label.to_string(),
        backend,
    }))
}

#[get("/api/engine/status")]
async fn engine_status(state: web::Data<AppState>) -> impl Responder {
    let engine = state.engine.read();
    HttpResponse::Ok().json(EngineStatusResponse {
        success: true,
        state: engine.state().label().to_string(),
        backend: engine.describe_backend(),
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        success: false,
        error: "not_found".to_string(),
        message: "Endpoint not found".to_string(),
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(locales)
        .service(corrections)
        .service(initialize_engine)
        .service(engine_status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use crate::correction::client::{GeneratedResponse, MockGeneratorClient};
    use crate::correction::extract::ResponseMode;

    fn mock_client() -> MockGeneratorClient {
        let mut client = MockGeneratorClient::new();
        client
            .expect_describe()
            .returning(|| "test-model via mock".to_string());
        client
    }

    fn ready_engine(reply: &str, mode: ResponseMode) -> CorrectionEngine {
        let mut client = mock_client();
        client.expect_warm_up().returning(|| Ok(()));
        let text = reply.to_string();
        client
            .expect_generate()
            .returning(move |_| Ok(GeneratedResponse { text: text.clone(), mode }));

        let mut engine = CorrectionEngine::new(Box::new(client));
        engine.initialize().unwrap();
        engine
    }

    fn app_state(engine: CorrectionEngine) -> web::Data<AppState> {
        web::Data::new(AppState {
            engine: RwLock::new(engine),
            config: Config::default(),
        })
    }

    #[actix_web::test]
    async fn test_health_reports_ok() {
        let app = test::init_service(App::new().configure(configure)).await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn test_locales_lists_the_catalog() {
        let app = test::init_service(App::new().configure(configure)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/locales").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], true);
        let locales = body["locales"].as_array().unwrap();
        assert_eq!(locales.len(), 10);
        assert_eq!(locales[0]["code"], "en");
        assert!(locales[0]["sample"].is_string());
    }

    #[actix_web::test]
    async fn test_corrections_rejects_unknown_locale() {
        let state = app_state(CorrectionEngine::new(Box::new(mock_client())));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/corrections")
            .set_json(serde_json::json!({"locale": "xx", "text": "I are happy"}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_corrections_rejects_empty_text() {
        let state = app_state(CorrectionEngine::new(Box::new(mock_client())));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/corrections")
            .set_json(serde_json::json!({"locale": "en", "text": "   "}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_corrections_rejects_input_at_the_length_cap() {
        let state = app_state(CorrectionEngine::new(Box::new(mock_client())));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/corrections")
            .set_json(serde_json::json!({"locale": "en", "text": "a".repeat(1000)}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_corrections_accepts_input_below_the_length_cap() {
        let state = app_state(ready_engine(
            r#"{"corrections": ["short fix"]}"#,
            ResponseMode::Structured,
        ));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/corrections")
            .set_json(serde_json::json!({"locale": "en", "text": "a".repeat(999)}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_corrections_requires_initialized_engine() {
        let state = app_state(CorrectionEngine::new(Box::new(mock_client())));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/corrections")
            .set_json(serde_json::json!({"locale": "en", "text": "I are happy"}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_corrections_happy_path() {
        let state = app_state(ready_engine(
            r#"{"corrections": ["I am happy", "I was happy"]}"#,
            ResponseMode::Structured,
        ));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/corrections")
            .set_json(serde_json::json!({"locale": "en", "text": "I are happy"}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["corrections"],
            serde_json::json!(["I am happy", "I was happy"])
        );
        assert_eq!(body["original"], "I are happy");
    }

    #[actix_web::test]
    async fn test_initialize_endpoint_reaches_ready() {
        let mut client = mock_client();
        client.expect_warm_up().returning(|| Ok(()));
        let state = app_state(CorrectionEngine::new(Box::new(client)));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/engine/initialize")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["state"], "ready");
    }

    #[actix_web::test]
    async fn test_initialize_endpoint_reports_backend_failure() {
        let mut client = mock_client();
        client
            .expect_warm_up()
            .returning(|| Err(anyhow::anyhow!("connection refused")));
        let state = app_state(CorrectionEngine::new(Box::new(client)));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let request = test::TestRequest::post()
            .uri("/api/engine/initialize")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_engine_status_before_initialization() {
        let state = app_state(CorrectionEngine::new(Box::new(mock_client())));
        let app =
            test::init_service(App::new().app_data(state).configure(configure)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/engine/status").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["state"], "uninitialized");
    }

    #[actix_web::test]
    async fn test_unknown_route_returns_json_404() {
        let app = test::init_service(
            App::new()
                .configure(configure)
                .default_service(web::route().to(not_found)),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/nothing").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Endpoint not found");
    }
}
