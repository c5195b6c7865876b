use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use augur_core::analyzer::CompanyAnalyzer;
use augur_core::config::Settings;
use augur_core::domain::analysis::{AnalysisReport, AnalysisRequest};
use augur_core::domain::prediction::{self, Prediction, PredictionRequest};
use augur_core::domain::status::{self, DependencyStatus};
use augur_core::providers::market::{AlphaVantageClient, MarketDataSource};
use augur_core::providers::news::{NewsApiClient, NewsSource};
use augur_core::providers::voice::VoiceRssClient;
use augur_core::rng::{RandomSource, ThreadRngSource};

const MISSING_PREDICT_FIELDS: &str = "Missing required fields (topic, category, timeframe)";
const MISSING_TEXT: &str = "Text is required";
const MISSING_TTS_KEY: &str = "TTS API key not configured";
const MISSING_COMPANY: &str = "Company name is required";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState::from_settings(&settings)?;
    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/predict", post(predict))
        .route("/api/text-to-speech", post(text_to_speech))
        .route("/api/analyze", post(analyze))
        .route("/api/status", get(service_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    analyzer: Arc<CompanyAnalyzer>,
    voice: Option<Arc<VoiceRssClient>>,
    speech_to_text_configured: bool,
    rng: Arc<dyn RandomSource>,
}

impl AppState {
    fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let rng: Arc<dyn RandomSource> = Arc::new(ThreadRngSource);

        let news = NewsApiClient::from_settings(settings)?;
        if news.is_none() {
            tracing::warn!("NEWS_API_KEY not set; analysis falls back to synthesized headlines");
        }
        let market = AlphaVantageClient::from_settings(settings)?;
        if market.is_none() {
            tracing::warn!("ALPHAVANTAGE_API_KEY not set; analysis omits financial data");
        }
        let voice = VoiceRssClient::from_settings(settings)?;
        if voice.is_none() {
            tracing::warn!("VOICERSS_API_KEY not set; text-to-speech disabled");
        }

        let analyzer = CompanyAnalyzer::new(
            news.map(|client| Arc::new(client) as Arc<dyn NewsSource>),
            market.map(|client| Arc::new(client) as Arc<dyn MarketDataSource>),
            Arc::clone(&rng),
        );

        Ok(Self {
            analyzer: Arc::new(analyzer),
            voice: voice.map(Arc::new),
            speech_to_text_configured: settings.wit_ai_token.is_some(),
            rng,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ApiError {
    BadRequest(&'static str),
    MissingConfig(&'static str),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::MissingConfig(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<Prediction>, ApiError> {
    let now = chrono::Local::now();
    prediction::generate(req, state.rng.as_ref(), &now)
        .map(Json)
        .ok_or(ApiError::BadRequest(MISSING_PREDICT_FIELDS))
}

#[derive(Debug, Deserialize)]
struct TtsRequest {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TtsResponse {
    audio_url: String,
    format: &'static str,
}

async fn text_to_speech(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, ApiError> {
    let text = match req.text.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ApiError::BadRequest(MISSING_TEXT)),
    };
    let Some(voice) = &state.voice else {
        return Err(ApiError::MissingConfig(MISSING_TTS_KEY));
    };

    Ok(Json(TtsResponse {
        audio_url: voice.synthesis_url(text),
        format: "mp3",
    }))
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let company = match req.company.as_deref() {
        Some(company) if !company.is_empty() => company,
        _ => return Err(ApiError::BadRequest(MISSING_COMPANY)),
    };

    let now = chrono::Local::now();
    Ok(Json(state.analyzer.analyze(company, &now).await))
}

async fn service_status(State(state): State<AppState>) -> Json<Vec<DependencyStatus>> {
    let voice = match &state.voice {
        None => DependencyStatus::disabled(status::VOICE_NAME, "API key not configured"),
        Some(client) => match client.probe().await {
            Ok(true) => DependencyStatus::connected(status::VOICE_NAME),
            Ok(false) => DependencyStatus::error(status::VOICE_NAME, "Test failed"),
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::warn!(error = %err, "voice synthesis probe failed");
                DependencyStatus::error(status::VOICE_NAME, "Test failed")
            }
        },
    };
    let speech = status::speech_to_text_status(state.speech_to_text_configured);

    Json(status::assemble(voice, speech))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use augur_core::domain::status::StatusKind;
    use serde_json::json;

    fn bare_state() -> AppState {
        let rng: Arc<dyn RandomSource> = Arc::new(ThreadRngSource);
        AppState {
            analyzer: Arc::new(CompanyAnalyzer::new(None, None, Arc::clone(&rng))),
            voice: None,
            speech_to_text_configured: false,
            rng,
        }
    }

    fn state_with_voice() -> AppState {
        let mut state = bare_state();
        let client = VoiceRssClient::new("k3y".to_string(), "http://api.voicerss.org".to_string())
            .unwrap();
        state.voice = Some(Arc::new(client));
        state
    }

    #[tokio::test]
    async fn predict_rejects_missing_required_fields() {
        let req: PredictionRequest =
            serde_json::from_value(json!({"topic": "rates", "category": "finance"})).unwrap();

        let err = predict(State(bare_state()), Json(req)).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest(MISSING_PREDICT_FIELDS));
    }

    #[tokio::test]
    async fn predict_returns_generated_fields_with_passthrough() {
        let req: PredictionRequest = serde_json::from_value(json!({
            "topic": "rates",
            "category": "finance",
            "timeframe": "6 months",
            "dataPoints": [1, 2],
        }))
        .unwrap();

        let Json(out) = predict(State(bare_state()), Json(req)).await.unwrap();
        assert!((50..=95).contains(&out.confidence));
        assert_eq!(out.data_points, Some(json!([1, 2])));
    }

    #[tokio::test]
    async fn tts_requires_text() {
        let err = text_to_speech(State(state_with_voice()), Json(TtsRequest { text: None }))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest(MISSING_TEXT));

        let err = text_to_speech(
            State(state_with_voice()),
            Json(TtsRequest {
                text: Some(String::new()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ApiError::BadRequest(MISSING_TEXT));
    }

    #[tokio::test]
    async fn tts_without_key_is_a_server_configuration_error() {
        let err = text_to_speech(
            State(bare_state()),
            Json(TtsRequest {
                text: Some("hello".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ApiError::MissingConfig(MISSING_TTS_KEY));
    }

    #[tokio::test]
    async fn tts_builds_an_encoded_audio_url() {
        let Json(out) = text_to_speech(
            State(state_with_voice()),
            Json(TtsRequest {
                text: Some("hello world".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(out.format, "mp3");
        assert!(out.audio_url.contains("src=hello%20world"));
        assert!(out.audio_url.contains("key=k3y"));
    }

    #[tokio::test]
    async fn analyze_requires_a_company_name() {
        let err = analyze(State(bare_state()), Json(AnalysisRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest(MISSING_COMPANY));
    }

    #[tokio::test]
    async fn analyze_without_providers_still_answers() {
        let Json(report) = analyze(
            State(bare_state()),
            Json(AnalysisRequest {
                company: Some("OpenAI".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(report.ticker, "OPEN");
        let value = serde_json::to_value(&report).unwrap();
        assert!(!value.as_object().unwrap().contains_key("price"));
        assert!(!value.as_object().unwrap().contains_key("marketCap"));
    }

    #[tokio::test]
    async fn status_lists_three_dependencies_in_order() {
        let Json(report) = service_status(State(bare_state())).await;

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].name, status::SELF_NAME);
        assert_eq!(report[0].status, StatusKind::Connected);
        assert_eq!(report[1].name, status::VOICE_NAME);
        assert_eq!(report[1].status, StatusKind::Disabled);
        assert_eq!(report[2].name, status::SPEECH_NAME);
        assert_eq!(report[2].status, StatusKind::Disabled);
    }

    #[tokio::test]
    async fn configured_speech_to_text_reports_connected() {
        let mut state = bare_state();
        state.speech_to_text_configured = true;

        let Json(report) = service_status(State(state)).await;
        assert_eq!(report[2].status, StatusKind::Connected);
    }

    #[test]
    fn error_responses_carry_a_json_error_body() {
        let response = ApiError::BadRequest(MISSING_TEXT).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::MissingConfig(MISSING_TTS_KEY).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
