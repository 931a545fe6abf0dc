//! HTTP API gateway for youthdesk.
//!
//! Exposes the conversational ask endpoint, the faceted policy search
//! endpoint, and a health check. Built on Axum.
//!
//! Session continuity is cookie-based: the ask endpoint reads the
//! `guest_token` cookie when present and always sets it on success, so a
//! cookie-bearing browser keeps one conversation thread without any
//! explicit signup.

pub mod payload;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use youthdesk_chat::ConversationAssembler;
use youthdesk_core::error::{Error, StoreError};
use youthdesk_core::store::{HistoryStore, PolicyCatalog};
use youthdesk_search::{FilterEngine, ResultProjector};

use crate::payload::{parse_ask_payload, parse_search_payload};

const GUEST_COOKIE: &str = "guest_token";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub assembler: ConversationAssembler,
    pub engine: FilterEngine,
    pub projector: ResultProjector,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/search", post(search_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the store, generator, and engines once from configuration and
/// shares them across requests.
pub async fn start(
    config: youthdesk_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let (store, catalog): (Arc<dyn HistoryStore>, Arc<dyn PolicyCatalog>) =
        match config.store.backend.as_str() {
            "memory" => {
                let store = Arc::new(youthdesk_store::InMemoryStore::new());
                (store.clone(), store)
            }
            _ => {
                let store =
                    Arc::new(youthdesk_store::SqliteStore::new(&config.store.path).await?);
                (store.clone(), store)
            }
        };
    let generator = youthdesk_generator::build_from_config(&config);

    let state = Arc::new(GatewayState {
        assembler: ConversationAssembler::new(store, generator)
            .with_history_window(config.chat.history_window),
        engine: FilterEngine::new(catalog).with_result_cap(config.search.result_cap),
        projector: ResultProjector::new().with_summary_chars(config.search.summary_chars),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct AskResponse {
    question: String,
    answer: String,
}

async fn ask_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let question = match parse_ask_payload(&body) {
        Ok(question) => question,
        Err(e) => return bad_request(&e.to_string()),
    };
    let token = guest_token_from(&headers);

    match state.assembler.ask(token.as_deref(), &question).await {
        Ok(outcome) => {
            let cookie = format!(
                "{GUEST_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
                outcome.guest_token
            );
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(AskResponse {
                    question: outcome.question,
                    answer: outcome.answer,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn search_handler(State(state): State<SharedState>, body: Bytes) -> Response {
    let criteria = match parse_search_payload(&body) {
        Ok(criteria) => criteria,
        Err(e) => return bad_request(&e.to_string()),
    };

    match state.engine.search(&criteria).await {
        Ok(records) => {
            let results = state.projector.project(&records);
            Json(json!({
                "count": results.len(),
                "results": results,
            }))
            .into_response()
        }
        Err(e) => error_response(Error::Store(e)),
    }
}

/// Read the guest token from the `Cookie` header, if any.
fn guest_token_from(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(GUEST_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Map a domain error to a wire response. Internal detail is logged, not
/// returned: callers see a stable Korean message and a status class.
fn error_response(err: Error) -> Response {
    let (status, message) = match &err {
        Error::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
        Error::Store(StoreError::UnknownGuest(_)) => {
            (StatusCode::BAD_REQUEST, "세션이 유효하지 않습니다.".to_string())
        }
        Error::Generation(_) => {
            (StatusCode::BAD_GATEWAY, "답변 생성에 실패했습니다.".to_string())
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "요청 처리 중 오류가 발생했습니다.".to_string(),
        ),
    };

    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }

    (status, Json(json!({ "error": message }))).into_response()
}
