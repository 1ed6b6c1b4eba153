//! Legal Demystifier - PDF upload, Document AI analysis, and legal-assistant tools.

mod auth;
mod chat;
mod config;
mod docai;
mod storage;
mod tools;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::TokenSource;
use chat::ChatClient;
use config::AppConfig;
use docai::{analyze_document, AnalysisOutcome, DocAiProcessor, DocumentProcessor};
use storage::GcsClient;
use tools::rpc::{self, JsonRpcRequest, JsonRpcResponse};
use tools::{ClauseSummary, GlossaryEntry, LegalTools, PrecedentSearch};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    storage: GcsClient,
    processor: Arc<dyn DocumentProcessor>,
    chat: Option<ChatClient>,
    tools: Arc<LegalTools>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "legal_demystifier=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(
        "Configured for project {} (processor {} in {})",
        config.project_id, config.docai_processor_id, config.docai_location
    );

    let http = reqwest::Client::new();
    let tokens = TokenSource::from_key_file(&config.sa_key_path)?;

    let storage = GcsClient::new(config.bucket.clone(), tokens.clone(), http.clone());
    let processor: Arc<dyn DocumentProcessor> =
        Arc::new(DocAiProcessor::new(&config, tokens, http.clone()));

    let chat = match ChatClient::from_env(http) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Chat disabled: {}", e);
            None
        }
    };

    let state = AppState {
        storage,
        processor,
        chat,
        tools: Arc::new(LegalTools::new()),
    };

    // CORS: single configured frontend origin, MCP session headers exposed
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static("mcp-session-id"),
            HeaderName::from_static("mcp-protocol-version"),
        ]);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/upload-pdf", post(upload_pdf))
        .route("/analyze", post(analyze))
        .route("/pdf-chat", post(pdf_chat))
        .route("/tools/glossary", get(glossary_search))
        .route("/tools/glossary/:term", get(glossary_lookup))
        .route("/tools/summarize-clause", post(summarize_clause))
        .route("/tools/precedents", post(find_precedents))
        .route("/mcp", post(mcp_endpoint))
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024)) // 32MB
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Run server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Upload a PDF to GCS and return its `gs://` URI.
async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut filename = String::new();
    let mut file_data = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        bad_request(format!("Multipart error: {}", e))
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or_default().to_string();
            file_data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read file: {}", e)))?
                .to_vec();
            break;
        }
    }

    if filename.is_empty() {
        return Err(bad_request("No selected file"));
    }
    if !is_pdf_filename(&filename) {
        return Err(bad_request("Invalid file type"));
    }
    if file_data.is_empty() {
        return Err(bad_request("No file part"));
    }

    info!("Received file: {} ({} bytes)", filename, file_data.len());

    let gcs_uri = state.storage.upload(&filename, file_data).await.map_err(|e| {
        error!("Upload failed: {:#}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Upload failed: {:#}", e)})),
        )
    })?;

    Ok(Json(json!({"message": "File uploaded", "gcs_uri": gcs_uri})))
}

#[derive(serde::Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    gcs_uri: Option<String>,
}

/// Run Document AI over a stored PDF. Always returns the uniform envelope;
/// failures are carried inside it.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalysisOutcome> {
    let uri = request.gcs_uri.unwrap_or_default();
    Json(analyze_document(state.processor.as_ref(), &uri).await)
}

#[derive(serde::Deserialize)]
struct ChatRequest {
    #[serde(default)]
    question: Option<String>,
    #[serde(default, rename = "gsUri", alias = "gs_uri")]
    gs_uri: Option<String>,
}

/// Answer a question about a stored PDF.
async fn pdf_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(chat) = state.chat.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "Chat backend not configured"})),
        ));
    };

    let question = request.question.unwrap_or_default();
    if question.trim().is_empty() {
        return Err(bad_request("No question provided"));
    }

    let uri = request.gs_uri.unwrap_or_default();
    let outcome = analyze_document(state.processor.as_ref(), &uri).await;
    if !outcome.success {
        let message = outcome.error.unwrap_or_else(|| "Analysis failed".to_string());
        return Err(bad_request(message));
    }

    let answer = chat.answer(&question, &outcome.full_text).await.map_err(|e| {
        error!("Chat failed: {:#}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": format!("Chat failed: {:#}", e)})),
        )
    })?;

    Ok(Json(json!({"answer": answer})))
}

#[derive(serde::Deserialize)]
struct GlossaryQuery {
    q: Option<String>,
}

/// Substring search over the glossary.
async fn glossary_search(
    State(state): State<AppState>,
    Query(query): Query<GlossaryQuery>,
) -> Json<Vec<GlossaryEntry>> {
    Json(state.tools.search_glossary(query.q.as_deref().unwrap_or_default()))
}

/// Exact glossary lookup.
async fn glossary_lookup(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<GlossaryEntry>, StatusCode> {
    state
        .tools
        .lookup_term(&term)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(serde::Deserialize)]
struct ClauseRequest {
    #[serde(default)]
    clause: String,
    #[serde(default)]
    location: Option<String>,
}

/// Stub clause summary.
async fn summarize_clause(
    State(state): State<AppState>,
    Json(request): Json<ClauseRequest>,
) -> Result<Json<ClauseSummary>, (StatusCode, Json<Value>)> {
    state
        .tools
        .summarize_clause(&request.clause)
        .map(Json)
        .ok_or_else(|| bad_request("No clause provided"))
}

/// Stub precedent search; the envelope carries its own success flag.
async fn find_precedents(
    State(state): State<AppState>,
    Json(request): Json<ClauseRequest>,
) -> Json<PrecedentSearch> {
    Json(
        state
            .tools
            .find_precedents(&request.clause, request.location.as_deref()),
    )
}

/// JSON-RPC binding of the same tool capability.
async fn mcp_endpoint(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    Json(rpc::process_request(&state.tools, request))
}

// ============================================================================
// Helper functions
// ============================================================================

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message.into()})))
}

fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf_filename("lease.pdf"));
        assert!(is_pdf_filename("LEASE.PDF"));
        assert!(!is_pdf_filename("lease.docx"));
        assert!(!is_pdf_filename("pdf"));
    }
}
