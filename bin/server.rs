// GSTR-1 Normalizer - Web Server
// REST API with Axum: JSON rows in, template rows + report out

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use gstr1_normalizer::{
    dropdowns_by_header, normalize, AliasTable, Cell, EngineConfig, InputBatch, InputRecord,
    NormalizeError, ReturnPeriod, VERSION,
};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// POST /api/normalize body
#[derive(Deserialize)]
struct NormalizeRequest {
    return_period: Option<String>,
    #[serde(default)]
    aliases: IndexMap<String, String>,
    rows: Vec<IndexMap<String, serde_json::Value>>,
}

impl NormalizeRequest {
    fn into_parts(self) -> Result<(InputBatch, EngineConfig), NormalizeError> {
        let return_period = ReturnPeriod::from_optional(self.return_period.as_deref())?;

        let mut aliases = AliasTable::standard();
        aliases.extend(&AliasTable::from_entries(self.aliases)?);

        let records: Vec<InputRecord> = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(|(k, v)| (k, Cell::from_json(&v))).collect())
            .collect();

        Ok((
            InputBatch::from_records(records),
            EngineConfig::new(return_period).with_aliases(aliases),
        ))
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(format!("OK v{}", VERSION)))
}

/// GET /api/dropdowns - Enumerated value lists keyed by template header
async fn get_dropdowns() -> impl IntoResponse {
    Json(ApiResponse::ok(dropdowns_by_header()))
}

/// POST /api/normalize - Run the pipeline over JSON rows
async fn post_normalize(Json(request): Json<NormalizeRequest>) -> impl IntoResponse {
    let result = request
        .into_parts()
        .and_then(|(batch, config)| normalize(&batch, &config));

    match result {
        Ok(normalized) => (StatusCode::OK, Json(ApiResponse::ok(normalized.to_output()))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "normalize request rejected");
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::err(e.to_string()))).into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🌐 GSTR-1 Normalizer - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dropdowns", get(get_dropdowns))
        .route("/normalize", post(post_normalize));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let addr = std::env::var("GST_SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/normalize", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
