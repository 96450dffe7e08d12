pub mod errors;
pub mod routes;

use std::path::Path;
use std::sync::Arc;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use crate::analysis::{Interpreter, ReportAnalyzer};
use crate::config::{LabsightConfig, ServerConfig};
use crate::db::Database;
use crate::errors::LabsightError;
use crate::llm::{create_provider, LLMProvider};

/// Room for multipart headers and boundaries on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub analyzer: Arc<ReportAnalyzer>,
}

impl AppState {
    pub fn new(db: Database, provider: Arc<dyn LLMProvider>, config: &LabsightConfig) -> Self {
        let interpreter = Interpreter::new(
            provider,
            &config.analysis.lifestyle_guidance,
            config.llm.max_tokens,
        );
        let analyzer = ReportAnalyzer::new(db.clone(), interpreter, config.analysis.max_upload_bytes);
        Self { db, analyzer: Arc::new(analyzer) }
    }
}

/// Open the database, build the provider and seed the sample report.
pub async fn create_app_state(config: &LabsightConfig) -> Result<AppState, LabsightError> {
    let db = Database::new(&config.database.path)?;
    let provider = create_provider(&config.llm)?;
    info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        db = %config.database.path,
        "Analysis backend ready"
    );

    if config.database.seed_sample {
        if let Err(e) = crate::db::seed::seed_if_empty(&db) {
            warn!(error = %e, "Failed to seed sample report");
        }
    }

    Ok(AppState::new(db, provider, config))
}

/// The JSON API.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.analyzer.max_upload_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/reports", axum::routing::get(routes::reports::list_reports))
        .route("/api/reports/upload", axum::routing::post(routes::reports::upload_report))
        .route("/api/reports/:id", axum::routing::get(routes::reports::get_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// The API plus the optional client bundle, CORS and request tracing.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    let mut app = build_router(state);

    if let Some(dir) = server.static_dir.as_deref() {
        let dist = Path::new(dir);
        if dist.is_dir() {
            let spa = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));
            app = app.fallback_service(spa);
            info!(dir = %dist.display(), "Serving client bundle");
        } else {
            warn!(dir = %dist.display(), "Static directory not found, client not served");
        }
    }

    if let Some(cors) = build_cors_layer(&server.cors_origins) {
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

fn build_cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        warn!("CORS configured with wildcard \"*\", all origins allowed");
        return Some(layer.allow_origin(Any));
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                warn!(origin = %origin, "invalid CORS origin, skipping");
                None
            }
        })
        .collect();
    Some(layer.allow_origin(allowed))
}
