// Axum API Server Module
//
// Purpose: serve the in-memory course catalog as JSON plus a couple of HTML pages
// All request handling reads from the immutable Catalog built at startup

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};

use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::catalog_views::Catalog;
use crate::classes_query::{resolve_classes_query, ClassesQuery, ClassesRequest};
use crate::config::ServerConfig;
use crate::data::load_catalog;
use crate::web::handlers::{home_page, not_found_page};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Load the catalog named by `config` and build its views.
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading course catalog...");
        let store = load_catalog(&config.catalog_path)?;

        tracing::info!("Building catalog views...");
        Ok(Self::from_catalog(Catalog::new(store)))
    }

    /// Wrap an already-built catalog (fixtures in tests).
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML landing page
        .route("/", get(home_page))

        // Health check
        .route("/health", get(health_check))

        // Catalog endpoints (JSON API)
        .route("/api/semesters", get(get_semesters))
        .route(
            "/api/classes",
            get(get_classes)
                .post(submit_classes)
                .fallback(not_found_page),
        )

        // Everything else renders the not-found page
        .fallback(not_found_page)

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip compression
        .layer(CorsLayer::permissive()) // Allow all origins
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Semester offered to the client's semester picker
#[derive(Debug, Clone, serde::Serialize)]
pub struct Semester {
    pub id: u32,
    pub name: &'static str,
}

pub const SEMESTERS: [Semester; 2] = [
    Semester { id: 0, name: "Spring 2019" },
    Semester { id: 1, name: "Fall 2018" },
];

async fn get_semesters() -> Json<[Semester; 2]> {
    Json(SEMESTERS)
}

async fn get_classes(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    // Raw pairs so a repeated flag is tolerated rather than rejected
    let query = ClassesQuery::from_pairs(pairs);
    tracing::debug!("GET /api/classes {:?}", query);
    resolve_classes_query(&state.catalog, &ClassesRequest::Retrieve(query)).into_response()
}

// Body is accepted but not read
async fn submit_classes(State(state): State<AppState>) -> Response {
    tracing::debug!("POST /api/classes");
    resolve_classes_query(&state.catalog, &ClassesRequest::Submit).into_response()
}
