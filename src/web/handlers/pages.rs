// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::api_server::AppState;

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub section_count_formatted: String,
}

pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let template = HomeTemplate {
        title: "Course Catalog".to_string(),
        section_count_formatted: format_count(state.catalog.len()),
    };
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}

// ============================================================================
// Not Found
// ============================================================================

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub title: String,
    pub path: String,
}

/// Fallback for unmatched paths and unregistered methods.
pub async fn not_found_page(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    tracing::debug!("No route for {}", uri.path());
    let template = NotFoundTemplate {
        title: "Not Found".to_string(),
        path: uri.path().to_string(),
    };
    let body = template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    });
    (StatusCode::NOT_FOUND, Html(body))
}

/// Thousands separators: 11711 → "11,711"
fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
