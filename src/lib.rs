//! Course Catalog API
//!
//! Serves a read-only course catalog over HTTP.
//!
//! - `data`: record schema and CSV loading
//! - `catalog_views`: previews and key list derived once at startup
//! - `classes_query`: `/api/classes` response selection
//! - `api_server`: Axum router and JSON handlers
//! - `web`: Askama HTML pages

pub mod data;
pub mod catalog_views;
pub mod classes_query;
pub mod config;
pub mod api_server;
pub mod web;

// Re-export commonly used types
pub use api_server::{AppState, create_router};
pub use catalog_views::{Catalog, KeyList, PreviewStore, build_views};
pub use classes_query::{ClassesQuery, ClassesRequest, ClassesResponse, resolve_classes_query};
pub use config::ServerConfig;
pub use data::{AttributeMap, CatalogStore, Record, SectionKey, load_catalog};
