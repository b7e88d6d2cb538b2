//! Catalog Views - read-only projections built once at startup
//!
//! `Catalog` owns the loaded store plus the two derived views (previews and
//! the ordered key list). It is constructed before the server binds and
//! shared immutably behind an `Arc` for the rest of the process.

use indexmap::IndexMap;

use crate::data::{CatalogStore, Record, SectionKey, PREVIEW_LEN};

/// Section key → first [`PREVIEW_LEN`] fields of its record.
pub type PreviewStore = IndexMap<SectionKey, Record>;

/// Section keys in catalog insertion order.
pub type KeyList = Vec<SectionKey>;

/// Derive the preview store and key list from a loaded catalog.
///
/// Records shorter than the preview length are copied whole.
pub fn build_views(store: &CatalogStore) -> (PreviewStore, KeyList) {
    let mut previews = PreviewStore::with_capacity(store.len());
    let mut keys = KeyList::with_capacity(store.len());

    for (key, record) in store {
        let end = record.len().min(PREVIEW_LEN);
        previews.insert(key.clone(), record[..end].to_vec());
        keys.push(key.clone());
    }

    (previews, keys)
}

/// Immutable catalog context handed to the request handlers.
#[derive(Debug, Clone)]
pub struct Catalog {
    store: CatalogStore,
    previews: PreviewStore,
    keys: KeyList,
}

impl Catalog {
    pub fn new(store: CatalogStore) -> Self {
        let (previews, keys) = build_views(&store);
        tracing::info!("Built catalog views ({} previews)", previews.len());
        Self { store, previews, keys }
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn keys(&self) -> &KeyList {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.store.get(key)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}
