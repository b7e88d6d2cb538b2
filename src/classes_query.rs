//! Classes Query - selects and shapes the `/api/classes` response
//!
//! Three retrieval outcomes are picked by which query flags are set; a
//! submission always returns the fixed submission subset. Flag values are
//! never inspected beyond being non-empty.

use axum::{
    http::header,
    response::{IntoResponse, Json, Response},
};
use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog_views::{Catalog, KeyList, PreviewStore};
use crate::data::{AttributeMap, Record, SectionKey};

/// Body returned when a retrieval carries neither flag.
pub const PLACEHOLDER: &str = "!!!";

/// Cap applied to named-subset records (records hold 15 fields, so this keeps them whole).
pub const NAMED_SUBSET_LIMIT: usize = 100;

pub const NAMED_SUBSET_KEYS: [&str; 7] = [
    "cs2110lecture",
    "cs2110laboratory",
    "span2020lecture",
    "cs2102lecture",
    "sts1500discussion",
    "math3354lecture",
    "sts1500lecture",
];

pub const SUBMISSION_KEYS: [&str; 7] = [
    "CS2110Lecture",
    "CS2110Laboratory",
    "SPAN2020Lecture",
    "CS2102Lecture",
    "STS1500Discussion",
    "MATH3354Lecture",
    "STS1500Lecture",
];

/// Query flags accepted by `GET /api/classes`.
#[derive(Debug, Clone, Default)]
pub struct ClassesQuery {
    pub semester: Option<String>,
    pub test: Option<String>,
}

impl ClassesQuery {
    /// Build from raw query pairs. A repeated name keeps its first value;
    /// unknown names are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_ref() {
                "semester" => &mut query.semester,
                "test" => &mut query.test,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    fn has_semester(&self) -> bool {
        is_set(&self.semester)
    }

    fn has_test(&self) -> bool {
        is_set(&self.test)
    }
}

fn is_set(flag: &Option<String>) -> bool {
    flag.as_deref().is_some_and(|v| !v.is_empty())
}

/// Incoming `/api/classes` request, reduced to what selects a response.
#[derive(Debug, Clone)]
pub enum ClassesRequest {
    Retrieve(ClassesQuery),
    Submit,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Meta {
    pub attr_map: AttributeMap,
}

/// Every preview plus the ordered key list.
#[derive(Debug, Serialize)]
pub struct FullTableView<'a> {
    pub meta: Meta,
    pub data: &'a PreviewStore,
    pub keys: &'a KeyList,
}

/// A fixed set of records looked up by key.
#[derive(Debug, Serialize, PartialEq)]
pub struct SubsetView {
    pub meta: Meta,
    pub data: IndexMap<SectionKey, Record>,
}

/// One variant per `/api/classes` outcome.
#[derive(Debug)]
pub enum ClassesResponse<'a> {
    FullTable(FullTableView<'a>),
    NamedSubset(SubsetView),
    Placeholder,
    Submission(SubsetView),
}

impl IntoResponse for ClassesResponse<'_> {
    fn into_response(self) -> Response {
        match self {
            ClassesResponse::FullTable(view) => Json(view).into_response(),
            ClassesResponse::NamedSubset(view) | ClassesResponse::Submission(view) => {
                Json(view).into_response()
            }
            ClassesResponse::Placeholder => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                PLACEHOLDER,
            )
                .into_response(),
        }
    }
}

/// Pick and build the response for a classes request.
///
/// `semester` takes precedence over `test`; submissions ignore parameters.
pub fn resolve_classes_query<'a>(catalog: &'a Catalog, request: &ClassesRequest) -> ClassesResponse<'a> {
    match request {
        ClassesRequest::Retrieve(query) if query.has_semester() => {
            ClassesResponse::FullTable(FullTableView {
                meta: Meta::default(),
                data: catalog.previews(),
                keys: catalog.keys(),
            })
        }
        ClassesRequest::Retrieve(query) if query.has_test() => {
            ClassesResponse::NamedSubset(SubsetView {
                meta: Meta::default(),
                data: lookup(catalog, &NAMED_SUBSET_KEYS, Some(NAMED_SUBSET_LIMIT)),
            })
        }
        ClassesRequest::Retrieve(_) => ClassesResponse::Placeholder,
        ClassesRequest::Submit => ClassesResponse::Submission(SubsetView {
            meta: Meta::default(),
            data: lookup(catalog, &SUBMISSION_KEYS, None),
        }),
    }
}

/// Look up `keys` in request order, keeping at most `limit` fields per record.
///
/// Keys absent from the catalog are left out of the result.
pub fn lookup(catalog: &Catalog, keys: &[&str], limit: Option<usize>) -> IndexMap<SectionKey, Record> {
    let mut found = IndexMap::with_capacity(keys.len());
    let mut missing = Vec::new();

    for &key in keys {
        match catalog.get(key) {
            Some(record) => {
                let end = limit.map_or(record.len(), |n| n.min(record.len()));
                found.insert(key.to_string(), record[..end].to_vec());
            }
            None => missing.push(key),
        }
    }

    if !missing.is_empty() {
        tracing::warn!("Lookup omitted {} unknown keys: {:?}", missing.len(), missing);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CatalogStore;
    use serde_json::Value;

    fn record(prefix: &str) -> Record {
        (0..15).map(|i| Value::String(format!("{prefix}-{i}"))).collect()
    }

    fn catalog() -> Catalog {
        let mut store = CatalogStore::new();
        store.insert("cs2110lecture".to_string(), record("cs"));
        store.insert("phys1425lecture".to_string(), record("phys"));
        store.insert("CS2102Lecture".to_string(), record("upper"));
        Catalog::new(store)
    }

    fn retrieve(semester: Option<&str>, test: Option<&str>) -> ClassesRequest {
        ClassesRequest::Retrieve(ClassesQuery {
            semester: semester.map(str::to_string),
            test: test.map(str::to_string),
        })
    }

    #[test]
    fn test_semester_selects_full_table() {
        let catalog = catalog();
        match resolve_classes_query(&catalog, &retrieve(Some("0"), Some("1"))) {
            ClassesResponse::FullTable(view) => {
                assert_eq!(view.data, catalog.previews());
                assert_eq!(view.keys, catalog.keys());
                assert_eq!(view.data["cs2110lecture"].len(), 10);
            }
            other => panic!("expected full table, got {other:?}"),
        }
    }

    #[test]
    fn test_full_table_is_idempotent() {
        let catalog = catalog();
        let request = retrieve(Some("1"), None);
        let first = match resolve_classes_query(&catalog, &request) {
            ClassesResponse::FullTable(view) => serde_json::to_string(&view).unwrap(),
            other => panic!("expected full table, got {other:?}"),
        };
        let second = match resolve_classes_query(&catalog, &request) {
            ClassesResponse::FullTable(view) => serde_json::to_string(&view).unwrap(),
            other => panic!("expected full table, got {other:?}"),
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_test_flag_selects_named_subset() {
        let catalog = catalog();
        match resolve_classes_query(&catalog, &retrieve(None, Some("yes"))) {
            ClassesResponse::NamedSubset(view) => {
                assert_eq!(view.data.len(), 1);
                assert_eq!(view.data["cs2110lecture"], record("cs"));
            }
            other => panic!("expected named subset, got {other:?}"),
        }
    }

    #[test]
    fn test_no_flags_yields_placeholder() {
        let catalog = catalog();
        assert!(matches!(
            resolve_classes_query(&catalog, &retrieve(None, None)),
            ClassesResponse::Placeholder
        ));
        // Empty values count as absent
        assert!(matches!(
            resolve_classes_query(&catalog, &retrieve(Some(""), Some(""))),
            ClassesResponse::Placeholder
        ));
    }

    #[test]
    fn test_submit_ignores_flags_and_keeps_full_records() {
        let catalog = catalog();
        match resolve_classes_query(&catalog, &ClassesRequest::Submit) {
            ClassesResponse::Submission(view) => {
                assert_eq!(view.data.len(), 1);
                assert_eq!(view.data["CS2102Lecture"].len(), 15);
                assert!(!view.data.contains_key("cs2110lecture"));
            }
            other => panic!("expected submission, got {other:?}"),
        }
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let query = ClassesQuery::from_pairs([
            ("semester", "1"),
            ("other", "x"),
            ("semester", "2"),
            ("test", "a"),
            ("test", "b"),
        ]);
        assert_eq!(query.semester.as_deref(), Some("1"));
        assert_eq!(query.test.as_deref(), Some("a"));

        // First value empty: flag reads as absent even if a later one is set
        let query = ClassesQuery::from_pairs([("semester", ""), ("semester", "2")]);
        assert!(!query.has_semester());

        let query = ClassesQuery::from_pairs(Vec::<(String, String)>::new());
        assert!(query.semester.is_none() && query.test.is_none());
    }

    #[test]
    fn test_lookup_truncates_and_preserves_request_order() {
        let catalog = catalog();
        let found = lookup(&catalog, &["phys1425lecture", "missing", "cs2110lecture"], Some(3));

        let keys: Vec<&str> = found.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["phys1425lecture", "cs2110lecture"]);
        assert_eq!(found["phys1425lecture"], record("phys")[..3].to_vec());

        let untruncated = lookup(&catalog, &["cs2110lecture"], None);
        assert_eq!(untruncated["cs2110lecture"], record("cs"));
    }

    #[test]
    fn test_subset_view_shape() {
        let view = SubsetView {
            meta: Meta::default(),
            data: lookup(&catalog(), &["cs2110lecture"], Some(NAMED_SUBSET_LIMIT)),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["meta"]["attr_map"]["13"], "wait_list");
        assert_eq!(json["data"]["cs2110lecture"][14], "cs-14");
        assert!(json.get("keys").is_none());
    }
}
