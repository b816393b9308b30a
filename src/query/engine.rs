use std::sync::Arc;

use serde::Serialize;

use crate::query::coerce::{map_document, DocumentMapped};
use crate::query::error::QueryError;
use crate::query::fragment::{FilterFragment, Predicate};
use crate::store::DocumentStore;

/// Parameters for one dynamic query: a collection plus an optional raw
/// filter supplied by the call site. Built per request, consumed once.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub collection: String,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

impl QuerySpec {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            sort: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Uniform result wrapper for query operations, serialized with the wire
/// casing the web client expects (`totalRecords`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope<T> {
    pub data: Vec<T>,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
}

impl<T> ResultEnvelope<T> {
    pub fn ok(data: Vec<T>, total_records: usize) -> Self {
        Self {
            data,
            success: true,
            message: "operation successful".to_string(),
            total_records: Some(total_records),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            success: false,
            message: message.into(),
            total_records: None,
        }
    }
}

/// Combines filter fragments from independent sources, executes against the
/// document store, and reflects result documents into typed records.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn DocumentStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Execute a query. Failures never propagate: malformed fragments, store
    /// faults and coercion mismatches all come back as a failed envelope.
    pub async fn execute<T: DocumentMapped + 'static>(
        &self,
        spec: &QuerySpec,
        aux_filters: &[String],
    ) -> ResultEnvelope<T> {
        match self.run(spec, aux_filters).await {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(collection = %spec.collection, error = %err, "query failed");
                ResultEnvelope::failure(err.to_string())
            }
        }
    }

    async fn run<T: DocumentMapped + 'static>(
        &self,
        spec: &QuerySpec,
        aux_filters: &[String],
    ) -> Result<ResultEnvelope<T>, QueryError> {
        // Each source is parsed independently, then AND-combined in source
        // order: the spec filter first, auxiliaries after.
        let mut fragments = Vec::with_capacity(1 + aux_filters.len());
        if let Some(filter) = spec.filter.as_deref() {
            fragments.push(FilterFragment::parse(filter)?);
        }
        for filter in aux_filters {
            fragments.push(FilterFragment::parse(filter)?);
        }
        let predicate = Predicate::all_of(fragments);

        let documents = self
            .store
            .find(&spec.collection, &predicate, spec.sort.as_deref())
            .await?;

        let total = documents.len();
        let mut data = Vec::with_capacity(total);
        for doc in &documents {
            data.push(map_document(doc)?);
        }

        Ok(ResultEnvelope::ok(data, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::coerce::{FieldBinding, FieldKind};
    use crate::store::memory::MemoryDocumentStore;
    use crate::store::Document;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Row {
        id: String,
        a: i32,
        b: i32,
    }

    impl DocumentMapped for Row {
        fn bindings() -> &'static [FieldBinding<Self>] {
            const BINDINGS: &[FieldBinding<Row>] = &[
                FieldBinding {
                    name: "_id",
                    kind: FieldKind::Text,
                    assign: |r, v| {
                        if let Some(t) = v.into_text() {
                            r.id = t;
                        }
                    },
                },
                FieldBinding {
                    name: "a",
                    kind: FieldKind::Int,
                    assign: |r, v| {
                        if let Some(n) = v.into_int() {
                            r.a = n;
                        }
                    },
                },
                FieldBinding {
                    name: "b",
                    kind: FieldKind::Int,
                    assign: |r, v| {
                        if let Some(n) = v.into_int() {
                            r.b = n;
                        }
                    },
                },
            ];
            BINDINGS
        }
    }

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().expect("object")
    }

    async fn seeded_engine() -> QueryEngine {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert("rows", doc(json!({"_id": {"$oid": "aa01"}, "a": 1, "b": 2})))
            .await;
        store
            .insert("rows", doc(json!({"_id": {"$oid": "aa02"}, "a": 1, "b": 9})))
            .await;
        store
            .insert("rows", doc(json!({"_id": {"$oid": "aa03"}, "a": 5, "b": 2})))
            .await;
        QueryEngine::new(store)
    }

    #[tokio::test]
    async fn no_fragments_returns_all_documents() {
        let engine = seeded_engine().await;
        let result: ResultEnvelope<Row> = engine.execute(&QuerySpec::new("rows"), &[]).await;
        assert!(result.success);
        assert_eq!(result.total_records, Some(3));
        assert_eq!(result.data.len(), 3);
    }

    #[tokio::test]
    async fn fragments_are_and_combined() {
        let engine = seeded_engine().await;
        let spec = QuerySpec::new("rows").with_filter(r#"{"a": 1}"#);
        let result: ResultEnvelope<Row> =
            engine.execute(&spec, &[r#"{"b": 2}"#.to_string()]).await;
        assert!(result.success);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0], Row { id: "aa01".into(), a: 1, b: 2 });
    }

    #[tokio::test]
    async fn malformed_filter_becomes_failed_envelope() {
        let engine = seeded_engine().await;
        let spec = QuerySpec::new("rows").with_filter("{broken");
        let result: ResultEnvelope<Row> = engine.execute(&spec, &[]).await;
        assert!(!result.success);
        assert!(result.data.is_empty());
        assert!(!result.message.is_empty());
        assert_eq!(result.total_records, None);
    }

    #[tokio::test]
    async fn sort_orders_results() {
        let engine = seeded_engine().await;
        let spec = QuerySpec::new("rows").with_sort("-b");
        let result: ResultEnvelope<Row> = engine.execute(&spec, &[]).await;
        assert!(result.success);
        let bs: Vec<i32> = result.data.iter().map(|r| r.b).collect();
        assert_eq!(bs, vec![9, 2, 2]);
    }

    #[tokio::test]
    async fn unknown_collection_returns_empty_success() {
        let engine = seeded_engine().await;
        let result: ResultEnvelope<Row> = engine.execute(&QuerySpec::new("missing"), &[]).await;
        assert!(result.success);
        assert_eq!(result.total_records, Some(0));
    }
}
