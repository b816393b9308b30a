use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use super::{parse_sort, validate_collection_name, Document, DocumentStore, StoreError};
use crate::config;
use crate::query::fragment::Predicate;

/// Document store over Postgres: one table per collection, a single JSONB
/// `doc` column per row. Predicates compile to containment matches.
pub struct PgDocumentStore {
    pool: OnceCell<PgPool>,
}

impl PgDocumentStore {
    pub fn new() -> Self {
        Self {
            pool: OnceCell::new(),
        }
    }

    /// Lazily create the shared pool on first use.
    async fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool
            .get_or_try_init(|| async {
                let store = &config::config().store;
                if store.url.is_empty() {
                    return Err(StoreError::ConfigMissing("DATABASE_URL"));
                }
                let pool = PgPoolOptions::new()
                    .max_connections(store.max_connections)
                    .connect(&store.url)
                    .await?;
                tracing::info!(max_connections = store.max_connections, "store pool ready");
                Ok(pool)
            })
            .await
    }
}

impl Default for PgDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        sort: Option<&str>,
    ) -> Result<Vec<Document>, StoreError> {
        validate_collection_name(collection)?;

        let mut sql = format!("SELECT doc FROM \"{}\"", collection);
        for (i, _) in predicate.fragments().iter().enumerate() {
            if i == 0 {
                sql.push_str(" WHERE ");
            } else {
                sql.push_str(" AND ");
            }
            sql.push_str(&format!("doc @> ${}", i + 1));
        }
        if let Some(sort) = sort {
            let (field, descending) = parse_sort(sort)?;
            sql.push_str(&format!(
                " ORDER BY doc->>'{}' {}",
                field,
                if descending { "DESC" } else { "ASC" }
            ));
        }

        let mut query = sqlx::query_scalar::<_, serde_json::Value>(&sql);
        for fragment in predicate.fragments() {
            query = query.bind(fragment.to_json());
        }

        let rows = query.fetch_all(self.pool().await?).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                serde_json::Value::Object(map) => Some(map),
                other => {
                    tracing::warn!(collection, "skipping non-object document: {}", other);
                    None
                }
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool().await?)
            .await?;
        Ok(())
    }
}
