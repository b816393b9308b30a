use serde_json::Value;

use crate::query::error::QueryError;
use crate::store::Document;

/// One source of filter criteria: field -> literal equality pairs, parsed
/// from a JSON object. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterFragment {
    pairs: Vec<(String, Value)>,
}

impl FilterFragment {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_str(raw).map_err(QueryError::FragmentJson)?;
        match value {
            Value::Object(map) => Ok(Self {
                pairs: map.into_iter().collect(),
            }),
            _ => Err(QueryError::FragmentShape),
        }
    }

    pub fn pairs(&self) -> &[(String, Value)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.pairs.iter().cloned().collect())
    }
}

/// AND-combination of fragments. Zero fragments is the match-all predicate.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    fragments: Vec<FilterFragment>,
}

impl Predicate {
    pub fn all_of(fragments: Vec<FilterFragment>) -> Self {
        Self { fragments }
    }

    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.fragments.iter().all(FilterFragment::is_empty)
    }

    pub fn fragments(&self) -> &[FilterFragment] {
        &self.fragments
    }

    /// Whether a document satisfies every equality pair of every fragment.
    pub fn matches(&self, doc: &Document) -> bool {
        self.fragments
            .iter()
            .all(|f| f.pairs.iter().all(|(key, value)| doc.get(key) == Some(value)))
    }
}
