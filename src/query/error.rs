use thiserror::Error;

use crate::query::coerce::CoerceError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("malformed filter fragment: {0}")]
    FragmentJson(#[source] serde_json::Error),

    #[error("filter fragment must be a JSON object")]
    FragmentShape,

    #[error("cannot coerce field '{field}': {source}")]
    Coercion {
        field: String,
        #[source]
        source: CoerceError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
