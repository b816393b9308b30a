pub mod coerce;
pub mod engine;
pub mod error;
pub mod fragment;

pub use coerce::{DocumentMapped, FieldBinding, FieldKind};
pub use engine::{QueryEngine, QuerySpec, ResultEnvelope};
pub use error::QueryError;
pub use fragment::{FilterFragment, Predicate};
