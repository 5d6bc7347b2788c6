//! Extractors that reject with the shared [`ErrorResponse`](crate::errors::ErrorResponse) body.

pub mod id_path;
pub mod query;
pub mod validated_json;

pub use id_path::IdPath;
pub use query::QueryParams;
pub use validated_json::ValidatedJson;
