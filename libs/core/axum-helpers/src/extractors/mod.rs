//! Custom extractors for Axum handlers.

pub mod json_query;
pub mod object_id_path;
pub mod validated_json;

pub use json_query::JsonQuery;
pub use object_id_path::ObjectIdPath;
pub use validated_json::ValidatedJson;
