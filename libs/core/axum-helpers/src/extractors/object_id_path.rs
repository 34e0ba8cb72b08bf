//! ObjectId path parameter extractor.

use crate::errors::{AppError, ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;

/// Extractor for ObjectId path parameters.
///
/// Parses the single path segment as a 24-character hex ObjectId and
/// rejects with a 400 `INVALID_OBJECT_ID` body otherwise.
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::ObjectIdPath;
///
/// async fn get_product(ObjectIdPath(id): ObjectIdPath) -> String {
///     id.to_hex()
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                error_response(StatusCode::BAD_REQUEST, e.body_text(), ErrorCode::BadRequest)
            })?;

        ObjectId::parse_str(&id)
            .map(ObjectIdPath)
            .map_err(|e| AppError::InvalidObjectId(e).into_response())
    }
}
