use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, errors::is_duplicate_key};
use domain_categories::CategoryError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ObjectId),

    #[error("Product not found: {0}")]
    SlugNotFound(String),

    /// Identifier in a body or query string is not a valid ObjectId
    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    #[error("Category {0} does not exist")]
    UnknownCategory(ObjectId),

    #[error("Subcategory {0} does not exist")]
    UnknownSubcategory(ObjectId),

    #[error("Subcategory {subcategory} does not belong to category {category}")]
    SubcategoryMismatch {
        subcategory: ObjectId,
        category: ObjectId,
    },

    /// Category cleared on update while a subcategory is still set
    #[error("Category cannot be cleared while subcategory {0} is set")]
    CategoryRequired(ObjectId),

    #[error("Slug '{0}' is already taken")]
    DuplicateSlug(String),

    /// Unique index violation from a concurrent write
    #[error("A product with this slug already exists")]
    DuplicateKey,

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) | ProductError::SlugNotFound(_) => {
                AppError::NotFound("Product not found".to_string())
            }
            ProductError::InvalidId(_)
            | ProductError::UnknownCategory(_)
            | ProductError::UnknownSubcategory(_)
            | ProductError::SubcategoryMismatch { .. }
            | ProductError::CategoryRequired(_) => AppError::BadRequest(err.to_string()),
            ProductError::DuplicateSlug(_) | ProductError::DuplicateKey => {
                AppError::Conflict(err.to_string())
            }
            ProductError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            ProductError::DuplicateKey
        } else {
            ProductError::Database(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

/// Failures while looking up parent categories
impl From<CategoryError> for ProductError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::Database(msg) => ProductError::Database(msg),
            other => ProductError::Database(other.to_string()),
        }
    }
}

/// Parse an optional hex reference; blank strings mean "no reference".
pub fn parse_reference(
    raw: Option<&str>,
    kind: &'static str,
) -> ProductResult<Option<ObjectId>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(hex) => ObjectId::parse_str(hex)
            .map(Some)
            .map_err(|_| ProductError::InvalidId(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::NotFound(ObjectId::new()), StatusCode::NOT_FOUND),
            (
                ProductError::SlugNotFound("widget".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (ProductError::InvalidId("category"), StatusCode::BAD_REQUEST),
            (
                ProductError::UnknownCategory(ObjectId::new()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProductError::SubcategoryMismatch {
                    subcategory: ObjectId::new(),
                    category: ObjectId::new(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ProductError::CategoryRequired(ObjectId::new()),
                StatusCode::BAD_REQUEST,
            ),
            (ProductError::DuplicateKey, StatusCode::CONFLICT),
            (
                ProductError::Database("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_parse_reference() {
        let id = ObjectId::new();

        assert_eq!(parse_reference(None, "category").unwrap(), None);
        assert_eq!(parse_reference(Some(""), "category").unwrap(), None);
        assert_eq!(parse_reference(Some("  "), "category").unwrap(), None);
        assert_eq!(
            parse_reference(Some(&id.to_hex()), "category").unwrap(),
            Some(id)
        );
        assert_eq!(
            parse_reference(Some("abc"), "subcategory")
                .unwrap_err()
                .to_string(),
            "Invalid subcategory id"
        );
    }
}
