use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, errors::is_duplicate_key};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    CategoryNotFound(ObjectId),

    #[error("Subcategory not found: {0}")]
    SubcategoryNotFound(ObjectId),

    /// Identifier in a body or query string is not a valid ObjectId
    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    /// The parent category named in a subcategory body does not exist
    #[error("Category {0} does not exist")]
    UnknownParent(ObjectId),

    #[error("{0}")]
    HasDependants(String),

    #[error("Slug '{0}' is already taken")]
    DuplicateSlug(String),

    /// Unique index violation from a concurrent write
    #[error("A record with this slug already exists")]
    DuplicateKey,

    #[error("Database error: {0}")]
    Database(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::CategoryNotFound(_) => AppError::NotFound("Category not found".to_string()),
            CategoryError::SubcategoryNotFound(_) => {
                AppError::NotFound("Subcategory not found".to_string())
            }
            CategoryError::InvalidId(_) | CategoryError::UnknownParent(_) => {
                AppError::BadRequest(err.to_string())
            }
            CategoryError::HasDependants(msg) => AppError::Conflict(msg),
            CategoryError::DuplicateSlug(_) | CategoryError::DuplicateKey => {
                AppError::Conflict(err.to_string())
            }
            CategoryError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CategoryError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            CategoryError::DuplicateKey
        } else {
            CategoryError::Database(err.to_string())
        }
    }
}

/// Parse a hex id from a body or query string.
pub fn parse_id(raw: &str, kind: &'static str) -> CategoryResult<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| CategoryError::InvalidId(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                CategoryError::CategoryNotFound(ObjectId::new()),
                StatusCode::NOT_FOUND,
            ),
            (CategoryError::InvalidId("category"), StatusCode::BAD_REQUEST),
            (
                CategoryError::HasDependants("Category has subcategories".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                CategoryError::Database("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_parse_id() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex(), "category").unwrap(), id);
        assert_eq!(
            parse_id("xyz", "category").unwrap_err().to_string(),
            "Invalid category id"
        );
    }
}
