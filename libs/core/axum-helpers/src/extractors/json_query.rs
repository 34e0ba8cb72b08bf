//! Query string extractor with JSON error bodies.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// `Query<T>` that rejects with the standard error body.
///
/// A query string that does not deserialize into `T` (e.g. `limit=abc`)
/// becomes 400 `QUERY_EXTRACTION` instead of axum's plain-text rejection.
/// Unknown parameters are ignored unless `T` denies them.
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::JsonQuery;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Page {
///     limit: Option<i64>,
/// }
///
/// async fn list(JsonQuery(page): JsonQuery<Page>) -> String {
///     format!("{:?}", page.limit)
/// }
///
/// let app = Router::new().route("/products", get(list));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for JsonQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::QueryExtractorRejection(e).into_response())?;

        Ok(JsonQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Page {
        limit: Option<i64>,
    }

    async fn list(JsonQuery(page): JsonQuery<Page>) -> String {
        page.limit.unwrap_or_default().to_string()
    }

    async fn send(uri: &str) -> axum::response::Response {
        Router::new()
            .route("/", get(list))
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_query() {
        let response = send("/?limit=5&_t=1").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        let response = send("/?limit=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "QUERY_EXTRACTION");
        assert_eq!(body["code"], 1012);
    }
}
