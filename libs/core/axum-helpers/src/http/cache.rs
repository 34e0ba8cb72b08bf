use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{self, HeaderName},
    },
    middleware::Next,
    response::Response,
};

pub const NO_STORE_CACHE_CONTROL: &str =
    "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0";

/// Marks every response, errors included, as uncacheable for browsers,
/// proxies and CDNs.
///
/// ```ignore
/// let router = Router::new()
///     .route("/", get(list))
///     .layer(axum::middleware::from_fn(no_store_headers));
/// ```
pub async fn no_store_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(NO_STORE_CACHE_CONTROL),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        HeaderName::from_static("surrogate-control"),
        HeaderValue::from_static("no-store"),
    );

    response
}
