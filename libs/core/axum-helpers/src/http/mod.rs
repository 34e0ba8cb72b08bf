//! HTTP middleware: CORS, security headers and no-store cache headers.
//!
//! ```ignore
//! use axum_helpers::http::{no_store_headers, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(no_store_headers))
//!     .layer(axum::middleware::from_fn(security_headers));
//! ```

pub mod cache;
pub mod cors;
pub mod security;

pub use cache::{NO_STORE_CACHE_CONTROL, no_store_headers};
pub use cors::{cors_layer_from_env, create_cors_layer, parse_origins};
pub use security::security_headers;
