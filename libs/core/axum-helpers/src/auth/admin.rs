use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::admin::AdminConfig;
use std::sync::Arc;

/// Cookie-equality gate for admin write routes.
///
/// Cheap to clone; the expected name and value are shared.
#[derive(Clone, Debug)]
pub struct AdminGate {
    config: Arc<AdminConfig>,
}

impl AdminGate {
    pub fn new(config: AdminConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// True when any `Cookie` header carries the expected name/value pair.
    pub fn is_admin(&self, headers: &HeaderMap) -> bool {
        cookie_value(headers, &self.config.cookie_name)
            .is_some_and(|value| value == self.config.cookie_value)
    }
}

impl From<AdminConfig> for AdminGate {
    fn from(config: AdminConfig) -> Self {
        Self::new(config)
    }
}

/// Find a cookie by name across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim())
        })
}

/// Rejects requests without a valid admin session cookie with 401.
///
/// ```ignore
/// use axum::{Router, middleware, routing::post};
/// use axum_helpers::auth::{AdminGate, require_admin_session};
///
/// let admin_routes = Router::new()
///     .route("/", post(create))
///     .route_layer(middleware::from_fn_with_state(gate, require_admin_session));
/// ```
pub async fn require_admin_session(
    State(gate): State<AdminGate>,
    request: Request,
    next: Next,
) -> Response {
    if !gate.is_admin(request.headers()) {
        tracing::debug!(
            cookie = gate.cookie_name(),
            method = %request.method(),
            path = %request.uri().path(),
            "Admin session missing or invalid"
        );
        return AppError::Unauthorized("Unauthorized".to_string()).into_response();
    }

    next.run(request).await
}
