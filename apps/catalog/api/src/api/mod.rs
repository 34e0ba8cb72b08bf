//! API routes module

pub mod categories;
pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes (nested under `/api` by the server setup)
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/categories", categories::router(state))
        .nest("/subcategories", categories::subcategories_router(state))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    categories::init_indexes(state).await?;
    products::init_indexes(state).await
}
