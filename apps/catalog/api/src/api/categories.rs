//! Category and subcategory API routes

use axum::Router;
use domain_categories::{CategoryService, MongoCategoryRepository, handlers};

use crate::state::AppState;

fn service(state: &AppState) -> CategoryService<MongoCategoryRepository> {
    CategoryService::new(MongoCategoryRepository::new(&state.db))
}

/// Create categories router
pub fn router(state: &AppState) -> Router {
    handlers::router(service(state), state.admin.clone())
}

/// Create subcategories router
pub fn subcategories_router(state: &AppState) -> Router {
    handlers::subcategories_router(service(state), state.admin.clone())
}

/// Initialize category and subcategory indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoCategoryRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
