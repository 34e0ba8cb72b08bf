//! Products API routes

use axum::Router;
use domain_categories::MongoCategoryRepository;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::new(&state.db);
    let categories = MongoCategoryRepository::new(&state.db);
    let service = ProductService::new(repository, categories);
    handlers::router(service, state.admin.clone())
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
