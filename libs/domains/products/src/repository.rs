use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{Product, ProductQuery};

/// Repository trait for Product persistence operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a fully built product
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Get a product by ID, active or not
    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Get an active product by slug, counting the view atomically.
    ///
    /// Returns the document as it is after the increment.
    async fn find_active_by_slug_and_increment_views(
        &self,
        slug: String,
    ) -> ProductResult<Option<Product>>;

    /// List products matching a query, newest first
    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;

    /// Persist every field of `product` except `views` and `createdAt`.
    ///
    /// Returns `false` when no product has that id.
    async fn update(&self, product: Product) -> ProductResult<bool>;

    /// Delete a product; `false` when nothing matched
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;

    /// Whether a product other than `exclude` owns `slug`
    async fn slug_exists(&self, slug: String, exclude: Option<ObjectId>) -> ProductResult<bool>;
}
