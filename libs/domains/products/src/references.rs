//! Parent lookups used to validate product references.

use async_trait::async_trait;
use domain_categories::{CategoryRepository, MongoCategoryRepository};
use mongodb::bson::oid::ObjectId;
use tracing::instrument;

use crate::error::ProductResult;

/// Read-only view of the categories a product may point at
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    async fn category_exists(&self, id: ObjectId) -> ProductResult<bool>;

    /// Parent category of a subcategory, `None` when the subcategory is missing
    async fn subcategory_parent(&self, id: ObjectId) -> ProductResult<Option<ObjectId>>;
}

#[async_trait]
impl CategoryLookup for MongoCategoryRepository {
    #[instrument(skip(self))]
    async fn category_exists(&self, id: ObjectId) -> ProductResult<bool> {
        Ok(self.find_category(id).await?.is_some())
    }

    #[instrument(skip(self))]
    async fn subcategory_parent(&self, id: ObjectId) -> ProductResult<Option<ObjectId>> {
        Ok(self.find_subcategory(id).await?.map(|sub| sub.category))
    }
}
