use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::CategoryResult;
use crate::models::{Category, Subcategory};

/// Persistence for categories and subcategories.
///
/// The dependant counters look across collections so that deletes can be
/// refused while anything still points at the record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert_category(&self, category: Category) -> CategoryResult<Category>;

    async fn find_category(&self, id: ObjectId) -> CategoryResult<Option<Category>>;

    /// All categories, sorted by name
    async fn list_categories(&self) -> CategoryResult<Vec<Category>>;

    /// Replace by `_id`; `false` when nothing matched
    async fn replace_category(&self, category: Category) -> CategoryResult<bool>;

    async fn delete_category(&self, id: ObjectId) -> CategoryResult<bool>;

    /// Whether a category other than `exclude` owns `slug`
    async fn category_slug_exists(
        &self,
        slug: String,
        exclude: Option<ObjectId>,
    ) -> CategoryResult<bool>;

    async fn insert_subcategory(&self, subcategory: Subcategory) -> CategoryResult<Subcategory>;

    async fn find_subcategory(&self, id: ObjectId) -> CategoryResult<Option<Subcategory>>;

    /// Subcategories sorted by name, optionally of one category
    async fn list_subcategories(
        &self,
        category: Option<ObjectId>,
    ) -> CategoryResult<Vec<Subcategory>>;

    async fn replace_subcategory(&self, subcategory: Subcategory) -> CategoryResult<bool>;

    async fn delete_subcategory(&self, id: ObjectId) -> CategoryResult<bool>;

    async fn subcategory_slug_exists(
        &self,
        slug: String,
        exclude: Option<ObjectId>,
    ) -> CategoryResult<bool>;

    async fn count_subcategories_of(&self, category: ObjectId) -> CategoryResult<u64>;

    async fn count_products_in_category(&self, category: ObjectId) -> CategoryResult<u64>;

    async fn count_products_in_subcategory(&self, subcategory: ObjectId) -> CategoryResult<u64>;
}
