//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;

use crate::error::CategoryResult;
use crate::models::{Category, Subcategory};
use crate::repository::CategoryRepository;

pub const CATEGORIES_COLLECTION: &str = "categories";
pub const SUBCATEGORIES_COLLECTION: &str = "subcategories";
/// Read only; used to count products that reference a category
pub const PRODUCTS_COLLECTION: &str = "products";

#[derive(Clone)]
pub struct MongoCategoryRepository {
    categories: Collection<Category>,
    subcategories: Collection<Subcategory>,
    products: Collection<Document>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            categories: db.collection(CATEGORIES_COLLECTION),
            subcategories: db.collection(SUBCATEGORIES_COLLECTION),
            products: db.collection(PRODUCTS_COLLECTION),
        }
    }

    /// Unique slug indexes plus the parent lookup index.
    pub async fn init_indexes(&self) -> CategoryResult<()> {
        self.categories
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "slug": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("idx_slug_unique".to_string())
                            .build(),
                    )
                    .build(),
            )
            .await?;

        self.subcategories
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "slug": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("idx_slug_unique".to_string())
                            .build(),
                    )
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "category": 1, "name": 1 })
                    .options(
                        IndexOptions::builder()
                            .name("idx_category_name".to_string())
                            .build(),
                    )
                    .build(),
            ])
            .await?;

        tracing::info!("Category indexes created successfully");
        Ok(())
    }

    fn slug_filter(slug: &str, exclude: Option<ObjectId>) -> Document {
        let mut filter = doc! { "slug": slug };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        filter
    }

    fn by_name() -> FindOptions {
        FindOptions::builder().sort(doc! { "name": 1 }).build()
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn insert_category(&self, category: Category) -> CategoryResult<Category> {
        self.categories.insert_one(&category).await?;
        tracing::info!(slug = %category.slug, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn find_category(&self, id: ObjectId) -> CategoryResult<Option<Category>> {
        Ok(self.categories.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        let cursor = self
            .categories
            .find(doc! {})
            .with_options(Self::by_name())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn replace_category(&self, category: Category) -> CategoryResult<bool> {
        let result = self
            .categories
            .replace_one(doc! { "_id": category.id }, &category)
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: ObjectId) -> CategoryResult<bool> {
        let result = self.categories.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn category_slug_exists(
        &self,
        slug: String,
        exclude: Option<ObjectId>,
    ) -> CategoryResult<bool> {
        let count = self
            .categories
            .count_documents(Self::slug_filter(&slug, exclude))
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, subcategory), fields(subcategory_id = %subcategory.id))]
    async fn insert_subcategory(&self, subcategory: Subcategory) -> CategoryResult<Subcategory> {
        self.subcategories.insert_one(&subcategory).await?;
        tracing::info!(slug = %subcategory.slug, "Subcategory created");
        Ok(subcategory)
    }

    #[instrument(skip(self))]
    async fn find_subcategory(&self, id: ObjectId) -> CategoryResult<Option<Subcategory>> {
        Ok(self.subcategories.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn list_subcategories(
        &self,
        category: Option<ObjectId>,
    ) -> CategoryResult<Vec<Subcategory>> {
        let filter = match category {
            Some(id) => doc! { "category": id },
            None => doc! {},
        };
        let cursor = self
            .subcategories
            .find(filter)
            .with_options(Self::by_name())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, subcategory), fields(subcategory_id = %subcategory.id))]
    async fn replace_subcategory(&self, subcategory: Subcategory) -> CategoryResult<bool> {
        let result = self
            .subcategories
            .replace_one(doc! { "_id": subcategory.id }, &subcategory)
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_subcategory(&self, id: ObjectId) -> CategoryResult<bool> {
        let result = self.subcategories.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn subcategory_slug_exists(
        &self,
        slug: String,
        exclude: Option<ObjectId>,
    ) -> CategoryResult<bool> {
        let count = self
            .subcategories
            .count_documents(Self::slug_filter(&slug, exclude))
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn count_subcategories_of(&self, category: ObjectId) -> CategoryResult<u64> {
        Ok(self
            .subcategories
            .count_documents(doc! { "category": category })
            .await?)
    }

    #[instrument(skip(self))]
    async fn count_products_in_category(&self, category: ObjectId) -> CategoryResult<u64> {
        Ok(self
            .products
            .count_documents(doc! { "category": category })
            .await?)
    }

    #[instrument(skip(self))]
    async fn count_products_in_subcategory(&self, subcategory: ObjectId) -> CategoryResult<u64> {
        Ok(self
            .products
            .count_documents(doc! { "subcategory": subcategory })
            .await?)
    }
}
