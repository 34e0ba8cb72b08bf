//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc, oid::ObjectId},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{MAX_LIMIT, Product, ProductQuery};
use crate::repository::ProductRepository;

pub const PRODUCTS_COLLECTION: &str = "products";

/// Optional fields dropped from the document when they are `None`
const OPTIONAL_FIELDS: [&str; 3] = ["catalogFile", "category", "subcategory"];

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Product>(PRODUCTS_COLLECTION),
        }
    }

    /// Create a repository over a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Initialize indexes; the unique slug index backs the slug loop
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_slug_unique".to_string())
                        .build(),
                )
                .build(),
            // Category and subcategory listings
            IndexModel::builder()
                .keys(doc! { "category": 1, "subcategory": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category_subcategory".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "isActive": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_active_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Build a MongoDB filter document from a parsed query
    fn build_filter(query: &ProductQuery) -> Document {
        let mut filter = doc! {};

        if let Some(category) = query.category {
            filter.insert("category", category);
        }

        if let Some(subcategory) = query.subcategory {
            filter.insert("subcategory", subcategory);
        }

        if let Some(active) = query.active {
            filter.insert("isActive", active);
        }

        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                filter.insert(
                    "name",
                    doc! { "$regex": regex::escape(search), "$options": "i" },
                );
            }
        }

        filter
    }

    fn list_options(query: &ProductQuery) -> FindOptions {
        FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .skip(query.offset)
            .limit(query.limit.clamp(1, MAX_LIMIT))
            .build()
    }

    /// `$set` every stored field except the immutable ones and the view
    /// counter, `$unset` optional fields that are now empty.
    fn update_document(product: &Product) -> ProductResult<Document> {
        let mut set = bson::to_document(product)?;
        set.remove("_id");
        set.remove("views");
        set.remove("createdAt");

        let unset: Document = OPTIONAL_FIELDS
            .iter()
            .filter(|field| !set.contains_key(**field))
            .map(|field| (field.to_string(), bson::Bson::String(String::new())))
            .collect();

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        Ok(update)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;
        tracing::info!(slug = %product.slug, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_active_by_slug_and_increment_views(
        &self,
        slug: String,
    ) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_update(
                doc! { "slug": slug, "isActive": true },
                doc! { "$inc": { "views": 1_i64 } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&query))
            .with_options(Self::list_options(&query))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> ProductResult<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": product.id }, Self::update_document(&product)?)
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: String, exclude: Option<ObjectId>) -> ProductResult<bool> {
        let mut filter = doc! { "slug": slug };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        let count = self.collection.count_documents(filter).await?;
        Ok(count > 0)
    }
}
