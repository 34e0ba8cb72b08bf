//! Product Service - Business logic layer

use domain_categories::{slugify, unique_slug};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult, parse_reference};
use crate::models::{CreateProduct, Product, ProductFilter, ProductQuery, UpdateProduct};
use crate::references::CategoryLookup;
use crate::repository::ProductRepository;

const FALLBACK_SLUG: &str = "product";

/// Product service providing business logic operations
///
/// Owns slug assignment and reference checks; persistence goes through
/// the repository, parent lookups through [`CategoryLookup`].
pub struct ProductService<R: ProductRepository, C: CategoryLookup> {
    repository: Arc<R>,
    categories: Arc<C>,
}

impl<R: ProductRepository, C: CategoryLookup> ProductService<R, C> {
    pub fn new(repository: R, categories: C) -> Self {
        Self {
            repository: Arc::new(repository),
            categories: Arc::new(categories),
        }
    }

    async fn assign_slug(&self, name: &str, exclude: Option<ObjectId>) -> ProductResult<String> {
        let repository = Arc::clone(&self.repository);
        unique_slug(name, FALLBACK_SLUG, move |slug| {
            let repository = Arc::clone(&repository);
            async move { repository.slug_exists(slug, exclude).await }
        })
        .await?
        .ok_or_else(|| ProductError::DuplicateSlug(slugify(name, FALLBACK_SLUG)))
    }

    /// Check a category/subcategory pair.
    ///
    /// A subcategory alone implies its parent category.
    async fn resolve_references(
        &self,
        category: Option<ObjectId>,
        subcategory: Option<ObjectId>,
    ) -> ProductResult<(Option<ObjectId>, Option<ObjectId>)> {
        match (category, subcategory) {
            (category, Some(subcategory)) => {
                let parent = self
                    .categories
                    .subcategory_parent(subcategory)
                    .await?
                    .ok_or(ProductError::UnknownSubcategory(subcategory))?;

                match category {
                    Some(category) if category != parent => {
                        Err(ProductError::SubcategoryMismatch {
                            subcategory,
                            category,
                        })
                    }
                    _ => Ok((Some(parent), Some(subcategory))),
                }
            }
            (Some(category), None) => {
                if self.categories.category_exists(category).await? {
                    Ok((Some(category), None))
                } else {
                    Err(ProductError::UnknownCategory(category))
                }
            }
            (None, None) => Ok((None, None)),
        }
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        let category = parse_reference(input.category.as_deref(), "category")?;
        let subcategory = parse_reference(input.subcategory.as_deref(), "subcategory")?;
        let (category, subcategory) = self.resolve_references(category, subcategory).await?;

        let slug = self.assign_slug(&input.name, None).await?;

        self.repository
            .insert(Product::new(input, slug, category, subcategory))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Public lookup: active products only, each hit counts as a view
    #[instrument(skip(self))]
    pub async fn view_product_by_slug(&self, slug: &str) -> ProductResult<Product> {
        self.repository
            .find_active_by_slug_and_increment_views(slug.to_string())
            .await?
            .ok_or_else(|| ProductError::SlugNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let query = ProductQuery {
            category: parse_reference(filter.category.as_deref(), "category")?,
            subcategory: parse_reference(filter.subcategory.as_deref(), "subcategory")?,
            active: filter.active,
            search: filter.search.filter(|s| !s.trim().is_empty()),
            limit: filter.limit,
            offset: filter.offset,
        };

        self.repository.list(query).await
    }

    /// Update a product; the slug follows the name only when the name changes
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product> {
        let mut product = self.get_product(id).await?;

        let references_changed = input.category.is_some() || input.subcategory.is_some();
        if references_changed {
            let category = match input.category.as_deref() {
                Some(raw) => parse_reference(Some(raw), "category")?,
                None => product.category,
            };
            let subcategory = match input.subcategory.as_deref() {
                Some(raw) => parse_reference(Some(raw), "subcategory")?,
                None => product.subcategory,
            };
            if let (Some(_), None, Some(subcategory)) =
                (input.category.as_deref(), category, subcategory)
            {
                return Err(ProductError::CategoryRequired(subcategory));
            }
            let (category, subcategory) = self.resolve_references(category, subcategory).await?;
            product.category = category;
            product.subcategory = subcategory;
        }

        if let Some(name) = input.name.clone() {
            if name != product.name {
                product.slug = self.assign_slug(&name, Some(id)).await?;
                product.name = name;
            }
        }

        product.apply_update(input);

        if !self.repository.update(product.clone()).await? {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, slug = %product.slug, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}

impl<R: ProductRepository, C: CategoryLookup> Clone for ProductService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: Arc::clone(&self.categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::MockCategoryLookup;
    use crate::repository::MockProductRepository;
    use mockall::predicate::*;
    use serde_json::json;

    fn create(body: serde_json::Value) -> CreateProduct {
        serde_json::from_value(body).unwrap()
    }

    fn widget() -> Product {
        Product::new(create(json!({ "name": "Widget" })), "widget".to_string(), None, None)
    }

    #[tokio::test]
    async fn test_create_product_sequential_slugs() {
        let mut repo = MockProductRepository::new();
        repo.expect_slug_exists()
            .with(eq("widget".to_string()), eq(None))
            .returning(|_, _| Ok(true));
        repo.expect_slug_exists()
            .with(eq("widget-1".to_string()), eq(None))
            .returning(|_, _| Ok(true));
        repo.expect_slug_exists()
            .with(eq("widget-2".to_string()), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_insert().returning(Ok);

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let created = service
            .create_product(create(json!({ "name": "Widget" })))
            .await
            .unwrap();

        assert_eq!(created.slug, "widget-2");
        assert!(created.is_active);
        assert_eq!(created.views, 0);
    }

    #[tokio::test]
    async fn test_create_product_unknown_category() {
        let category = ObjectId::new();

        let mut lookup = MockCategoryLookup::new();
        lookup
            .expect_category_exists()
            .with(eq(category))
            .returning(|_| Ok(false));
        let mut repo = MockProductRepository::new();
        repo.expect_insert().never();

        let service = ProductService::new(repo, lookup);
        let result = service
            .create_product(create(json!({ "name": "Widget", "category": category.to_hex() })))
            .await;

        assert!(matches!(result, Err(ProductError::UnknownCategory(id)) if id == category));
    }

    #[tokio::test]
    async fn test_create_product_invalid_category_hex() {
        let service = ProductService::new(MockProductRepository::new(), MockCategoryLookup::new());
        let result = service
            .create_product(create(json!({ "name": "Widget", "category": "nope" })))
            .await;

        assert!(matches!(result, Err(ProductError::InvalidId("category"))));
    }

    #[tokio::test]
    async fn test_create_product_subcategory_mismatch() {
        let category = ObjectId::new();
        let other_parent = ObjectId::new();
        let subcategory = ObjectId::new();

        let mut lookup = MockCategoryLookup::new();
        lookup
            .expect_subcategory_parent()
            .returning(move |_| Ok(Some(other_parent)));

        let service = ProductService::new(MockProductRepository::new(), lookup);
        let result = service
            .create_product(create(json!({
                "name": "Widget",
                "category": category.to_hex(),
                "subcategory": subcategory.to_hex(),
            })))
            .await;

        assert!(matches!(result, Err(ProductError::SubcategoryMismatch { .. })));
    }

    #[tokio::test]
    async fn test_create_product_infers_category_from_subcategory() {
        let parent = ObjectId::new();
        let subcategory = ObjectId::new();

        let mut lookup = MockCategoryLookup::new();
        lookup
            .expect_subcategory_parent()
            .with(eq(subcategory))
            .returning(move |_| Ok(Some(parent)));
        let mut repo = MockProductRepository::new();
        repo.expect_slug_exists().returning(|_, _| Ok(false));
        repo.expect_insert().returning(Ok);

        let service = ProductService::new(repo, lookup);
        let created = service
            .create_product(create(json!({
                "name": "Widget",
                "category": "",
                "subcategory": subcategory.to_hex(),
            })))
            .await
            .unwrap();

        assert_eq!(created.category, Some(parent));
        assert_eq!(created.subcategory, Some(subcategory));
    }

    #[tokio::test]
    async fn test_create_product_unknown_subcategory() {
        let mut lookup = MockCategoryLookup::new();
        lookup.expect_subcategory_parent().returning(|_| Ok(None));

        let service = ProductService::new(MockProductRepository::new(), lookup);
        let result = service
            .create_product(create(json!({
                "name": "Widget",
                "subcategory": ObjectId::new().to_hex(),
            })))
            .await;

        assert!(matches!(result, Err(ProductError::UnknownSubcategory(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_slug_when_name_unchanged() {
        let existing = widget();
        let id = existing.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_slug_exists().never();
        repo.expect_update()
            .withf(|p| p.slug == "widget" && p.short_description == "Shiny")
            .returning(|_| Ok(true));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let updated = service
            .update_product(
                id,
                UpdateProduct {
                    name: Some("Widget".to_string()),
                    short_description: Some("Shiny".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "widget");
    }

    #[tokio::test]
    async fn test_update_regenerates_slug_on_rename() {
        let existing = widget();
        let id = existing.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_slug_exists()
            .with(eq("gadget".to_string()), eq(Some(id)))
            .returning(|_, _| Ok(false));
        repo.expect_update().returning(|_| Ok(true));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let updated = service
            .update_product(
                id,
                UpdateProduct {
                    name: Some("Gadget".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "gadget");
        assert_eq!(updated.name, "Gadget");
    }

    #[tokio::test]
    async fn test_update_clears_references_with_empty_strings() {
        let mut existing = widget();
        existing.category = Some(ObjectId::new());
        existing.subcategory = Some(ObjectId::new());
        let id = existing.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().returning(|_| Ok(true));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let updated = service
            .update_product(
                id,
                UpdateProduct {
                    category: Some(String::new()),
                    subcategory: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category, None);
        assert_eq!(updated.subcategory, None);
    }

    #[tokio::test]
    async fn test_update_category_conflicting_with_kept_subcategory() {
        let parent = ObjectId::new();
        let mut existing = widget();
        existing.category = Some(parent);
        existing.subcategory = Some(ObjectId::new());
        let id = existing.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().never();
        let mut lookup = MockCategoryLookup::new();
        lookup
            .expect_subcategory_parent()
            .returning(move |_| Ok(Some(parent)));

        let service = ProductService::new(repo, lookup);
        let result = service
            .update_product(
                id,
                UpdateProduct {
                    category: Some(ObjectId::new().to_hex()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::SubcategoryMismatch { .. })));
    }

    #[tokio::test]
    async fn test_update_clearing_category_with_kept_subcategory_rejected() {
        let subcategory = ObjectId::new();
        let mut existing = widget();
        existing.category = Some(ObjectId::new());
        existing.subcategory = Some(subcategory);
        let id = existing.id;

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().never();
        let mut lookup = MockCategoryLookup::new();
        lookup.expect_subcategory_parent().never();

        let service = ProductService::new(repo, lookup);
        let result = service
            .update_product(
                id,
                UpdateProduct {
                    category: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::CategoryRequired(s)) if s == subcategory));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let result = service
            .update_product(ObjectId::new(), UpdateProduct::default())
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_view_product_by_slug_inactive_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_active_by_slug_and_increment_views()
            .with(eq("hidden".to_string()))
            .returning(|_| Ok(None));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let result = service.view_product_by_slug("hidden").await;

        assert!(matches!(result, Err(ProductError::SlugNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_products_parses_filter() {
        let category = ObjectId::new();

        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .withf(move |q| {
                q.category == Some(category)
                    && q.subcategory.is_none()
                    && q.active == Some(true)
                    && q.search.is_none()
            })
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let filter = ProductFilter {
            category: Some(category.to_hex()),
            subcategory: Some(String::new()),
            active: Some(true),
            search: Some("  ".to_string()),
            ..Default::default()
        };

        assert!(service.list_products(filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_products_invalid_subcategory() {
        let service = ProductService::new(MockProductRepository::new(), MockCategoryLookup::new());
        let filter = ProductFilter {
            subcategory: Some("123".to_string()),
            ..Default::default()
        };

        let result = service.list_products(filter).await;
        assert!(matches!(result, Err(ProductError::InvalidId("subcategory"))));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(repo, MockCategoryLookup::new());
        let result = service.delete_product(ObjectId::new()).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }
}
