//! Category Service - Business logic layer

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{CategoryError, CategoryResult, parse_id};
use crate::models::{
    Category, CreateCategory, CreateSubcategory, Subcategory, SubcategoryFilter, UpdateCategory,
    UpdateSubcategory,
};
use crate::repository::CategoryRepository;
use crate::slug::{slugify, unique_slug};

const CATEGORY_FALLBACK_SLUG: &str = "category";
const SUBCATEGORY_FALLBACK_SLUG: &str = "subcategory";

/// Service for categories and their subcategories.
///
/// Handles slug assignment, parent checks and dependant checks on delete.
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn category_slug(&self, name: &str, exclude: Option<ObjectId>) -> CategoryResult<String> {
        let repository = Arc::clone(&self.repository);
        unique_slug(name, CATEGORY_FALLBACK_SLUG, move |slug| {
            let repository = Arc::clone(&repository);
            async move { repository.category_slug_exists(slug, exclude).await }
        })
        .await?
        .ok_or_else(|| CategoryError::DuplicateSlug(slugify(name, CATEGORY_FALLBACK_SLUG)))
    }

    async fn subcategory_slug(
        &self,
        name: &str,
        exclude: Option<ObjectId>,
    ) -> CategoryResult<String> {
        let repository = Arc::clone(&self.repository);
        unique_slug(name, SUBCATEGORY_FALLBACK_SLUG, move |slug| {
            let repository = Arc::clone(&repository);
            async move { repository.subcategory_slug_exists(slug, exclude).await }
        })
        .await?
        .ok_or_else(|| CategoryError::DuplicateSlug(slugify(name, SUBCATEGORY_FALLBACK_SLUG)))
    }

    async fn require_parent(&self, raw: &str) -> CategoryResult<ObjectId> {
        let id = parse_id(raw, "category")?;
        match self.repository.find_category(id).await? {
            Some(_) => Ok(id),
            None => Err(CategoryError::UnknownParent(id)),
        }
    }

    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        let slug = self.category_slug(&input.name, None).await?;
        self.repository
            .insert_category(Category::new(input, slug))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: ObjectId) -> CategoryResult<Category> {
        self.repository
            .find_category(id)
            .await?
            .ok_or(CategoryError::CategoryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        self.repository.list_categories().await
    }

    /// Slug is regenerated only when the name actually changes.
    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: ObjectId,
        input: UpdateCategory,
    ) -> CategoryResult<Category> {
        let mut category = self.get_category(id).await?;

        if let Some(name) = input.name {
            if name != category.name {
                category.slug = self.category_slug(&name, Some(id)).await?;
                category.name = name;
            }
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }
        category.updated_at = Utc::now();

        if !self.repository.replace_category(category.clone()).await? {
            return Err(CategoryError::CategoryNotFound(id));
        }

        tracing::info!(category_id = %id, "Category updated");
        Ok(category)
    }

    /// Refused with a conflict while subcategories or products point here.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: ObjectId) -> CategoryResult<()> {
        self.get_category(id).await?;

        let subcategories = self.repository.count_subcategories_of(id).await?;
        if subcategories > 0 {
            return Err(CategoryError::HasDependants(format!(
                "Category still has {} subcategories",
                subcategories
            )));
        }

        let products = self.repository.count_products_in_category(id).await?;
        if products > 0 {
            return Err(CategoryError::HasDependants(format!(
                "Category is still referenced by {} products",
                products
            )));
        }

        if !self.repository.delete_category(id).await? {
            return Err(CategoryError::CategoryNotFound(id));
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    #[instrument(skip(self, input), fields(subcategory_name = %input.name))]
    pub async fn create_subcategory(&self, input: CreateSubcategory) -> CategoryResult<Subcategory> {
        let parent = self.require_parent(&input.category).await?;
        let slug = self.subcategory_slug(&input.name, None).await?;

        self.repository
            .insert_subcategory(Subcategory::new(input.name, slug, parent, input.description))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_subcategory(&self, id: ObjectId) -> CategoryResult<Subcategory> {
        self.repository
            .find_subcategory(id)
            .await?
            .ok_or(CategoryError::SubcategoryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_subcategories(
        &self,
        filter: SubcategoryFilter,
    ) -> CategoryResult<Vec<Subcategory>> {
        let category = filter
            .category
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_id(raw, "category"))
            .transpose()?;

        self.repository.list_subcategories(category).await
    }

    /// Subcategories of an existing category; 404 when the category is missing.
    #[instrument(skip(self))]
    pub async fn subcategories_of(&self, category: ObjectId) -> CategoryResult<Vec<Subcategory>> {
        self.get_category(category).await?;
        self.repository.list_subcategories(Some(category)).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_subcategory(
        &self,
        id: ObjectId,
        input: UpdateSubcategory,
    ) -> CategoryResult<Subcategory> {
        let mut subcategory = self.get_subcategory(id).await?;

        if let Some(raw) = input.category.as_deref() {
            let parent = self.require_parent(raw).await?;
            if parent != subcategory.category {
                // Referencing products carry the old parent as their category
                let products = self.repository.count_products_in_subcategory(id).await?;
                if products > 0 {
                    return Err(CategoryError::HasDependants(format!(
                        "Subcategory is still referenced by {} products",
                        products
                    )));
                }
                subcategory.category = parent;
            }
        }
        if let Some(name) = input.name {
            if name != subcategory.name {
                subcategory.slug = self.subcategory_slug(&name, Some(id)).await?;
                subcategory.name = name;
            }
        }
        if let Some(description) = input.description {
            subcategory.description = Some(description);
        }
        subcategory.updated_at = Utc::now();

        if !self.repository.replace_subcategory(subcategory.clone()).await? {
            return Err(CategoryError::SubcategoryNotFound(id));
        }

        tracing::info!(subcategory_id = %id, "Subcategory updated");
        Ok(subcategory)
    }

    #[instrument(skip(self))]
    pub async fn delete_subcategory(&self, id: ObjectId) -> CategoryResult<()> {
        self.get_subcategory(id).await?;

        let products = self.repository.count_products_in_subcategory(id).await?;
        if products > 0 {
            return Err(CategoryError::HasDependants(format!(
                "Subcategory is still referenced by {} products",
                products
            )));
        }

        if !self.repository.delete_subcategory(id).await? {
            return Err(CategoryError::SubcategoryNotFound(id));
        }

        tracing::info!(subcategory_id = %id, "Subcategory deleted");
        Ok(())
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;
    use mockall::predicate::*;

    fn category(name: &str, slug: &str) -> Category {
        Category::new(
            CreateCategory {
                name: name.to_string(),
                description: None,
            },
            slug.to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_category_assigns_free_slug() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_category_slug_exists()
            .with(eq("power-tools".to_string()), eq(None))
            .returning(|_, _| Ok(true));
        repo.expect_category_slug_exists()
            .with(eq("power-tools-1".to_string()), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_insert_category().returning(Ok);

        let service = CategoryService::new(repo);
        let created = service
            .create_category(CreateCategory {
                name: "Power Tools".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(created.slug, "power-tools-1");
    }

    #[tokio::test]
    async fn test_get_category_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category().returning(|_| Ok(None));

        let service = CategoryService::new(repo);
        let result = service.get_category(ObjectId::new()).await;

        assert!(matches!(result, Err(CategoryError::CategoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_category_keeps_slug_when_name_unchanged() {
        let existing = category("Tools", "tools");
        let id = existing.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_category_slug_exists().never();
        repo.expect_replace_category().returning(|_| Ok(true));

        let service = CategoryService::new(repo);
        let updated = service
            .update_category(
                id,
                UpdateCategory {
                    name: Some("Tools".to_string()),
                    description: Some("All the tools".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "tools");
        assert_eq!(updated.description.as_deref(), Some("All the tools"));
    }

    #[tokio::test]
    async fn test_update_category_regenerates_slug_on_rename() {
        let existing = category("Tools", "tools");
        let id = existing.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_category_slug_exists()
            .with(eq("hand-tools".to_string()), eq(Some(id)))
            .returning(|_, _| Ok(false));
        repo.expect_replace_category().returning(|_| Ok(true));

        let service = CategoryService::new(repo);
        let updated = service
            .update_category(
                id,
                UpdateCategory {
                    name: Some("Hand Tools".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "hand-tools");
    }

    #[tokio::test]
    async fn test_delete_category_with_subcategories_conflicts() {
        let existing = category("Tools", "tools");

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_count_subcategories_of().returning(|_| Ok(2));
        repo.expect_delete_category().never();

        let service = CategoryService::new(repo);
        let result = service.delete_category(ObjectId::new()).await;

        assert!(matches!(result, Err(CategoryError::HasDependants(_))));
    }

    #[tokio::test]
    async fn test_delete_category_with_products_conflicts() {
        let existing = category("Tools", "tools");

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_count_subcategories_of().returning(|_| Ok(0));
        repo.expect_count_products_in_category().returning(|_| Ok(5));
        repo.expect_delete_category().never();

        let service = CategoryService::new(repo);
        let result = service.delete_category(ObjectId::new()).await;

        assert!(matches!(result, Err(CategoryError::HasDependants(_))));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_category() {
        let existing = category("Tools", "tools");
        let id = existing.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_count_subcategories_of().returning(|_| Ok(0));
        repo.expect_count_products_in_category().returning(|_| Ok(0));
        repo.expect_delete_category()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));

        let service = CategoryService::new(repo);
        assert!(service.delete_category(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_subcategory_requires_existing_parent() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category().returning(|_| Ok(None));
        repo.expect_insert_subcategory().never();

        let service = CategoryService::new(repo);
        let result = service
            .create_subcategory(CreateSubcategory {
                name: "Drills".to_string(),
                category: ObjectId::new().to_hex(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(CategoryError::UnknownParent(_))));
    }

    #[tokio::test]
    async fn test_create_subcategory_rejects_bad_parent_id() {
        let repo = MockCategoryRepository::new();

        let service = CategoryService::new(repo);
        let result = service
            .create_subcategory(CreateSubcategory {
                name: "Drills".to_string(),
                category: "not-hex".to_string(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(CategoryError::InvalidId("category"))));
    }

    #[tokio::test]
    async fn test_create_subcategory() {
        let parent = category("Tools", "tools");
        let parent_id = parent.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_category()
            .returning(move |_| Ok(Some(parent.clone())));
        repo.expect_subcategory_slug_exists()
            .returning(|_, _| Ok(false));
        repo.expect_insert_subcategory().returning(Ok);

        let service = CategoryService::new(repo);
        let created = service
            .create_subcategory(CreateSubcategory {
                name: "Cordless Drills".to_string(),
                category: parent_id.to_hex(),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(created.category, parent_id);
        assert_eq!(created.slug, "cordless-drills");
    }

    #[tokio::test]
    async fn test_list_subcategories_invalid_filter() {
        let repo = MockCategoryRepository::new();
        let service = CategoryService::new(repo);

        let result = service
            .list_subcategories(SubcategoryFilter {
                category: Some("123".to_string()),
            })
            .await;

        assert!(matches!(result, Err(CategoryError::InvalidId("category"))));
    }

    #[tokio::test]
    async fn test_delete_subcategory_with_products_conflicts() {
        let sub = Subcategory::new(
            "Drills".to_string(),
            "drills".to_string(),
            ObjectId::new(),
            None,
        );

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_subcategory()
            .returning(move |_| Ok(Some(sub.clone())));
        repo.expect_count_products_in_subcategory()
            .returning(|_| Ok(1));
        repo.expect_delete_subcategory().never();

        let service = CategoryService::new(repo);
        let result = service.delete_subcategory(ObjectId::new()).await;

        assert!(matches!(result, Err(CategoryError::HasDependants(_))));
    }

    #[tokio::test]
    async fn test_move_referenced_subcategory_conflicts() {
        let sub = Subcategory::new(
            "Drills".to_string(),
            "drills".to_string(),
            ObjectId::new(),
            None,
        );
        let id = sub.id;
        let new_parent = category("Garden", "garden");
        let new_parent_id = new_parent.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_subcategory()
            .returning(move |_| Ok(Some(sub.clone())));
        repo.expect_find_category()
            .returning(move |_| Ok(Some(new_parent.clone())));
        repo.expect_count_products_in_subcategory()
            .with(eq(id))
            .returning(|_| Ok(3));
        repo.expect_replace_subcategory().never();

        let service = CategoryService::new(repo);
        let result = service
            .update_subcategory(
                id,
                UpdateSubcategory {
                    name: None,
                    category: Some(new_parent_id.to_hex()),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(CategoryError::HasDependants(_))));
    }

    #[tokio::test]
    async fn test_move_unreferenced_subcategory() {
        let sub = Subcategory::new(
            "Drills".to_string(),
            "drills".to_string(),
            ObjectId::new(),
            None,
        );
        let id = sub.id;
        let new_parent = category("Garden", "garden");
        let new_parent_id = new_parent.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_subcategory()
            .returning(move |_| Ok(Some(sub.clone())));
        repo.expect_find_category()
            .returning(move |_| Ok(Some(new_parent.clone())));
        repo.expect_count_products_in_subcategory()
            .returning(|_| Ok(0));
        repo.expect_replace_subcategory().returning(|_| Ok(true));

        let service = CategoryService::new(repo);
        let updated = service
            .update_subcategory(
                id,
                UpdateSubcategory {
                    name: None,
                    category: Some(new_parent_id.to_hex()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category, new_parent_id);
    }

    #[tokio::test]
    async fn test_same_parent_skips_product_check() {
        let parent = category("Tools", "tools");
        let parent_id = parent.id;
        let sub = Subcategory::new("Drills".to_string(), "drills".to_string(), parent_id, None);
        let id = sub.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_find_subcategory()
            .returning(move |_| Ok(Some(sub.clone())));
        repo.expect_find_category()
            .returning(move |_| Ok(Some(parent.clone())));
        repo.expect_count_products_in_subcategory().never();
        repo.expect_replace_subcategory().returning(|_| Ok(true));

        let service = CategoryService::new(repo);
        let updated = service
            .update_subcategory(
                id,
                UpdateSubcategory {
                    name: None,
                    category: Some(parent_id.to_hex()),
                    description: Some("Corded and cordless".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category, parent_id);
    }
}
