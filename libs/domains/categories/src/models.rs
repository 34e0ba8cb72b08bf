use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Category document (stored in the `categories` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Unique across categories
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Subcategory document (stored in the `subcategories` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Unique across subcategories
    pub slug: String,
    /// Parent category
    pub category: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// DTO for updating a category; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// DTO for creating a subcategory
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Parent category id (24-character hex)
    pub category: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// DTO for updating a subcategory; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubcategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New parent category id (24-character hex)
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Query filters for listing subcategories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SubcategoryFilter {
    /// Only subcategories of this category (24-character hex)
    pub category: Option<String>,
}

/// Category as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Hex ObjectId
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subcategory as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryResponse {
    /// Hex ObjectId
    pub id: String,
    pub name: String,
    pub slug: String,
    /// Parent category id as hex
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body returned by DELETE endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    /// Hex ObjectId of the removed document
    pub id: String,
}

impl DeleteResponse {
    pub fn new(message: impl Into<String>, id: ObjectId) -> Self {
        Self {
            message: message.into(),
            id: id.to_hex(),
        }
    }
}

impl Category {
    pub fn new(input: CreateCategory, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            slug,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Subcategory {
    pub fn new(name: String, slug: String, category: ObjectId, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name,
            slug,
            category,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_hex(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<Subcategory> for SubcategoryResponse {
    fn from(subcategory: Subcategory) -> Self {
        Self {
            id: subcategory.id.to_hex(),
            name: subcategory.name,
            slug: subcategory.slug,
            category: subcategory.category.to_hex(),
            description: subcategory.description,
            created_at: subcategory.created_at,
            updated_at: subcategory.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_category_document_uses_underscore_id() {
        let category = Category::new(
            CreateCategory {
                name: "Tools".to_string(),
                description: None,
            },
            "tools".to_string(),
        );

        let doc = bson::to_document(&category).unwrap();
        assert!(doc.get_object_id("_id").is_ok());
        assert!(doc.get_datetime("createdAt").is_ok());
        assert!(!doc.contains_key("description"));
    }

    #[test]
    fn test_category_response_renames_id() {
        let category = Category::new(
            CreateCategory {
                name: "Tools".to_string(),
                description: Some("Hand tools".to_string()),
            },
            "tools".to_string(),
        );
        let hex = category.id.to_hex();

        let json = serde_json::to_value(CategoryResponse::from(category)).unwrap();
        assert_eq!(json["id"], hex);
        assert!(json.get("_id").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_subcategory_response_renders_parent_as_hex() {
        let parent = ObjectId::new();
        let sub = Subcategory::new("Drills".to_string(), "drills".to_string(), parent, None);

        let response = SubcategoryResponse::from(sub);
        assert_eq!(response.category, parent.to_hex());
    }
}
