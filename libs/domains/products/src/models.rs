use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// Customer review embedded in a product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    /// 1 to 5
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Product document (stored in the `products` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Unique across products, derived from the name
    pub slug: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    /// Image URLs or storage paths
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    /// Free-form specification object
    #[serde(default = "empty_object")]
    pub specifications: Value,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<ObjectId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub views: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Review as submitted by an admin
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
    /// Defaults to the time of the request
    pub created_at: Option<DateTime<Utc>>,
}

/// DTO for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "validate_specifications"))]
    #[schema(value_type = Object)]
    pub specifications: Value,
    #[serde(default)]
    #[validate(nested)]
    pub reviews: Vec<ReviewInput>,
    pub catalog_file: Option<String>,
    /// Category id (24-character hex); empty means none
    pub category: Option<String>,
    /// Subcategory id (24-character hex); empty means none
    pub subcategory: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// DTO for updating a product; absent fields are left unchanged.
///
/// An empty `category`, `subcategory` or `catalogFile` clears the field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    #[validate(custom(function = "validate_specifications"))]
    #[schema(value_type = Option<Object>)]
    pub specifications: Option<Value>,
    #[validate(nested)]
    pub reviews: Option<Vec<ReviewInput>>,
    pub catalog_file: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub is_active: Option<bool>,
}

/// Query filters for listing products.
///
/// Unknown parameters such as cache-busting `_t` are ignored.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ProductFilter {
    /// Category id (24-character hex)
    pub category: Option<String>,
    /// Subcategory id (24-character hex)
    pub subcategory: Option<String>,
    /// Only active (`true`) or only hidden (`false`) products
    pub active: Option<bool>,
    /// Case-insensitive match on the product name
    pub search: Option<String>,
    /// Maximum number of results (1 to 200)
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of results to skip
    #[serde(default)]
    pub offset: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            subcategory: None,
            active: None,
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Parsed listing query handed to the repository
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub category: Option<ObjectId>,
    pub subcategory: Option<ObjectId>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: u64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            subcategory: None,
            active: None,
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub author: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Product as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Hex ObjectId
    pub id: String,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub long_description: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    #[schema(value_type = Object)]
    pub specifications: Value,
    pub reviews: Vec<ReviewResponse>,
    pub catalog_file: Option<String>,
    /// Category id as hex
    pub category: Option<String>,
    /// Subcategory id as hex
    pub subcategory: Option<String>,
    pub is_active: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body returned by DELETE
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    /// Hex ObjectId of the removed product
    pub id: String,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_true() -> bool {
    true
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn validate_specifications(value: &Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ValidationError::new("specifications_object")
            .with_message("specifications must be a JSON object".into()))
    }
}

impl From<ReviewInput> for Review {
    fn from(input: ReviewInput) -> Self {
        Self {
            author: input.author,
            rating: input.rating,
            comment: input.comment,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        }
    }
}

impl Product {
    /// Build a new product once its slug and references are resolved
    pub fn new(
        input: CreateProduct,
        slug: String,
        category: Option<ObjectId>,
        subcategory: Option<ObjectId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            slug,
            short_description: input.short_description,
            long_description: input.long_description,
            images: input.images,
            features: input.features,
            specifications: input.specifications,
            reviews: input.reviews.into_iter().map(Review::from).collect(),
            catalog_file: input.catalog_file.filter(|f| !f.trim().is_empty()),
            category,
            subcategory,
            is_active: input.is_active,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the plain fields of an update.
    ///
    /// Name, slug and references are resolved by the service.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(short_description) = update.short_description {
            self.short_description = short_description;
        }
        if let Some(long_description) = update.long_description {
            self.long_description = long_description;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(features) = update.features {
            self.features = features;
        }
        if let Some(specifications) = update.specifications {
            self.specifications = specifications;
        }
        if let Some(reviews) = update.reviews {
            self.reviews = reviews.into_iter().map(Review::from).collect();
        }
        if let Some(catalog_file) = update.catalog_file {
            self.catalog_file = Some(catalog_file).filter(|f| !f.trim().is_empty());
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            author: review.author,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            slug: product.slug,
            short_description: product.short_description,
            long_description: product.long_description,
            images: product.images,
            features: product.features,
            specifications: product.specifications,
            reviews: product.reviews.into_iter().map(Into::into).collect(),
            catalog_file: product.catalog_file,
            category: product.category.map(|id| id.to_hex()),
            subcategory: product.subcategory.map(|id| id.to_hex()),
            is_active: product.is_active,
            views: product.views,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl DeleteResponse {
    pub fn new(id: ObjectId) -> Self {
        Self {
            message: "Product deleted successfully".to_string(),
            id: id.to_hex(),
        }
    }
}
