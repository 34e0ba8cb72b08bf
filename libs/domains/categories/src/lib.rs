//! Categories Domain
//!
//! Categories and subcategories are the parent entities products point at.
//! A product may reference one category and one subcategory; deletes here
//! are refused while anything still references the record.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, admin gate, no-store headers
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Slugs, parent checks, dependant checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Documents, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::AdminGate;
//! use core_config::admin::AdminConfig;
//! use domain_categories::{handlers, CategoryService, MongoCategoryRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoCategoryRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = CategoryService::new(repository);
//!
//! let gate = AdminGate::new(AdminConfig::new("admin_session", "true"));
//! let categories = handlers::router(service.clone(), gate.clone());
//! let subcategories = handlers::subcategories_router(service, gate);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod slug;

pub use error::{CategoryError, CategoryResult, parse_id};
pub use handlers::{ApiDoc, SubcategoriesApiDoc};
pub use models::{
    Category, CategoryResponse, CreateCategory, CreateSubcategory, DeleteResponse, Subcategory,
    SubcategoryFilter, SubcategoryResponse, UpdateCategory, UpdateSubcategory,
};
pub use mongodb::MongoCategoryRepository;
pub use repository::CategoryRepository;
pub use service::CategoryService;
pub use slug::{slugify, unique_slug};
