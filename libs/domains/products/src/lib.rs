//! Products Domain
//!
//! Catalog products stored in MongoDB. Products carry a unique slug derived
//! from the name and may reference a category and a subcategory from
//! `domain_categories`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, admin gate, no-store headers
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌────────────────┐
//! │   Service   │ ──▶ │ CategoryLookup │  ← reference checks
//! └──────┬──────┘     └────────────────┘
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
//! use domain_categories::MongoCategoryRepository;
//! use domain_products::{handlers, mongodb::MongoProductRepository, service::ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = ProductService::new(repository, MongoCategoryRepository::new(&db));
//!
//! let gate = AdminGate::new(AdminConfig::new("admin_session", "true"));
//! let router = handlers::router(service, gate);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod references;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, DeleteResponse, Product, ProductFilter, ProductQuery, ProductResponse, Review,
    ReviewInput, ReviewResponse, UpdateProduct,
};
pub use mongodb::MongoProductRepository;
pub use references::CategoryLookup;
pub use repository::ProductRepository;
pub use service::ProductService;
