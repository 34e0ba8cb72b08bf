//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog admin API: products, categories and subcategories"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/categories", api = domain_categories::ApiDoc),
        (path = "/api/subcategories", api = domain_categories::SubcategoriesApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Categories", description = "Product category endpoints"),
        (name = "Subcategories", description = "Product subcategory endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_nests_every_domain() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for prefix in ["/api/products", "/api/categories", "/api/subcategories"] {
            assert!(
                paths.iter().any(|p| p.starts_with(prefix)),
                "missing {} in {:?}",
                prefix,
                paths
            );
        }
        assert!(paths.iter().any(|p| p.as_str() == "/api/products/slug/{slug}"));
    }
}
