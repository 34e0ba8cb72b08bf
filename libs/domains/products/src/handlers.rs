//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AdminGate, JsonQuery, ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    no_store_headers, require_admin_session,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, DeleteResponse, ProductFilter, ProductResponse, ReviewInput, ReviewResponse,
    UpdateProduct,
};
use crate::references::CategoryLookup;
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        get_product_by_slug,
        create_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            ProductResponse, ReviewResponse, CreateProduct, UpdateProduct,
            ReviewInput, DeleteResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R, C> = Arc<ProductService<R, C>>;

/// Create the products router.
///
/// Reads are public; POST, PUT and DELETE need the admin session cookie.
/// Every response, errors included, carries no-store cache headers.
pub fn router<R, C>(service: ProductService<R, C>, gate: AdminGate) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryLookup + 'static,
{
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route("/slug/{slug}", get(get_product_by_slug))
        .with_state(shared_service.clone());

    let admin = Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(gate, require_admin_session))
        .with_state(shared_service);

    public
        .merge(admin)
        .layer(middleware::from_fn(no_store_headers))
}

/// List products with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "List of products, newest first", body = Vec<ProductResponse>),
        (status = 400, description = "Invalid category or subcategory id"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository, C: CategoryLookup>(
    State(service): State<SharedService<R, C>>,
    JsonQuery(filter): JsonQuery<ProductFilter>,
) -> ProductResult<Json<Vec<ProductResponse>>> {
    let products = service.list_products(filter).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository, C: CategoryLookup>(
    State(service): State<SharedService<R, C>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.get_product(id).await?;
    Ok(Json(product.into()))
}

/// Get an active product by slug and count the view
#[utoipa::path(
    get,
    path = "/slug/{slug}",
    tag = "Products",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_by_slug<R: ProductRepository, C: CategoryLookup>(
    State(service): State<SharedService<R, C>>,
    Path(slug): Path<String>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.view_product_by_slug(&slug).await?;
    Ok(Json(product.into()))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository, C: CategoryLookup>(
    State(service): State<SharedService<R, C>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ObjectId (hex)")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, C: CategoryLookup>(
    State(service): State<SharedService<R, C>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product.into()))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = DeleteResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository, C: CategoryLookup>(
    State(service): State<SharedService<R, C>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<DeleteResponse>> {
    service.delete_product(id).await?;
    Ok(Json(DeleteResponse::new(id)))
}
