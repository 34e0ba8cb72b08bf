//! HTTP handlers for the Categories and Subcategories APIs

use axum::{
    Json, Router,
    extract::State,
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

use crate::error::CategoryResult;
use crate::models::{
    CategoryResponse, CreateCategory, CreateSubcategory, DeleteResponse, SubcategoryFilter,
    SubcategoryResponse, UpdateCategory, UpdateSubcategory,
};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for the Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        get_category,
        list_category_subcategories,
        create_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(CategoryResponse, SubcategoryResponse, CreateCategory, UpdateCategory, DeleteResponse),
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
        (name = "Categories", description = "Product category endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the Subcategories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_subcategories,
        get_subcategory,
        create_subcategory,
        update_subcategory,
        delete_subcategory,
    ),
    components(
        schemas(SubcategoryResponse, CreateSubcategory, UpdateSubcategory, DeleteResponse),
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
        (name = "Subcategories", description = "Product subcategory endpoints")
    )
)]
pub struct SubcategoriesApiDoc;

type SharedService<R> = Arc<CategoryService<R>>;

/// Categories router; writes require the admin session cookie.
pub fn router<R: CategoryRepository + 'static>(
    service: CategoryService<R>,
    gate: AdminGate,
) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/", get(list_categories))
        .route("/{id}", get(get_category))
        .route("/{id}/subcategories", get(list_category_subcategories))
        .with_state(shared_service.clone());

    let admin = Router::new()
        .route("/", post(create_category))
        .route("/{id}", put(update_category).delete(delete_category))
        .route_layer(middleware::from_fn_with_state(gate, require_admin_session))
        .with_state(shared_service);

    public
        .merge(admin)
        .layer(middleware::from_fn(no_store_headers))
}

/// Subcategories router; writes require the admin session cookie.
pub fn subcategories_router<R: CategoryRepository + 'static>(
    service: CategoryService<R>,
    gate: AdminGate,
) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/", get(list_subcategories))
        .route("/{id}", get(get_subcategory))
        .with_state(shared_service.clone());

    let admin = Router::new()
        .route("/", post(create_subcategory))
        .route("/{id}", put(update_subcategory).delete(delete_subcategory))
        .route_layer(middleware::from_fn_with_state(gate, require_admin_session))
        .with_state(shared_service);

    public
        .merge(admin)
        .layer(middleware::from_fn(no_store_headers))
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
) -> CategoryResult<Json<Vec<CategoryResponse>>> {
    let categories = service.list_categories().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<CategoryResponse>> {
    let category = service.get_category(id).await?;
    Ok(Json(category.into()))
}

/// List the subcategories of a category
#[utoipa::path(
    get,
    path = "/{id}/subcategories",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Subcategories of the category", body = Vec<SubcategoryResponse>),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_category_subcategories<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<Vec<SubcategoryResponse>>> {
    let subcategories = service.subcategories_of(id).await?;
    Ok(Json(subcategories.into_iter().map(Into::into).collect()))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (hex)")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<CategoryResponse>> {
    let category = service.update_category(id, input).await?;
    Ok(Json(category.into()))
}

/// Delete a category without dependants
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = String, Path, description = "Category ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Category deleted", body = DeleteResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<DeleteResponse>> {
    service.delete_category(id).await?;
    Ok(Json(DeleteResponse::new("Category deleted successfully", id)))
}

/// List subcategories, optionally of one category
#[utoipa::path(
    get,
    path = "",
    tag = "Subcategories",
    params(SubcategoryFilter),
    responses(
        (status = 200, description = "List of subcategories", body = Vec<SubcategoryResponse>),
        (status = 400, description = "Invalid category id"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_subcategories<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    JsonQuery(filter): JsonQuery<SubcategoryFilter>,
) -> CategoryResult<Json<Vec<SubcategoryResponse>>> {
    let subcategories = service.list_subcategories(filter).await?;
    Ok(Json(subcategories.into_iter().map(Into::into).collect()))
}

/// Get a subcategory by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Subcategories",
    params(
        ("id" = String, Path, description = "Subcategory ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Subcategory found", body = SubcategoryResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_subcategory<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<SubcategoryResponse>> {
    let subcategory = service.get_subcategory(id).await?;
    Ok(Json(subcategory.into()))
}

/// Create a subcategory under an existing category
#[utoipa::path(
    post,
    path = "",
    tag = "Subcategories",
    request_body = CreateSubcategory,
    responses(
        (status = 201, description = "Subcategory created", body = SubcategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_subcategory<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<CreateSubcategory>,
) -> CategoryResult<impl IntoResponse> {
    let subcategory = service.create_subcategory(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubcategoryResponse::from(subcategory)),
    ))
}

/// Update a subcategory
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Subcategories",
    params(
        ("id" = String, Path, description = "Subcategory ObjectId (hex)")
    ),
    request_body = UpdateSubcategory,
    responses(
        (status = 200, description = "Subcategory updated", body = SubcategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_subcategory<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateSubcategory>,
) -> CategoryResult<Json<SubcategoryResponse>> {
    let subcategory = service.update_subcategory(id, input).await?;
    Ok(Json(subcategory.into()))
}

/// Delete a subcategory no product references
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Subcategories",
    params(
        ("id" = String, Path, description = "Subcategory ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Subcategory deleted", body = DeleteResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_subcategory<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<DeleteResponse>> {
    service.delete_subcategory(id).await?;
    Ok(Json(DeleteResponse::new("Subcategory deleted successfully", id)))
}
