//! Product CRUD handlers. Responses carry the resolved owner.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateProductRequest, ProductDto, UpdateProductRequest};
use crate::application::ProductService;
use crate::interfaces::http::common::{
    parse_id, ApiError, ApiResponse, ListParams, ListResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct ProductHandlerState {
    pub product_service: Arc<ProductService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(ListParams),
    responses(
        (status = 200, description = "Page of products with owners", body = ApiResponse<ListResponse<ProductDto>>),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_products(
    State(state): State<ProductHandlerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<ListResponse<ProductDto>>>, ApiError> {
    let (products, pagination) = state.product_service.list_products(params.into()).await?;
    let items = products.into_iter().map(ProductDto::from).collect();
    Ok(Json(ApiResponse::success(ListResponse::new(items, pagination))))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with owner", body = ApiResponse<ProductDto>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Product or owner not found")
    )
)]
pub async fn get_product(
    State(state): State<ProductHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = parse_id(&id, "product")?;
    let product = state.product_service.get_product(id).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Malformed JSON, bad price or unknown owner"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_product(
    State(state): State<ProductHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    let product = state.product_service.create_product(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_product(
    State(state): State<ProductHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = parse_id(&id, "product")?;
    let product = state.product_service.update_product(id, request.into()).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_product(
    State(state): State<ProductHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "product")?;
    state.product_service.delete_product(id).await?;
    Ok(Json(ApiResponse::success(())))
}
