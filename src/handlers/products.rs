use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    db,
    error::AppResult,
    extract::AppJson,
    models::{NewProduct, Product, ProductChanges, ProductDraft},
    AppState,
};

pub const DELETED_MESSAGE: &str = "Producto eliminado";

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteConfirmation {
    #[schema(example = "Producto eliminado")]
    pub message: String,
}

// ── Create ────────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "productos",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Producto creado", body = Product),
        (status = 400, description = "Datos inválidos", body = ErrorBody),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let draft = ProductDraft::try_from(payload)?;
    let product = state.store.create(draft).await?;

    info!(id = %product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

// ── List ──────────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "productos",
    responses(
        (status = 200, description = "Todos los productos", body = [Product]),
        (status = 500, description = "Error del almacén", body = ErrorBody),
    )
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.store.list_all().await?;

    info!(count = products.len(), "Listed products");

    Ok(Json(products))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "productos",
    params(("id" = String, Path, description = "Identificador del producto")),
    responses(
        (status = 200, description = "Producto encontrado", body = Product),
        (status = 400, description = "Identificador inválido", body = ErrorBody),
        (status = 404, description = "Producto no encontrado", body = ErrorBody),
        (status = 500, description = "Error del almacén", body = ErrorBody),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = db::parse_id(&id)?;
    let product = state.store.get_by_id(id).await?;

    info!(id = %id, "Fetched product");

    Ok(Json(product))
}

// ── Update ────────────────────────────────────────────────────────────────────

#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    tag = "productos",
    params(("id" = String, Path, description = "Identificador del producto")),
    request_body = ProductChanges,
    responses(
        (status = 200, description = "Producto actualizado", body = Product),
        (status = 400, description = "Datos o identificador inválidos", body = ErrorBody),
        (status = 404, description = "Producto no encontrado", body = ErrorBody),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(changes): AppJson<ProductChanges>,
) -> AppResult<Json<Product>> {
    let id = db::parse_id(&id)?;
    changes.validate()?;
    let product = state.store.update(id, &changes).await?;

    info!(id = %id, "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "productos",
    params(("id" = String, Path, description = "Identificador del producto")),
    responses(
        (status = 200, description = "Producto eliminado", body = DeleteConfirmation),
        (status = 400, description = "Identificador inválido", body = ErrorBody),
        (status = 404, description = "Producto no encontrado", body = ErrorBody),
        (status = 500, description = "Error del almacén", body = ErrorBody),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteConfirmation>> {
    let id = db::parse_id(&id)?;
    state.store.delete(id).await?;

    info!(id = %id, "Deleted product");

    Ok(Json(DeleteConfirmation {
        message: DELETED_MESSAGE.to_string(),
    }))
}
