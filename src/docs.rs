//! OpenAPI description generated from the handler annotations.

use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers::products::{self, DeleteConfirmation};
use crate::models::{NewProduct, Product, ProductChanges};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API de Productos",
        description = "CRUD de productos de inventario: nombre, precio, cantidad y marca."
    ),
    paths(
        products::create_product,
        products::list_products,
        products::get_product,
        products::update_product,
        products::delete_product,
    ),
    components(schemas(Product, NewProduct, ProductChanges, DeleteConfirmation, ErrorBody)),
    tags((name = "productos", description = "Gestión de productos"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
