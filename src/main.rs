use std::sync::Arc;

use axum::{extract::Request, routing::get, Router};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};
use tracing::info;

mod config;
mod db;
mod docs;
mod error;
mod extract;
mod handlers;
mod models;

use crate::config::Config;
use crate::db::ProductStore;

/// Base path for every product route.
pub const PRODUCTS_PATH: &str = "/api/productos";

/// Shared application state. Cloning only bumps the store's refcount.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

/// The full service: the router behind trailing-slash normalization, so
/// `/api/productos/` reaches the same handlers as `/api/productos`.
pub type App = NormalizePath<Router>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,productos_api=debug")
            }),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let state = AppState {
        store: db::open_store(&config).await?,
    };

    let app = build_app(state);

    let addr = config.addr();
    info!("Listening on http://{}", addr);
    info!("API docs: http://{}/api-docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, axum::ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}

fn build_app(state: AppState) -> App {
    // Must wrap the router from outside: `Router::layer` runs after routing.
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

fn build_router(state: AppState) -> Router {
    use handlers::products;

    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── API docs ────────────────────────────────────────────────────────
        .route("/api-docs", get(docs::openapi_json))
        .route("/api-docs/openapi.json", get(docs::openapi_json))

        // ── Products CRUD ───────────────────────────────────────────────────
        .route(
            PRODUCTS_PATH,
            get(products::list_products).post(products::create_product),
        )
        .route(
            &format!("{PRODUCTS_PATH}/:id"),
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
