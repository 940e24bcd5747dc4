use std::{str::FromStr, sync::Arc};

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{Cache, CartStore, CommentStore, UserStore},
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    recommend::Snapshot,
};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod comments;
pub mod recommendations;

/// Default length of content-based and hybrid result lists
pub const DEFAULT_TOP_N: usize = 10;

/// State shared by every handler
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub users: Arc<dyn UserStore>,
    pub carts: Arc<dyn CartStore>,
    pub comments: Arc<dyn CommentStore>,
    pub cache: Cache,
    /// Accounts registered with this email are admins
    pub admin_email: String,
}

impl AppState {
    /// State backed by a single store implementing every storage trait
    pub fn new<S>(snapshot: Snapshot, store: S, cache: Cache, admin_email: impl Into<String>) -> Self
    where
        S: UserStore + CartStore + CommentStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            snapshot: Arc::new(snapshot),
            users: store.clone(),
            carts: store.clone(),
            comments: store,
            cache,
            admin_email: admin_email.into(),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Accounts
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        // Recommendations
        .route("/content-recommendation", get(recommendations::content_based))
        .route("/search-similar-products", get(recommendations::similar_by_description))
        .route("/rating-recommendation", get(recommendations::top_rated))
        .route("/recommendations", get(recommendations::collaborative))
        .route("/hybrid-recommendation", get(recommendations::hybrid))
        // Catalog browsing
        .route("/brands", get(catalog::brands))
        .route("/products/brand", get(catalog::products_by_brand))
        .route("/brands/products", get(catalog::brands_with_products))
        // Cart
        .route("/add_to_cart", post(cart::add_to_cart))
        .route("/get_cart", get(cart::get_cart))
        .route("/decrease_cart_quantity", post(cart::decrease_quantity))
        .route("/remove_from_cart", post(cart::remove_from_cart))
        .route("/increase_cart_count", post(cart::increase_count))
        .route("/recommend-by-brand", get(cart::recommend_by_brand))
        // Comments
        .route("/addcomment", post(comments::add_comment))
        .route("/top-comments-products", get(comments::top_commented))
        // Admin
        .route("/admin-dashboard-data", get(admin::dashboard))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Parses an optional identifier, treating an unparsable value as absent
pub(crate) fn lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// Parses the `top_n` query parameter, defaulting to [`DEFAULT_TOP_N`]
pub(crate) fn top_n(raw: Option<&str>) -> AppResult<usize> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_TOP_N),
        Some(v) => v
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("Invalid top_n: {}", v))),
    }
}
