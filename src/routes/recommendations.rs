use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{lenient, top_n, AppState};
use crate::{
    error::AppResult,
    models::{HybridRecommendations, ProductSummary, RatedProduct, RecommendedProduct},
    services::{catalog, recommendations},
};

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    item_name: Option<String>,
    top_n: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionQuery {
    description: Option<String>,
    top_n: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HybridQuery {
    user_id: Option<String>,
    item_name: Option<String>,
    top_n: Option<String>,
}

/// Handler for `GET /content-recommendation`
pub async fn content_based(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContentQuery>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let top_n = top_n(params.top_n.as_deref())?;
    let products = recommendations::content_based(
        &state.snapshot,
        &state.cache,
        params.item_name.as_deref(),
        top_n,
    )
    .await?;
    Ok(Json(products))
}

/// Handler for `GET /search-similar-products`
pub async fn similar_by_description(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DescriptionQuery>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let top_n = top_n(params.top_n.as_deref())?;
    let products = recommendations::similar_by_description(
        &state.snapshot,
        &state.cache,
        params.description.as_deref(),
        top_n,
    )
    .await?;
    Ok(Json(products))
}

/// Handler for `GET /rating-recommendation`
pub async fn top_rated(State(state): State<Arc<AppState>>) -> Json<Vec<RatedProduct>> {
    Json(catalog::top_rated(state.snapshot.catalog()))
}

/// Handler for `GET /recommendations`
pub async fn collaborative(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<Vec<RecommendedProduct>>> {
    let user_id = lenient(params.user_id.as_deref());
    let products = recommendations::collaborative(&state.snapshot, &state.cache, user_id).await?;
    Ok(Json(products))
}

/// Handler for `GET /hybrid-recommendation`
pub async fn hybrid(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HybridQuery>,
) -> AppResult<Json<HybridRecommendations>> {
    let top_n = top_n(params.top_n.as_deref())?;
    let user_id = lenient(params.user_id.as_deref());
    let result = recommendations::hybrid(
        &state.snapshot,
        &state.cache,
        user_id,
        params.item_name.as_deref(),
        top_n,
    )
    .await?;
    Ok(Json(result))
}
