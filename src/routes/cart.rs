use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{lenient, AppState};
use crate::{
    error::AppResult,
    models::{AddToCartRequest, CartItemRequest, CartResponse, CartUpdateResponse},
    services::{cart, BrandRecommendations, CartChange},
};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    user_id: Option<String>,
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddToCartRequest>,
) -> AppResult<Json<Value>> {
    let outcome = cart::add_to_cart(state.users.as_ref(), state.carts.as_ref(), request).await?;
    Ok(Json(json!({ "message": outcome.message() })))
}

pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<CartResponse>> {
    let user_id = lenient(params.user_id.as_deref());
    let cart = cart::get_cart(state.users.as_ref(), state.carts.as_ref(), user_id).await?;
    Ok(Json(CartResponse { cart }))
}

async fn update(
    state: &AppState,
    change: CartChange,
    request: CartItemRequest,
) -> AppResult<Json<CartUpdateResponse>> {
    let response =
        cart::update_cart(state.users.as_ref(), state.carts.as_ref(), change, request).await?;
    Ok(Json(response))
}

pub async fn decrease_quantity(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CartItemRequest>,
) -> AppResult<Json<CartUpdateResponse>> {
    update(&state, CartChange::Decrease, request).await
}

pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CartItemRequest>,
) -> AppResult<Json<CartUpdateResponse>> {
    update(&state, CartChange::Remove, request).await
}

pub async fn increase_count(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CartItemRequest>,
) -> AppResult<Json<CartUpdateResponse>> {
    update(&state, CartChange::Increase, request).await
}

/// Handler for `GET /recommend-by-brand`
pub async fn recommend_by_brand(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<BrandRecommendations>> {
    let user_id = lenient(params.user_id.as_deref());
    let result = cart::recommend_by_brand(
        state.users.as_ref(),
        state.carts.as_ref(),
        state.snapshot.catalog(),
        user_id,
    )
    .await?;
    Ok(Json(result))
}
