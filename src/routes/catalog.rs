use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::{error::AppResult, models::Product, services::catalog};

#[derive(Debug, Deserialize)]
pub struct BrandQuery {
    brand: Option<String>,
}

pub async fn brands(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(catalog::brands(state.snapshot.catalog())?))
}

pub async fn products_by_brand(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrandQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = catalog::products_by_brand(state.snapshot.catalog(), params.brand.as_deref())?;
    Ok(Json(products))
}

pub async fn brands_with_products(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<BTreeMap<String, Vec<Product>>>> {
    Ok(Json(catalog::brands_with_products(state.snapshot.catalog())?))
}
