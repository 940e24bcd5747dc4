use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::AppResult,
    models::{LoginRequest, LoginResponse, SignupRequest},
    services::auth,
};

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    auth::signup(state.users.as_ref(), &state.admin_email, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = auth::login(state.users.as_ref(), request).await?;
    Ok(Json(response))
}
