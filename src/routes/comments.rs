use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::AppResult,
    models::{AddCommentRequest, CommentedProduct},
    services::comments,
};

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddCommentRequest>,
) -> AppResult<Json<Value>> {
    comments::add_comment(state.comments.as_ref(), request).await?;
    Ok(Json(json!({ "message": "Comment added successfully" })))
}

pub async fn top_commented(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<CommentedProduct>>> {
    Ok(Json(comments::top_commented(state.comments.as_ref()).await?))
}
