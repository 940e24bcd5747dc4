use std::sync::Arc;

use axum::{extract::State, Json};

use super::AppState;
use crate::{models::DashboardData, services::catalog};

/// Handler for `GET /admin-dashboard-data`
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardData> {
    Json(catalog::dashboard(state.snapshot.catalog()))
}
