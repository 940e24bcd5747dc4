use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered storefront account
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub mobile_no: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Account data ready to be persisted, password already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub mobile_no: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "mobileNo")]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub is_admin: bool,
}
