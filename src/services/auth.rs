use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{LoginRequest, LoginResponse, NewUser, SignupRequest, User},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registers a new account
///
/// Accounts registered with `admin_email` are flagged as admins.
pub async fn signup(users: &dyn UserStore, admin_email: &str, request: SignupRequest) -> AppResult<User> {
    let name = required(request.name, "name")?;
    let mobile_no = required(request.mobile_no, "mobileNo")?;
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;

    let new_user = NewUser {
        is_admin: email == admin_email,
        password_hash: hash_password(&password)?,
        name,
        mobile_no,
        email,
    };

    let user = users.insert_user(new_user).await?;
    tracing::info!(user_id = user.user_id, is_admin = user.is_admin, "User registered");
    Ok(user)
}

/// Verifies an email/password pair
///
/// An unknown email and a wrong password fail identically.
pub async fn login(users: &dyn UserStore, request: LoginRequest) -> AppResult<LoginResponse> {
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;

    let Some(user) = users.find_by_email(&email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&password, &user.password_hash) {
        tracing::debug!(user_id = user.user_id, "Login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = user.user_id, "User logged in");
    Ok(LoginResponse {
        message: "Login successful".to_string(),
        user_id: user.user_id,
        is_admin: user.is_admin,
    })
}

/// Creates the admin account unless one with `email` already exists
pub async fn ensure_admin(users: &dyn UserStore, email: &str, password: &str) -> AppResult<()> {
    if users.find_by_email(email).await?.is_some() {
        tracing::debug!(email, "Admin account already present");
        return Ok(());
    }

    let admin = NewUser {
        name: "Admin".to_string(),
        mobile_no: "0000000000".to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        is_admin: true,
    };

    match users.insert_user(admin).await {
        Ok(user) => {
            tracing::info!(user_id = user.user_id, "Admin account created");
            Ok(())
        }
        // Another instance created it in between
        Err(AppError::Conflict(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("Missing field: {}", field)))
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}
