//! User account handlers: registration, login and password reset.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserProfile;
use crate::errors::{AppError, AppResult};
use crate::services::LoginResponse;
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Vanshita")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "Vanshita@123", min_length = 8)]
    pub password: String,
    /// Role, "User" when omitted
    #[serde(default)]
    #[schema(example = "User")]
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Vanshita@123")]
    pub password: String,
}

/// Forgot password request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// Reset password request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Token from the reset email
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewPass@123", min_length = 8)]
    pub new_password: String,
}

/// Create user account routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "User",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserProfile),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserProfile>> {
    let profile = state
        .auth_service
        .register_user(payload.name, payload.email, payload.password, payload.role)
        .await?;

    Ok(Created(profile, "User registered successfully"))
}

/// Login and get a JWT
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "User",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let response = state
        .auth_service
        .login_user(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(response, "Login successful")))
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/user/forgot-password",
    tag = "User",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email queued"),
        (status = 400, description = "Unknown email or validation error")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .auth_service
        .forgot_password(payload.email)
        .await
        .map_err(|e| match e {
            AppError::NotFound => AppError::bad_request("No user registered with this email"),
            other => other,
        })?;

    Ok(Json(ApiResponse::message(
        "Password reset link sent to your email",
    )))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/user/reset-password",
    tag = "User",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Invalid or expired token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .auth_service
        .reset_password(payload.token, payload.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password has been reset successfully")))
}
