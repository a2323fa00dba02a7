use axum::extract::State;

use crate::auth::{
    forgot_password, signin, signup, ForgotPasswordRequest, SigninRequest, SigninResponse,
    SignupRequest,
};
use crate::errors::AppError;
use crate::extract::Json;
use crate::models::User;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = signup(state.store.as_ref(), req).await?;
    Ok(ApiResponse::created("User registered successfully", user))
}

/// POST /api/signin
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<ApiResponse<SigninResponse>, AppError> {
    let session = signin(state.store.as_ref(), state.config.session_ttl_hours, req).await?;
    Ok(ApiResponse::ok("Signed in successfully", session))
}

/// POST /api/forgot-password
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    forgot_password(state.store.as_ref(), req).await?;
    Ok(ApiResponse::ok("Password updated successfully.", ()))
}
