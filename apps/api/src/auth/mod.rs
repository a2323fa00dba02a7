//! Signup, signin and password reset, plus the bearer-session extractor.
//!
//! Passwords are stored as Argon2 hashes. Signin issues an opaque random token
//! persisted with an expiry; `AuthSession` resolves it back to a user and role.

pub mod handlers;
pub mod password;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{CollegeStaffProfile, CompanyProfile, StudentProfile};
use crate::models::{Profile, Role, Session, User};
use crate::state::AppState;
use crate::store::Store;

const TOKEN_LEN: usize = 48;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub user_type: Role,
    pub first_name: String,
    pub last_name: Option<String>,
    #[serde(alias = "emailID")]
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(alias = "staffID")]
    pub staff_id: Option<String>,
    #[serde(alias = "company")]
    pub company_name: Option<String>,
    #[serde(alias = "studentID")]
    pub student_id: Option<String>,
    pub college_name: Option<String>,
    pub location: Option<String>,
    pub total_employees: Option<i64>,
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    #[serde(alias = "emailID")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub user_type: Role,
    pub user_token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[serde(alias = "emailID")]
    pub email: String,
    pub new_password: String,
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Builds the role's field group from signup input; fields belonging to other
/// roles are dropped.
fn initial_profile(req: &SignupRequest) -> Profile {
    match req.user_type {
        Role::Student => Profile::Student(StudentProfile {
            student_id: req.student_id.clone(),
            ..StudentProfile::default()
        }),
        Role::Company => Profile::Company(CompanyProfile {
            company_name: req.company_name.clone(),
            staff_id: req.staff_id.clone(),
            location: req.location.clone(),
            total_employees: req.total_employees,
            industry: req.industry.clone(),
            ..CompanyProfile::default()
        }),
        Role::CollegeStaff => Profile::CollegeStaff(CollegeStaffProfile {
            college_name: req.college_name.clone(),
            staff_id: req.staff_id.clone(),
            location: req.location.clone(),
            ..CollegeStaffProfile::default()
        }),
    }
}

pub async fn signup(store: &dyn Store, req: SignupRequest) -> Result<User, AppError> {
    require("firstName", &req.first_name)?;
    require("email", &req.email)?;
    require("phone", &req.phone)?;
    require("password", &req.password)?;
    if !req.email.contains('@') {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            req.email
        )));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: req.email.trim().to_string(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.clone(),
        phone: req.phone.trim().to_string(),
        password_hash: password::hash_password(&req.password).await?,
        profile: initial_profile(&req),
        created_at: now,
        updated_at: now,
    };
    store.insert_user(user).await
}

pub async fn signin(
    store: &dyn Store,
    session_ttl_hours: i64,
    req: SigninRequest,
) -> Result<SigninResponse, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = store
        .find_user_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid)?;
    if !password::verify_password(&user.password_hash, &req.password).await? {
        warn!("Failed signin for user {}", user.id);
        return Err(invalid());
    }

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    let expires_at = Utc::now() + Duration::hours(session_ttl_hours);
    store
        .insert_session(Session {
            token: token.clone(),
            user_id: user.id,
            role: user.role().as_str().to_string(),
            expires_at,
        })
        .await?;
    info!("Issued session for user {}", user.id);

    Ok(SigninResponse {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        user_type: user.role(),
        user_token: token,
        expires_at,
    })
}

/// Resets a password by email. There is no ownership proof beyond the email.
pub async fn forgot_password(store: &dyn Store, req: ForgotPasswordRequest) -> Result<(), AppError> {
    require("newPassword", &req.new_password)?;
    let user = store
        .find_user_by_email(req.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
    let hash = password::hash_password(&req.new_password).await?;
    store.update_password(user.id, &hash, Utc::now()).await?;
    info!("Password reset for user {}", user.id);
    Ok(())
}

/// Identity and role claim resolved from an `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let session = state
            .store
            .find_session(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown session".to_string()))?;
        if session.expires_at <= Utc::now() {
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        Ok(AuthSession {
            user_id: session.user_id,
            role: session.role.parse()?,
        })
    }
}
