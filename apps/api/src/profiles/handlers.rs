use axum::extract::State;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::models::{Role, User};
use crate::profiles::{
    self, CollegePatch, CompanyPatch, Reference, ReferenceRequest, StudentPatch,
};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/student/:id
pub async fn handle_get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<User>, AppError> {
    let student = profiles::get_student(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok("Student fetched successfully", student))
}

/// POST /api/student/update-profile/:id
pub async fn handle_update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StudentPatch>,
) -> Result<ApiResponse<User>, AppError> {
    let user = profiles::update_student(state.store.as_ref(), id, patch, Utc::now()).await?;
    Ok(ApiResponse::ok("Profile updated successfully", user))
}

/// POST /api/company/update-profile/:id
pub async fn handle_update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CompanyPatch>,
) -> Result<ApiResponse<User>, AppError> {
    let user = profiles::update_company(state.store.as_ref(), id, patch, Utc::now()).await?;
    Ok(ApiResponse::ok("Profile updated successfully", user))
}

/// POST /api/college/update-profile/:id
pub async fn handle_update_college(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CollegePatch>,
) -> Result<ApiResponse<User>, AppError> {
    let user = profiles::update_college(state.store.as_ref(), id, patch, Utc::now()).await?;
    Ok(ApiResponse::ok("Profile updated successfully", user))
}

async fn update_reference(
    state: &AppState,
    id: Uuid,
    role: Role,
    reference: Reference,
    req: ReferenceRequest,
) -> Result<ApiResponse<User>, AppError> {
    let user =
        profiles::set_reference(state.store.as_ref(), id, role, reference, req.url, Utc::now())
            .await?;
    let message = match reference {
        Reference::Resume => "Resume updated successfully",
        Reference::Image => "Image updated successfully",
    };
    Ok(ApiResponse::ok(message, user))
}

/// POST /api/student/update-resumeurl/:id
pub async fn handle_student_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReferenceRequest>,
) -> Result<ApiResponse<User>, AppError> {
    update_reference(&state, id, Role::Student, Reference::Resume, req).await
}

/// POST /api/student/update-imageurl/:id
pub async fn handle_student_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReferenceRequest>,
) -> Result<ApiResponse<User>, AppError> {
    update_reference(&state, id, Role::Student, Reference::Image, req).await
}

/// POST /api/company/update-imageurl/:id
pub async fn handle_company_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReferenceRequest>,
) -> Result<ApiResponse<User>, AppError> {
    update_reference(&state, id, Role::Company, Reference::Image, req).await
}

/// POST /api/college/update-imageurl/:id
pub async fn handle_college_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReferenceRequest>,
) -> Result<ApiResponse<User>, AppError> {
    update_reference(&state, id, Role::CollegeStaff, Reference::Image, req).await
}

/// GET /api/college/get-students-list
pub async fn handle_students_list(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let students = profiles::list_students(state.store.as_ref()).await?;
    Ok(ApiResponse::ok("Students fetched successfully", students))
}

/// GET /api/college/get-companies-list
pub async fn handle_companies_list(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let companies = profiles::list_companies(state.store.as_ref()).await?;
    Ok(ApiResponse::ok("Companies fetched successfully", companies))
}
