use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::models::{Applicant, InterviewDetails, Placement, PlacementRecord, PlacementStatus};
use crate::placements::ledger::{
    self, AppliedJobView, ApplyRequest, JobApplicationView, StatusUpdateRequest,
};
use crate::placements::lifecycle::{self, ChangeJobStatusRequest, CreateJobRequest};
use crate::placements::listings::{self, AppliedJobOverview, JobBoardEntry, Viewer};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsQuery {
    pub company_id: Option<Uuid>,
}

/// POST /api/company/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<ApiResponse<Placement>, AppError> {
    let job = lifecycle::create_job(state.store.as_ref(), &req, Utc::now()).await?;
    Ok(ApiResponse::created("Job created successfully", job))
}

/// GET /api/company/jobs?companyId=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<ApiResponse<Vec<PlacementRecord>>, AppError> {
    let jobs = listings::list_jobs(state.store.as_ref(), query.company_id).await?;
    Ok(ApiResponse::ok("Jobs fetched successfully", jobs))
}

/// POST /api/company/jobs/:job_id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<ApiResponse<Applicant>, AppError> {
    let applicant = ledger::apply(state.store.as_ref(), job_id, req.student_id, Utc::now()).await?;
    Ok(ApiResponse::created("Applied successfully", applicant))
}

/// GET /api/company/jobs/:job_id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<JobApplicationView>>, AppError> {
    let views = ledger::list_by_job(state.store.as_ref(), job_id).await?;
    Ok(ApiResponse::ok("Applications fetched successfully", views))
}

/// PUT /api/company/applications/:id/status
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<ApiResponse<Applicant>, AppError> {
    let applicant =
        ledger::set_status(state.store.as_ref(), application_id, req.status, Utc::now()).await?;
    Ok(ApiResponse::ok("Application status updated", applicant))
}

/// PATCH /api/company/applications/:id/schedule-interview
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(details): Json<InterviewDetails>,
) -> Result<ApiResponse<Applicant>, AppError> {
    let applicant =
        ledger::schedule_interview(state.store.as_ref(), application_id, details, Utc::now())
            .await?;
    Ok(ApiResponse::ok("Interview scheduled successfully", applicant))
}

/// PATCH /api/company/change-jobs-status/:job_id
///
/// An empty body deactivates the job.
pub async fn handle_change_job_status(
    State(state): State<AppState>,
    session: AuthSession,
    Path(job_id): Path<Uuid>,
    body: Option<Json<ChangeJobStatusRequest>>,
) -> Result<ApiResponse<Placement>, AppError> {
    let requested = body
        .and_then(|Json(req)| req.status)
        .unwrap_or(PlacementStatus::Deactivated);
    let job = lifecycle::change_job_status(
        state.store.as_ref(),
        &session,
        job_id,
        requested,
        Utc::now(),
    )
    .await?;
    Ok(ApiResponse::ok("Job status updated", job))
}

/// GET /api/student/job-list/:student_id  (`0` for an anonymous preview)
pub async fn handle_job_board(
    State(state): State<AppState>,
    Path(viewer): Path<String>,
) -> Result<ApiResponse<Vec<JobBoardEntry>>, AppError> {
    let viewer: Viewer = viewer.parse()?;
    let board = listings::job_board(state.store.as_ref(), viewer).await?;
    Ok(ApiResponse::ok("Jobs fetched successfully", board))
}

/// GET /api/student/applied-jobs/:student_id
pub async fn handle_applied_jobs(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<AppliedJobView>>, AppError> {
    let views = ledger::list_by_student(state.store.as_ref(), student_id).await?;
    Ok(ApiResponse::ok("Applied jobs fetched successfully", views))
}

/// GET /api/student/students-applied-jobs/:id
///
/// The path id is accepted for route compatibility and not used.
pub async fn handle_all_applied_jobs(
    State(state): State<AppState>,
    Path(_id): Path<String>,
) -> Result<ApiResponse<Vec<AppliedJobOverview>>, AppError> {
    let overview = listings::all_applied_jobs(state.store.as_ref()).await?;
    Ok(ApiResponse::ok("Applied jobs fetched successfully", overview))
}
