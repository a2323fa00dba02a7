use axum::extract::State;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::Path;
use crate::reports::activity::{RecentApplication, RecentSelection};
use crate::reports::chart::FunnelReport;
use crate::reports::funnel::{DepartmentFunnelRow, JobFunnelRow};
use crate::reports::{self, CollegeDetails, CompanyDetails};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/company/:id/details
pub async fn handle_company_details(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ApiResponse<CompanyDetails>, AppError> {
    let details = reports::company_details(state.store.as_ref(), company_id).await?;
    Ok(ApiResponse::ok("Company details fetched successfully", details))
}

/// GET /api/company/:id/recent-applications
pub async fn handle_company_recent_applications(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<RecentApplication>>, AppError> {
    let recent = reports::company_recent_applications(state.store.as_ref(), company_id).await?;
    Ok(ApiResponse::ok("Recent applications fetched successfully", recent))
}

/// GET /api/company/:id/applications-overview
pub async fn handle_company_overview(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ApiResponse<FunnelReport<JobFunnelRow>>, AppError> {
    let report = reports::company_overview(state.store.as_ref(), company_id).await?;
    Ok(ApiResponse::ok("Applications overview fetched successfully", report))
}

/// GET /api/college/get-college-details/:id
pub async fn handle_college_details(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<ApiResponse<CollegeDetails>, AppError> {
    let details = reports::college_details(state.store.as_ref(), staff_id).await?;
    Ok(ApiResponse::ok("College details fetched successfully", details))
}

/// GET /api/college/get-college-summary/:id
pub async fn handle_college_summary(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<ApiResponse<FunnelReport<DepartmentFunnelRow>>, AppError> {
    let report = reports::department_summary(state.store.as_ref(), staff_id).await?;
    Ok(ApiResponse::ok("Placement summary fetched successfully", report))
}

/// GET /api/college/get-recent-placement/:id
pub async fn handle_recent_placements(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<RecentSelection>>, AppError> {
    let recent = reports::recent_placements(state.store.as_ref(), staff_id).await?;
    Ok(ApiResponse::ok("Recent placements fetched successfully", recent))
}

/// GET /api/college/get-college-application-overview/:id
pub async fn handle_college_overview(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<ApiResponse<FunnelReport<JobFunnelRow>>, AppError> {
    let report = reports::college_overview(state.store.as_ref(), staff_id).await?;
    Ok(ApiResponse::ok("Applications overview fetched successfully", report))
}
