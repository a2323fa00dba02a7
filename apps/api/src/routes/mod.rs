pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::placements::handlers as placements;
use crate::profiles::handlers as profiles;
use crate::reports::handlers as reports;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/signup", post(auth::handle_signup))
        .route("/signin", post(auth::handle_signin))
        .route("/forgot-password", post(auth::handle_forgot_password))
        // Company
        .route(
            "/company/jobs",
            post(placements::handle_create_job).get(placements::handle_list_jobs),
        )
        .route("/company/jobs/:job_id/apply", post(placements::handle_apply))
        .route(
            "/company/jobs/:job_id/applications",
            get(placements::handle_job_applications),
        )
        .route(
            "/company/applications/:id/status",
            put(placements::handle_update_application_status),
        )
        .route(
            "/company/applications/:id/schedule-interview",
            patch(placements::handle_schedule_interview),
        )
        .route(
            "/company/change-jobs-status/:job_id",
            patch(placements::handle_change_job_status),
        )
        .route("/company/:id/details", get(reports::handle_company_details))
        .route(
            "/company/:id/recent-applications",
            get(reports::handle_company_recent_applications),
        )
        .route(
            "/company/:id/applications-overview",
            get(reports::handle_company_overview),
        )
        .route(
            "/company/update-profile/:id",
            post(profiles::handle_update_company),
        )
        .route(
            "/company/update-imageurl/:id",
            post(profiles::handle_company_image),
        )
        // Student
        .route(
            "/student/job-list/:student_id",
            get(placements::handle_job_board),
        )
        .route(
            "/student/applied-jobs/:student_id",
            get(placements::handle_applied_jobs),
        )
        .route(
            "/student/students-applied-jobs/:id",
            get(placements::handle_all_applied_jobs),
        )
        .route(
            "/student/update-profile/:id",
            post(profiles::handle_update_student),
        )
        .route(
            "/student/update-resumeurl/:id",
            post(profiles::handle_student_resume),
        )
        .route(
            "/student/update-imageurl/:id",
            post(profiles::handle_student_image),
        )
        .route("/student/:id", get(profiles::handle_get_student))
        // College
        .route(
            "/college/get-students-list",
            get(profiles::handle_students_list),
        )
        .route(
            "/college/get-companies-list",
            get(profiles::handle_companies_list),
        )
        .route(
            "/college/get-college-details/:id",
            get(reports::handle_college_details),
        )
        .route(
            "/college/get-college-summary/:id",
            get(reports::handle_college_summary),
        )
        .route(
            "/college/get-recent-placement/:id",
            get(reports::handle_recent_placements),
        )
        .route(
            "/college/get-college-application-overview/:id",
            get(reports::handle_college_overview),
        )
        .route(
            "/college/update-profile/:id",
            post(profiles::handle_update_college),
        )
        .route(
            "/college/update-imageurl/:id",
            post(profiles::handle_college_image),
        )
}
