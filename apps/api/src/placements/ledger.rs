//! Applicant sub-ledger: apply, status transitions, interview scheduling and
//! the two joined read views (by job, by student).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::SocialProfile;
use crate::models::{
    Applicant, ApplicantStatus, InterviewDetails, JobType, PlacementStatus, Role,
};
use crate::placements::{require_user, users_by_id, CompanySummary};
use crate::store::{ApplicantChange, PlacementFilter, Store};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub student_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicantStatus,
}

/// One row of `GET /company/jobs/:id/applications`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub student_id: Uuid,
    pub student_name: String,
    pub department: Option<String>,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub social_profile: SocialProfile,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub status: ApplicantStatus,
    pub interview_details: Option<InterviewDetails>,
    pub resume_link: Option<String>,
    pub profile_image: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `GET /student/applied-jobs/:studentId`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobView {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary: f64,
    pub location: String,
    pub skills: Vec<String>,
    pub deadline: NaiveDate,
    pub job_status: PlacementStatus,
    pub company: Option<CompanySummary>,
    pub status: ApplicantStatus,
    pub interview_details: Option<InterviewDetails>,
    pub applied_at: DateTime<Utc>,
}

pub async fn apply(
    store: &dyn Store,
    job_id: Uuid,
    student_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Applicant, AppError> {
    require_user(store, student_id, Role::Student).await?;
    let applicant = store
        .append_applicant(Applicant::new(job_id, student_id, now))
        .await?;
    info!(
        "Student {} applied to job {} (application {})",
        student_id, job_id, applicant.id
    );
    Ok(applicant)
}

/// Overwrites the status in place. No transition graph is enforced.
pub async fn set_status(
    store: &dyn Store,
    application_id: Uuid,
    status: ApplicantStatus,
    now: DateTime<Utc>,
) -> Result<Applicant, AppError> {
    let applicant = store
        .update_applicant(application_id, ApplicantChange::Status(status), now)
        .await?
        .ok_or_else(|| application_not_found(application_id))?;
    info!(
        "Application {} set to {}",
        application_id,
        status.as_str()
    );
    Ok(applicant)
}

/// Replaces the interview details wholesale; the status is left alone.
pub async fn schedule_interview(
    store: &dyn Store,
    application_id: Uuid,
    details: InterviewDetails,
    now: DateTime<Utc>,
) -> Result<Applicant, AppError> {
    if details.time.trim().is_empty() {
        return Err(AppError::Validation("time is required".to_string()));
    }
    if details.location_or_link.trim().is_empty() {
        return Err(AppError::Validation(
            "locationOrLink is required".to_string(),
        ));
    }
    store
        .update_applicant(application_id, ApplicantChange::Interview(details), now)
        .await?
        .ok_or_else(|| application_not_found(application_id))
}

fn application_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

/// Applicants of one job joined with their student profiles, newest first.
pub async fn list_by_job(store: &dyn Store, job_id: Uuid) -> Result<Vec<JobApplicationView>, AppError> {
    let record = store
        .find_placement(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let students = users_by_id(
        store,
        record.applicants.iter().map(|a| a.student_id).collect(),
    )
    .await?;

    let mut views: Vec<JobApplicationView> = Vec::with_capacity(record.applicants.len());
    for applicant in record.applicants.iter().rev() {
        let Some((student, profile)) = students
            .get(&applicant.student_id)
            .and_then(|u| u.as_student().map(|p| (u, p)))
        else {
            warn!(
                "Application {} references missing student {}",
                applicant.id, applicant.student_id
            );
            continue;
        };
        views.push(JobApplicationView {
            id: applicant.id,
            job_id: record.placement.id,
            job_title: record.placement.title.clone(),
            student_id: student.id,
            student_name: student.full_name(),
            department: profile.education.first().and_then(|e| e.department.clone()),
            email: student.email.clone(),
            phone: student.phone.clone(),
            skills: profile.skills.clone(),
            social_profile: profile.social_profile.clone(),
            gender: profile.gender.clone(),
            state: profile.state.clone(),
            city: profile.city.clone(),
            status: applicant.status,
            interview_details: applicant.interview_details.clone(),
            resume_link: profile.resume_url.clone(),
            profile_image: profile.image_url.clone(),
            applied_at: applicant.created_at,
            updated_at: applicant.updated_at,
        });
    }
    // Ledger is in append order; reversed + stable sort keeps later appends first on ties.
    views.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    Ok(views)
}

/// Every application of one student with its job and company, newest first.
pub async fn list_by_student(
    store: &dyn Store,
    student_id: Uuid,
) -> Result<Vec<AppliedJobView>, AppError> {
    require_user(store, student_id, Role::Student).await?;
    let records = store
        .list_placements(&PlacementFilter::applied_by(student_id))
        .await?;
    let companies = users_by_id(
        store,
        records.iter().map(|r| r.placement.company_id).collect(),
    )
    .await?;

    let mut views: Vec<AppliedJobView> = records
        .iter()
        .filter_map(|record| {
            let applicant = record.applicant_for(student_id)?;
            let job = &record.placement;
            Some(AppliedJobView {
                application_id: applicant.id,
                job_id: job.id,
                job_title: job.title.clone(),
                description: job.description.clone(),
                job_type: job.job_type,
                salary: job.salary,
                location: job.location.clone(),
                skills: job.skills.clone(),
                deadline: job.deadline,
                job_status: job.status,
                company: companies
                    .get(&job.company_id)
                    .and_then(CompanySummary::from_user),
                status: applicant.status,
                interview_details: applicant.interview_details.clone(),
                applied_at: applicant.created_at,
            })
        })
        .collect();
    views.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterviewMode;
    use crate::placements::tests::{seed_company, seed_job, seed_student};
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn interview() -> InterviewDetails {
        InterviewDetails {
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            time: "10:30".to_string(),
            mode: InterviewMode::Online,
            location_or_link: "https://meet.example/xyz".to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_application_is_a_conflict_and_ledger_keeps_one() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "Backend Intern").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;

        let first = apply(&store, job.id, s1.id, Utc::now()).await.unwrap();
        assert_eq!(first.status, ApplicantStatus::Pending);

        let err = apply(&store, job.id, s1.id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let record = store.find_placement(job.id).await.unwrap().unwrap();
        assert_eq!(record.applicants.len(), 1);
        assert_eq!(record.applicants[0].student_id, s1.id);
    }

    #[tokio::test]
    async fn test_concurrent_applications_leave_one_entry() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let company = seed_company(store.as_ref(), "hr@acme.io", "Acme").await;
        let job = seed_job(store.as_ref(), company.id, "SDE").await;
        let s1 = seed_student(store.as_ref(), "s1@c.edu", &["CSE"]).await;

        let (job_id, student_id) = (job.id, s1.id);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                apply(store.as_ref(), job_id, student_id, Utc::now()).await
            }));
        }
        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        let record = store.find_placement(job.id).await.unwrap().unwrap();
        assert_eq!(record.applicants.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_to_unknown_job_is_not_found() {
        let store = MemoryStore::new();
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let err = apply(&store, Uuid::new_v4(), s1.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_bumps_parent_updated_at() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;

        let later = job.updated_at + Duration::minutes(5);
        apply(&store, job.id, s1.id, later).await.unwrap();
        let record = store.find_placement(job.id).await.unwrap().unwrap();
        assert_eq!(record.placement.updated_at, later);
    }

    #[tokio::test]
    async fn test_status_change_preserves_interview_and_bumps_both_timestamps() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let applicant = apply(&store, job.id, s1.id, Utc::now()).await.unwrap();

        schedule_interview(&store, applicant.id, interview(), Utc::now())
            .await
            .unwrap();
        let later = Utc::now() + Duration::minutes(10);
        let updated = set_status(&store, applicant.id, ApplicantStatus::Selected, later)
            .await
            .unwrap();
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, applicant.created_at);

        let views = list_by_job(&store, job.id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].status, ApplicantStatus::Selected);
        assert_eq!(views[0].interview_details, Some(interview()));

        let record = store.find_placement(job.id).await.unwrap().unwrap();
        assert_eq!(record.placement.updated_at, later);
    }

    #[tokio::test]
    async fn test_any_status_may_follow_any_other() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let applicant = apply(&store, job.id, s1.id, Utc::now()).await.unwrap();

        for status in [
            ApplicantStatus::Selected,
            ApplicantStatus::Pending,
            ApplicantStatus::Rejected,
            ApplicantStatus::Shortlisted,
        ] {
            let updated = set_status(&store, applicant.id, status, Utc::now())
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn test_scheduling_twice_changes_only_updated_at() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let applicant = apply(&store, job.id, s1.id, Utc::now()).await.unwrap();

        let first = schedule_interview(&store, applicant.id, interview(), Utc::now())
            .await
            .unwrap();
        let second = schedule_interview(
            &store,
            applicant.id,
            interview(),
            Utc::now() + Duration::seconds(1),
        )
        .await
        .unwrap();
        assert_eq!(first.interview_details, second.interview_details);
        assert_eq!(first.status, second.status);
        assert_eq!(second.status, ApplicantStatus::Pending);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_application_is_not_found() {
        let store = MemoryStore::new();
        let err = set_status(&store, Uuid::new_v4(), ApplicantStatus::Rejected, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = schedule_interview(&store, Uuid::new_v4(), interview(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_by_job_is_newest_first_with_student_details() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let s2 = seed_student(&store, "s2@c.edu", &["ECE"]).await;

        let t0 = Utc::now();
        apply(&store, job.id, s1.id, t0).await.unwrap();
        apply(&store, job.id, s2.id, t0 + Duration::minutes(1))
            .await
            .unwrap();

        let views = list_by_job(&store, job.id).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].student_id, s2.id);
        assert_eq!(views[0].department.as_deref(), Some("ECE"));
        assert_eq!(views[1].email, "s1@c.edu");
        assert_eq!(views[1].skills, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_list_by_student_carries_job_and_company() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let other = seed_job(&store, company.id, "QA").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let s2 = seed_student(&store, "s2@c.edu", &["CSE"]).await;
        apply(&store, job.id, s1.id, Utc::now()).await.unwrap();
        apply(&store, other.id, s2.id, Utc::now()).await.unwrap();

        let views = list_by_student(&store, s1.id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].job_title, "SDE");
        assert_eq!(
            views[0].company.as_ref().map(|c| c.company_name.as_str()),
            Some("Acme")
        );
        assert_eq!(views[0].status, ApplicantStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_by_student_rejects_non_students() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let err = list_by_student(&store, company.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
