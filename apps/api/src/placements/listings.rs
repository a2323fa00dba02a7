//! Read-side job listings: the company's job table, the student job board and
//! the college-wide "who applied where" view.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicantStatus, InterviewDetails, Placement, PlacementRecord, Role};
use crate::placements::{require_user, users_by_id, CompanySummary, StudentSummary};
use crate::store::{PlacementFilter, Store};

/// Anonymous visitors only see a short preview of the board.
pub const ANONYMOUS_PREVIEW_LIMIT: usize = 3;

/// Who is looking at the job board. The path segment `0` means nobody is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Student(Uuid),
}

impl FromStr for Viewer {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "0" {
            return Ok(Viewer::Anonymous);
        }
        Uuid::parse_str(s)
            .map(Viewer::Student)
            .map_err(|_| AppError::Validation(format!("Invalid student id: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationMarker {
    Applied,
    New,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBoardEntry {
    #[serde(flatten)]
    pub placement: Placement,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub application_status: ApplicationMarker,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantOverview {
    pub application_id: Uuid,
    pub student: Option<StudentSummary>,
    pub status: ApplicantStatus,
    pub interview_details: Option<InterviewDetails>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobOverview {
    #[serde(flatten)]
    pub placement: Placement,
    pub company: Option<CompanySummary>,
    pub applicants: Vec<ApplicantOverview>,
}

/// Every placement with its ledger, newest first, optionally for one company.
pub async fn list_jobs(
    store: &dyn Store,
    company_id: Option<Uuid>,
) -> Result<Vec<PlacementRecord>, AppError> {
    let filter = company_id.map_or_else(PlacementFilter::all, PlacementFilter::for_company);
    store.list_placements(&filter).await
}

/// Active placements newest first, each marked `applied` or `new` for the viewer.
pub async fn job_board(store: &dyn Store, viewer: Viewer) -> Result<Vec<JobBoardEntry>, AppError> {
    let mut filter = PlacementFilter::active();
    match viewer {
        Viewer::Anonymous => filter.limit = Some(ANONYMOUS_PREVIEW_LIMIT),
        Viewer::Student(id) => {
            require_user(store, id, Role::Student).await?;
        }
    }

    let records = store.list_placements(&filter).await?;
    let companies = users_by_id(
        store,
        records.iter().map(|r| r.placement.company_id).collect(),
    )
    .await?;

    Ok(records
        .into_iter()
        .map(|record| {
            let applied = match viewer {
                Viewer::Student(id) => record.applicant_for(id).is_some(),
                Viewer::Anonymous => false,
            };
            let company = companies
                .get(&record.placement.company_id)
                .and_then(CompanySummary::from_user);
            JobBoardEntry {
                company_name: company.as_ref().map(|c| c.company_name.clone()),
                company_logo: company.and_then(|c| c.logo_url),
                application_status: if applied {
                    ApplicationMarker::Applied
                } else {
                    ApplicationMarker::New
                },
                placement: record.placement,
            }
        })
        .collect())
}

/// Placements that have received at least one application, with applicants
/// resolved to student summaries.
pub async fn all_applied_jobs(store: &dyn Store) -> Result<Vec<AppliedJobOverview>, AppError> {
    let records: Vec<PlacementRecord> = store
        .list_placements(&PlacementFilter::all())
        .await?
        .into_iter()
        .filter(|r| !r.applicants.is_empty())
        .collect();

    let ids = records
        .iter()
        .flat_map(|r| {
            std::iter::once(r.placement.company_id).chain(r.applicants.iter().map(|a| a.student_id))
        })
        .collect();
    let users = users_by_id(store, ids).await?;

    Ok(records
        .into_iter()
        .map(|record| AppliedJobOverview {
            company: users
                .get(&record.placement.company_id)
                .and_then(CompanySummary::from_user),
            applicants: record
                .applicants
                .iter()
                .map(|a| ApplicantOverview {
                    application_id: a.id,
                    student: users.get(&a.student_id).and_then(StudentSummary::from_user),
                    status: a.status,
                    interview_details: a.interview_details.clone(),
                    applied_at: a.created_at,
                })
                .collect(),
            placement: record.placement,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthSession;
    use crate::models::PlacementStatus;
    use crate::placements::ledger::{apply, list_by_job, list_by_student};
    use crate::placements::lifecycle::change_job_status;
    use crate::placements::tests::{seed_company, seed_job, seed_student};
    use crate::store::MemoryStore;

    #[test]
    fn test_viewer_parsing() {
        assert_eq!("0".parse::<Viewer>().unwrap(), Viewer::Anonymous);
        let id = Uuid::new_v4();
        assert_eq!(id.to_string().parse::<Viewer>().unwrap(), Viewer::Student(id));
        assert!(matches!(
            "abc".parse::<Viewer>(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_anonymous_board_is_capped() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        for title in ["A", "B", "C", "D", "E"] {
            seed_job(&store, company.id, title).await;
        }
        let board = job_board(&store, Viewer::Anonymous).await.unwrap();
        assert_eq!(board.len(), ANONYMOUS_PREVIEW_LIMIT);
        assert!(board
            .iter()
            .all(|e| e.application_status == ApplicationMarker::New));
        assert_eq!(board[0].company_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_board_marks_applied_jobs() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let sde = seed_job(&store, company.id, "SDE").await;
        let qa = seed_job(&store, company.id, "QA").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        apply(&store, sde.id, s1.id, Utc::now()).await.unwrap();

        let board = job_board(&store, Viewer::Student(s1.id)).await.unwrap();
        assert_eq!(board.len(), 2);
        let marker = |id: Uuid| {
            board
                .iter()
                .find(|e| e.placement.id == id)
                .map(|e| e.application_status)
        };
        assert_eq!(marker(sde.id), Some(ApplicationMarker::Applied));
        assert_eq!(marker(qa.id), Some(ApplicationMarker::New));
    }

    #[tokio::test]
    async fn test_deactivated_job_leaves_board_but_not_ledger_views() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = seed_job(&store, company.id, "SDE").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        apply(&store, job.id, s1.id, Utc::now()).await.unwrap();

        let owner = AuthSession {
            user_id: company.id,
            role: Role::Company,
        };
        change_job_status(&store, &owner, job.id, PlacementStatus::Deactivated, Utc::now())
            .await
            .unwrap();

        let board = job_board(&store, Viewer::Student(s1.id)).await.unwrap();
        assert!(board.is_empty());
        assert_eq!(list_by_student(&store, s1.id).await.unwrap().len(), 1);
        assert_eq!(list_by_job(&store, job.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_jobs_filters_by_company() {
        let store = MemoryStore::new();
        let acme = seed_company(&store, "hr@acme.io", "Acme").await;
        let globex = seed_company(&store, "hr@globex.io", "Globex").await;
        seed_job(&store, acme.id, "SDE").await;
        seed_job(&store, globex.id, "QA").await;

        assert_eq!(list_jobs(&store, None).await.unwrap().len(), 2);
        let acme_jobs = list_jobs(&store, Some(acme.id)).await.unwrap();
        assert_eq!(acme_jobs.len(), 1);
        assert_eq!(acme_jobs[0].placement.title, "SDE");
    }

    #[tokio::test]
    async fn test_all_applied_jobs_skips_untouched_placements() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let sde = seed_job(&store, company.id, "SDE").await;
        seed_job(&store, company.id, "QA").await;
        let s1 = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        apply(&store, sde.id, s1.id, Utc::now()).await.unwrap();

        let overview = all_applied_jobs(&store).await.unwrap();
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].placement.id, sde.id);
        assert_eq!(
            overview[0].company.as_ref().map(|c| c.company_name.as_str()),
            Some("Acme")
        );
        let student = overview[0].applicants[0].student.as_ref().unwrap();
        assert_eq!(student.email, "s1@c.edu");
    }
}
