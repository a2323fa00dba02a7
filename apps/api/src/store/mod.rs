//! Record store: users, placements and their applicant ledgers.
//!
//! `AppState` holds an `Arc<dyn Store>`. `PgStore` is the production backend;
//! `MemoryStore` serves local runs and tests. Both uphold the same contract:
//! at most one applicant per (placement, student), and every applicant write
//! advances the parent placement's `updated_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Applicant, ApplicantStatus, InterviewDetails, Placement, PlacementRecord, PlacementStatus,
    Role, Session, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Selects placements for listing. Results are ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct PlacementFilter {
    pub company_id: Option<Uuid>,
    pub status: Option<PlacementStatus>,
    /// Only placements this student has applied to.
    pub applicant: Option<Uuid>,
    pub limit: Option<usize>,
}

impl PlacementFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_company(company_id: Uuid) -> Self {
        Self {
            company_id: Some(company_id),
            ..Self::default()
        }
    }

    pub fn active() -> Self {
        Self {
            status: Some(PlacementStatus::Active),
            ..Self::default()
        }
    }

    pub fn applied_by(student_id: Uuid) -> Self {
        Self {
            applicant: Some(student_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, placement: &Placement, applicants: &[Applicant]) -> bool {
        self.company_id.map_or(true, |id| placement.company_id == id)
            && self.status.map_or(true, |s| placement.status == s)
            && self
                .applicant
                .map_or(true, |sid| applicants.iter().any(|a| a.student_id == sid))
    }
}

/// In-place mutation of a single applicant.
#[derive(Debug, Clone)]
pub enum ApplicantChange {
    Status(ApplicantStatus),
    /// Full replacement of the interview details.
    Interview(InterviewDetails),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: User) -> Result<User, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Users in registration order, optionally restricted to one role.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, AppError>;

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;

    /// Persists name, phone and profile fields. The role column is never written.
    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError>;

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn insert_session(&self, session: Session) -> Result<(), AppError>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>, AppError>;

    async fn insert_placement(&self, placement: Placement) -> Result<Placement, AppError>;

    async fn find_placement(&self, id: Uuid) -> Result<Option<PlacementRecord>, AppError>;

    async fn list_placements(
        &self,
        filter: &PlacementFilter,
    ) -> Result<Vec<PlacementRecord>, AppError>;

    async fn set_placement_status(
        &self,
        id: Uuid,
        status: PlacementStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Placement>, AppError>;

    /// Appends to the placement's ledger. `NotFound` if the placement is
    /// missing, `Conflict` if the student already has an entry.
    async fn append_applicant(&self, applicant: Applicant) -> Result<Applicant, AppError>;

    async fn update_applicant(
        &self,
        id: Uuid,
        change: ApplicantChange,
        now: DateTime<Utc>,
    ) -> Result<Option<Applicant>, AppError>;
}

pub(crate) fn already_applied() -> AppError {
    AppError::Conflict("Student has already applied for this job".to_string())
}

pub(crate) fn job_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {id} not found"))
}
