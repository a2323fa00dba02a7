use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Applicant, Placement, PlacementRecord, PlacementStatus, Role, Session, User,
};
use crate::store::{already_applied, job_not_found, ApplicantChange, PlacementFilter, Store};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    placements: Vec<Placement>,
    applicants: Vec<Applicant>,
    sessions: HashMap<String, Session>,
}

impl Tables {
    fn record(&self, placement: &Placement) -> PlacementRecord {
        PlacementRecord {
            placement: placement.clone(),
            applicants: self
                .applicants
                .iter()
                .filter(|a| a.placement_id == placement.id)
                .cloned()
                .collect(),
        }
    }

    fn touch_placement(&mut self, id: Uuid, now: DateTime<Utc>) {
        if let Some(p) = self.placements.iter_mut().find(|p| p.id == id) {
            p.updated_at = now;
        }
    }
}

/// Process-local store. Every write holds the single write lock, so the
/// duplicate-application check and the append cannot interleave.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role() == r))
            .cloned()
            .collect())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id && u.role() == user.role())
        else {
            return Ok(None);
        };
        existing.first_name = user.first_name.clone();
        existing.last_name = user.last_name.clone();
        existing.phone = user.phone.clone();
        existing.profile = user.profile.clone();
        existing.updated_at = user.updated_at;
        Ok(Some(existing.clone()))
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = now;
        }
        Ok(())
    }

    async fn insert_session(&self, session: Session) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.get(token).cloned())
    }

    async fn insert_placement(&self, placement: Placement) -> Result<Placement, AppError> {
        let mut tables = self.tables.write().await;
        tables.placements.push(placement.clone());
        Ok(placement)
    }

    async fn find_placement(&self, id: Uuid) -> Result<Option<PlacementRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .placements
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.record(p)))
    }

    async fn list_placements(
        &self,
        filter: &PlacementFilter,
    ) -> Result<Vec<PlacementRecord>, AppError> {
        let tables = self.tables.read().await;
        // Newest insert first, then a stable sort keeps that order on equal timestamps.
        let mut records: Vec<PlacementRecord> = tables
            .placements
            .iter()
            .rev()
            .map(|p| tables.record(p))
            .filter(|r| filter.matches(&r.placement, &r.applicants))
            .collect();
        records.sort_by(|a, b| b.placement.created_at.cmp(&a.placement.created_at));
        if let Some(limit) = filter.limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn set_placement_status(
        &self,
        id: Uuid,
        status: PlacementStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Placement>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.placements.iter_mut().find(|p| p.id == id).map(|p| {
            p.status = status;
            p.updated_at = now;
            p.clone()
        }))
    }

    async fn append_applicant(&self, applicant: Applicant) -> Result<Applicant, AppError> {
        let mut tables = self.tables.write().await;
        if !tables
            .placements
            .iter()
            .any(|p| p.id == applicant.placement_id)
        {
            return Err(job_not_found(applicant.placement_id));
        }
        if tables
            .applicants
            .iter()
            .any(|a| a.placement_id == applicant.placement_id && a.student_id == applicant.student_id)
        {
            return Err(already_applied());
        }
        tables.touch_placement(applicant.placement_id, applicant.updated_at);
        tables.applicants.push(applicant.clone());
        Ok(applicant)
    }

    async fn update_applicant(
        &self,
        id: Uuid,
        change: ApplicantChange,
        now: DateTime<Utc>,
    ) -> Result<Option<Applicant>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(applicant) = tables.applicants.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        match change {
            ApplicantChange::Status(status) => applicant.status = status,
            ApplicantChange::Interview(details) => applicant.interview_details = Some(details),
        }
        applicant.updated_at = now;
        let updated = applicant.clone();
        tables.touch_placement(updated.placement_id, now);
        Ok(Some(updated))
    }
}
