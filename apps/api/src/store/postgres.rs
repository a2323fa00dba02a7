use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::placement::{ApplicantRow, PlacementRow};
use crate::models::user::UserRow;
use crate::models::{
    Applicant, Placement, PlacementRecord, PlacementStatus, Role, Session, User,
};
use crate::store::{already_applied, job_not_found, ApplicantChange, PlacementFilter, Store};

const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed store. Applicants live in their own table keyed to the
/// owning placement.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn applicants_for(
        &self,
        placement_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Applicant>>, AppError> {
        let rows: Vec<ApplicantRow> = sqlx::query_as(
            "SELECT * FROM applicants WHERE placement_id = ANY($1) ORDER BY created_at ASC, id ASC",
        )
        .bind(placement_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Applicant>> = HashMap::new();
        for row in rows {
            let applicant = Applicant::try_from(row)?;
            grouped
                .entry(applicant.placement_id)
                .or_default()
                .push(applicant);
        }
        Ok(grouped)
    }

    async fn attach_applicants(
        &self,
        rows: Vec<PlacementRow>,
    ) -> Result<Vec<PlacementRecord>, AppError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut ledgers = self.applicants_for(&ids).await?;
        rows.into_iter()
            .map(|row| -> Result<PlacementRecord, AppError> {
                let applicants = ledgers.remove(&row.id).unwrap_or_default();
                Ok(PlacementRecord {
                    placement: Placement::try_from(row)?,
                    applicants,
                })
            })
            .collect()
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

fn users_from_rows(rows: Vec<UserRow>) -> Result<Vec<User>, AppError> {
    Ok(rows
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let profile = serde_json::to_value(&user.profile).map_err(anyhow::Error::from)?;
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users
                (id, role, email, first_name, last_name, phone, password_hash,
                 profile, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(user.role().as_str())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(profile)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Email {} is already registered", user.email))
            } else {
                AppError::Database(e)
            }
        })?;

        info!("Registered {} user {}", row.role, row.id);
        Ok(User::try_from(row)?)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT * FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT * FROM users WHERE ($1::text IS NULL OR role = $1) ORDER BY created_at ASC, id ASC",
        )
        .bind(role.map(|r| r.as_str()))
        .fetch_all(&self.pool)
        .await?;
        users_from_rows(rows)
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        users_from_rows(rows)
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError> {
        let profile = serde_json::to_value(&user.profile).map_err(anyhow::Error::from)?;
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET first_name = $3, last_name = $4, phone = $5, profile = $6, updated_at = $7
            WHERE id = $1 AND role = $2
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(user.role().as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(profile)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_session(&self, session: Session) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, role, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(&session.role)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        Ok(
            sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_placement(&self, placement: Placement) -> Result<Placement, AppError> {
        let row: PlacementRow = sqlx::query_as(
            r#"
            INSERT INTO placements
                (id, company_id, title, description, job_type, salary, location, skills,
                 experience, interview_mode, deadline, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(placement.id)
        .bind(placement.company_id)
        .bind(&placement.title)
        .bind(&placement.description)
        .bind(placement.job_type.as_str())
        .bind(placement.salary)
        .bind(&placement.location)
        .bind(&placement.skills)
        .bind(&placement.experience)
        .bind(&placement.interview_mode)
        .bind(placement.deadline)
        .bind(placement.status.as_str())
        .bind(placement.created_at)
        .bind(placement.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(Placement::try_from(row)?)
    }

    async fn find_placement(&self, id: Uuid) -> Result<Option<PlacementRecord>, AppError> {
        let row: Option<PlacementRow> = sqlx::query_as("SELECT * FROM placements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(self.attach_applicants(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_placements(
        &self,
        filter: &PlacementFilter,
    ) -> Result<Vec<PlacementRecord>, AppError> {
        let rows: Vec<PlacementRow> = sqlx::query_as(
            r#"
            SELECT * FROM placements p
            WHERE ($1::uuid IS NULL OR p.company_id = $1)
              AND ($2::text IS NULL OR p.status = $2)
              AND ($3::uuid IS NULL OR EXISTS (
                    SELECT 1 FROM applicants a
                    WHERE a.placement_id = p.id AND a.student_id = $3))
            ORDER BY p.created_at DESC, p.id ASC
            LIMIT $4
            "#,
        )
        .bind(filter.company_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.applicant)
        .bind(filter.limit.map(|l| l as i64))
        .fetch_all(&self.pool)
        .await?;

        debug!("Loaded {} placements for {:?}", rows.len(), filter);
        self.attach_applicants(rows).await
    }

    async fn set_placement_status(
        &self,
        id: Uuid,
        status: PlacementStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Placement>, AppError> {
        let row: Option<PlacementRow> = sqlx::query_as(
            "UPDATE placements SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Placement::try_from).transpose()?)
    }

    async fn append_applicant(&self, applicant: Applicant) -> Result<Applicant, AppError> {
        let mut tx = self.pool.begin().await?;

        let placement: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM placements WHERE id = $1 FOR UPDATE")
                .bind(applicant.placement_id)
                .fetch_optional(&mut *tx)
                .await?;
        if placement.is_none() {
            return Err(job_not_found(applicant.placement_id));
        }

        let inserted: Option<ApplicantRow> = sqlx::query_as(
            r#"
            INSERT INTO applicants
                (id, placement_id, student_id, status, interview_details, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, $5, $6)
            ON CONFLICT (placement_id, student_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(applicant.id)
        .bind(applicant.placement_id)
        .bind(applicant.student_id)
        .bind(applicant.status.as_str())
        .bind(applicant.created_at)
        .bind(applicant.updated_at)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = inserted else {
            return Err(already_applied());
        };

        sqlx::query("UPDATE placements SET updated_at = $2 WHERE id = $1")
            .bind(applicant.placement_id)
            .bind(applicant.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Applicant::try_from(row)?)
    }

    async fn update_applicant(
        &self,
        id: Uuid,
        change: ApplicantChange,
        now: DateTime<Utc>,
    ) -> Result<Option<Applicant>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ApplicantRow> = match change {
            ApplicantChange::Status(status) => {
                sqlx::query_as(
                    "UPDATE applicants SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(status.as_str())
                .bind(now)
                .fetch_optional(&mut *tx)
                .await?
            }
            ApplicantChange::Interview(details) => {
                let details = serde_json::to_value(details).map_err(anyhow::Error::from)?;
                sqlx::query_as(
                    "UPDATE applicants SET interview_details = $2, updated_at = $3 WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(details)
                .bind(now)
                .fetch_optional(&mut *tx)
                .await?
            }
        };
        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("UPDATE placements SET updated_at = $2 WHERE id = $1")
            .bind(row.placement_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(Applicant::try_from(row)?))
    }
}
