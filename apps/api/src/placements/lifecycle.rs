use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::errors::AppError;
use crate::models::{JobType, Placement, PlacementStatus, Role};
use crate::placements::require_user;
use crate::store::Store;

/// Body of `POST /company/jobs`. Every field is optional at the wire level so
/// that a missing field surfaces as a validation error naming it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(alias = "jobTitle")]
    pub title: Option<String>,
    #[serde(alias = "jobDescription")]
    pub description: Option<String>,
    #[serde(rename = "type", alias = "jobType")]
    pub job_type: Option<JobType>,
    pub salary: Option<f64>,
    #[serde(alias = "jobLocation")]
    pub location: Option<String>,
    #[serde(alias = "technicalSkills")]
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub interview_mode: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeJobStatusRequest {
    pub status: Option<PlacementStatus>,
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Trimmed, de-duplicated skill set in first-seen order.
fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            out.push(skill.to_string());
        }
    }
    out
}

fn missing_fields(names: &[&str]) -> AppError {
    AppError::Validation(format!("Missing required fields: {}", names.join(", ")))
}

/// Checks every mandatory field and builds an active placement.
/// Nothing is written when this fails.
pub fn validate_new_job(req: &CreateJobRequest, now: DateTime<Utc>) -> Result<Placement, AppError> {
    let title = text(&req.title);
    let description = text(&req.description);
    let location = text(&req.location);
    let interview_mode = text(&req.interview_mode);
    let skills = req.skills.as_deref().map(normalize_skills).unwrap_or_default();

    let fields = (
        title,
        description,
        req.job_type,
        req.salary,
        location,
        interview_mode,
        req.deadline,
        req.company_id,
    );
    let missing: Vec<&str> = [
        ("title", fields.0.is_none()),
        ("description", fields.1.is_none()),
        ("type", fields.2.is_none()),
        ("salary", fields.3.is_none()),
        ("location", fields.4.is_none()),
        ("skills", skills.is_empty()),
        ("interviewMode", fields.5.is_none()),
        ("deadline", fields.6.is_none()),
        ("companyId", fields.7.is_none()),
    ]
    .into_iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        return Err(missing_fields(&missing));
    }
    let (
        Some(title),
        Some(description),
        Some(job_type),
        Some(salary),
        Some(location),
        Some(interview_mode),
        Some(deadline),
        Some(company_id),
    ) = fields
    else {
        return Err(missing_fields(&missing));
    };

    if !salary.is_finite() || salary < 0.0 {
        return Err(AppError::Validation(
            "salary must be a non-negative number".to_string(),
        ));
    }

    Ok(Placement {
        id: Uuid::new_v4(),
        company_id,
        title,
        description,
        job_type,
        salary,
        location,
        skills,
        experience: text(&req.experience),
        interview_mode,
        deadline,
        status: PlacementStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

pub async fn create_job(
    store: &dyn Store,
    req: &CreateJobRequest,
    now: DateTime<Utc>,
) -> Result<Placement, AppError> {
    let placement = validate_new_job(req, now)?;
    require_user(store, placement.company_id, Role::Company).await?;
    let placement = store.insert_placement(placement).await?;
    info!(
        "Company {} posted job {} ({})",
        placement.company_id, placement.id, placement.title
    );
    Ok(placement)
}

/// The only lifecycle edge is active → de-active.
pub fn next_status(
    current: PlacementStatus,
    requested: PlacementStatus,
) -> Result<PlacementStatus, AppError> {
    match (current, requested) {
        (_, PlacementStatus::Deactivated) => Ok(PlacementStatus::Deactivated),
        (PlacementStatus::Active, PlacementStatus::Active) => Ok(PlacementStatus::Active),
        (PlacementStatus::Deactivated, PlacementStatus::Active) => Err(AppError::Validation(
            "A deactivated job cannot be reactivated".to_string(),
        )),
    }
}

pub async fn change_job_status(
    store: &dyn Store,
    session: &AuthSession,
    job_id: Uuid,
    requested: PlacementStatus,
    now: DateTime<Utc>,
) -> Result<Placement, AppError> {
    let record = store
        .find_placement(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let placement = record.placement;

    if session.role != Role::Company || session.user_id != placement.company_id {
        return Err(AppError::Forbidden);
    }

    let status = next_status(placement.status, requested)?;
    if status == placement.status {
        return Ok(placement);
    }

    let updated = store
        .set_placement_status(job_id, status, now)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    info!("Job {} moved to {}", job_id, status.as_str());
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placements::tests::{seed_company, seed_student};
    use crate::store::MemoryStore;

    fn backend_intern(company_id: Option<Uuid>) -> CreateJobRequest {
        CreateJobRequest {
            title: Some("Backend Intern".to_string()),
            description: Some("Build APIs".to_string()),
            job_type: Some(JobType::Internship),
            salary: Some(20000.0),
            location: Some("Remote".to_string()),
            skills: Some(vec!["node".to_string()]),
            experience: None,
            interview_mode: Some("online".to_string()),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1),
            company_id,
        }
    }

    #[test]
    fn test_missing_owner_fails_validation() {
        let err = validate_new_job(&backend_intern(None), Utc::now()).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("companyId"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_missing_fields_are_reported_together() {
        let err = validate_new_job(&CreateJobRequest::default(), Utc::now()).unwrap_err();
        let AppError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        for field in ["title", "description", "type", "salary", "skills", "deadline"] {
            assert!(msg.contains(field), "missing {field} in '{msg}'");
        }
    }

    #[test]
    fn test_blank_skills_count_as_missing() {
        let mut req = backend_intern(Some(Uuid::new_v4()));
        req.skills = Some(vec!["  ".to_string()]);
        assert!(matches!(
            validate_new_job(&req, Utc::now()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_skills_are_deduplicated() {
        let mut req = backend_intern(Some(Uuid::new_v4()));
        req.skills = Some(vec![
            "Rust".to_string(),
            "rust".to_string(),
            " SQL ".to_string(),
        ]);
        let placement = validate_new_job(&req, Utc::now()).unwrap();
        assert_eq!(placement.skills, vec!["Rust".to_string(), "SQL".to_string()]);
        assert_eq!(placement.status, PlacementStatus::Active);
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let mut req = backend_intern(Some(Uuid::new_v4()));
        req.salary = Some(-1.0);
        assert!(validate_new_job(&req, Utc::now()).is_err());
    }

    #[test]
    fn test_deactivated_job_cannot_be_reactivated() {
        assert!(next_status(PlacementStatus::Deactivated, PlacementStatus::Active).is_err());
        assert_eq!(
            next_status(PlacementStatus::Active, PlacementStatus::Deactivated).unwrap(),
            PlacementStatus::Deactivated
        );
        assert_eq!(
            next_status(PlacementStatus::Deactivated, PlacementStatus::Deactivated).unwrap(),
            PlacementStatus::Deactivated
        );
    }

    #[tokio::test]
    async fn test_create_job_requires_a_company_owner() {
        let store = MemoryStore::new();
        let student = seed_student(&store, "s1@c.edu", &["CSE"]).await;
        let err = create_job(&store, &backend_intern(Some(student.id)), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let job = create_job(&store, &backend_intern(Some(company.id)), Utc::now())
            .await
            .unwrap();
        assert_eq!(job.company_id, company.id);
    }

    #[tokio::test]
    async fn test_only_the_owner_can_deactivate() {
        let store = MemoryStore::new();
        let company = seed_company(&store, "hr@acme.io", "Acme").await;
        let rival = seed_company(&store, "hr@rival.io", "Rival").await;
        let job = create_job(&store, &backend_intern(Some(company.id)), Utc::now())
            .await
            .unwrap();

        let intruder = AuthSession {
            user_id: rival.id,
            role: Role::Company,
        };
        let err = change_job_status(
            &store,
            &intruder,
            job.id,
            PlacementStatus::Deactivated,
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let owner = AuthSession {
            user_id: company.id,
            role: Role::Company,
        };
        let updated = change_job_status(
            &store,
            &owner,
            job.id,
            PlacementStatus::Deactivated,
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, PlacementStatus::Deactivated);
        assert!(updated.updated_at >= job.updated_at);

        let err = change_job_status(&store, &owner, job.id, PlacementStatus::Active, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
