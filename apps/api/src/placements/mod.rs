// Placement lifecycle and the applicant sub-ledger.
// Handlers stay thin: validation and store calls live in lifecycle/ledger/listings.

pub mod handlers;
pub mod ledger;
pub mod lifecycle;
pub mod listings;

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Role, User};
use crate::store::Store;

/// Loads a user and checks its role; anything else is `NotFound`.
pub async fn require_user(store: &dyn Store, id: Uuid, role: Role) -> Result<User, AppError> {
    match store.find_user(id).await? {
        Some(user) if user.role() == role => Ok(user),
        _ => Err(AppError::NotFound(format!(
            "{} {id} not found",
            match role {
                Role::Student => "Student",
                Role::Company => "Company",
                Role::CollegeStaff => "College staff",
            }
        ))),
    }
}

/// Loads each distinct id once and indexes the result by id.
pub(crate) async fn users_by_id(
    store: &dyn Store,
    mut ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, User>, AppError> {
    ids.sort();
    ids.dedup();
    Ok(store
        .find_users(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

/// Public face of a company attached to job views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: Uuid,
    pub company_name: String,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

impl CompanySummary {
    pub fn from_user(user: &User) -> Option<Self> {
        let profile = user.as_company()?;
        Some(Self {
            id: user.id,
            company_name: profile
                .company_name
                .clone()
                .unwrap_or_else(|| user.full_name()),
            logo_url: profile.logo_url.clone(),
            industry: profile.industry.clone(),
            location: profile.location.clone(),
        })
    }
}

/// Public face of a student attached to applicant views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub state: Option<String>,
    pub skills: Vec<String>,
    pub image_url: Option<String>,
}

impl StudentSummary {
    pub fn from_user(user: &User) -> Option<Self> {
        let profile = user.as_student()?;
        Some(Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            state: profile.state.clone(),
            skills: profile.skills.clone(),
            image_url: profile.image_url.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{NaiveDate, Utc};

    use crate::models::user::{CompanyProfile, Education, StudentProfile};
    use crate::models::{JobType, Placement, PlacementStatus, Profile, User};
    use crate::store::Store;
    use uuid::Uuid;

    fn user(email: &str, first_name: &str, profile: Profile) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: Some("Test".to_string()),
            phone: "9000000000".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn seed_student(store: &dyn Store, email: &str, departments: &[&str]) -> User {
        let profile = StudentProfile {
            skills: vec!["rust".to_string()],
            education: departments
                .iter()
                .map(|d| Education {
                    department: Some(d.to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        let first_name = email.split('@').next().unwrap_or("student");
        store
            .insert_user(user(email, first_name, Profile::Student(profile)))
            .await
            .unwrap()
    }

    pub async fn seed_company(store: &dyn Store, email: &str, name: &str) -> User {
        let profile = CompanyProfile {
            company_name: Some(name.to_string()),
            ..Default::default()
        };
        store
            .insert_user(user(email, "HR", Profile::Company(profile)))
            .await
            .unwrap()
    }

    pub async fn seed_job(store: &dyn Store, company_id: Uuid, title: &str) -> Placement {
        let now = Utc::now();
        store
            .insert_placement(Placement {
                id: Uuid::new_v4(),
                company_id,
                title: title.to_string(),
                description: format!("{title} role"),
                job_type: JobType::FullTime,
                salary: 600000.0,
                location: "Bengaluru".to_string(),
                skills: vec!["rust".to_string()],
                experience: None,
                interview_mode: "online".to_string(),
                deadline: NaiveDate::from_ymd_opt(2030, 1, 31).unwrap(),
                status: PlacementStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }
}
