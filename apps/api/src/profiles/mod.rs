//! Role profiles: read, partial-merge update, single-reference updates and the
//! listings college staff browse.
//!
//! A patch only overwrites the fields present in the request. The role of a
//! user is fixed at signup and no patch can carry fields of another role.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Education, Project, SocialProfile};
use crate::models::{Profile, Role, User};
use crate::placements::require_user;
use crate::store::Store;

/// Name and contact fields shared by every role.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(alias = "phoneNumber")]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(flatten)]
    pub identity: IdentityPatch,
    #[serde(alias = "studentID")]
    pub student_id: Option<String>,
    #[serde(alias = "headline")]
    pub profile_headline: Option<String>,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social_profile: Option<SocialProfile>,
    pub education: Option<Vec<Education>>,
    pub projects: Option<Vec<Project>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[serde(flatten)]
    pub identity: IdentityPatch,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub total_employees: Option<i64>,
    pub hr_name: Option<String>,
    pub company_phone_number: Option<String>,
    pub company_description: Option<String>,
    #[serde(alias = "companyImgUrl")]
    pub logo_url: Option<String>,
    #[serde(alias = "staffID")]
    pub staff_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegePatch {
    #[serde(flatten)]
    pub identity: IdentityPatch,
    pub college_name: Option<String>,
    #[serde(alias = "staffID")]
    pub staff_id: Option<String>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// Body of the single-reference endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceRequest {
    #[serde(
        alias = "resumeUrl",
        alias = "resumeURL",
        alias = "imageUrl",
        alias = "imgURL",
        alias = "logoUrl"
    )]
    pub url: Option<String>,
}

/// Which stored reference a dedicated endpoint replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Resume,
    Image,
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn merge_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn apply_identity(user: &mut User, patch: IdentityPatch) -> Result<(), AppError> {
    if let Some(first_name) = patch.first_name {
        let first_name = first_name.trim();
        if first_name.is_empty() {
            return Err(AppError::Validation("firstName cannot be empty".to_string()));
        }
        user.first_name = first_name.to_string();
    }
    merge_opt(&mut user.last_name, patch.last_name);
    merge(&mut user.phone, patch.phone);
    Ok(())
}

async fn save(store: &dyn Store, mut user: User, now: DateTime<Utc>) -> Result<User, AppError> {
    user.updated_at = now;
    let id = user.id;
    let saved = store
        .update_user(&user)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    info!("Profile {} ({}) updated", id, saved.role().as_str());
    Ok(saved)
}

pub async fn get_student(store: &dyn Store, id: Uuid) -> Result<User, AppError> {
    require_user(store, id, Role::Student).await
}

pub async fn update_student(
    store: &dyn Store,
    id: Uuid,
    patch: StudentPatch,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let mut user = require_user(store, id, Role::Student).await?;
    apply_identity(&mut user, patch.identity)?;
    if let Profile::Student(profile) = &mut user.profile {
        merge_opt(&mut profile.student_id, patch.student_id);
        merge(&mut profile.profile_headline, patch.profile_headline);
        merge_opt(&mut profile.gender, patch.gender);
        merge_opt(&mut profile.state, patch.state);
        merge_opt(&mut profile.city, patch.city);
        merge(&mut profile.skills, patch.skills);
        merge(&mut profile.social_profile, patch.social_profile);
        merge(&mut profile.education, patch.education);
        merge(&mut profile.projects, patch.projects);
    }
    save(store, user, now).await
}

pub async fn update_company(
    store: &dyn Store,
    id: Uuid,
    patch: CompanyPatch,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let mut user = require_user(store, id, Role::Company).await?;
    apply_identity(&mut user, patch.identity)?;
    if let Profile::Company(profile) = &mut user.profile {
        merge_opt(&mut profile.company_name, patch.company_name);
        merge_opt(&mut profile.industry, patch.industry);
        merge_opt(&mut profile.location, patch.location);
        merge_opt(&mut profile.total_employees, patch.total_employees);
        merge_opt(&mut profile.hr_name, patch.hr_name);
        merge_opt(&mut profile.company_phone_number, patch.company_phone_number);
        merge_opt(&mut profile.company_description, patch.company_description);
        merge_opt(&mut profile.logo_url, patch.logo_url);
        merge_opt(&mut profile.staff_id, patch.staff_id);
    }
    save(store, user, now).await
}

pub async fn update_college(
    store: &dyn Store,
    id: Uuid,
    patch: CollegePatch,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let mut user = require_user(store, id, Role::CollegeStaff).await?;
    apply_identity(&mut user, patch.identity)?;
    if let Profile::CollegeStaff(profile) = &mut user.profile {
        merge_opt(&mut profile.college_name, patch.college_name);
        merge_opt(&mut profile.staff_id, patch.staff_id);
        merge_opt(&mut profile.location, patch.location);
        merge_opt(&mut profile.state, patch.state);
        merge_opt(&mut profile.city, patch.city);
    }
    save(store, user, now).await
}

/// Replaces one stored reference: a student's resume or the image of any role
/// (a company's image is its logo).
pub async fn set_reference(
    store: &dyn Store,
    id: Uuid,
    role: Role,
    reference: Reference,
    url: Option<String>,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let url = url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("A non-empty URL is required".to_string()))?;

    let mut user = require_user(store, id, role).await?;
    match (&mut user.profile, reference) {
        (Profile::Student(p), Reference::Resume) => p.resume_url = Some(url),
        (Profile::Student(p), Reference::Image) => p.image_url = Some(url),
        (Profile::Company(p), Reference::Image) => p.logo_url = Some(url),
        (Profile::CollegeStaff(p), Reference::Image) => p.image_url = Some(url),
        (profile, Reference::Resume) => {
            return Err(AppError::Validation(format!(
                "A {} profile has no resume",
                profile.role().as_str()
            )))
        }
    }
    save(store, user, now).await
}

pub async fn list_students(store: &dyn Store) -> Result<Vec<User>, AppError> {
    store.list_users(Some(Role::Student)).await
}

pub async fn list_companies(store: &dyn Store) -> Result<Vec<User>, AppError> {
    store.list_users(Some(Role::Company)).await
}
