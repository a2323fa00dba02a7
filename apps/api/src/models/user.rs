use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Role tag carried by every user. Fixed at signup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Student,
    Company,
    CollegeStaff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Company => "company",
            Role::CollegeStaff => "college-staff",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "company" => Ok(Role::Company),
            "college-staff" => Ok(Role::CollegeStaff),
            other => Err(anyhow!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub education_type: Option<String>,
    pub college_name: Option<String>,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub project_skills: Option<String>,
    pub project_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialProfile {
    #[serde(rename = "linkedInUrl", alias = "LinkedInUrl")]
    pub linked_in_url: Option<String>,
    #[serde(rename = "githubUrl", alias = "GithubUrl")]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub student_id: Option<String>,
    pub profile_headline: String,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub resume_url: Option<String>,
    pub skills: Vec<String>,
    pub social_profile: SocialProfile,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
}

impl StudentProfile {
    /// Distinct departments in education order, blank entries skipped.
    pub fn departments(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for dept in self
            .education
            .iter()
            .filter_map(|e| e.department.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            if !seen.contains(&dept) {
                seen.push(dept);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub total_employees: Option<i64>,
    pub hr_name: Option<String>,
    pub company_phone_number: Option<String>,
    pub company_description: Option<String>,
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CollegeStaffProfile {
    pub college_name: Option<String>,
    pub staff_id: Option<String>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// Role-specific field group. The variant is the role; a user never carries
/// fields from another role's group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "userType", rename_all = "kebab-case")]
pub enum Profile {
    Student(StudentProfile),
    Company(CompanyProfile),
    CollegeStaff(CollegeStaffProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Student(_) => Role::Student,
            Profile::Company(_) => Role::Company,
            Profile::CollegeStaff(_) => Role::CollegeStaff,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match &self.profile {
            Profile::Student(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_company(&self) -> Option<&CompanyProfile> {
        match &self.profile {
            Profile::Company(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub role: String,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub password_hash: String,
    pub profile: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse()?;
        let profile: Profile = serde_json::from_value(row.profile)?;
        if profile.role() != role {
            return Err(anyhow!(
                "user {} has role '{}' but a '{}' profile",
                row.id,
                role.as_str(),
                profile.role().as_str()
            ));
        }
        Ok(User {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            password_hash: row.password_hash,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Login session issued at signin.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}
