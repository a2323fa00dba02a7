use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobType {
    #[serde(rename = "full-time", alias = "Full-Time")]
    FullTime,
    #[serde(rename = "internship", alias = "Internship")]
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::Internship => "internship",
        }
    }
}

impl FromStr for JobType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "internship" => Ok(JobType::Internship),
            other => Err(anyhow!("unknown job type '{other}'")),
        }
    }
}

/// Lifecycle of a posting: `Active` → `Deactivated`, never back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlacementStatus {
    #[serde(rename = "active", alias = "Active")]
    Active,
    #[serde(rename = "de-active", alias = "De-Active")]
    Deactivated,
}

impl PlacementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStatus::Active => "active",
            PlacementStatus::Deactivated => "de-active",
        }
    }
}

impl FromStr for PlacementStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PlacementStatus::Active),
            "de-active" => Ok(PlacementStatus::Deactivated),
            other => Err(anyhow!("unknown placement status '{other}'")),
        }
    }
}

/// Candidacy state. Any value may follow any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ApplicantStatus {
    #[serde(rename = "pending", alias = "Pending")]
    Pending,
    #[serde(rename = "shortlisted", alias = "Shortlisted")]
    Shortlisted,
    #[serde(rename = "rejected", alias = "Rejected")]
    Rejected,
    #[serde(rename = "selected", alias = "Selected")]
    Selected,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Pending => "pending",
            ApplicantStatus::Shortlisted => "shortlisted",
            ApplicantStatus::Rejected => "rejected",
            ApplicantStatus::Selected => "selected",
        }
    }
}

impl FromStr for ApplicantStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicantStatus::Pending),
            "shortlisted" => Ok(ApplicantStatus::Shortlisted),
            "rejected" => Ok(ApplicantStatus::Rejected),
            "selected" => Ok(ApplicantStatus::Selected),
            other => Err(anyhow!("unknown applicant status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterviewMode {
    #[serde(rename = "online", alias = "Online")]
    Online,
    #[serde(rename = "offline", alias = "Offline")]
    Offline,
    #[serde(rename = "in-person", alias = "College")]
    InPerson,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDetails {
    pub date: NaiveDate,
    pub time: String,
    pub mode: InterviewMode,
    #[serde(alias = "meetLinkorLocation")]
    pub location_or_link: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary: f64,
    pub location: String,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub interview_mode: String,
    pub deadline: NaiveDate,
    pub status: PlacementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub placement_id: Uuid,
    pub student_id: Uuid,
    pub status: ApplicantStatus,
    pub interview_details: Option<InterviewDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Applicant {
    pub fn new(placement_id: Uuid, student_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            placement_id,
            student_id,
            status: ApplicantStatus::Pending,
            interview_details: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A placement together with its applicant ledger in append order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    #[serde(flatten)]
    pub placement: Placement,
    pub applicants: Vec<Applicant>,
}

impl PlacementRecord {
    pub fn applicant_for(&self, student_id: Uuid) -> Option<&Applicant> {
        self.applicants.iter().find(|a| a.student_id == student_id)
    }

    pub fn count_with_status(&self, status: ApplicantStatus) -> usize {
        self.applicants.iter().filter(|a| a.status == status).count()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlacementRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub job_type: String,
    pub salary: f64,
    pub location: String,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub interview_mode: String,
    pub deadline: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PlacementRow> for Placement {
    type Error = Error;

    fn try_from(row: PlacementRow) -> Result<Self, Self::Error> {
        Ok(Placement {
            id: row.id,
            company_id: row.company_id,
            title: row.title,
            description: row.description,
            job_type: row.job_type.parse()?,
            salary: row.salary,
            location: row.location,
            skills: row.skills,
            experience: row.experience,
            interview_mode: row.interview_mode,
            deadline: row.deadline,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub placement_id: Uuid,
    pub student_id: Uuid,
    pub status: String,
    pub interview_details: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicantRow> for Applicant {
    type Error = Error;

    fn try_from(row: ApplicantRow) -> Result<Self, Self::Error> {
        let interview_details = row
            .interview_details
            .map(serde_json::from_value)
            .transpose()?;
        Ok(Applicant {
            id: row.id,
            placement_id: row.placement_id,
            student_id: row.student_id,
            status: row.status.parse()?,
            interview_details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_capitalised_values_are_accepted() {
        let status: ApplicantStatus = serde_json::from_value(json!("Selected")).unwrap();
        assert_eq!(status, ApplicantStatus::Selected);
        let job_type: JobType = serde_json::from_value(json!("Full-Time")).unwrap();
        assert_eq!(job_type, JobType::FullTime);
        let mode: InterviewMode = serde_json::from_value(json!("College")).unwrap();
        assert_eq!(mode, InterviewMode::InPerson);
    }

    #[test]
    fn test_interview_details_accept_legacy_link_field() {
        let details: InterviewDetails = serde_json::from_value(json!({
            "date": "2025-06-10",
            "time": "10:30",
            "mode": "online",
            "meetLinkorLocation": "https://meet.example/abc"
        }))
        .unwrap();
        assert_eq!(details.location_or_link, "https://meet.example/abc");
    }

    #[test]
    fn test_applicant_row_with_bad_status_fails() {
        let row = ApplicantRow {
            id: Uuid::new_v4(),
            placement_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            status: "hired".to_string(),
            interview_details: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Applicant::try_from(row).is_err());
    }

    #[test]
    fn test_status_strings_match_serde_names() {
        for status in [
            ApplicantStatus::Pending,
            ApplicantStatus::Shortlisted,
            ApplicantStatus::Rejected,
            ApplicantStatus::Selected,
        ] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                json!(status.as_str())
            );
            assert_eq!(status.as_str().parse::<ApplicantStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_value(PlacementStatus::Deactivated).unwrap(),
            json!("de-active")
        );
    }
}
