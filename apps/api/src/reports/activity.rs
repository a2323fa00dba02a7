use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Applicant, ApplicantStatus, PlacementRecord, User};

pub const RECENT_LIMIT: usize = 5;

const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentSelection {
    pub job_id: Uuid,
    pub job_title: String,
    pub salary: f64,
    pub company_name: String,
    pub student_id: Uuid,
    pub student_name: String,
    pub selected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplication {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub student_id: Uuid,
    pub student_name: String,
    pub applied_at: DateTime<Utc>,
}

fn company_name(users: &HashMap<Uuid, User>, id: Uuid) -> String {
    users
        .get(&id)
        .map(|u| {
            u.as_company()
                .and_then(|p| p.company_name.clone())
                .unwrap_or_else(|| u.full_name())
        })
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
}

/// Placements with a selected applicant, most recently touched first, capped
/// at `limit` placements; each expands to one row per selected applicant.
/// Rows whose student no longer resolves are dropped.
pub fn recent_selections(
    placements: &[PlacementRecord],
    users: &HashMap<Uuid, User>,
    limit: usize,
) -> Vec<RecentSelection> {
    let mut with_selection: Vec<&PlacementRecord> = placements
        .iter()
        .filter(|r| r.count_with_status(ApplicantStatus::Selected) > 0)
        .collect();
    with_selection.sort_by(|a, b| b.placement.updated_at.cmp(&a.placement.updated_at));

    with_selection
        .into_iter()
        .take(limit)
        .flat_map(|record| {
            let company = company_name(users, record.placement.company_id);
            record
                .applicants
                .iter()
                .filter(|a| a.status == ApplicantStatus::Selected)
                .filter_map(move |a| {
                    let student = users.get(&a.student_id)?;
                    Some(RecentSelection {
                        job_id: record.placement.id,
                        job_title: record.placement.title.clone(),
                        salary: record.placement.salary,
                        company_name: company.clone(),
                        student_id: student.id,
                        student_name: student.full_name(),
                        selected_at: a.updated_at,
                    })
                })
        })
        .collect()
}

/// Newest applications across the given placements.
pub fn recent_applications(
    placements: &[PlacementRecord],
    users: &HashMap<Uuid, User>,
    limit: usize,
) -> Vec<RecentApplication> {
    let mut entries: Vec<(&PlacementRecord, &Applicant)> = placements
        .iter()
        .flat_map(|r| r.applicants.iter().map(move |a| (r, a)))
        .collect();
    entries.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));

    entries
        .into_iter()
        .filter_map(|(record, applicant)| {
            let student = users.get(&applicant.student_id)?;
            Some(RecentApplication {
                application_id: applicant.id,
                job_id: record.placement.id,
                job_title: record.placement.title.clone(),
                student_id: student.id,
                student_name: student.full_name(),
                applied_at: applicant.created_at,
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests::{company, job, student, with_applicants};
    use chrono::Duration;

    fn directory(users: &[&User]) -> HashMap<Uuid, User> {
        users.iter().map(|u| (u.id, (*u).clone())).collect()
    }

    #[test]
    fn test_recent_selections_orders_by_placement_update_and_caps() {
        let acme = company("Acme");
        let a = student(&["CSE"]);
        let users = directory(&[&acme, &a]);
        let base = Utc::now();

        let records: Vec<PlacementRecord> = (0..7)
            .map(|i| {
                let mut r = with_applicants(
                    job(&format!("Job {i}")),
                    &[(a.id, ApplicantStatus::Selected)],
                );
                r.placement.company_id = acme.id;
                r.placement.updated_at = base + Duration::minutes(i);
                r
            })
            .collect();

        let rows = recent_selections(&records, &users, RECENT_LIMIT);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].job_title, "Job 6");
        assert_eq!(rows[4].job_title, "Job 2");
        assert!(rows.iter().all(|r| r.company_name == "Acme"));
    }

    #[test]
    fn test_recent_selections_expands_each_selected_applicant() {
        let a = student(&["CSE"]);
        let b = student(&["ECE"]);
        let c = student(&["ME"]);
        let users = directory(&[&a, &b, &c]);
        let record = with_applicants(
            job("SDE"),
            &[
                (a.id, ApplicantStatus::Selected),
                (b.id, ApplicantStatus::Rejected),
                (c.id, ApplicantStatus::Selected),
            ],
        );
        let untouched = with_applicants(job("QA"), &[(b.id, ApplicantStatus::Pending)]);

        let rows = recent_selections(&[record, untouched], &users, RECENT_LIMIT);
        let ids: Vec<Uuid> = rows.iter().map(|r| r.student_id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert_eq!(rows[0].company_name, UNKNOWN_COMPANY);
    }

    #[test]
    fn test_recent_applications_newest_first() {
        let a = student(&["CSE"]);
        let b = student(&["ECE"]);
        let users = directory(&[&a, &b]);
        let mut r1 = with_applicants(job("SDE"), &[(a.id, ApplicantStatus::Pending)]);
        let mut r2 = with_applicants(job("QA"), &[(b.id, ApplicantStatus::Pending)]);
        let base = Utc::now();
        r1.applicants[0].created_at = base;
        r2.applicants[0].created_at = base + Duration::minutes(1);

        let rows = recent_applications(&[r1, r2], &users, RECENT_LIMIT);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].job_title, "QA");
        assert_eq!(rows[1].student_id, a.id);
    }

    #[test]
    fn test_recent_applications_skips_unknown_students() {
        let a = student(&["CSE"]);
        let users = directory(&[&a]);
        let record = with_applicants(
            job("SDE"),
            &[
                (Uuid::new_v4(), ApplicantStatus::Pending),
                (a.id, ApplicantStatus::Pending),
            ],
        );
        let rows = recent_applications(&[record], &users, RECENT_LIMIT);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, a.id);
    }
}
