use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ApplicantStatus, PlacementRecord, PlacementStatus, User};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFunnelRow {
    pub department: String,
    pub total_students: usize,
    pub placed_students: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobFunnelRow {
    pub job_id: Uuid,
    pub job_title: String,
    pub applications_received: usize,
    pub selected_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounters {
    pub total_received: usize,
    pub total_pending: usize,
    pub total_shortlisted: usize,
    pub total_selected: usize,
    pub total_rejected: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollegeTotals {
    pub total_students: usize,
    pub total_jobs: usize,
    pub total_students_applied: usize,
    pub total_students_placed: usize,
}

fn selected_students(placements: &[PlacementRecord]) -> HashSet<Uuid> {
    placements
        .iter()
        .flat_map(|r| r.applicants.iter())
        .filter(|a| a.status == ApplicantStatus::Selected)
        .map(|a| a.student_id)
        .collect()
}

/// Per-department totals and placed counts.
///
/// A student counts once for each distinct department in their education
/// history, and is "placed" when selected in any placement. Departments come
/// out in the order first seen while walking `students`.
pub fn department_funnel(
    students: &[User],
    placements: &[PlacementRecord],
) -> Vec<DepartmentFunnelRow> {
    let placed = selected_students(placements);
    let mut rows: Vec<DepartmentFunnelRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for student in students {
        let Some(profile) = student.as_student() else {
            continue;
        };
        let is_placed = placed.contains(&student.id);
        for dept in profile.departments() {
            let i = *index.entry(dept.to_string()).or_insert_with(|| {
                rows.push(DepartmentFunnelRow {
                    department: dept.to_string(),
                    total_students: 0,
                    placed_students: 0,
                });
                rows.len() - 1
            });
            rows[i].total_students += 1;
            if is_placed {
                rows[i].placed_students += 1;
            }
        }
    }
    rows
}

/// One row per placement, oldest posting first.
pub fn job_funnel(placements: &[PlacementRecord]) -> Vec<JobFunnelRow> {
    let mut ordered: Vec<&PlacementRecord> = placements.iter().collect();
    ordered.sort_by(|a, b| a.placement.created_at.cmp(&b.placement.created_at));
    ordered
        .into_iter()
        .map(|r| JobFunnelRow {
            job_id: r.placement.id,
            job_title: r.placement.title.clone(),
            applications_received: r.applicants.len(),
            selected_count: r.count_with_status(ApplicantStatus::Selected),
        })
        .collect()
}

pub fn status_counters(placements: &[PlacementRecord]) -> StatusCounters {
    placements
        .iter()
        .flat_map(|r| r.applicants.iter())
        .fold(StatusCounters::default(), |mut acc, a| {
            acc.total_received += 1;
            match a.status {
                ApplicantStatus::Pending => acc.total_pending += 1,
                ApplicantStatus::Shortlisted => acc.total_shortlisted += 1,
                ApplicantStatus::Selected => acc.total_selected += 1,
                ApplicantStatus::Rejected => acc.total_rejected += 1,
            }
            acc
        })
}

/// College dashboard headline numbers. Applied/placed count distinct students.
pub fn college_totals(students: &[User], placements: &[PlacementRecord]) -> CollegeTotals {
    let applied: HashSet<Uuid> = placements
        .iter()
        .flat_map(|r| r.applicants.iter())
        .map(|a| a.student_id)
        .collect();
    CollegeTotals {
        total_students: students.iter().filter(|u| u.as_student().is_some()).count(),
        total_jobs: placements
            .iter()
            .filter(|r| r.placement.status == PlacementStatus::Active)
            .count(),
        total_students_applied: applied.len(),
        total_students_placed: selected_students(placements).len(),
    }
}
