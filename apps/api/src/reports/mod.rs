//! Dashboard reports for companies and college staff.
//!
//! `funnel`, `activity` and `chart` are pure functions over a snapshot of
//! users and placement records. The loaders below take that snapshot from the
//! store on every call; nothing is cached or pre-aggregated.

pub mod activity;
pub mod chart;
pub mod funnel;
pub mod handlers;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ApplicantStatus, PlacementStatus, Role, User};
use crate::placements::{require_user, users_by_id};
use crate::store::{PlacementFilter, Store};

use activity::{RecentApplication, RecentSelection, RECENT_LIMIT};
use chart::FunnelReport;
use funnel::{CollegeTotals, DepartmentFunnelRow, JobFunnelRow, StatusCounters};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub company: User,
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub applications: StatusCounters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDetails {
    pub college_details: User,
    #[serde(flatten)]
    pub totals: CollegeTotals,
}

pub async fn company_details(store: &dyn Store, company_id: Uuid) -> Result<CompanyDetails, AppError> {
    let company = require_user(store, company_id, Role::Company).await?;
    let records = store
        .list_placements(&PlacementFilter::for_company(company_id))
        .await?;
    Ok(CompanyDetails {
        company,
        total_jobs: records.len(),
        active_jobs: records
            .iter()
            .filter(|r| r.placement.status == PlacementStatus::Active)
            .count(),
        applications: funnel::status_counters(&records),
    })
}

pub async fn company_recent_applications(
    store: &dyn Store,
    company_id: Uuid,
) -> Result<Vec<RecentApplication>, AppError> {
    require_user(store, company_id, Role::Company).await?;
    let records = store
        .list_placements(&PlacementFilter::for_company(company_id))
        .await?;
    let students = users_by_id(
        store,
        records
            .iter()
            .flat_map(|r| r.applicants.iter().map(|a| a.student_id))
            .collect(),
    )
    .await?;
    Ok(activity::recent_applications(&records, &students, RECENT_LIMIT))
}

/// Applications received and selected per job, for one company.
pub async fn company_overview(
    store: &dyn Store,
    company_id: Uuid,
) -> Result<FunnelReport<JobFunnelRow>, AppError> {
    require_user(store, company_id, Role::Company).await?;
    let records = store
        .list_placements(&PlacementFilter::for_company(company_id))
        .await?;
    let rows = funnel::job_funnel(&records);
    Ok(FunnelReport {
        chart: chart::job_chart(&rows),
        rows,
    })
}

pub async fn college_details(store: &dyn Store, staff_id: Uuid) -> Result<CollegeDetails, AppError> {
    let staff = require_user(store, staff_id, Role::CollegeStaff).await?;
    let students = store.list_users(Some(Role::Student)).await?;
    let records = store.list_placements(&PlacementFilter::all()).await?;
    Ok(CollegeDetails {
        college_details: staff,
        totals: funnel::college_totals(&students, &records),
    })
}

/// Department placement funnel across every registered student.
pub async fn department_summary(
    store: &dyn Store,
    staff_id: Uuid,
) -> Result<FunnelReport<DepartmentFunnelRow>, AppError> {
    require_user(store, staff_id, Role::CollegeStaff).await?;
    let students = store.list_users(Some(Role::Student)).await?;
    let records = store.list_placements(&PlacementFilter::all()).await?;
    let rows = funnel::department_funnel(&students, &records);
    Ok(FunnelReport {
        chart: chart::department_chart(&rows),
        rows,
    })
}

pub async fn recent_placements(
    store: &dyn Store,
    staff_id: Uuid,
) -> Result<Vec<RecentSelection>, AppError> {
    require_user(store, staff_id, Role::CollegeStaff).await?;
    let records = store.list_placements(&PlacementFilter::all()).await?;
    let ids = records
        .iter()
        .filter(|r| r.count_with_status(ApplicantStatus::Selected) > 0)
        .flat_map(|r| {
            std::iter::once(r.placement.company_id).chain(
                r.applicants
                    .iter()
                    .filter(|a| a.status == ApplicantStatus::Selected)
                    .map(|a| a.student_id),
            )
        })
        .collect();
    let users = users_by_id(store, ids).await?;
    Ok(activity::recent_selections(&records, &users, RECENT_LIMIT))
}

/// Applications received and selected per job, across every company.
pub async fn college_overview(
    store: &dyn Store,
    staff_id: Uuid,
) -> Result<FunnelReport<JobFunnelRow>, AppError> {
    require_user(store, staff_id, Role::CollegeStaff).await?;
    let records = store.list_placements(&PlacementFilter::all()).await?;
    let rows = funnel::job_funnel(&records);
    Ok(FunnelReport {
        chart: chart::job_chart(&rows),
        rows,
    })
}
