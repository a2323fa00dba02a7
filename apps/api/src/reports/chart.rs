use serde::Serialize;

use super::funnel::{DepartmentFunnelRow, JobFunnelRow};

/// Chart-ready series: `{ labels, datasets: [{ label, data }] }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Chart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<usize>,
}

impl Dataset {
    fn new(label: &str, data: Vec<usize>) -> Self {
        Self {
            label: label.to_string(),
            data,
        }
    }
}

/// Rows plus the same numbers shaped for a chart.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelReport<R> {
    pub rows: Vec<R>,
    pub chart: Chart,
}

pub fn department_chart(rows: &[DepartmentFunnelRow]) -> Chart {
    Chart {
        labels: rows.iter().map(|r| r.department.clone()).collect(),
        datasets: vec![
            Dataset::new("Total Students", rows.iter().map(|r| r.total_students).collect()),
            Dataset::new("Placed Students", rows.iter().map(|r| r.placed_students).collect()),
        ],
    }
}

pub fn job_chart(rows: &[JobFunnelRow]) -> Chart {
    Chart {
        labels: rows.iter().map(|r| r.job_title.clone()).collect(),
        datasets: vec![
            Dataset::new(
                "Applications Received",
                rows.iter().map(|r| r.applications_received).collect(),
            ),
            Dataset::new(
                "Students Selected",
                rows.iter().map(|r| r.selected_count).collect(),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_department_chart_keeps_row_order() {
        let rows = vec![
            DepartmentFunnelRow {
                department: "CSE".to_string(),
                total_students: 4,
                placed_students: 2,
            },
            DepartmentFunnelRow {
                department: "ECE".to_string(),
                total_students: 3,
                placed_students: 0,
            },
        ];
        let chart = department_chart(&rows);
        assert_eq!(chart.labels, vec!["CSE", "ECE"]);
        assert_eq!(chart.datasets[0].data, vec![4, 3]);
        assert_eq!(chart.datasets[1].label, "Placed Students");
        assert_eq!(chart.datasets[1].data, vec![2, 0]);
    }

    #[test]
    fn test_job_chart_serializes_to_chart_shape() {
        let rows = vec![JobFunnelRow {
            job_id: Uuid::nil(),
            job_title: "SDE".to_string(),
            applications_received: 3,
            selected_count: 1,
        }];
        let json = serde_json::to_value(job_chart(&rows)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "labels": ["SDE"],
                "datasets": [
                    { "label": "Applications Received", "data": [3] },
                    { "label": "Students Selected", "data": [1] }
                ]
            })
        );
    }
}
