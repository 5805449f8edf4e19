//! Domain models for the PlanLine API.
//!
//! These structs match the backend's JSON payloads and use serde for
//! deserialization. Dates come over the wire as ISO `YYYY-MM-DD` strings
//! and map to NaiveDate. All records are read-only projections; the
//! timeline never mutates or persists them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Timeline view granularity, i.e. the period length of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// 3-month periods (default)
    #[default]
    Quarterly,
    /// 6-month periods
    Biannual,
    /// 12-month periods
    Annual,
}

impl Granularity {
    /// All granularities, in selector order.
    pub fn all() -> &'static [Granularity] {
        &[
            Granularity::Quarterly,
            Granularity::Biannual,
            Granularity::Annual,
        ]
    }

    /// Number of months covered by one period.
    pub fn period_months(&self) -> u32 {
        match self {
            Granularity::Quarterly => 3,
            Granularity::Biannual => 6,
            Granularity::Annual => 12,
        }
    }

    /// Value of the `view` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Granularity::Quarterly => "quarterly",
            Granularity::Biannual => "biannual",
            Granularity::Annual => "annual",
        }
    }

    /// Human label for the view selector.
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Quarterly => "Quarterly",
            Granularity::Biannual => "Biannual",
            Granularity::Annual => "Annual",
        }
    }

    /// Cycle to the next granularity.
    pub fn next(&self) -> Self {
        match self {
            Granularity::Quarterly => Granularity::Biannual,
            Granularity::Biannual => Granularity::Annual,
            Granularity::Annual => Granularity::Quarterly,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Project record (read)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub progress: i32,
}

/// Task record (read)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub assignee_name: Option<String>,
}

impl TaskDto {
    /// Progress clamped to the 0-100 display range.
    pub fn progress_clamped(&self) -> u16 {
        self.progress.clamp(0, 100) as u16
    }
}

/// Milestone record (read)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

/// Envelope returned by `GET /api/projects/{id}/timeline`.
///
/// `tasks` and `milestones` default to empty; `view` is echoed by the
/// server and falls back to the local selection when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineData {
    pub project: ProjectDto,
    #[serde(default)]
    pub tasks: Vec<TaskDto>,
    #[serde(default)]
    pub milestones: Vec<MilestoneDto>,
    #[serde(default)]
    pub view: Option<Granularity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_period_months() {
        assert_eq!(Granularity::Quarterly.period_months(), 3);
        assert_eq!(Granularity::Biannual.period_months(), 6);
        assert_eq!(Granularity::Annual.period_months(), 12);
    }

    #[test]
    fn test_granularity_query_roundtrip() {
        for &g in Granularity::all() {
            let json = serde_json::to_string(&g).unwrap();
            assert_eq!(json, format!("\"{}\"", g.as_query()));
            let back: Granularity = serde_json::from_str(&json).unwrap();
            assert_eq!(back, g);
        }
    }

    #[test]
    fn test_timeline_envelope_deserialization() {
        let payload = serde_json::json!({
            "project": {
                "id": 7,
                "name": "Warehouse rollout",
                "description": "Phase one",
                "start_date": "2024-01-15",
                "end_date": "2024-08-10",
                "progress": 40,
                "budget": 12000.0,
                "user_id": 3
            },
            "tasks": [
                {
                    "id": 21,
                    "project_id": 7,
                    "name": "Site survey",
                    "start_date": "2024-02-01",
                    "end_date": "2024-05-01",
                    "progress": 75,
                    "completed": false,
                    "assignee_name": "Lucía",
                    "subtasks_count": 4
                }
            ],
            "milestones": [
                {
                    "id": 5,
                    "project_id": 7,
                    "name": "Permits granted",
                    "date": "2024-04-15",
                    "completed": true
                }
            ],
            "view": "quarterly"
        });

        let data: TimelineData = serde_json::from_value(payload).unwrap();
        assert_eq!(data.project.id, 7);
        assert_eq!(data.tasks.len(), 1);
        assert_eq!(data.tasks[0].progress, 75);
        assert_eq!(data.milestones[0].date.to_string(), "2024-04-15");
        assert!(data.milestones[0].completed);
        assert_eq!(data.view, Some(Granularity::Quarterly));
    }

    #[test]
    fn test_timeline_envelope_defaults() {
        let payload = serde_json::json!({
            "project": {
                "id": 1,
                "name": "Bare",
                "start_date": "2024-03-01",
                "end_date": "2024-03-31"
            }
        });

        let data: TimelineData = serde_json::from_value(payload).unwrap();
        assert!(data.tasks.is_empty());
        assert!(data.milestones.is_empty());
        assert_eq!(data.view, None);
        assert_eq!(data.project.progress, 0);
    }

    #[test]
    fn test_malformed_date_is_an_error_not_a_panic() {
        let payload = serde_json::json!({
            "project": {
                "id": 1,
                "name": "Broken",
                "start_date": "not-a-date",
                "end_date": "2024-03-31"
            }
        });

        assert!(serde_json::from_value::<TimelineData>(payload).is_err());
    }

    #[test]
    fn test_progress_clamped() {
        let mut task = TaskDto {
            id: 1,
            name: "t".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            progress: 130,
            completed: false,
            assignee_name: None,
        };
        assert_eq!(task.progress_clamped(), 100);
        task.progress = -5;
        assert_eq!(task.progress_clamped(), 0);
    }
}
