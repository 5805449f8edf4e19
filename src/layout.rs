//! Pure layout engine for the timeline grid.
//!
//! Bucketing and positioning are plain date arithmetic over the fetched
//! records, kept free of any UI types so the grid math can be exercised
//! without a terminal. A [`TimelineLayout`] is rebuilt from scratch on
//! every render pass and owns nothing beyond indices into the payload.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Granularity, MilestoneDto, ProjectDto, TaskDto};

/// First day of the month containing `date`.
fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date` (advance one month, back one day).
fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Ordered period-start dates covering the project range.
///
/// Every day from the first day of the start month through the last day of
/// the end month falls into exactly one period. A start after the end
/// produces an empty range rather than looping.
pub fn time_range(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    let range_end = month_end(end);
    let mut range = Vec::new();
    let mut cursor = month_start(start);

    while cursor <= range_end {
        range.push(cursor);
        cursor = match cursor.checked_add_months(Months::new(granularity.period_months())) {
            Some(next) => next,
            None => break,
        };
    }

    range
}

/// Inclusive end of the period starting at `period_start`.
pub fn period_end(period_start: NaiveDate, granularity: Granularity) -> NaiveDate {
    let last_month = period_start
        .checked_add_months(Months::new(granularity.period_months() - 1))
        .unwrap_or(period_start);
    month_end(last_month)
}

/// Short header label for the period containing `date`.
pub fn period_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Quarterly => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
        Granularity::Biannual => format!("S{} {}", date.month0() / 6 + 1, date.year()),
        Granularity::Annual => date.year().to_string(),
    }
}

/// Inclusive `[start, end]` period indices spanned by a task.
///
/// The start scan anchors the task to the first period whose window it
/// overlaps, comparing against the previous period's start marker. Tasks
/// with no matching period are clamped to the range boundaries instead of
/// being dropped.
pub fn task_span(
    task_start: NaiveDate,
    task_end: NaiveDate,
    range: &[NaiveDate],
    granularity: Granularity,
) -> (usize, usize) {
    let mut start_position = None;
    let mut end_position = None;

    for (i, &period_start) in range.iter().enumerate() {
        let end_of_period = period_end(period_start, granularity);

        if start_position.is_none()
            && task_start <= end_of_period
            && (i == 0 || task_start > range[i - 1])
        {
            start_position = Some(i);
        }
        if end_position.is_none() && task_end <= end_of_period {
            end_position = Some(i);
        }
    }

    (
        start_position.unwrap_or(0),
        end_position.unwrap_or(range.len().saturating_sub(1)),
    )
}

/// Assign each milestone to the first period whose `[start, end]` window
/// contains its date. Milestones outside every window land in no bucket.
pub fn bucket_milestones(
    milestones: &[MilestoneDto],
    range: &[NaiveDate],
    granularity: Granularity,
) -> Vec<Vec<usize>> {
    let mut buckets = vec![Vec::new(); range.len()];

    for (index, milestone) in milestones.iter().enumerate() {
        for (i, &period_start) in range.iter().enumerate() {
            if milestone.date >= period_start
                && milestone.date <= period_end(period_start, granularity)
            {
                buckets[i].push(index);
                break;
            }
        }
    }

    buckets
}

/// One column of the grid header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// Grid placement of one task bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskBar {
    /// Index into the payload's task list.
    pub task: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl TaskBar {
    /// Number of grid columns the bar spans.
    pub fn width(&self) -> usize {
        self.end_col - self.start_col + 1
    }
}

/// Complete grid layout of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineLayout {
    pub granularity: Granularity,
    pub periods: Vec<Period>,
    /// One bar per task, in payload order. Empty when the range is empty.
    pub bars: Vec<TaskBar>,
    /// Milestone indices per period column.
    pub milestone_buckets: Vec<Vec<usize>>,
}

impl TimelineLayout {
    pub fn build(
        project: &ProjectDto,
        tasks: &[TaskDto],
        milestones: &[MilestoneDto],
        granularity: Granularity,
    ) -> Self {
        let range = time_range(project.start_date, project.end_date, granularity);

        let periods = range
            .iter()
            .map(|&start| Period {
                start,
                end: period_end(start, granularity),
                label: period_label(start, granularity),
            })
            .collect();

        let bars = if range.is_empty() {
            Vec::new()
        } else {
            tasks
                .iter()
                .enumerate()
                .map(|(task, t)| {
                    let (start_col, end_col) =
                        task_span(t.start_date, t.end_date, &range, granularity);
                    TaskBar {
                        task,
                        start_col,
                        end_col,
                    }
                })
                .collect()
        };

        let milestone_buckets = bucket_milestones(milestones, &range, granularity);

        Self {
            granularity,
            periods,
            bars,
            milestone_buckets,
        }
    }

    /// Flattened milestone markers in render order: `(column, milestone)`.
    pub fn markers(&self) -> Vec<(usize, usize)> {
        self.milestone_buckets
            .iter()
            .enumerate()
            .flat_map(|(col, bucket)| bucket.iter().map(move |&m| (col, m)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn milestone(id: i64, date: NaiveDate) -> MilestoneDto {
        MilestoneDto {
            id,
            name: format!("m{id}"),
            description: None,
            date,
            completed: false,
        }
    }

    fn project(start: NaiveDate, end: NaiveDate) -> ProjectDto {
        ProjectDto {
            id: 1,
            name: "p".to_string(),
            description: None,
            start_date: start,
            end_date: end,
            progress: 0,
        }
    }

    fn task(id: i64, start: NaiveDate, end: NaiveDate) -> TaskDto {
        TaskDto {
            id,
            name: format!("t{id}"),
            start_date: start,
            end_date: end,
            progress: 0,
            completed: false,
            assignee_name: None,
        }
    }

    #[test]
    fn test_range_is_increasing_and_evenly_stepped() {
        let cases = [
            (d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly),
            (d(2023, 2, 28), d(2025, 11, 3), Granularity::Biannual),
            (d(2020, 6, 1), d(2024, 6, 30), Granularity::Annual),
            (d(2024, 3, 5), d(2024, 3, 20), Granularity::Quarterly),
        ];

        for (start, end, granularity) in cases {
            let range = time_range(start, end, granularity);
            assert!(!range.is_empty());
            assert!(range[0] <= start);
            assert!(period_end(*range.last().unwrap(), granularity) >= end);
            for pair in range.windows(2) {
                assert_eq!(
                    pair[0]
                        .checked_add_months(Months::new(granularity.period_months()))
                        .unwrap(),
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_quarterly_range_scenario() {
        let range = time_range(d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly);
        assert_eq!(range, vec![d(2024, 1, 1), d(2024, 4, 1), d(2024, 7, 1)]);
        assert_eq!(period_end(range[2], Granularity::Quarterly), d(2024, 9, 30));
    }

    #[test]
    fn test_single_month_project_gets_one_bucket() {
        let range = time_range(d(2024, 5, 10), d(2024, 5, 20), Granularity::Annual);
        assert_eq!(range, vec![d(2024, 5, 1)]);
    }

    #[test]
    fn test_reversed_range_is_empty_not_infinite() {
        let range = time_range(d(2024, 9, 1), d(2024, 1, 1), Granularity::Quarterly);
        assert!(range.is_empty());
    }

    #[test]
    fn test_quarter_labels_follow_month_arithmetic() {
        for month in 1..=12 {
            let date = d(2024, month, 1);
            let label = period_label(date, Granularity::Quarterly);
            assert_eq!(label, format!("Q{} 2024", (month - 1) / 3 + 1));
        }
        assert_eq!(period_label(d(2025, 7, 1), Granularity::Biannual), "S2 2025");
        assert_eq!(period_label(d(2025, 6, 30), Granularity::Biannual), "S1 2025");
        assert_eq!(period_label(d(2025, 1, 1), Granularity::Annual), "2025");
    }

    #[test]
    fn test_task_span_scenario() {
        let range = time_range(d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly);
        let (start, end) = task_span(d(2024, 2, 1), d(2024, 5, 1), &range, Granularity::Quarterly);
        assert_eq!((start, end), (0, 1));
        assert_eq!(end - start + 1, 2);
    }

    #[test]
    fn test_task_span_is_ordered_for_in_range_tasks() {
        let range = time_range(d(2023, 1, 1), d(2025, 12, 31), Granularity::Biannual);
        let cases = [
            (d(2023, 1, 1), d(2023, 1, 1)),
            (d(2023, 8, 15), d(2024, 2, 1)),
            (d(2025, 12, 1), d(2025, 12, 31)),
        ];
        for (start, end) in cases {
            let (s, e) = task_span(start, end, &range, Granularity::Biannual);
            assert!(s <= e, "span for {start}..{end} was ({s}, {e})");
        }
    }

    #[test]
    fn test_task_start_on_period_boundary() {
        let range = time_range(d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly);
        let (start, end) = task_span(d(2024, 4, 1), d(2024, 6, 30), &range, Granularity::Quarterly);
        assert_eq!((start, end), (1, 1));
    }

    #[test]
    fn test_task_before_range_is_clamped_to_first_period() {
        let range = time_range(d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly);
        let (start, end) = task_span(d(2023, 1, 1), d(2023, 6, 1), &range, Granularity::Quarterly);
        assert_eq!((start, end), (0, 0));
    }

    #[test]
    fn test_task_after_range_is_clamped_to_last_period() {
        let range = time_range(d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly);
        let (start, end) = task_span(d(2025, 1, 1), d(2025, 6, 1), &range, Granularity::Quarterly);
        assert_eq!(start, 0);
        assert_eq!(end, range.len() - 1);
    }

    #[test]
    fn test_milestone_bucketing_scenario() {
        let range = time_range(d(2024, 1, 15), d(2024, 8, 10), Granularity::Quarterly);
        let milestones = [
            milestone(1, d(2024, 4, 15)),
            milestone(2, d(2023, 12, 1)),
        ];
        let buckets = bucket_milestones(&milestones, &range, Granularity::Quarterly);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[1], vec![0]);
        assert!(buckets[0].is_empty());
        assert!(buckets[2].is_empty());
    }

    #[test]
    fn test_milestone_bucketing_is_a_partition() {
        let range = time_range(d(2023, 1, 1), d(2024, 12, 31), Granularity::Quarterly);
        let milestones = [
            milestone(1, d(2023, 1, 1)),
            milestone(2, d(2023, 3, 31)),
            milestone(3, d(2023, 4, 1)),
            milestone(4, d(2024, 12, 31)),
            milestone(5, d(2025, 1, 1)),
        ];
        let buckets = bucket_milestones(&milestones, &range, Granularity::Quarterly);

        let mut assigned = vec![0usize; milestones.len()];
        for (col, bucket) in buckets.iter().enumerate() {
            for &m in bucket {
                assigned[m] += 1;
                let start = range[col];
                let end = period_end(start, Granularity::Quarterly);
                assert!(milestones[m].date >= start && milestones[m].date <= end);
            }
        }
        assert_eq!(assigned, vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_layout_build_counts() {
        let p = project(d(2024, 1, 15), d(2024, 8, 10));
        let tasks = [task(1, d(2024, 2, 1), d(2024, 5, 1))];
        let milestones = [milestone(1, d(2024, 4, 15))];
        let layout = TimelineLayout::build(&p, &tasks, &milestones, Granularity::Quarterly);

        assert_eq!(layout.periods.len(), 3);
        assert_eq!(layout.periods[0].label, "Q1 2024");
        assert_eq!(layout.bars.len(), 1);
        assert_eq!(layout.bars[0].width(), 2);
        assert_eq!(layout.markers(), vec![(1, 0)]);
    }

    #[test]
    fn test_layout_build_is_deterministic() {
        let p = project(d(2024, 1, 15), d(2024, 8, 10));
        let tasks = [
            task(1, d(2024, 2, 1), d(2024, 5, 1)),
            task(2, d(2024, 7, 1), d(2024, 8, 1)),
        ];
        let milestones = [milestone(1, d(2024, 4, 15))];
        let a = TimelineLayout::build(&p, &tasks, &milestones, Granularity::Quarterly);
        let b = TimelineLayout::build(&p, &tasks, &milestones, Granularity::Quarterly);
        assert_eq!(a, b);
    }

    #[test]
    fn test_layout_build_degenerate_project() {
        let p = project(d(2024, 9, 1), d(2024, 1, 1));
        let tasks = [task(1, d(2024, 2, 1), d(2024, 5, 1))];
        let layout = TimelineLayout::build(&p, &tasks, &[], Granularity::Quarterly);
        assert!(layout.periods.is_empty());
        assert!(layout.bars.is_empty());
        assert!(layout.milestone_buckets.is_empty());
    }
}
