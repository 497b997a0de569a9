//! Task bar placement and duration summaries.

use std::collections::HashMap;

use crate::coords;
use crate::model::{ResolvedTimeline, Task, TaskStatus};

/// Horizontal placement of a task bar in percent of the window width.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLayout {
    pub id: String,
    pub left: f64,
    pub width: f64,
    /// Extra width past the planned end when the task ran late.
    pub overflow_width: Option<f64>,
}

pub fn event_layout(task: &Task, window: &ResolvedTimeline) -> EventLayout {
    let total = window.total_minutes as f64;
    let overflow_width = task
        .actual_end_time
        .filter(|actual| *actual > task.end_time)
        .map(|actual| (actual - task.end_time).num_minutes() as f64 / total * 100.0);

    EventLayout {
        id: task.id.clone(),
        left: coords::position_percentage(task.start_time, window.start_date, window.end_date),
        width: task.planned_minutes() as f64 / total * 100.0,
        overflow_width,
    }
}

pub fn event_layouts(tasks: &[Task], window: &ResolvedTimeline) -> HashMap<String, EventLayout> {
    tasks
        .iter()
        .map(|t| (t.id.clone(), event_layout(t, window)))
        .collect()
}

/// How far an actual duration deviates from the plan, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationModifier {
    Delayed(i64),
    Early(i64),
}

impl std::fmt::Display for DurationModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationModifier::Delayed(m) => write!(f, "({} min. delayed)", m),
            DurationModifier::Early(m) => write!(f, "({} min. early)", m),
        }
    }
}

/// Compare an actual duration against the planned one.
pub fn status_change_diff(planned: i64, actual: i64) -> Option<DurationModifier> {
    let diff = actual - planned;
    if diff > 0 {
        Some(DurationModifier::Delayed(diff))
    } else if diff < 0 {
        Some(DurationModifier::Early(-diff))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationInfo {
    pub planned_minutes: i64,
    /// Minutes to show on the bar: the actual duration when one applies.
    pub display_minutes: i64,
    pub modifier: Option<DurationModifier>,
}

impl DurationInfo {
    pub fn label(&self) -> String {
        match self.modifier {
            Some(m) => format!("{} {}", coords::format_duration(self.display_minutes), m),
            None => coords::format_duration(self.display_minutes),
        }
    }
}

/// Only delayed tasks that ran longer and early tasks that ran shorter get
/// a modifier. A recorded actual duration wins over an actual end time.
pub fn duration_info(task: &Task) -> DurationInfo {
    let planned = task.planned_minutes();
    let plain = DurationInfo {
        planned_minutes: planned,
        display_minutes: planned,
        modifier: None,
    };

    if let Some(actual) = task.actual_duration {
        let modifier = match (task.status, status_change_diff(planned, actual)) {
            (TaskStatus::Delayed, Some(m @ DurationModifier::Delayed(_))) => Some(m),
            (TaskStatus::Early, Some(m @ DurationModifier::Early(_))) => Some(m),
            _ => None,
        };
        if modifier.is_some() {
            return DurationInfo {
                planned_minutes: planned,
                display_minutes: actual,
                modifier,
            };
        }
    }

    if task.status == TaskStatus::Delayed {
        if let Some(actual_end) = task.actual_end_time {
            let actual = (actual_end - task.start_time).num_minutes();
            if actual > planned {
                return DurationInfo {
                    planned_minutes: planned,
                    display_minutes: actual,
                    modifier: Some(DurationModifier::Delayed(actual - planned)),
                };
            }
        }
    }

    plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimelineConfig;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn window() -> ResolvedTimeline {
        TimelineConfig {
            start_date: Some(at(8, 0)),
            end_date: Some(at(18, 0)),
            ..Default::default()
        }
        .resolve(at(0, 0).date())
    }

    #[test]
    fn test_event_layout_with_overflow() {
        let task = Task::new("r", "t", at(10, 0), at(11, 30))
            .with_id("e1")
            .with_status(TaskStatus::Delayed)
            .with_actual_end_time(at(12, 0));
        let layout = event_layout(&task, &window());
        assert_eq!(layout.left, 20.0);
        assert_eq!(layout.width, 15.0);
        assert_eq!(layout.overflow_width, Some(5.0));
    }

    #[test]
    fn test_event_layout_ignores_early_actual_end() {
        let task = Task::new("r", "t", at(10, 0), at(11, 0)).with_actual_end_time(at(10, 30));
        assert_eq!(event_layout(&task, &window()).overflow_width, None);
    }

    #[test]
    fn test_event_layout_outside_window() {
        let task = Task::new("r", "t", at(6, 0), at(7, 0));
        assert_eq!(event_layout(&task, &window()).left, -20.0);
    }

    #[test]
    fn test_event_layouts_keyed_by_id() {
        let tasks = vec![
            Task::new("r", "t", at(8, 0), at(9, 0)).with_id("a"),
            Task::new("r", "t", at(9, 0), at(10, 0)).with_id("b"),
        ];
        let layouts = event_layouts(&tasks, &window());
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts["b"].left, 10.0);
    }

    #[test]
    fn test_duration_info_from_actual_duration() {
        let delayed = Task::new("r", "t", at(10, 0), at(11, 30))
            .with_status(TaskStatus::Delayed)
            .with_actual_duration(120);
        let info = duration_info(&delayed);
        assert_eq!(info.display_minutes, 120);
        assert_eq!(info.modifier, Some(DurationModifier::Delayed(30)));
        assert_eq!(info.label(), "2h (30 min. delayed)");

        let early = Task::new("r", "t", at(12, 0), at(12, 45))
            .with_status(TaskStatus::Early)
            .with_actual_duration(30);
        assert_eq!(duration_info(&early).label(), "30m (15 min. early)");
    }

    #[test]
    fn test_duration_info_mismatched_status_shows_plan() {
        // early status but ran longer: no modifier
        let task = Task::new("r", "t", at(10, 0), at(11, 0))
            .with_status(TaskStatus::Early)
            .with_actual_duration(75);
        let info = duration_info(&task);
        assert_eq!(info.display_minutes, 60);
        assert_eq!(info.modifier, None);
    }

    #[test]
    fn test_duration_info_from_actual_end() {
        let task = Task::new("r", "t", at(11, 0), at(12, 30))
            .with_status(TaskStatus::Delayed)
            .with_actual_end_time(at(13, 0));
        let info = duration_info(&task);
        assert_eq!(info.display_minutes, 120);
        assert_eq!(info.modifier, Some(DurationModifier::Delayed(30)));
    }

    #[test]
    fn test_status_change_diff() {
        assert_eq!(status_change_diff(60, 75), Some(DurationModifier::Delayed(15)));
        assert_eq!(status_change_diff(60, 40), Some(DurationModifier::Early(20)));
        assert_eq!(status_change_diff(60, 60), None);
    }
}
