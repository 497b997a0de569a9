use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a task, used for styling and for cascade legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Planned,
    InProgress,
    Delayed,
    Early,
    /// Immovable: a cascade that would displace it is rejected.
    Blocked,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Planned,
        TaskStatus::InProgress,
        TaskStatus::Delayed,
        TaskStatus::Early,
        TaskStatus::Blocked,
        TaskStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Planned => "Planned",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Delayed => "Delayed",
            TaskStatus::Early => "Early",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Loose parse used by the CSV importer and the CLI.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "planned" | "scheduled" | "new" => Some(TaskStatus::Planned),
            "in-progress" | "inprogress" | "active" | "started" => Some(TaskStatus::InProgress),
            "delayed" | "late" => Some(TaskStatus::Delayed),
            "early" => Some(TaskStatus::Early),
            "blocked" | "locked" => Some(TaskStatus::Blocked),
            "completed" | "complete" | "done" | "finished" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Statuses for which an actual duration is recorded.
    pub fn tracks_actual_duration(self) -> bool {
        matches!(self, TaskStatus::Delayed | TaskStatus::Early)
    }
}

/// A time-bounded task ("event") placed on one row of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub row_id: String,
    #[serde(default)]
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub status: TaskStatus,
    /// When the task actually finished; only drives overflow display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<NaiveDateTime>,
    /// Actual duration in minutes, recorded for delayed/early tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Task {
    /// Create a planned task with a fresh id.
    pub fn new(
        row_id: impl Into<String>,
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            row_id: row_id.into(),
            title: title.into(),
            start_time,
            end_time,
            status: TaskStatus::Planned,
            actual_end_time: None,
            actual_duration: None,
            color: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_actual_end_time(mut self, actual_end_time: NaiveDateTime) -> Self {
        self.actual_end_time = Some(actual_end_time);
        self
    }

    pub fn with_actual_duration(mut self, minutes: i64) -> Self {
        self.actual_duration = Some(minutes);
        self
    }

    /// Planned duration in whole minutes.
    pub fn planned_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn is_blocked(&self) -> bool {
        self.status == TaskStatus::Blocked
    }

    /// Blocked tasks cannot be picked up by a drag gesture.
    pub fn is_draggable(&self) -> bool {
        !self.is_blocked()
    }

    /// Whether `time` lies in `[start_time, end_time)`.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start_time <= time && time < self.end_time
    }

    pub fn overlaps(&self, other: &Task) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// A status edit submitted by the host's status dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub event_id: String,
    pub new_status: TaskStatus,
    /// Minutes; meaningful for delayed/early only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
}

/// New placement of one task produced by an accepted cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMove {
    pub event_id: String,
    pub new_start_time: NaiveDateTime,
    pub new_end_time: NaiveDateTime,
}
