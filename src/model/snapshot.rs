use serde::{Deserialize, Serialize};

use super::task::{EventMove, StatusChange, Task};
use crate::error::{Error, Result};
use super::{Period, Row, TimelineConfig};

/// Everything a host hands the timeline: rows, periods, tasks and config.
///
/// The scheduling functions only ever read a snapshot. The mutating helpers
/// here exist for the host's own update path, after it has decided to
/// commit an accepted move or a status edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub events: Vec<Task>,
    #[serde(default)]
    pub config: TimelineConfig,
}

impl Snapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.events.iter().find(|t| t.id == id)
    }

    /// A task the user may pick up: it exists, its row is schedulable and it
    /// is not blocked.
    pub fn draggable_task(&self, id: &str) -> Result<&Task> {
        let task = self
            .task(id)
            .ok_or_else(|| Error::UnknownTask(id.to_string()))?;
        let row = self
            .row(&task.row_id)
            .ok_or_else(|| Error::UnknownRow(task.row_id.clone()))?;
        if !row.is_schedulable() {
            return Err(Error::RowUnavailable(row.id.clone()));
        }
        if !task.is_draggable() {
            return Err(Error::TaskBlocked(task.id.clone()));
        }
        Ok(task)
    }

    /// Tasks of one row, ordered by start time.
    pub fn row_tasks(&self, row_id: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .events
            .iter()
            .filter(|t| t.row_id == row_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.start_time);
        tasks
    }

    /// Commit an accepted move list. Returns how many tasks were updated.
    pub fn apply_moves(&mut self, moves: &[EventMove]) -> usize {
        let mut applied = 0;
        for mv in moves {
            if let Some(task) = self.events.iter_mut().find(|t| t.id == mv.event_id) {
                task.start_time = mv.new_start_time;
                task.end_time = mv.new_end_time;
                applied += 1;
            }
        }
        applied
    }

    /// Record a status edit. The actual duration is kept only for statuses
    /// that track one. Returns false when the task does not exist.
    pub fn apply_status_change(&mut self, change: &StatusChange) -> bool {
        let Some(task) = self.events.iter_mut().find(|t| t.id == change.event_id) else {
            return false;
        };
        task.status = change.new_status;
        task.actual_duration = if change.new_status.tracks_actual_duration() {
            change.actual_duration
        } else {
            None
        };
        true
    }

    /// Pairs of task ids that overlap within the same row.
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, a) in self.events.iter().enumerate() {
            for b in &self.events[i + 1..] {
                if a.row_id == b.row_id && a.overlaps(b) {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }
}
