//! Cascade rescheduling within a single row.
//!
//! Moving a task into occupied time pushes the tasks after it to the right,
//! one after another, until the chain reaches a real gap. Nothing is ever
//! pulled earlier and nothing outside the moved task's row is touched.
//!
//! The legality test only checks the drop point: a move is refused when the
//! new start falls inside another task, but the moved task's full new span is
//! not checked against tasks starting before the drop point.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::model::{EventMove, ResolvedTimeline, Task};

/// Verdict for a requested move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum MoveOutcome {
    /// The moved task first, then each pushed task in push order. Tasks not
    /// listed stay where they are.
    Accepted { moves: Vec<EventMove> },
    /// The drop point is inside another task, or the task is not in the row.
    RejectedOverlap,
    /// The cascade would have to displace a blocked task.
    RejectedBlocked,
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }

    /// The moves to apply; empty for either rejection.
    pub fn moves(&self) -> &[EventMove] {
        match self {
            MoveOutcome::Accepted { moves } => moves,
            _ => &[],
        }
    }
}

/// Decide whether `moved_task_id` may start at `new_start` and compute the
/// resulting placements.
///
/// `row_tasks` is the current snapshot of the row containing the task.
/// Durations are preserved for every task that moves.
pub fn resolve_cascade(
    moved_task_id: &str,
    new_start: NaiveDateTime,
    row_tasks: &[Task],
) -> MoveOutcome {
    let Some(moved) = row_tasks.iter().find(|t| t.id == moved_task_id) else {
        debug!(task = moved_task_id, "cascade rejected: task not in row");
        return MoveOutcome::RejectedOverlap;
    };

    let others: Vec<&Task> = row_tasks.iter().filter(|t| t.id != moved.id).collect();

    if let Some(hit) = others.iter().find(|t| t.contains(new_start)) {
        debug!(
            task = moved_task_id,
            %new_start,
            inside = %hit.id,
            "cascade rejected: drop point occupied"
        );
        return MoveOutcome::RejectedOverlap;
    }

    let new_end = new_start + (moved.end_time - moved.start_time);
    let mut moves = vec![EventMove {
        event_id: moved.id.clone(),
        new_start_time: new_start,
        new_end_time: new_end,
    }];

    let mut affected: Vec<&Task> = others
        .into_iter()
        .filter(|t| t.start_time >= new_start)
        .collect();
    affected.sort_by_key(|t| t.start_time);

    let mut cursor = new_end;
    for task in affected {
        if task.start_time >= cursor {
            // Real gap: this task stays and the chain restarts from its end.
            cursor = task.end_time;
            continue;
        }
        if task.is_blocked() {
            debug!(
                task = moved_task_id,
                blocked = %task.id,
                "cascade rejected: blocked task in push chain"
            );
            return MoveOutcome::RejectedBlocked;
        }
        let pushed_end = cursor + (task.end_time - task.start_time);
        moves.push(EventMove {
            event_id: task.id.clone(),
            new_start_time: cursor,
            new_end_time: pushed_end,
        });
        cursor = pushed_end;
    }

    debug!(task = moved_task_id, %new_start, moved = moves.len(), "cascade accepted");
    MoveOutcome::Accepted { moves }
}

/// Slot boundaries across the window at which `task_id` may be dropped.
pub fn valid_drop_zones(
    task_id: &str,
    row_tasks: &[Task],
    window: &ResolvedTimeline,
) -> Vec<NaiveDateTime> {
    if !row_tasks.iter().any(|t| t.id == task_id) {
        return Vec::new();
    }
    window
        .slot_boundaries()
        .filter(|&slot| resolve_cascade(task_id, slot, row_tasks).is_accepted())
        .collect()
}
