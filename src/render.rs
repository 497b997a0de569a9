//! Frame assembly and the rendering capability interface.
//!
//! [`build_frame`] gathers everything a renderer needs for one paint: row
//! labels at the reference time, task layouts, the now line and the hour
//! ruler. A [`Presenter`] lets the host override how individual tasks and
//! row labels are shown without the core knowing about any drawing code.

use chrono::NaiveDateTime;

use crate::clock::{Clock, NowIndicator};
use crate::layout::{duration_info, event_layout, DurationInfo, EventLayout};
use crate::model::{ResolvedTimeline, Row, Snapshot, Task};
use crate::periods::{self, format_row_label, LabelState, TransitionZone};

#[derive(Debug, Clone)]
pub struct TaskFrame<'a> {
    pub task: &'a Task,
    pub layout: EventLayout,
    pub duration: DurationInfo,
}

#[derive(Debug, Clone)]
pub struct RowFrame<'a> {
    pub row: &'a Row,
    pub label: LabelState,
    /// False for unavailable rows: their tasks are listed but not interactive.
    pub schedulable: bool,
    pub tasks: Vec<TaskFrame<'a>>,
}

#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub window: ResolvedTimeline,
    pub reference_time: NaiveDateTime,
    pub rows: Vec<RowFrame<'a>>,
    pub now: Option<NowIndicator>,
    pub hours: Vec<(NaiveDateTime, Option<String>)>,
    pub transition_zones: Vec<TransitionZone<'a>>,
}

pub fn build_frame<'a>(
    snapshot: &'a Snapshot,
    window: &ResolvedTimeline,
    reference_time: NaiveDateTime,
    clock: &dyn Clock,
) -> Frame<'a> {
    let rows = snapshot
        .rows
        .iter()
        .map(|row| {
            let mut tasks: Vec<TaskFrame<'a>> = snapshot
                .events
                .iter()
                .filter(|t| t.row_id == row.id)
                .map(|task| TaskFrame {
                    task,
                    layout: event_layout(task, window),
                    duration: duration_info(task),
                })
                .collect();
            tasks.sort_by_key(|t| t.task.start_time);

            RowFrame {
                row,
                label: periods::row_label(&row.id, reference_time, &snapshot.periods),
                schedulable: row.is_schedulable(),
                tasks,
            }
        })
        .collect();

    Frame {
        window: window.clone(),
        reference_time,
        rows,
        now: window
            .show_now_indicator
            .then(|| NowIndicator::sample(clock, window)),
        hours: periods::labelled_hours(window),
        transition_zones: periods::transition_zones(&snapshot.periods, window),
    }
}

/// Host-supplied overrides for task and row label content.
pub trait Presenter {
    /// Text for one task bar; `default` is what would be shown otherwise.
    fn event(&self, task: &Task, layout: &EventLayout, default: String) -> String {
        let _ = (task, layout);
        default
    }

    /// Custom row label, or `None` to keep the default.
    fn row_label(&self, row: &Row, label: &LabelState, collapsed: bool) -> Option<String> {
        let _ = (row, label, collapsed);
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPresenter;

impl Presenter for DefaultPresenter {}

fn default_row_label(row: &RowFrame<'_>, collapsed: bool) -> String {
    if !row.schedulable {
        return row.row.unavailable_label().to_string();
    }
    match &row.label {
        LabelState::Steady { label } => format_row_label(label, collapsed),
        LabelState::Transitioning {
            outgoing_label,
            incoming_label,
            progress,
        } => format!(
            "{} > {} ({:.0}%)",
            format_row_label(outgoing_label, collapsed),
            format_row_label(incoming_label, collapsed),
            progress * 100.0
        ),
    }
}

fn default_event_text(task: &TaskFrame<'_>) -> String {
    format!(
        "{} [{}] {}-{} {}",
        task.task.id,
        task.task.status.label(),
        task.task.start_time.format("%H:%M"),
        task.task.end_time.format("%H:%M"),
        task.duration.label()
    )
}

/// Column range `[from, to)` covered by a percentage span.
fn columns(left: f64, width: f64, total: usize) -> (usize, usize) {
    let scale = total as f64 / 100.0;
    let from = (left * scale).floor().clamp(0.0, total as f64) as usize;
    let to = ((left + width) * scale).ceil().clamp(0.0, total as f64) as usize;
    (from, to.max(from))
}

/// Plain-text rendering: one bar line per row followed by its tasks.
pub fn render_text(
    frame: &Frame<'_>,
    presenter: &dyn Presenter,
    collapsed: bool,
    bar_width: usize,
) -> String {
    let mut out = String::new();

    for row in &frame.rows {
        let label = presenter
            .row_label(row.row, &row.label, collapsed)
            .unwrap_or_else(|| default_row_label(row, collapsed));

        let mut bar = vec!['.'; bar_width];
        if row.schedulable {
            for t in &row.tasks {
                let (from, to) = columns(t.layout.left, t.layout.width, bar_width);
                bar[from..to].iter_mut().for_each(|c| *c = '#');
                if let Some(overflow) = t.layout.overflow_width {
                    let overflow_left = t.layout.left + t.layout.width;
                    let (o_from, o_to) = columns(overflow_left, overflow, bar_width);
                    bar[o_from.max(to)..o_to.max(to)].iter_mut().for_each(|c| *c = '~');
                }
            }
        } else {
            bar.iter_mut().for_each(|c| *c = '-');
        }

        out.push_str(&format!("{:<28} |{}|\n", label, bar.into_iter().collect::<String>()));
        if row.schedulable {
            for t in &row.tasks {
                let text = presenter.event(t.task, &t.layout, default_event_text(t));
                out.push_str(&format!("    {}\n", text));
            }
        }
    }

    if let Some(now) = frame.now.filter(|n| n.visible) {
        out.push_str(&format!(
            "now: {} ({:.1}%)\n",
            now.time.format("%Y-%m-%d %H:%M"),
            now.position_percent
        ));
    }
    out
}
