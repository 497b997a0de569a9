//! Period handover resolution.
//!
//! Rows are labelled by whichever period (shift) is active at a reference
//! time. Around the boundary between two consecutive periods there is a
//! handover window, `[end - d, next.start + d]` with `d` the outgoing
//! period's transition duration, during which both labels are shown and a
//! progress value drives the cross-fade.

use chrono::NaiveDateTime;

use crate::coords;
use crate::model::{Period, ResolvedTimeline, Row};

/// First period whose inclusive `[start, end]` contains `time`.
pub fn active_period(time: NaiveDateTime, periods: &[Period]) -> Option<&Period> {
    periods.iter().find(|p| p.contains(time))
}

/// Handover between two consecutive periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<'a> {
    pub outgoing: &'a Period,
    pub incoming: &'a Period,
    /// 0.0 at the window start, 1.0 at its end.
    pub progress: f64,
}

/// The handover window containing `time`, if any. When windows of several
/// adjacent pairs overlap, the earliest pair wins.
pub fn transition_window(time: NaiveDateTime, periods: &[Period]) -> Option<Transition<'_>> {
    periods.windows(2).find_map(|pair| {
        let (outgoing, incoming) = (&pair[0], &pair[1]);
        let window_start = outgoing.end_time - outgoing.transition();
        let window_end = incoming.start_time + outgoing.transition();

        if time < window_start || time > window_end {
            return None;
        }

        let total = (window_end - window_start).num_seconds() as f64;
        let progress = if total > 0.0 {
            ((time - window_start).num_seconds() as f64 / total).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some(Transition {
            outgoing,
            incoming,
            progress,
        })
    })
}

/// What a row header shows at a given reference time.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelState {
    Steady {
        label: String,
    },
    Transitioning {
        outgoing_label: String,
        incoming_label: String,
        progress: f64,
    },
}

impl LabelState {
    /// The label currently in charge: the outgoing one during a handover.
    pub fn current(&self) -> &str {
        match self {
            LabelState::Steady { label } => label,
            LabelState::Transitioning { outgoing_label, .. } => outgoing_label,
        }
    }

    pub fn incoming(&self) -> Option<&str> {
        match self {
            LabelState::Steady { .. } => None,
            LabelState::Transitioning { incoming_label, .. } => Some(incoming_label),
        }
    }

    pub fn progress(&self) -> f64 {
        match self {
            LabelState::Steady { .. } => 0.0,
            LabelState::Transitioning { progress, .. } => *progress,
        }
    }
}

pub fn row_label(row_id: &str, time: NaiveDateTime, periods: &[Period]) -> LabelState {
    if let Some(t) = transition_window(time, periods) {
        return LabelState::Transitioning {
            outgoing_label: t.outgoing.label_for(row_id).to_string(),
            incoming_label: t.incoming.label_for(row_id).to_string(),
            progress: t.progress,
        };
    }
    LabelState::Steady {
        label: active_period(time, periods)
            .map(|p| p.label_for(row_id).to_string())
            .unwrap_or_default(),
    }
}

/// Labels for every row at one reference time.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabels {
    pub labels: Vec<(String, LabelState)>,
    pub in_transition: bool,
    pub transition_progress: f64,
}

pub fn row_labels(rows: &[Row], time: NaiveDateTime, periods: &[Period]) -> RowLabels {
    let transition = transition_window(time, periods);
    let labels = rows
        .iter()
        .map(|row| (row.id.clone(), row_label(&row.id, time, periods)))
        .collect();

    RowLabels {
        labels,
        in_transition: transition.is_some(),
        transition_progress: transition.map_or(0.0, |t| t.progress),
    }
}

/// "William Marshall" → "William M." or, collapsed, "W.M.".
pub fn format_row_label(full_name: &str, collapsed: bool) -> String {
    fn initial(s: &str) -> String {
        s.chars().next().map(String::from).unwrap_or_default()
    }

    let parts: Vec<&str> = full_name.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [single] if collapsed => format!("{}.", initial(single)),
        [single] => single.to_string(),
        [first, .., last] if collapsed => format!("{}.{}.", initial(first), initial(last)),
        [first, .., last] => format!("{} {}.", first, initial(last)),
    }
}

/// A handover band to shade on the grid, in percent of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionZone<'a> {
    pub left_percent: f64,
    pub width_percent: f64,
    pub incoming: &'a Period,
}

/// Handover bands starting at each period's end, clipped to the window.
pub fn transition_zones<'a>(
    periods: &'a [Period],
    window: &ResolvedTimeline,
) -> Vec<TransitionZone<'a>> {
    let total = window.total_minutes as f64;
    periods
        .windows(2)
        .filter_map(|pair| {
            let zone_start = pair[0].end_time;
            let zone_end = zone_start + pair[0].transition();
            if zone_end < window.start_date || zone_start > window.end_date {
                return None;
            }
            let start_offset = ((zone_start - window.start_date).num_minutes() as f64).max(0.0);
            let end_offset = ((zone_end - window.start_date).num_minutes() as f64).min(total);
            Some(TransitionZone {
                left_percent: start_offset / total * 100.0,
                width_percent: (end_offset - start_offset) / total * 100.0,
                incoming: &pair[1],
            })
        })
        .collect()
}

/// Hour markers in the window with their period marker, when configured.
pub fn labelled_hours(window: &ResolvedTimeline) -> Vec<(NaiveDateTime, Option<String>)> {
    let markers = window.period_markers.as_ref().filter(|m| m.enabled);
    coords::hour_markers(window.start_date, window.end_date)
        .map(|hour| {
            let marker = markers.map(|m| coords::period_marker(hour, m.reference_time, &m.prefix));
            (hour, marker)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PeriodMarkerConfig, TimelineConfig};
    use chrono::{Duration, NaiveDate};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn shifts() -> Vec<Period> {
        vec![
            Period::new("morning", at(0, 0), at(8, 0))
                .with_label("row-1", "William Marshall")
                .with_label("row-2", "Myriam G."),
            Period::new("afternoon", at(8, 0), at(16, 0))
                .with_label("row-1", "Sophie Adams"),
        ]
    }

    #[test]
    fn test_active_period_is_inclusive() {
        let periods = shifts();
        assert_eq!(active_period(at(0, 0), &periods).unwrap().id, "morning");
        // shared boundary resolves to the first period
        assert_eq!(active_period(at(8, 0), &periods).unwrap().id, "morning");
        assert_eq!(active_period(at(16, 0), &periods).unwrap().id, "afternoon");
        assert!(active_period(at(16, 1), &periods).is_none());
    }

    #[test]
    fn test_transition_window_midpoint() {
        let periods = shifts();
        let t = transition_window(at(8, 0), &periods).unwrap();
        assert_eq!(t.outgoing.id, "morning");
        assert_eq!(t.incoming.id, "afternoon");
        assert_eq!(t.progress, 0.5);
    }

    #[test]
    fn test_transition_window_bounds_inclusive() {
        let periods = shifts();
        assert_eq!(transition_window(at(7, 45), &periods).unwrap().progress, 0.0);
        assert_eq!(transition_window(at(8, 15), &periods).unwrap().progress, 1.0);
        assert!(transition_window(at(7, 44), &periods).is_none());
        assert!(transition_window(at(8, 16), &periods).is_none());
    }

    #[test]
    fn test_transition_uses_outgoing_duration() {
        let periods = vec![
            Period::new("a", at(0, 0), at(8, 0)).with_transition_duration(30),
            Period::new("b", at(8, 0), at(16, 0)).with_transition_duration(5),
        ];
        let t = transition_window(at(7, 30), &periods).unwrap();
        assert_eq!(t.progress, 0.0);
        assert_eq!(transition_window(at(8, 15), &periods).unwrap().progress, 0.75);
    }

    #[test]
    fn test_overlapping_windows_earliest_pair_wins() {
        let periods = vec![
            Period::new("a", at(0, 0), at(8, 0)).with_transition_duration(60),
            Period::new("b", at(8, 0), at(8, 30)).with_transition_duration(60),
            Period::new("c", at(8, 30), at(16, 0)),
        ];
        let t = transition_window(at(8, 10), &periods).unwrap();
        assert_eq!(t.outgoing.id, "a");
        assert_eq!(t.incoming.id, "b");
    }

    #[test]
    fn test_gap_between_periods_extends_window() {
        let periods = vec![
            Period::new("a", at(0, 0), at(8, 0)),
            Period::new("b", at(9, 0), at(16, 0)),
        ];
        // [7:45, 9:15]: 8:30 is halfway
        let t = transition_window(at(8, 30), &periods).unwrap();
        assert_eq!(t.progress, 0.5);
    }

    #[test]
    fn test_row_label_steady_and_transitioning() {
        let periods = shifts();
        assert_eq!(
            row_label("row-1", at(12, 0), &periods),
            LabelState::Steady {
                label: "Sophie Adams".into()
            }
        );

        let state = row_label("row-2", at(8, 0), &periods);
        assert_eq!(state.current(), "Myriam G.");
        assert_eq!(state.incoming(), Some(""));
        assert_eq!(state.progress(), 0.5);

        assert_eq!(row_label("row-1", at(20, 0), &periods).current(), "");
    }

    #[test]
    fn test_row_labels_reports_transition() {
        let periods = shifts();
        let rows = vec![Row::new("row-1"), Row::new("row-2")];
        let labels = row_labels(&rows, at(7, 50), &periods);
        assert!(labels.in_transition);
        assert_eq!(labels.labels.len(), 2);
        assert!(labels.transition_progress > 0.0);

        let labels = row_labels(&rows, at(12, 0), &periods);
        assert!(!labels.in_transition);
        assert_eq!(labels.transition_progress, 0.0);
    }

    #[test]
    fn test_format_row_label() {
        assert_eq!(format_row_label("William Marshall", false), "William M.");
        assert_eq!(format_row_label("William Marshall", true), "W.M.");
        assert_eq!(format_row_label("Anne de la Cour", false), "Anne C.");
        assert_eq!(format_row_label("Paul", false), "Paul");
        assert_eq!(format_row_label("Paul", true), "P.");
        assert_eq!(format_row_label("  ", true), "");
    }

    #[test]
    fn test_transition_zones_clip_to_window() {
        let periods = shifts();
        let window = TimelineConfig {
            start_date: Some(at(6, 0)),
            end_date: Some(at(10, 0)),
            ..Default::default()
        }
        .resolve(at(0, 0).date());

        let zones = transition_zones(&periods, &window);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].left_percent, 50.0);
        assert_eq!(zones[0].width_percent, 6.25);
        assert_eq!(zones[0].incoming.id, "afternoon");

        let late = TimelineConfig {
            start_date: Some(at(9, 0)),
            end_date: Some(at(10, 0)),
            ..Default::default()
        }
        .resolve(at(0, 0).date());
        assert!(transition_zones(&periods, &late).is_empty());
    }

    #[test]
    fn test_labelled_hours_with_markers() {
        let window = TimelineConfig {
            start_date: Some(at(8, 0)),
            end_date: Some(at(10, 0)),
            period_markers: Some(PeriodMarkerConfig {
                enabled: true,
                prefix: "T".into(),
                reference_time: at(0, 0),
            }),
            ..Default::default()
        }
        .resolve(at(0, 0).date());

        let hours = labelled_hours(&window);
        assert_eq!(hours.len(), 3);
        assert_eq!(hours[0], (at(8, 0), Some("T0".to_string())));
        assert_eq!(hours[2].1.as_deref(), Some("T2"));
        assert_eq!(hours[1].0, at(8, 0) + Duration::hours(1));
    }
}
