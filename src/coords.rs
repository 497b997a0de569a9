//! Time ↔ coordinate mapping.
//!
//! Pure conversions between absolute times, a linear coordinate space
//! (percent of the window or a pixel offset) and fixed-duration slots.
//! Results are not clamped: times outside the window map to coordinates
//! below zero or beyond the full width, and callers decide visibility.

use chrono::{Duration, NaiveDateTime, Timelike};

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_minutes() as f64
}

/// Offset of `time` within `[start, end]` as a percentage.
pub fn position_percentage(time: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    minutes_between(start, time) / minutes_between(start, end) * 100.0
}

/// Share of the window covered by `[from, to]`, as a percentage.
pub fn width_percentage(
    from: NaiveDateTime,
    to: NaiveDateTime,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> f64 {
    minutes_between(from, to) / minutes_between(window_start, window_end) * 100.0
}

pub fn to_pixel(
    time: NaiveDateTime,
    start: NaiveDateTime,
    total_minutes: i64,
    grid_width: f64,
) -> f64 {
    minutes_between(start, time) / total_minutes as f64 * grid_width
}

/// Inverse of [`to_pixel`], to the nearest millisecond.
pub fn from_pixel(
    pixel_offset: f64,
    start: NaiveDateTime,
    total_minutes: i64,
    grid_width: f64,
) -> NaiveDateTime {
    let minutes = pixel_offset / grid_width * total_minutes as f64;
    start + Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Floor `time` to the slot boundary at or before it.
pub fn snap_to_slot(
    time: NaiveDateTime,
    start: NaiveDateTime,
    slot_duration: i64,
) -> NaiveDateTime {
    let slot_seconds = slot_duration * 60;
    let slots = (time - start).num_seconds().div_euclid(slot_seconds);
    start + Duration::seconds(slots * slot_seconds)
}

pub fn slot_index(time: NaiveDateTime, start: NaiveDateTime, slot_duration: i64) -> i64 {
    (time - start).num_minutes().div_euclid(slot_duration)
}

pub fn slot_time(index: i64, start: NaiveDateTime, slot_duration: i64) -> NaiveDateTime {
    start + Duration::minutes(index * slot_duration)
}

fn start_of_hour(time: NaiveDateTime) -> NaiveDateTime {
    time.date()
        .and_hms_opt(time.hour(), 0, 0)
        .unwrap_or(time)
}

/// Every whole hour in `[start, end]`, ascending.
pub fn hour_markers(start: NaiveDateTime, end: NaiveDateTime) -> HourMarkers {
    let mut next = start_of_hour(start);
    if next < start {
        next += Duration::hours(1);
    }
    HourMarkers { next, end }
}

/// Iterator returned by [`hour_markers`].
#[derive(Debug, Clone)]
pub struct HourMarkers {
    next: NaiveDateTime,
    end: NaiveDateTime,
}

impl Iterator for HourMarkers {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let current = self.next;
        self.next += Duration::hours(1);
        Some(current)
    }
}

/// Label like `T3` for the eight-hour cycle containing `hour`, counted from
/// `reference`. Hours before the reference wrap around to `T7`, `T6`, ...
pub fn period_marker(hour: NaiveDateTime, reference: NaiveDateTime, prefix: &str) -> String {
    let hours = (hour - reference).num_minutes().div_euclid(60);
    format!("{}{}", prefix, hours.rem_euclid(8))
}

/// `45m`, `1h`, `1h30`.
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h{:02}", hours, rest)
    }
}
