use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::coords;
use crate::error::{Error, Result};

pub const DEFAULT_SLOT_DURATION: i64 = 5;
pub const DEFAULT_TRANSITION_DURATION: i64 = 15;
pub const DEFAULT_SLOT_WIDTH: f64 = 12.0;
pub const DEFAULT_ROW_COLUMN_WIDTH_EXPANDED: f64 = 120.0;
pub const DEFAULT_ROW_COLUMN_WIDTH_COLLAPSED: f64 = 48.0;
/// Scroll offset past which the row column collapses.
pub const SCROLL_COLLAPSE_THRESHOLD: f64 = 50.0;

/// "T0, T1, ..." markers cycling every eight hours from a reference time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMarkerConfig {
    pub enabled: bool,
    pub prefix: String,
    pub reference_time: NaiveDateTime,
}

/// Timeline configuration as supplied by the host; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineConfig {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    /// Minutes per slot.
    pub slot_duration: i64,
    pub show_now_indicator: bool,
    pub auto_scroll_to_now: bool,
    pub period_markers: Option<PeriodMarkerConfig>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            slot_duration: DEFAULT_SLOT_DURATION,
            show_now_indicator: true,
            auto_scroll_to_now: true,
            period_markers: None,
        }
    }
}

impl TimelineConfig {
    /// Slot maths divides by the slot duration, so it must be positive, and
    /// an explicit window must not be empty.
    pub fn validate(&self) -> Result<()> {
        if self.slot_duration <= 0 {
            return Err(Error::InvalidConfig(format!(
                "slotDuration must be positive, got {}",
                self.slot_duration
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                return Err(Error::InvalidConfig(format!(
                    "endDate {} is not after startDate {}",
                    end, start
                )));
            }
        }
        Ok(())
    }

    /// Apply defaults and derive the slot and hour counts. A missing window
    /// spans from the day before `reference_day` to the end of the day after.
    pub fn resolve(&self, reference_day: NaiveDate) -> ResolvedTimeline {
        let midnight = reference_day.and_time(chrono::NaiveTime::MIN);
        let start_date = self.start_date.unwrap_or(midnight - Duration::days(1));
        let end_date = self.end_date.unwrap_or(midnight + Duration::days(2));
        let total_minutes = (end_date - start_date).num_minutes();

        ResolvedTimeline {
            start_date,
            end_date,
            slot_duration: self.slot_duration,
            total_minutes,
            slot_count: ceil_div(total_minutes, self.slot_duration),
            hour_count: ceil_div(total_minutes, 60),
            show_now_indicator: self.show_now_indicator,
            auto_scroll_to_now: self.auto_scroll_to_now,
            period_markers: self.period_markers.clone(),
        }
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 {
        q + 1
    } else {
        q
    }
}

/// Configuration with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTimeline {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub slot_duration: i64,
    pub total_minutes: i64,
    pub slot_count: i64,
    pub hour_count: i64,
    pub show_now_indicator: bool,
    pub auto_scroll_to_now: bool,
    pub period_markers: Option<PeriodMarkerConfig>,
}

impl ResolvedTimeline {
    /// Start time of every slot boundary, in order.
    pub fn slot_boundaries(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.slot_count).map(move |i| coords::slot_time(i, self.start_date, self.slot_duration))
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start_date <= time && time <= self.end_date
    }
}

/// Expanded and collapsed widths of the row label column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowColumnWidth {
    pub expanded: f64,
    pub collapsed: f64,
}

impl Default for RowColumnWidth {
    fn default() -> Self {
        Self {
            expanded: DEFAULT_ROW_COLUMN_WIDTH_EXPANDED,
            collapsed: DEFAULT_ROW_COLUMN_WIDTH_COLLAPSED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl VisibleRange {
    pub fn midpoint(&self) -> NaiveDateTime {
        self.start + (self.end - self.start) / 2
    }
}

/// The scrollable grid: a resolved window laid out at a fixed slot width.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    pub window: ResolvedTimeline,
    /// Pixels per slot.
    pub slot_width: f64,
    /// Horizontal scroll offset of the grid in pixels.
    pub scroll_left: f64,
    /// Width of the visible part of the grid.
    pub container_width: f64,
}

impl TimelineViewport {
    pub fn new(window: ResolvedTimeline, slot_width: f64, container_width: f64) -> Self {
        Self {
            window,
            slot_width,
            scroll_left: 0.0,
            container_width,
        }
    }

    /// Total grid width in pixels.
    pub fn total_width(&self) -> f64 {
        self.window.slot_count as f64 * self.slot_width
    }

    /// Convert a time to an x-pixel offset from the grid start.
    pub fn time_to_x(&self, time: NaiveDateTime) -> f64 {
        coords::to_pixel(
            time,
            self.window.start_date,
            self.window.total_minutes,
            self.total_width(),
        )
    }

    /// Convert an x-pixel offset back to a time.
    pub fn x_to_time(&self, x: f64) -> NaiveDateTime {
        coords::from_pixel(
            x,
            self.window.start_date,
            self.window.total_minutes,
            self.total_width(),
        )
    }

    /// Time of the slot boundary at or before a click at `x` in a row.
    pub fn click_to_slot_time(&self, x: f64) -> NaiveDateTime {
        coords::snap_to_slot(
            self.x_to_time(x),
            self.window.start_date,
            self.window.slot_duration,
        )
    }

    /// Largest scroll offset that still keeps the container on the grid.
    pub fn max_scroll(&self) -> f64 {
        (self.total_width() - self.container_width).max(0.0)
    }

    /// Scroll offset that centres `time` in the container, clamped to the
    /// scrollable range so times outside the window pin to an edge.
    pub fn scroll_position_for_time(&self, time: NaiveDateTime) -> f64 {
        (self.time_to_x(time) - self.container_width / 2.0).clamp(0.0, self.max_scroll())
    }

    pub fn scroll_to_time(&mut self, time: NaiveDateTime) {
        self.scroll_left = self.scroll_position_for_time(time);
    }

    pub fn visible_range(&self) -> VisibleRange {
        VisibleRange {
            start: self.x_to_time(self.scroll_left),
            end: self.x_to_time(self.scroll_left + self.container_width),
        }
    }

    /// Reference time used to pick row labels while scrolling.
    pub fn visible_midpoint(&self) -> NaiveDateTime {
        self.visible_range().midpoint()
    }

    pub fn is_collapsed(&self, threshold: f64) -> bool {
        self.scroll_left > threshold
    }

    /// The row column stays expanded while hovered even when scrolled.
    pub fn row_column_width(&self, widths: RowColumnWidth, threshold: f64, hovered: bool) -> f64 {
        if self.is_collapsed(threshold) && !hovered {
            widths.collapsed
        } else {
            widths.expanded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn ten_hour_window() -> ResolvedTimeline {
        TimelineConfig {
            start_date: Some(at(8, 0)),
            end_date: Some(at(18, 0)),
            ..Default::default()
        }
        .resolve(day())
    }

    #[test]
    fn test_resolve_defaults_to_three_days() {
        let resolved = TimelineConfig::default().resolve(day());
        assert_eq!(resolved.start_date, at(0, 0) - Duration::days(1));
        assert_eq!(resolved.end_date, at(0, 0) + Duration::days(2));
        assert_eq!(resolved.total_minutes, 3 * 24 * 60);
        assert_eq!(resolved.slot_count, 3 * 24 * 60 / 5);
        assert_eq!(resolved.hour_count, 72);
    }

    #[test]
    fn test_slot_count_rounds_up() {
        let resolved = TimelineConfig {
            start_date: Some(at(8, 0)),
            end_date: Some(at(8, 7)),
            ..Default::default()
        }
        .resolve(day());
        assert_eq!(resolved.total_minutes, 7);
        assert_eq!(resolved.slot_count, 2);
        assert_eq!(resolved.hour_count, 1);
    }

    #[test]
    fn test_viewport_round_trip_and_width() {
        let viewport = TimelineViewport::new(ten_hour_window(), 12.0, 600.0);
        // 600 minutes / 5 = 120 slots
        assert_eq!(viewport.total_width(), 1440.0);
        assert_eq!(viewport.time_to_x(at(13, 0)), 720.0);
        assert_eq!(viewport.x_to_time(720.0), at(13, 0));
    }

    #[test]
    fn test_click_snaps_down_to_slot() {
        let viewport = TimelineViewport::new(ten_hour_window(), 12.0, 600.0);
        // 2.4 px per minute: x = 24 + 4*2.4 is 8:14 -> 8:10
        assert_eq!(viewport.click_to_slot_time(24.0 + 9.6), at(8, 10));
    }

    #[test]
    fn test_scroll_to_time_centres_and_clamps() {
        let mut viewport = TimelineViewport::new(ten_hour_window(), 12.0, 600.0);
        viewport.scroll_to_time(at(13, 0));
        assert_eq!(viewport.scroll_left, 420.0);
        assert_eq!(viewport.visible_midpoint(), at(13, 0));

        viewport.scroll_to_time(at(8, 30));
        assert_eq!(viewport.scroll_left, 0.0);
    }

    #[test]
    fn test_scroll_past_window_end_pins_to_last_page() {
        let mut viewport = TimelineViewport::new(ten_hour_window(), 12.0, 600.0);
        viewport.scroll_to_time(at(0, 0) + Duration::days(900));
        assert_eq!(viewport.scroll_left, 840.0);

        let visible = viewport.visible_range();
        assert!(visible.end <= viewport.window.end_date);
        assert_eq!(visible.end, at(18, 0));
        assert_eq!(visible.start, at(13, 50));
    }

    #[test]
    fn test_narrow_grid_never_scrolls() {
        let mut viewport = TimelineViewport::new(ten_hour_window(), 12.0, 2000.0);
        viewport.scroll_to_time(at(17, 0));
        assert_eq!(viewport.scroll_left, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_slot_and_window() {
        assert!(TimelineConfig::default().validate().is_ok());

        let zero_slot = TimelineConfig {
            slot_duration: 0,
            ..Default::default()
        };
        assert!(matches!(zero_slot.validate(), Err(Error::InvalidConfig(_))));

        let inverted = TimelineConfig {
            start_date: Some(at(18, 0)),
            end_date: Some(at(8, 0)),
            ..Default::default()
        };
        assert!(matches!(inverted.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_row_column_collapses_past_threshold() {
        let mut viewport = TimelineViewport::new(ten_hour_window(), 12.0, 600.0);
        let widths = RowColumnWidth::default();
        assert_eq!(viewport.row_column_width(widths, SCROLL_COLLAPSE_THRESHOLD, false), 120.0);

        viewport.scroll_left = 51.0;
        assert!(viewport.is_collapsed(SCROLL_COLLAPSE_THRESHOLD));
        assert_eq!(viewport.row_column_width(widths, SCROLL_COLLAPSE_THRESHOLD, false), 48.0);
        assert_eq!(viewport.row_column_width(widths, SCROLL_COLLAPSE_THRESHOLD, true), 120.0);
    }
}
