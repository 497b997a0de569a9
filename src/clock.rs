//! Time source for "now"-dependent views.
//!
//! Nothing in the crate reads the wall clock directly; callers hand in a
//! [`Clock`] and sample it as often as they want to refresh.

use chrono::{Duration, Local, NaiveDateTime, Timelike};

use crate::coords;
use crate::model::ResolvedTimeline;

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Position of the "now" line at one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowIndicator {
    pub time: NaiveDateTime,
    pub visible: bool,
    /// Percent of the window; 0 when not visible.
    pub position_percent: f64,
}

impl NowIndicator {
    pub fn sample(clock: &dyn Clock, window: &ResolvedTimeline) -> Self {
        let time = clock.now();
        let visible = window.contains(time);
        let position_percent = if visible {
            coords::position_percentage(time, window.start_date, window.end_date)
        } else {
            0.0
        };
        Self {
            time,
            visible,
            position_percent,
        }
    }
}

/// Now, with minutes floored to the slot and seconds cleared.
pub fn current_time_slot(clock: &dyn Clock, slot_duration: i64) -> NaiveDateTime {
    let now = clock.now();
    let minute = i64::from(now.minute());
    let floored = minute - minute.rem_euclid(slot_duration);
    now.date()
        .and_hms_opt(now.hour(), 0, 0)
        .map_or(now, |hour| hour + Duration::minutes(floored))
}
