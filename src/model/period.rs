use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timeline::DEFAULT_TRANSITION_DURATION;

/// A validity period (e.g. a shift) mapping each row to a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub row_labels: HashMap<String, String>,
    /// Width in minutes of the handover window around the boundary with the
    /// next period. Defaults to 15.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<i64>,
}

impl Period {
    pub fn new(id: impl Into<String>, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            row_labels: HashMap::new(),
            transition_duration: None,
        }
    }

    pub fn with_label(mut self, row_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.row_labels.insert(row_id.into(), label.into());
        self
    }

    pub fn with_transition_duration(mut self, minutes: i64) -> Self {
        self.transition_duration = Some(minutes);
        self
    }

    pub fn transition(&self) -> Duration {
        Duration::minutes(self.transition_duration.unwrap_or(DEFAULT_TRANSITION_DURATION))
    }

    /// Inclusive at both ends.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    pub fn label_for(&self, row_id: &str) -> &str {
        self.row_labels.get(row_id).map(String::as_str).unwrap_or("")
    }
}
