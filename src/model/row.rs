use serde::{Deserialize, Serialize};

/// Fixed status dot shown next to a row label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIndicator {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Absent,
    Break,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAvailability {
    pub status: AvailabilityStatus,
    /// e.g. "out of office / absence / break"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One horizontal lane of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<RowIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<RowAvailability>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            indicator: None,
            availability: None,
        }
    }

    pub fn with_availability(mut self, status: AvailabilityStatus, label: Option<&str>) -> Self {
        self.availability = Some(RowAvailability {
            status,
            label: label.map(str::to_string),
        });
        self
    }

    /// Rows marked anything but available accept no task interaction.
    pub fn is_schedulable(&self) -> bool {
        self.availability
            .as_ref()
            .map_or(true, |a| a.status == AvailabilityStatus::Available)
    }

    /// Text shown in place of the row's tasks when it is not schedulable.
    pub fn unavailable_label(&self) -> &str {
        self.availability
            .as_ref()
            .and_then(|a| a.label.as_deref())
            .unwrap_or("Unavailable")
    }
}
