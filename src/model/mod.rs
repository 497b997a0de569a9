pub mod period;
pub mod row;
pub mod snapshot;
pub mod task;
pub mod timeline;

pub use period::Period;
pub use row::{AvailabilityStatus, Row, RowAvailability, RowIndicator};
pub use snapshot::Snapshot;
pub use task::{EventMove, StatusChange, Task, TaskStatus};
pub use timeline::{
    PeriodMarkerConfig, ResolvedTimeline, RowColumnWidth, TimelineConfig, TimelineViewport,
    VisibleRange,
};
