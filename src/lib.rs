//! Core of a multi-row shift timeline.
//!
//! Three independent pieces share the data model in [`model`]:
//!
//! - **`coords`**: time ↔ percent/pixel/slot conversions used for layout and
//!   for turning pointer positions into drop times.
//! - **`periods`**: which period (shift) labels each row at a reference
//!   time, including the handover window between consecutive periods.
//! - **`cascade`**: legality of moving a task within its row, and the chain
//!   of later tasks that must be pushed to keep the row free of overlaps.
//!
//! Everything here works on caller-owned snapshots and returns plain data;
//! applying a move or refreshing "now" is the caller's job. The [`io`],
//! [`config`] and [`render`] modules are conveniences for hosts and the
//! bundled CLI.

pub mod cascade;
pub mod clock;
pub mod config;
pub mod coords;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod periods;
pub mod render;

pub use cascade::{resolve_cascade, valid_drop_zones, MoveOutcome};
pub use error::{Error, Result};
