//! chart-sync: keeps groups of interactive charts in lock-step.
//!
//! Panning or zooming one chart mirrors its viewport onto the others, and
//! highlighting a point mirrors the selection at the same x position. Charts
//! are external collaborators reached through the [`chart::SyncChart`]
//! contract; this crate never renders anything.

pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{
    ChartGroup, GroupBuilder, SyncArgument, SynchronizationHandle, Synchronizer, synchronize,
};
pub use chart::{ChartRef, MemoryChart, SyncChart};
pub use crate::core::{Range, SyncOptions};
pub use error::{SyncError, SyncResult};
