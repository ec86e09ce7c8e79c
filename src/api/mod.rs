//! Synchronization controller.
//!
//! Control flow: [`GroupBuilder`] validates the charts and options into a
//! [`ChartGroup`]; [`Synchronizer::build`] registers a readiness barrier on
//! every chart; once the last chart is ready the callback vault captures the
//! existing hooks and the viewport/selection hooks are installed. The
//! returned [`SynchronizationHandle`] reverses the installation on `detach`.

mod arguments;
mod callback_vault;
mod controller;
mod group_builder;
mod readiness;
mod selection_sync;
mod viewport_sync;

pub use arguments::{SyncArgument, parse_arguments, synchronize};
pub use controller::{SynchronizationHandle, Synchronizer};
pub use group_builder::{ChartGroup, GroupBuilder};
