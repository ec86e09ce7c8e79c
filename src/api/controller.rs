use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::chart::{ChartRef, OptionsPatch, SyncChart};
use crate::core::SyncOptions;
use crate::error::{SyncError, SyncResult};
use crate::interaction::ReentrancyGuard;

use super::ChartGroup;
use super::callback_vault::CallbackVault;
use super::readiness::ReadinessBarrier;

/// Entry point of the typed API.
pub struct Synchronizer;

impl Synchronizer {
    /// Starts synchronizing a validated group.
    ///
    /// Hooks are installed only after every chart reported ready; until then
    /// the group is inert. A chart that never reports ready keeps it inert.
    pub fn build(group: ChartGroup) -> SyncResult<SynchronizationHandle> {
        let core = Rc::new(SyncCore::new(&group));
        debug!(
            charts = group.len(),
            options = ?group.options(),
            "waiting for charts to become ready"
        );

        for (index, chart) in group.charts().iter().enumerate() {
            let core_ref = Rc::clone(&core);
            chart.on_ready(Box::new(move || core_ref.on_chart_ready(index)))?;
        }

        Ok(SynchronizationHandle { core })
    }
}

/// Handle of a running synchronization.
///
/// The group stays synchronized until [`detach`](Self::detach) is called;
/// dropping the handle does not undo anything.
#[must_use = "the group stays synchronized until `detach` is called"]
pub struct SynchronizationHandle {
    core: Rc<SyncCore>,
}

impl SynchronizationHandle {
    /// Restores every chart's original hooks and releases the group.
    ///
    /// Not idempotent: a second call fails with [`SyncError::Detached`].
    /// Detaching before activation releases the group without touching any
    /// chart, and a later readiness notification no longer activates it.
    pub fn detach(&self) -> SyncResult<()> {
        let state = self
            .core
            .state
            .borrow_mut()
            .take()
            .ok_or(SyncError::Detached)?;

        match &state.vault {
            Some(vault) => vault.restore(&state.upgrade_members())?,
            None => debug!(
                pending = self.core.barrier.remaining(),
                "detached before every chart was ready"
            ),
        }
        debug!(charts = state.members.len(), "chart group detached");
        Ok(())
    }
}

impl fmt::Debug for SynchronizationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynchronizationHandle")
            .field("state", &self.core.state.borrow())
            .field("pending", &self.core.barrier.remaining())
            .finish()
    }
}

/// Shared state behind a handle and every hook it installed.
///
/// `state` is `None` after detach. No borrow of it is held while a chart is
/// called, so hooks re-entering from inside a propagation pass always find it
/// available.
///
/// Members are held weakly: the installed hooks own the core, so a strong
/// reference back to their charts would keep a dropped group alive forever.
pub(super) struct SyncCore {
    pub(super) state: RefCell<Option<GroupState>>,
    pub(super) barrier: ReadinessBarrier,
    pub(super) zoom_guard: ReentrancyGuard,
    pub(super) selection_guard: ReentrancyGuard,
}

pub(super) struct GroupState {
    members: Rc<[Weak<dyn SyncChart>]>,
    options: SyncOptions,
    vault: Option<Rc<CallbackVault>>,
}

impl GroupState {
    /// Live charts indexed like the group; dropped charts are `None`.
    fn upgrade_members(&self) -> Vec<Option<ChartRef>> {
        self.members.iter().map(Weak::upgrade).collect()
    }
}

impl fmt::Debug for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self
            .members
            .iter()
            .filter(|member| member.strong_count() > 0)
            .count();
        f.debug_struct("GroupState")
            .field("members", &self.members.len())
            .field("live", &live)
            .field("options", &self.options)
            .field("activated", &self.vault.is_some())
            .finish()
    }
}

/// Everything a hook needs for one event, with members upgraded.
pub(super) struct ActiveGroup {
    members: Vec<Option<ChartRef>>,
    options: SyncOptions,
    pub(super) vault: Rc<CallbackVault>,
}

impl ActiveGroup {
    pub(super) fn chart(&self, index: usize) -> Option<&ChartRef> {
        self.members.get(index).and_then(Option::as_ref)
    }

    /// Charts still alive, with their position in the group.
    pub(super) fn live_charts(&self) -> impl Iterator<Item = (usize, &ChartRef)> {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(index, member)| member.as_ref().map(|chart| (index, chart)))
    }

    pub(super) fn options(&self) -> SyncOptions {
        self.options
    }
}

impl SyncCore {
    fn new(group: &ChartGroup) -> Self {
        let members = group.charts().iter().map(Rc::downgrade).collect();
        Self {
            barrier: ReadinessBarrier::new(group.len()),
            state: RefCell::new(Some(GroupState {
                members,
                options: group.options(),
                vault: None,
            })),
            zoom_guard: ReentrancyGuard::new(),
            selection_guard: ReentrancyGuard::new(),
        }
    }

    /// Snapshot of the activated group for one hook invocation.
    pub(super) fn active_group(&self) -> SyncResult<ActiveGroup> {
        let state = self.state.borrow();
        let state = state.as_ref().ok_or(SyncError::Detached)?;
        let vault = state.vault.clone().ok_or(SyncError::Detached)?;
        Ok(ActiveGroup {
            members: state.upgrade_members(),
            options: state.options,
            vault,
        })
    }

    fn on_chart_ready(self: &Rc<Self>, index: usize) -> SyncResult<()> {
        if self.state.borrow().is_none() {
            warn!(index, "chart became ready after detach; ignoring");
            return Ok(());
        }
        if !self.barrier.arrive(index) {
            debug!(
                index,
                remaining = self.barrier.remaining(),
                "chart ready; waiting for the rest of the group"
            );
            return Ok(());
        }
        self.activate()
    }

    fn activate(self: &Rc<Self>) -> SyncResult<()> {
        let (members, options) = match self.state.borrow().as_ref() {
            Some(state) => (state.upgrade_members(), state.options),
            None => return Ok(()),
        };

        let vault = Rc::new(CallbackVault::capture(&members));
        if let Some(state) = self.state.borrow_mut().as_mut() {
            state.vault = Some(vault);
        }

        for (index, member) in members.iter().enumerate() {
            let Some(chart) = member else {
                trace!(index, "chart dropped before activation; skipping");
                continue;
            };
            let mut patch = OptionsPatch::default();
            if options.zoom {
                patch = patch.with_draw_hook(Some(self.draw_hook(index)));
            }
            if options.selection {
                patch = patch
                    .with_highlight_hook(Some(self.highlight_hook(index)))
                    .with_unhighlight_hook(Some(self.unhighlight_hook(index)));
            }
            if patch.is_empty() {
                continue;
            }
            chart.update_options(patch, true)?;
        }

        debug!(
            charts = members.len(),
            zoom = options.zoom,
            selection = options.selection,
            range = options.range,
            "chart group synchronized"
        );
        Ok(())
    }
}
