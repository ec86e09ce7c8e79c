use std::cell::Cell;

use serde::{Deserialize, Serialize};

/// State of one propagation protocol across the whole chart group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    Idle,
    /// A change from one chart is being applied to the others.
    Propagating,
}

/// Two-state automaton that suppresses feedback while a propagation pass runs.
///
/// Applying a viewport or selection to another chart synchronously re-enters
/// that chart's hook; the guard makes the nested call a no-op. Entering hands
/// out a [`PropagationPass`] that returns the guard to `Idle` when dropped,
/// including when a chart call fails mid-pass.
#[derive(Debug)]
pub struct ReentrancyGuard {
    phase: Cell<SyncPhase>,
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self {
            phase: Cell::new(SyncPhase::Idle),
        }
    }
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    #[must_use]
    pub fn is_propagating(&self) -> bool {
        self.phase.get() == SyncPhase::Propagating
    }

    /// Moves `Idle -> Propagating`. Returns `None` when a pass is already running.
    #[must_use]
    pub fn try_enter(&self) -> Option<PropagationPass<'_>> {
        if self.is_propagating() {
            return None;
        }
        self.phase.set(SyncPhase::Propagating);
        Some(PropagationPass { guard: self })
    }
}

/// Live propagation pass; dropping it ends the pass.
#[derive(Debug)]
pub struct PropagationPass<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for PropagationPass<'_> {
    fn drop(&mut self) {
        self.guard.phase.set(SyncPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let guard = ReentrancyGuard::new();
        assert_eq!(guard.phase(), SyncPhase::Idle);
        assert!(!guard.is_propagating());
    }

    #[test]
    fn nested_enter_is_refused_until_pass_ends() {
        let guard = ReentrancyGuard::new();
        let pass = guard.try_enter().expect("first pass");
        assert_eq!(guard.phase(), SyncPhase::Propagating);
        assert!(guard.try_enter().is_none());

        drop(pass);
        assert_eq!(guard.phase(), SyncPhase::Idle);
        assert!(guard.try_enter().is_some());
    }

    #[test]
    fn early_return_releases_guard() {
        fn failing_pass(guard: &ReentrancyGuard) -> Result<(), &'static str> {
            let _pass = guard.try_enter().ok_or("busy")?;
            Err("chart failed")
        }

        let guard = ReentrancyGuard::new();
        assert_eq!(failing_pass(&guard), Err("chart failed"));
        assert_eq!(guard.phase(), SyncPhase::Idle);
    }
}
