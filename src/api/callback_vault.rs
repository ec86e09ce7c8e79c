use tracing::trace;

use crate::chart::{
    ChartHooks, ChartRef, DrawEvent, HighlightEvent, OptionsPatch, UnhighlightEvent,
};
use crate::error::SyncResult;

/// Hooks each chart had in place right before synchronization took over.
///
/// Indexed like the group. Captured once at activation, then used both for
/// pass-through from the replacement hooks and for restoration on detach.
/// A chart dropped before activation gets an empty snapshot.
#[derive(Debug)]
pub(super) struct CallbackVault {
    snapshots: Vec<ChartHooks>,
}

impl CallbackVault {
    pub(super) fn capture(charts: &[Option<ChartRef>]) -> Self {
        let snapshots: Vec<ChartHooks> = charts
            .iter()
            .map(|chart| chart.as_ref().map(|chart| chart.hooks()).unwrap_or_default())
            .collect();
        trace!(charts = snapshots.len(), "captured chart hooks");
        Self { snapshots }
    }

    pub(super) fn snapshot(&self, index: usize) -> Option<&ChartHooks> {
        self.snapshots.get(index)
    }

    pub(super) fn invoke_draw(&self, index: usize, event: &DrawEvent) -> SyncResult<()> {
        match self.snapshot(index).and_then(|hooks| hooks.draw.as_ref()) {
            Some(hook) => hook(event),
            None => Ok(()),
        }
    }

    pub(super) fn invoke_highlight(&self, index: usize, event: &HighlightEvent) -> SyncResult<()> {
        match self.snapshot(index).and_then(|hooks| hooks.highlight.as_ref()) {
            Some(hook) => hook(event),
            None => Ok(()),
        }
    }

    pub(super) fn invoke_unhighlight(
        &self,
        index: usize,
        event: &UnhighlightEvent,
    ) -> SyncResult<()> {
        match self
            .snapshot(index)
            .and_then(|hooks| hooks.unhighlight.as_ref())
        {
            Some(hook) => hook(event),
            None => Ok(()),
        }
    }

    /// Writes every captured slot back onto its chart, whether or not a
    /// protocol ever replaced it. Charts dropped in the meantime are skipped.
    pub(super) fn restore(&self, charts: &[Option<ChartRef>]) -> SyncResult<()> {
        for (chart, hooks) in charts.iter().zip(&self.snapshots) {
            if let Some(chart) = chart {
                chart.update_options(OptionsPatch::restore_hooks(hooks), true)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::chart::{DrawHook, MemoryChart, SyncChart};

    #[test]
    fn missing_hooks_are_captured_as_absent() {
        let chart: ChartRef = Rc::new(MemoryChart::new("a", vec![0.0]));
        let vault = CallbackVault::capture(&[Some(chart), None]);
        let hooks = vault.snapshot(0).expect("snapshot");
        assert!(hooks.draw.is_none());
        assert!(hooks.highlight.is_none());
        assert!(hooks.unhighlight.is_none());
        assert!(vault.snapshot(1).is_some_and(|hooks| hooks.draw.is_none()));
        assert!(vault.snapshot(2).is_none());
        vault
            .invoke_draw(0, &DrawEvent::default())
            .expect("absent hook is skipped");
    }

    #[test]
    fn restore_puts_back_identical_hooks() {
        let memory = Rc::new(MemoryChart::new("a", vec![0.0]));
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let original: DrawHook = Rc::new(move |_event: &DrawEvent| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        memory
            .update_options(
                OptionsPatch::default().with_draw_hook(Some(original.clone())),
                true,
            )
            .expect("install");

        let chart: ChartRef = memory.clone();
        let vault = CallbackVault::capture(&[Some(chart.clone())]);
        vault
            .invoke_draw(0, &DrawEvent::default())
            .expect("pass-through");
        assert_eq!(calls.get(), 1);

        let replacement: DrawHook = Rc::new(|_event: &DrawEvent| Ok(()));
        memory
            .update_options(OptionsPatch::default().with_draw_hook(Some(replacement)), true)
            .expect("replace");
        vault.restore(&[Some(chart)]).expect("restore");

        let restored = memory.draw_hook().expect("restored hook");
        assert!(Rc::ptr_eq(&restored, &original));
        assert!(memory.highlight_hook().is_none());
    }
}
