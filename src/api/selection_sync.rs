use std::rc::Rc;

use tracing::trace;

use crate::chart::{HighlightEvent, HighlightHook, UnhighlightEvent, UnhighlightHook};
use crate::error::SyncResult;

use super::controller::SyncCore;

impl SyncCore {
    pub(super) fn highlight_hook(self: &Rc<Self>, origin: usize) -> HighlightHook {
        let core = Rc::clone(self);
        Rc::new(move |event: &HighlightEvent| core.propagate_highlight(origin, event))
    }

    pub(super) fn unhighlight_hook(self: &Rc<Self>, origin: usize) -> UnhighlightHook {
        let core = Rc::clone(self);
        Rc::new(move |event: &UnhighlightEvent| core.propagate_unhighlight(origin, event))
    }

    /// Selects the row at the same x position on every other chart.
    ///
    /// Charts without a row at exactly that x keep their current selection.
    /// Highlights raised by the selections applied here are ignored.
    pub(super) fn propagate_highlight(
        &self,
        origin: usize,
        event: &HighlightEvent,
    ) -> SyncResult<()> {
        let active = self.active_group()?;
        let Some(_pass) = self.selection_guard.try_enter() else {
            return Ok(());
        };

        for (index, chart) in active.live_charts() {
            if index == origin {
                active.vault.invoke_highlight(origin, event)?;
                continue;
            }
            match chart.find_row_for_x(event.x) {
                Some(row) => {
                    trace!(origin, target = index, row, "mirroring highlight");
                    chart.set_selection(row, event.series_name.as_deref())?;
                }
                None => trace!(origin, target = index, x = event.x, "no row at x"),
            }
        }
        Ok(())
    }

    /// Clears the selection on every other chart.
    pub(super) fn propagate_unhighlight(
        &self,
        origin: usize,
        event: &UnhighlightEvent,
    ) -> SyncResult<()> {
        let active = self.active_group()?;
        let Some(_pass) = self.selection_guard.try_enter() else {
            return Ok(());
        };

        for (index, chart) in active.live_charts() {
            if index == origin {
                active.vault.invoke_unhighlight(origin, event)?;
            } else {
                chart.clear_selection()?;
            }
        }
        Ok(())
    }
}
