use std::rc::Rc;

use tracing::trace;

use crate::chart::{DrawEvent, DrawHook, OptionsPatch};
use crate::error::{SyncError, SyncResult};

use super::controller::SyncCore;

impl SyncCore {
    /// Replacement draw hook for the chart at `origin`.
    pub(super) fn draw_hook(self: &Rc<Self>, origin: usize) -> DrawHook {
        let core = Rc::clone(self);
        Rc::new(move |event: &DrawEvent| core.propagate_viewport(origin, event))
    }

    /// Mirrors the viewport of chart `origin` onto the rest of the group.
    ///
    /// Initial draws and draws caused by an ongoing pass only run the chart's
    /// own original hook. Charts already showing the target window are
    /// skipped, which also keeps nested redraws from cascading.
    pub(super) fn propagate_viewport(&self, origin: usize, event: &DrawEvent) -> SyncResult<()> {
        let active = self.active_group()?;
        let pass = if event.is_initial {
            None
        } else {
            self.zoom_guard.try_enter()
        };
        let Some(_pass) = pass else {
            return active.vault.invoke_draw(origin, event);
        };

        let source = active.chart(origin).ok_or_else(|| {
            SyncError::Chart(format!("draw event from unknown chart index {origin}"))
        })?;
        let date_window = source.x_axis_range();
        let value_range = active.options().range.then(|| source.y_axis_range());

        let mut applied = 0_usize;
        for (index, chart) in active.live_charts() {
            if index == origin {
                continue;
            }
            let window_matches = chart.date_window() == Some(date_window);
            let range_matches = value_range.is_none() || chart.value_range() == value_range;
            if window_matches && range_matches {
                trace!(origin, target = index, "viewport already in sync");
                continue;
            }
            trace!(
                origin,
                target = index,
                min = date_window.min,
                max = date_window.max,
                "applying viewport"
            );
            chart.update_options(OptionsPatch::viewport(date_window, value_range), false)?;
            applied += 1;
        }

        active.vault.invoke_draw(origin, event)?;
        trace!(origin, applied, "viewport propagated");
        Ok(())
    }
}
