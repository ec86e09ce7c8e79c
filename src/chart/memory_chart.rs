use std::cell::RefCell;
use std::mem;

use smallvec::SmallVec;
use tracing::trace;

use crate::core::{HitPoint, Range};
use crate::error::{SyncError, SyncResult};

use super::{
    ChartHooks, DrawEvent, DrawHook, HighlightEvent, HighlightHook, OptionsPatch, ReadyCallback,
    SyncChart, UnhighlightEvent, UnhighlightHook,
};

/// Row/series currently highlighted on a [`MemoryChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub row: usize,
    pub series_name: Option<String>,
}

/// Headless chart used by tests and by hosts that drive synchronization
/// without a widget toolkit.
///
/// It keeps just enough state to honor the [`SyncChart`] contract: x samples,
/// optional named series, the configured viewport, hook slots, selection and
/// readiness. Hooks fire synchronously, exactly where a real widget would fire
/// them. Programmatic `set_selection`/`clear_selection` notify the installed
/// hooks the same way pointer-driven highlighting does.
#[derive(Debug)]
pub struct MemoryChart {
    label: String,
    state: RefCell<MemoryChartState>,
}

struct MemoryChartState {
    x_values: Vec<f64>,
    series: Vec<(String, Vec<f64>)>,
    y_extent: Range,
    date_window: Option<Range>,
    value_range: Option<Range>,
    hooks: ChartHooks,
    selection: Option<Selection>,
    rendered: bool,
    pending_ready: Vec<ReadyCallback>,
    draw_count: usize,
    viewport_update_count: usize,
}

impl std::fmt::Debug for MemoryChartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryChartState")
            .field("rows", &self.x_values.len())
            .field("series", &self.series.len())
            .field("date_window", &self.date_window)
            .field("value_range", &self.value_range)
            .field("hooks", &self.hooks)
            .field("selection", &self.selection)
            .field("rendered", &self.rendered)
            .field("pending_ready", &self.pending_ready.len())
            .finish()
    }
}

impl MemoryChart {
    #[must_use]
    pub fn new(label: impl Into<String>, x_values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            state: RefCell::new(MemoryChartState {
                x_values,
                series: Vec::new(),
                y_extent: Range::new(0.0, 1.0),
                date_window: None,
                value_range: None,
                hooks: ChartHooks::default(),
                selection: None,
                rendered: false,
                pending_ready: Vec::new(),
                draw_count: 0,
                viewport_update_count: 0,
            }),
        }
    }

    /// Adds a named series; `values` are indexed by row.
    ///
    /// The y extent is widened to cover the new values.
    #[must_use]
    pub fn with_series(self, name: impl Into<String>, values: Vec<f64>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let has_series = !state.series.is_empty();
            if let Some(extent) = Range::enclosing(&values) {
                state.y_extent = if has_series {
                    Range::new(
                        state.y_extent.min.min(extent.min),
                        state.y_extent.max.max(extent.max),
                    )
                } else {
                    extent
                };
            }
            state.series.push((name.into(), values));
        }
        self
    }

    /// Overrides the y extent reported when no value range is configured.
    #[must_use]
    pub fn with_y_extent(self, extent: Range) -> Self {
        self.state.borrow_mut().y_extent = extent;
        self
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.state.borrow().rendered
    }

    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.state.borrow().draw_count
    }

    /// Number of `update_options` calls that carried a viewport change.
    #[must_use]
    pub fn viewport_update_count(&self) -> usize {
        self.state.borrow().viewport_update_count
    }

    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.state.borrow().selection.clone()
    }

    /// Draws the chart. The first call is the initial draw and releases every
    /// pending ready callback afterwards.
    pub fn render(&self) -> SyncResult<()> {
        let (initial, hook) = {
            let mut state = self.state.borrow_mut();
            let initial = !state.rendered;
            state.rendered = true;
            state.draw_count += 1;
            (initial, state.hooks.draw.clone())
        };
        trace!(chart = %self.label, initial, "draw");

        if let Some(hook) = hook {
            hook(&DrawEvent {
                is_initial: initial,
            })?;
        }

        if initial {
            let pending = mem::take(&mut self.state.borrow_mut().pending_ready);
            for callback in pending {
                callback()?;
            }
        }
        Ok(())
    }

    /// Simulates a user pan/zoom: sets the viewport, then redraws.
    pub fn set_viewport(&self, date_window: Range, value_range: Option<Range>) -> SyncResult<()> {
        {
            let mut state = self.state.borrow_mut();
            state.date_window = Some(date_window);
            if value_range.is_some() {
                state.value_range = value_range;
            }
        }
        self.render()
    }

    /// Simulates the pointer hovering `row`.
    pub fn highlight_row(&self, row: usize, series_name: Option<&str>) -> SyncResult<()> {
        self.select_and_notify(row, series_name)
    }

    /// Simulates the pointer leaving the chart.
    pub fn unhighlight(&self) -> SyncResult<()> {
        let hook = {
            let mut state = self.state.borrow_mut();
            state.selection = None;
            state.hooks.unhighlight.clone()
        };
        match hook {
            Some(hook) => hook(&UnhighlightEvent::default()),
            None => Ok(()),
        }
    }

    fn select_and_notify(&self, row: usize, series_name: Option<&str>) -> SyncResult<()> {
        let (event, hook) = {
            let mut state = self.state.borrow_mut();
            let Some(x) = state.x_values.get(row).copied() else {
                return Err(SyncError::Chart(format!(
                    "row {row} is out of range for chart `{}` with {} rows",
                    self.label,
                    state.x_values.len()
                )));
            };
            let points: SmallVec<[HitPoint; 4]> = state
                .series
                .iter()
                .filter_map(|(name, values)| {
                    values.get(row).map(|y| HitPoint::new(x, *y, name.as_str()))
                })
                .collect();
            state.selection = Some(Selection {
                row,
                series_name: series_name.map(str::to_owned),
            });
            let event = HighlightEvent {
                x,
                points,
                row,
                series_name: series_name.map(str::to_owned),
            };
            (event, state.hooks.highlight.clone())
        };
        match hook {
            Some(hook) => hook(&event),
            None => Ok(()),
        }
    }
}

impl SyncChart for MemoryChart {
    fn on_ready(&self, callback: ReadyCallback) -> SyncResult<()> {
        if self.is_rendered() {
            return callback();
        }
        self.state.borrow_mut().pending_ready.push(callback);
        Ok(())
    }

    fn draw_hook(&self) -> Option<DrawHook> {
        self.state.borrow().hooks.draw.clone()
    }

    fn highlight_hook(&self) -> Option<HighlightHook> {
        self.state.borrow().hooks.highlight.clone()
    }

    fn unhighlight_hook(&self) -> Option<UnhighlightHook> {
        self.state.borrow().hooks.unhighlight.clone()
    }

    fn update_options(&self, patch: OptionsPatch, suppress_redraw: bool) -> SyncResult<()> {
        let redraw = {
            let mut state = self.state.borrow_mut();
            if patch.touches_viewport() {
                state.viewport_update_count += 1;
            }
            if let Some(window) = patch.date_window {
                state.date_window = Some(window);
            }
            if let Some(range) = patch.value_range {
                state.value_range = Some(range);
            }
            if let Some(hook) = patch.draw_hook {
                state.hooks.draw = hook;
            }
            if let Some(hook) = patch.highlight_hook {
                state.hooks.highlight = hook;
            }
            if let Some(hook) = patch.unhighlight_hook {
                state.hooks.unhighlight = hook;
            }
            !suppress_redraw && state.rendered
        };

        if redraw { self.render() } else { Ok(()) }
    }

    fn x_axis_range(&self) -> Range {
        let state = self.state.borrow();
        state
            .date_window
            .or_else(|| Range::enclosing(&state.x_values))
            .unwrap_or(Range::new(0.0, 1.0))
    }

    fn y_axis_range(&self) -> Range {
        let state = self.state.borrow();
        state.value_range.unwrap_or(state.y_extent)
    }

    fn date_window(&self) -> Option<Range> {
        self.state.borrow().date_window
    }

    fn value_range(&self) -> Option<Range> {
        self.state.borrow().value_range
    }

    fn find_row_for_x(&self, x: f64) -> Option<usize> {
        self.state.borrow().x_values.iter().position(|value| *value == x)
    }

    fn set_selection(&self, row: usize, series_name: Option<&str>) -> SyncResult<()> {
        self.select_and_notify(row, series_name)
    }

    fn clear_selection(&self) -> SyncResult<()> {
        self.unhighlight()
    }
}
