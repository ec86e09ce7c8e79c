//! Collaborator contract for charts taking part in a synchronized group.
//!
//! The synchronization engine never renders or owns a chart. It only needs the
//! narrow capability set of [`SyncChart`]: readiness notification, access to
//! the three event hook slots, option patching, viewport queries and
//! point-level selection.

mod memory_chart;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{HitPoint, Range};
use crate::error::SyncResult;

pub use memory_chart::{MemoryChart, Selection};

/// Shared reference to a chart. Group membership compares these by pointer.
pub type ChartRef = Rc<dyn SyncChart>;

pub type DrawHook = Rc<dyn Fn(&DrawEvent) -> SyncResult<()>>;
pub type HighlightHook = Rc<dyn Fn(&HighlightEvent) -> SyncResult<()>>;
pub type UnhighlightHook = Rc<dyn Fn(&UnhighlightEvent) -> SyncResult<()>>;

/// One-shot readiness notification. Errors surface to whoever fired it.
pub type ReadyCallback = Box<dyn FnOnce() -> SyncResult<()>>;

/// Payload of a draw hook invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawEvent {
    /// `true` only for the chart's very first draw.
    pub is_initial: bool,
}

/// Payload of a highlight hook invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightEvent {
    /// Position on the x domain under the pointer.
    pub x: f64,
    pub points: SmallVec<[HitPoint; 4]>,
    /// Row index local to the chart that fired the event.
    pub row: usize,
    pub series_name: Option<String>,
}

/// Payload of an unhighlight hook invocation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnhighlightEvent {
    /// Last pointer position in canvas pixels, when the pointer caused it.
    pub pointer: Option<(f64, f64)>,
}

/// The three hook slots of one chart.
///
/// `None` means the slot holds no hook at all, which is not the same as a
/// hook that does nothing.
#[derive(Clone, Default)]
pub struct ChartHooks {
    pub draw: Option<DrawHook>,
    pub highlight: Option<HighlightHook>,
    pub unhighlight: Option<UnhighlightHook>,
}

impl fmt::Debug for ChartHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartHooks")
            .field("draw", &self.draw.is_some())
            .field("highlight", &self.highlight.is_some())
            .field("unhighlight", &self.unhighlight.is_some())
            .finish()
    }
}

/// Partial option update applied through [`SyncChart::update_options`].
///
/// For hook slots the outer `Option` selects whether the slot is written at
/// all; `Some(None)` clears it.
#[derive(Clone, Default)]
pub struct OptionsPatch {
    pub date_window: Option<Range>,
    pub value_range: Option<Range>,
    pub draw_hook: Option<Option<DrawHook>>,
    pub highlight_hook: Option<Option<HighlightHook>>,
    pub unhighlight_hook: Option<Option<UnhighlightHook>>,
}

impl OptionsPatch {
    /// Viewport-only patch. `value_range: None` leaves the y viewport alone.
    #[must_use]
    pub fn viewport(date_window: Range, value_range: Option<Range>) -> Self {
        Self {
            date_window: Some(date_window),
            value_range,
            ..Self::default()
        }
    }

    /// Writes all three hook slots back to exactly the given values.
    #[must_use]
    pub fn restore_hooks(hooks: &ChartHooks) -> Self {
        Self {
            draw_hook: Some(hooks.draw.clone()),
            highlight_hook: Some(hooks.highlight.clone()),
            unhighlight_hook: Some(hooks.unhighlight.clone()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_draw_hook(mut self, hook: Option<DrawHook>) -> Self {
        self.draw_hook = Some(hook);
        self
    }

    #[must_use]
    pub fn with_highlight_hook(mut self, hook: Option<HighlightHook>) -> Self {
        self.highlight_hook = Some(hook);
        self
    }

    #[must_use]
    pub fn with_unhighlight_hook(mut self, hook: Option<UnhighlightHook>) -> Self {
        self.unhighlight_hook = Some(hook);
        self
    }

    #[must_use]
    pub fn touches_viewport(&self) -> bool {
        self.date_window.is_some() || self.value_range.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.touches_viewport()
            && self.draw_hook.is_none()
            && self.highlight_hook.is_none()
            && self.unhighlight_hook.is_none()
    }
}

impl fmt::Debug for OptionsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsPatch")
            .field("date_window", &self.date_window)
            .field("value_range", &self.value_range)
            .field("draw_hook", &self.draw_hook.as_ref().map(Option::is_some))
            .field(
                "highlight_hook",
                &self.highlight_hook.as_ref().map(Option::is_some),
            )
            .field(
                "unhighlight_hook",
                &self.unhighlight_hook.as_ref().map(Option::is_some),
            )
            .finish()
    }
}

/// Capability contract a chart widget exposes to the synchronization engine.
///
/// All methods take `&self`: charts are shared between the host and the
/// engine, and hooks re-enter them synchronously while a propagation pass is
/// running. Implementations must not hold interior borrows while invoking a
/// hook or a ready callback.
pub trait SyncChart {
    /// Registers a one-shot callback fired once the first render completed.
    ///
    /// Fires immediately when the chart has already rendered.
    fn on_ready(&self, callback: ReadyCallback) -> SyncResult<()>;

    fn draw_hook(&self) -> Option<DrawHook>;
    fn highlight_hook(&self) -> Option<HighlightHook>;
    fn unhighlight_hook(&self) -> Option<UnhighlightHook>;

    /// Applies option values, including hooks.
    ///
    /// With `suppress_redraw` the chart must not re-render as a side effect.
    fn update_options(&self, patch: OptionsPatch, suppress_redraw: bool) -> SyncResult<()>;

    /// Currently displayed x viewport.
    fn x_axis_range(&self) -> Range;
    /// Currently displayed y viewport.
    fn y_axis_range(&self) -> Range;

    /// Explicitly configured date window, if any.
    fn date_window(&self) -> Option<Range>;
    /// Explicitly configured value range, if any.
    fn value_range(&self) -> Option<Range>;

    /// Maps an x-domain value to a local row index.
    fn find_row_for_x(&self, x: f64) -> Option<usize>;

    fn set_selection(&self, row: usize, series_name: Option<&str>) -> SyncResult<()>;
    fn clear_selection(&self) -> SyncResult<()>;

    /// Reads all three hook slots at once.
    fn hooks(&self) -> ChartHooks {
        ChartHooks {
            draw: self.draw_hook(),
            highlight: self.highlight_hook(),
            unhighlight: self.unhighlight_hook(),
        }
    }
}
