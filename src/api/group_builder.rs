use std::fmt;
use std::rc::Rc;

use crate::chart::ChartRef;
use crate::core::SyncOptions;
use crate::error::{SyncError, SyncResult};

/// Validated, immutable set of charts kept in lock-step.
///
/// Holds at least two distinct charts. Order only matters for bookkeeping:
/// propagation visits charts in this order.
#[derive(Clone)]
pub struct ChartGroup {
    charts: Rc<[ChartRef]>,
    options: SyncOptions,
}

impl ChartGroup {
    #[must_use]
    pub fn charts(&self) -> &[ChartRef] {
        &self.charts
    }

    #[must_use]
    pub fn options(&self) -> SyncOptions {
        self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl fmt::Debug for ChartGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartGroup")
            .field("charts", &self.charts.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Typed builder for a [`ChartGroup`].
///
/// Nothing is read from or written to a chart here; validation is purely
/// structural.
#[derive(Default)]
pub struct GroupBuilder {
    charts: Vec<ChartRef>,
    options: Option<SyncOptions>,
}

impl GroupBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn chart(mut self, chart: ChartRef) -> Self {
        self.charts.push(chart);
        self
    }

    #[must_use]
    pub fn charts(mut self, charts: impl IntoIterator<Item = ChartRef>) -> Self {
        self.charts.extend(charts);
        self
    }

    #[must_use]
    pub fn options(mut self, options: SyncOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn build(self) -> SyncResult<ChartGroup> {
        if self.charts.len() < 2 {
            return Err(SyncError::InvalidArgument(
                "need two or more charts".to_owned(),
            ));
        }

        for (position, chart) in self.charts.iter().enumerate() {
            if self.charts[..position]
                .iter()
                .any(|earlier| Rc::ptr_eq(earlier, chart))
            {
                return Err(SyncError::InvalidArgument(format!(
                    "chart at position {position} appears more than once"
                )));
            }
        }

        Ok(ChartGroup {
            charts: self.charts.into(),
            options: self.options.unwrap_or_default(),
        })
    }
}
