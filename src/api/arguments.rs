use std::fmt;

use serde_json::Value;

use crate::chart::ChartRef;
use crate::core::SyncOptions;
use crate::error::{SyncError, SyncResult};

use super::{ChartGroup, GroupBuilder, SynchronizationHandle, Synchronizer};

/// One loosely typed argument of [`synchronize`].
///
/// Two call shapes are accepted:
/// - positional: `Chart, Chart, ..., [Value(options)]`
/// - sequence: `Charts([..]), [Value(options)]`
pub enum SyncArgument {
    Chart(ChartRef),
    Charts(Vec<ChartRef>),
    /// Options object or any other host value.
    Value(Value),
}

impl SyncArgument {
    /// Serializes typed options into the object form accepted as trailing argument.
    #[must_use]
    pub fn options(options: SyncOptions) -> Self {
        Self::Value(serde_json::json!({
            "selection": options.selection,
            "zoom": options.zoom,
            "range": options.range,
        }))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Chart(_) => "chart",
            Self::Charts(_) => "chart sequence",
            Self::Value(Value::Object(_)) => "options object",
            Self::Value(_) => "value",
        }
    }
}

impl fmt::Debug for SyncArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chart(_) => f.write_str("Chart(..)"),
            Self::Charts(charts) => write!(f, "Charts(len={})", charts.len()),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<ChartRef> for SyncArgument {
    fn from(chart: ChartRef) -> Self {
        Self::Chart(chart)
    }
}

impl From<Vec<ChartRef>> for SyncArgument {
    fn from(charts: Vec<ChartRef>) -> Self {
        Self::Charts(charts)
    }
}

impl From<Value> for SyncArgument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<SyncOptions> for SyncArgument {
    fn from(options: SyncOptions) -> Self {
        Self::options(options)
    }
}

/// Synchronizes a group of charts given in either call shape.
///
/// All argument validation happens before any chart is touched.
pub fn synchronize(args: Vec<SyncArgument>) -> SyncResult<SynchronizationHandle> {
    let group = parse_arguments(args)?;
    Synchronizer::build(group)
}

/// Reduces the loose call shapes to a validated [`ChartGroup`].
pub fn parse_arguments(args: Vec<SyncArgument>) -> SyncResult<ChartGroup> {
    let mut args = args.into_iter();
    let Some(first) = args.next() else {
        return Err(SyncError::InvalidArgument(
            "need at least one argument".to_owned(),
        ));
    };
    let mut rest: Vec<SyncArgument> = args.collect();

    let mut builder = GroupBuilder::new();
    let trailing = match first {
        SyncArgument::Chart(chart) => {
            builder = builder.chart(chart);
            let trailing_is_chart = matches!(rest.last(), Some(SyncArgument::Chart(_)) | None);
            let trailing = if trailing_is_chart { None } else { rest.pop() };
            for (offset, arg) in rest.into_iter().enumerate() {
                match arg {
                    SyncArgument::Chart(chart) => builder = builder.chart(chart),
                    other => {
                        return Err(SyncError::InvalidArgument(format!(
                            "argument {} must be a chart, got {}",
                            offset + 1,
                            other.kind()
                        )));
                    }
                }
            }
            trailing
        }
        SyncArgument::Charts(charts) => {
            builder = builder.charts(charts);
            if rest.len() > 1 {
                return Err(SyncError::InvalidArgument(format!(
                    "expected a chart sequence and at most one options object, \
                     got {} extra arguments",
                    rest.len()
                )));
            }
            rest.pop()
        }
        other @ SyncArgument::Value(_) => {
            return Err(SyncError::InvalidArgument(format!(
                "first argument must be a chart or a sequence of charts, got {}",
                other.kind()
            )));
        }
    };

    match trailing {
        Some(SyncArgument::Value(value)) => {
            builder = builder.options(SyncOptions::from_json_value(&value)?);
        }
        Some(_) => {
            return Err(SyncError::InvalidArgument(
                "last argument must be a chart or options object".to_owned(),
            ));
        }
        None => {}
    }

    builder.build()
}
