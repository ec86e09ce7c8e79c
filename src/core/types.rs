use serde::{Deserialize, Serialize};

/// Closed `[min, max]` interval on one chart axis.
///
/// Used for both the x viewport (date window) and the y viewport (value
/// range). Equality is exact: two windows are the same only when both bounds
/// compare equal, which is what lets propagation skip charts that already
/// show the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Smallest range covering every value, or `None` for an empty slice.
    #[must_use]
    pub fn enclosing(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied().filter(|value| value.is_finite());
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |range, value| {
            Self::new(range.min.min(value), range.max.max(value))
        }))
    }
}

impl From<(f64, f64)> for Range {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// One series sample under the pointer when a highlight fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitPoint {
    pub x: f64,
    pub y: f64,
    pub series_name: String,
}

impl HitPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, series_name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            series_name: series_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_ignores_non_finite_samples() {
        let range = Range::enclosing(&[4.0, f64::NAN, -2.0, 9.5]).expect("range");
        assert_eq!(range, Range::new(-2.0, 9.5));
        assert_eq!(range.span(), 11.5);
    }

    #[test]
    fn enclosing_empty_slice_is_none() {
        assert!(Range::enclosing(&[]).is_none());
        assert!(Range::enclosing(&[f64::INFINITY]).is_none());
    }
}
