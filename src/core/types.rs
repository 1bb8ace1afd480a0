use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::{GraphError, GraphResult};

/// Pixel size of the plot surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> GraphResult<Self> {
        if !self.is_valid() {
            return Err(GraphError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// One timestamped sample (epoch milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> GraphResult<Self> {
        Ok(Self {
            timestamp: datetime_to_unix_millis(time),
            value: decimal_to_f64(value, "value")?,
        })
    }
}

/// Visible time span in epoch milliseconds.
///
/// A window with `end <= start` is the "no data" window: it is representable
/// (the host clears data by collapsing the window) but never displayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    #[must_use]
    pub fn span(self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_displayable(self) -> bool {
        self.end > self.start
    }

    #[must_use]
    pub fn shifted(self, delta: i64) -> Self {
        Self {
            start: self.start.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }

    /// Window padded by one full span on each side.
    #[must_use]
    pub fn padded(self) -> Self {
        let span = self.span();
        Self {
            start: self.start.saturating_sub(span),
            end: self.end.saturating_add(span),
        }
    }
}

/// Value axis domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> GraphResult<Self> {
        Self { min, max }.validate()
    }

    pub fn validate(self) -> GraphResult<Self> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GraphError::InvalidConfig(
                "value range bounds must be finite".to_owned(),
            ));
        }
        if self.min >= self.max {
            return Err(GraphError::InvalidConfig(format!(
                "value range minimum ({}) must be lower than maximum ({})",
                self.min, self.max
            )));
        }
        Ok(self)
    }

    #[must_use]
    pub fn span(self) -> f32 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

/// First and last fetched samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataExtent {
    pub first: DataPoint,
    pub last: DataPoint,
}

impl DataExtent {
    /// Returns `None` for an empty slice. Assumes ascending timestamps.
    #[must_use]
    pub fn from_points(points: &[DataPoint]) -> Option<Self> {
        Some(Self {
            first: *points.first()?,
            last: *points.last()?,
        })
    }

    #[must_use]
    pub fn span(self) -> i64 {
        self.last.timestamp.saturating_sub(self.first.timestamp)
    }

    /// `true` when the extent is no wider than `window` ("data fits").
    #[must_use]
    pub fn fits_within(self, window: TimeWindow) -> bool {
        self.span() <= window.span()
    }
}
