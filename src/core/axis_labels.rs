use serde::{Deserialize, Serialize};

/// Raw time-axis label as produced by a data provider or the labeler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeAxisLabel {
    pub timestamp: i64,
    pub text: String,
}

impl TimeAxisLabel {
    #[must_use]
    pub fn new(timestamp: i64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

/// Time-axis label placed in the current window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxisLabelEntry {
    pub timestamp: i64,
    pub text: String,
    /// Horizontal offset in pixels from the left plot edge.
    pub pixel_offset: f32,
}

/// Value-axis mid label and its vertical offset from the top plot edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueAxisLabel {
    pub value: f32,
    pub pixel_offset: f32,
}
