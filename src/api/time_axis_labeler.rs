use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, Timelike,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, TimeAxisLabel, TimeAxisLabelEntry, TimeWindow};
use crate::error::{GraphError, GraphResult};
use crate::render::LabelMarkers;

/// Horizontal nudge keeping markers clear of the plot's left border.
pub const LABEL_MARKER_NUDGE: f32 = 0.0015;
/// Clip-space height of label markers, measured from the bottom edge.
pub const LABEL_MARKER_HEIGHT: f32 = 0.1;

/// Calendar bucket used for time-axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LabelGranularity {
    Minute,
    Hour,
    #[default]
    Day,
    /// ISO week, starting Monday.
    Week,
    Month,
}

impl LabelGranularity {
    #[must_use]
    pub fn default_format(self) -> &'static str {
        match self {
            Self::Minute | Self::Hour => "%H:%M",
            Self::Day | Self::Week | Self::Month => "%Y-%m-%d",
        }
    }
}

/// Serializable labeler setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAxisLabelConfig {
    #[serde(default)]
    pub granularity: LabelGranularity,
    /// Offset from UTC used for bucket boundaries and formatting.
    #[serde(default)]
    pub utc_offset_seconds: i32,
    /// chrono format string overriding the granularity default.
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for TimeAxisLabelConfig {
    fn default() -> Self {
        Self {
            granularity: LabelGranularity::default(),
            utc_offset_seconds: 0,
            format: None,
        }
    }
}

impl TimeAxisLabelConfig {
    #[must_use]
    pub fn new(granularity: LabelGranularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Buckets timestamps into calendar units and formats one label per bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxisLabeler {
    granularity: LabelGranularity,
    offset: FixedOffset,
    format: String,
}

impl TimeAxisLabeler {
    pub fn new(config: &TimeAxisLabelConfig) -> GraphResult<Self> {
        let offset = FixedOffset::east_opt(config.utc_offset_seconds).ok_or_else(|| {
            GraphError::InvalidConfig(format!(
                "time-axis utc offset must be within one day, got {}s",
                config.utc_offset_seconds
            ))
        })?;
        let format = config
            .format
            .clone()
            .unwrap_or_else(|| config.granularity.default_format().to_owned());
        if format.trim().is_empty() {
            return Err(GraphError::InvalidConfig(
                "time-axis label format must not be empty".to_owned(),
            ));
        }
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(GraphError::InvalidConfig(format!(
                "time-axis label format `{format}` is not a valid chrono format"
            )));
        }
        Ok(Self {
            granularity: config.granularity,
            offset,
            format,
        })
    }

    #[must_use]
    pub fn granularity(&self) -> LabelGranularity {
        self.granularity
    }

    fn local(&self, timestamp: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp_millis(timestamp).map(|utc| utc.with_timezone(&self.offset))
    }

    fn to_timestamp(&self, local: NaiveDateTime) -> Option<i64> {
        local
            .and_local_timezone(self.offset)
            .single()
            .map(|datetime| datetime.timestamp_millis())
    }

    /// Start of the bucket containing `timestamp`.
    #[must_use]
    pub fn bucket_start(&self, timestamp: i64) -> Option<i64> {
        let local = self.local(timestamp)?.naive_local();
        let truncated = match self.granularity {
            LabelGranularity::Minute => local.with_second(0)?.with_nanosecond(0)?,
            LabelGranularity::Hour => local.with_minute(0)?.with_second(0)?.with_nanosecond(0)?,
            LabelGranularity::Day => local.date().and_hms_opt(0, 0, 0)?,
            LabelGranularity::Week => {
                let date = local.date();
                let monday =
                    date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                monday.and_hms_opt(0, 0, 0)?
            }
            LabelGranularity::Month => {
                NaiveDate::from_ymd_opt(local.year(), local.month(), 1)?.and_hms_opt(0, 0, 0)?
            }
        };
        self.to_timestamp(truncated)
    }

    /// Start of the bucket following the one starting at `bucket_start`.
    #[must_use]
    pub fn next_bucket(&self, bucket_start: i64) -> Option<i64> {
        let local = self.local(bucket_start)?.naive_local();
        let next = match self.granularity {
            LabelGranularity::Minute => local.checked_add_signed(Duration::minutes(1))?,
            LabelGranularity::Hour => local.checked_add_signed(Duration::hours(1))?,
            LabelGranularity::Day => local.checked_add_signed(Duration::days(1))?,
            LabelGranularity::Week => local.checked_add_signed(Duration::weeks(1))?,
            LabelGranularity::Month => local.checked_add_months(Months::new(1))?,
        };
        self.to_timestamp(next)
    }

    #[must_use]
    pub fn format_label(&self, timestamp: i64) -> String {
        self.local(timestamp)
            .map(|local| local.format(&self.format).to_string())
            .unwrap_or_default()
    }

    /// One label per bucket that holds at least one point.
    ///
    /// Points must be ascending. Output timestamps are bucket boundaries and
    /// strictly increase.
    #[must_use]
    pub fn label_points(&self, points: &[DataPoint]) -> Vec<TimeAxisLabel> {
        let mut last_bucket: Option<i64> = None;
        let mut labels = Vec::new();
        for point in points {
            let Some(bucket) = self.bucket_start(point.timestamp) else {
                continue;
            };
            if last_bucket.is_none_or(|last| bucket > last) {
                labels.push(TimeAxisLabel::new(bucket, self.format_label(bucket)));
                last_bucket = Some(bucket);
            }
        }
        labels
    }

    /// Calendar walk: one label per bucket from the first point's bucket up
    /// to, but excluding, the last point's timestamp. Empty buckets are
    /// labeled too.
    #[must_use]
    pub fn label_span(&self, points: &[DataPoint]) -> Vec<TimeAxisLabel> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Vec::new();
        };
        let mut labels = Vec::new();
        let mut cursor = self.bucket_start(first.timestamp);
        while let Some(bucket) = cursor {
            if bucket >= last.timestamp {
                break;
            }
            labels.push(TimeAxisLabel::new(bucket, self.format_label(bucket)));
            cursor = self.next_bucket(bucket).filter(|next| *next > bucket);
        }
        labels
    }
}

/// Sorts provider labels and keeps the last text for repeated timestamps.
#[must_use]
pub fn normalize_labels(labels: Vec<TimeAxisLabel>) -> Vec<TimeAxisLabel> {
    let mut by_timestamp: IndexMap<i64, String> = IndexMap::with_capacity(labels.len());
    for label in labels {
        by_timestamp.insert(label.timestamp, label.text);
    }
    by_timestamp.sort_keys();
    by_timestamp
        .into_iter()
        .map(|(timestamp, text)| TimeAxisLabel { timestamp, text })
        .collect()
}

/// Horizontal pixel offset of `timestamp` inside `window`.
#[must_use]
pub fn label_pixel_offset(timestamp: i64, window: TimeWindow, width_px: f32) -> f32 {
    let span = window.span() as f64;
    ((1.0 - (window.end - timestamp) as f64 / span) * f64::from(width_px)) as f32
}

/// Places labels for the current window. A collapsed window places nothing.
#[must_use]
pub fn place_labels(
    labels: &[TimeAxisLabel],
    window: TimeWindow,
    width_px: f32,
) -> Vec<TimeAxisLabelEntry> {
    if !window.is_displayable() {
        return Vec::new();
    }
    labels
        .iter()
        .map(|label| TimeAxisLabelEntry {
            timestamp: label.timestamp,
            text: label.text.clone(),
            pixel_offset: label_pixel_offset(label.timestamp, window, width_px),
        })
        .collect()
}

/// Recomputes offsets in place after a window change.
pub fn reposition_labels(entries: &mut [TimeAxisLabelEntry], window: TimeWindow, width_px: f32) {
    if !window.is_displayable() {
        return;
    }
    for entry in entries {
        entry.pixel_offset = label_pixel_offset(entry.timestamp, window, width_px);
    }
}

/// Vertical clip-space ticks under each label.
#[must_use]
pub fn label_markers(entries: &[TimeAxisLabelEntry], width_px: f32) -> LabelMarkers {
    let mut vertices = Vec::with_capacity(entries.len() * 4);
    if width_px <= 0.0 {
        return LabelMarkers { vertices };
    }
    for entry in entries {
        let x = entry.pixel_offset / width_px * 2.0 - 1.0 + LABEL_MARKER_NUDGE;
        vertices.extend_from_slice(&[x, -1.0, x, -1.0 + LABEL_MARKER_HEIGHT]);
    }
    LabelMarkers { vertices }
}

/// Change of one label slot between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSlotChange {
    Unchanged,
    /// Same text, new offset.
    Moved,
    /// New text (and possibly offset) in an existing slot.
    Relabeled,
    Added,
    Removed,
}

/// Diffs two label arrays slot by slot.
///
/// Hosts reuse their label widgets by index; the result has one entry per
/// slot of the longer array.
#[must_use]
pub fn diff_label_slots(
    previous: &[TimeAxisLabelEntry],
    next: &[TimeAxisLabelEntry],
) -> Vec<LabelSlotChange> {
    let slots = previous.len().max(next.len());
    (0..slots)
        .map(|index| match (previous.get(index), next.get(index)) {
            (Some(old), Some(new)) if old.text != new.text => LabelSlotChange::Relabeled,
            (Some(old), Some(new)) if old.pixel_offset != new.pixel_offset => {
                LabelSlotChange::Moved
            }
            (Some(_), Some(_)) => LabelSlotChange::Unchanged,
            (None, Some(_)) => LabelSlotChange::Added,
            (Some(_), None) | (None, None) => LabelSlotChange::Removed,
        })
        .collect()
}
