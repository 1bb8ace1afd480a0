pub mod axis_labels;
pub mod line_strip;
pub mod normalized_space;
pub mod primitives;
pub mod types;
pub mod windowing;

pub use axis_labels::{TimeAxisLabel, TimeAxisLabelEntry, ValueAxisLabel};
pub use line_strip::{LineStrip, project_line_strip};
pub use normalized_space::{
    ValueAxisOrientation, checked_to_unit_x, scale_value, to_clip, to_unit_x, to_unit_y,
    value_to_unit,
};
pub use types::{DataExtent, DataPoint, TimeWindow, ValueRange, Viewport};
pub use windowing::{canonicalize_points, points_in_time_window};
