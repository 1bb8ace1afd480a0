mod data_controller;
mod data_window_fetcher;
mod engine;
mod engine_config;
mod engine_init;
mod entry_animation;
mod pan_zoom_controller;
mod pan_zoom_resolver;
mod time_axis_labeler;
mod validation;
mod value_axis_labels;
mod viewport_state;

pub use data_window_fetcher::{
    DataProvider, DataWindowFetcher, FetchBackend, FetchRange, FetchedWindow, RefreshOutcome,
    RefreshRequest, RequestDisposition,
};
pub use engine::{GraphEngine, RefreshStatus, ViewportChange};
pub use engine_config::GraphEngineConfig;
pub use entry_animation::{ENTRY_ANIMATION_DURATION, EntryAnimation, accelerate_decelerate};
pub use pan_zoom_resolver::{
    EdgePin, MIN_WINDOW_SPAN_MS, PanResolution, clamp_pan_delta, resolve_edge_pin, resolve_pan,
    zoom_allowed, zoom_window,
};
pub use time_axis_labeler::{
    LABEL_MARKER_HEIGHT, LABEL_MARKER_NUDGE, LabelGranularity, LabelSlotChange,
    TimeAxisLabelConfig, TimeAxisLabeler, diff_label_slots, label_markers, label_pixel_offset,
    normalize_labels, place_labels, reposition_labels,
};
pub use value_axis_labels::{validate_mid_labels, value_axis_labels, value_label_offset};
pub use viewport_state::{ViewportState, ZoomBaseline};
