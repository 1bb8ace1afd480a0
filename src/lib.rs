//! timegraph: viewport transform and render-geometry engine for scrollable,
//! zoomable time-series graphs.
//!
//! The crate maps a time/value window onto normalized device coordinates,
//! keeps pan/zoom state bounded by the fetched data extent, builds the
//! range-highlight triangle mesh and places time-axis labels. Drawing and
//! widget layout stay with the host through the [`render::Renderer`] trait.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{GraphEngine, GraphEngineConfig};
pub use error::{GraphError, GraphResult};
