//! Sense
//!
//! Depth camera session toolkit. Re-exports the workspace crates:
//!
//! - [`data`]: depth grids and depth-to-mesh reconstruction
//! - [`capture`]: depth sources and hand tracking data
//! - [`app`]: session driver, effects, gestures and post processing

pub use sense_app as app;
pub use sense_capture as capture;
pub use sense_data as data;
