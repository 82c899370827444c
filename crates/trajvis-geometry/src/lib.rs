#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// camera intrinsics and fisheye undistortion module.
pub mod calibration;

/// camera configuration and built-in presets.
pub mod config;

/// the composed per-point correction pipeline.
pub mod correction;

/// error types for the geometry module.
pub mod error;

/// module containing parallelization utilities.
pub mod parallel;

/// basic 2d point and size types.
pub mod point;

/// perspective transforms and rectangle fitting.
pub mod warp;

pub use correction::{CorrectionPipeline, PerspectiveParams};
pub use error::GeometryError;
pub use point::{Point2, Quad, Size};
