#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// fitting raw trajectories into a canvas without calibration.
pub mod canvas;

/// per-person colors.
pub mod color;

/// error types for the trajectory module.
pub mod error;

/// body joint averaging.
pub mod joints;

/// density map over the output canvas.
pub mod mesh;

/// trajectory and timestamp rows.
pub mod rows;

/// per-person polylines.
pub mod stroke;

/// time windows and time formatting.
pub mod time;

pub use error::TrajectoryError;
pub use rows::{TimestampRow, TrajectoryRow};
pub use stroke::{group_strokes, Stroke};
