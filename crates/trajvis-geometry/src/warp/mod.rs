//! Planar geometric transformations.
//!
//! This module provides the pieces used to map ground-plane camera pixels onto
//! a metrically scaled top-down view:
//!
//! - Perspective transforms (homographies) solved from 4 point pairs
//! - Fitting an aspect preserving rectangle inside a canvas
//!
//! # Examples
//!
//! Mapping a quadrilateral onto a centered rectangle:
//!
//! ```
//! use trajvis_geometry::warp::{fit_rect, get_perspective_transform};
//! use trajvis_geometry::Point2;
//!
//! let src = [
//!     Point2::new(598.0, 246.0),
//!     Point2::new(1047.0, 276.0),
//!     Point2::new(1077.0, 624.0),
//!     Point2::new(537.0, 601.0),
//! ];
//! let dst = fit_rect(2.334, 1.8, 1280.0, 720.0, 0.3);
//!
//! let h = get_perspective_transform(&src, &dst).unwrap();
//! let p = h.transform_point(src[0]);
//!
//! assert!((p.x - dst[0].x).abs() < 1e-6);
//! assert!((p.y - dst[0].y).abs() < 1e-6);
//! ```

mod perspective;
mod rect;

pub use perspective::{get_perspective_transform, Homography};
pub use rect::fit_rect;
