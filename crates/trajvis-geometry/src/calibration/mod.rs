/// fisheye (equidistant) undistortion module.
pub mod fisheye;

pub use fisheye::{
    is_out_of_frame, undistort_point_fisheye, FisheyeUndistorter, UndistortFailure,
    OUT_OF_FRAME, UNDISTORT_EPS, UNDISTORT_EPS_F32, UNDISTORT_MAX_ITER,
};

use serde::{Deserialize, Serialize};

use crate::point::Size;

/// Represents the instrinsic parameters of a pinhole camera
///
/// The values are given in pixels at the resolution used for calibration.
///
/// # Fields
///
/// * `fx` - The focal length in the x direction
/// * `fy` - The focal length in the y direction
/// * `cx` - The x coordinate of the principal point
/// * `cy` - The y coordinate of the principal point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsic {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
}

impl CameraIntrinsic {
    /// Rescale the intrinsics to another image resolution.
    pub fn scaled(&self, scale: InputScale) -> Self {
        Self {
            fx: self.fx * scale.sx,
            fy: self.fy * scale.sy,
            cx: self.cx * scale.sx,
            cy: self.cy * scale.sy,
        }
    }
}

/// Represents the radial distortion coefficients of the equidistant fisheye model
///
/// The distorted angle is `theta_d = theta * (1 + k1 θ² + k2 θ⁴ + k3 θ⁶ + k4 θ⁸)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FisheyeDistortion {
    /// The first radial distortion coefficient
    pub k1: f64,
    /// The second radial distortion coefficient
    pub k2: f64,
    /// The third radial distortion coefficient
    pub k3: f64,
    /// The fourth radial distortion coefficient
    pub k4: f64,
}

impl From<[f64; 4]> for FisheyeDistortion {
    fn from(k: [f64; 4]) -> Self {
        Self {
            k1: k[0],
            k2: k[1],
            k3: k[2],
            k4: k[3],
        }
    }
}

/// Ratio between the resolution in use and the calibration resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputScale {
    /// Horizontal ratio
    pub sx: f64,
    /// Vertical ratio
    pub sy: f64,
}

impl InputScale {
    /// No rescaling.
    pub const IDENTITY: Self = Self { sx: 1.0, sy: 1.0 };

    /// Create a new scale.
    pub const fn new(sx: f64, sy: f64) -> Self {
        Self { sx, sy }
    }

    /// Scale from the image size in use and the image size used for calibration.
    ///
    /// # Example
    ///
    /// ```
    /// use trajvis_geometry::calibration::InputScale;
    /// use trajvis_geometry::Size;
    ///
    /// let scale = InputScale::from_sizes(Size::new(1280.0, 720.0), Size::new(1920.0, 1080.0));
    ///
    /// assert_eq!(scale.sx, 1280.0 / 1920.0);
    /// assert_eq!(scale.sy, 720.0 / 1080.0);
    /// ```
    pub fn from_sizes(input: Size, calibration: Size) -> Self {
        Self {
            sx: input.width / calibration.width,
            sy: input.height / calibration.height,
        }
    }
}

impl Default for InputScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_scaled() {
        let intrinsic = CameraIntrinsic {
            fx: 1200.0,
            fy: 1000.0,
            cx: 960.0,
            cy: 540.0,
        };
        let scaled = intrinsic.scaled(InputScale::new(0.5, 0.25));
        assert_eq!(scaled.fx, 600.0);
        assert_eq!(scaled.fy, 250.0);
        assert_eq!(scaled.cx, 480.0);
        assert_eq!(scaled.cy, 135.0);
    }

    #[test]
    fn distortion_from_array() {
        let k = FisheyeDistortion::from([0.1, 0.2, 0.3, 0.4]);
        assert_eq!(k.k3, 0.3);
        assert_eq!(FisheyeDistortion::default().k1, 0.0);
    }
}
