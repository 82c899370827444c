//! Inverse of the equidistant fisheye projection.
//!
//! The kernel [`undistort_point_fisheye`] is generic over the float type so the
//! overlay path (`f64`) and the vertex path (`f32`) share one implementation
//! and one failure sentinel. Single precision cannot resolve a Newton step of
//! [`UNDISTORT_EPS`] for angles near one radian, so `f32` stops at
//! [`UNDISTORT_EPS_F32`] instead.

use num_traits::{AsPrimitive, Float, FloatConst};

use super::{CameraIntrinsic, FisheyeDistortion, InputScale};
use crate::parallel::{ExecuteExt, ExecutionStrategy, ParallelError};
use crate::point::Point2;

/// Maximum number of Newton steps used to recover theta.
pub const UNDISTORT_MAX_ITER: usize = 10;

/// Convergence tolerance on the Newton step, also the near-center threshold.
pub const UNDISTORT_EPS: f64 = 1e-7;

/// Newton step tolerance for float types whose machine epsilon exceeds
/// [`UNDISTORT_EPS`], i.e. `f32`.
pub const UNDISTORT_EPS_F32: f64 = 1e-4;

/// Point returned when a point cannot be undistorted.
///
/// Downstream code culls it by magnitude, it is far outside any canvas.
pub const OUT_OF_FRAME: Point2 = Point2 {
    x: -1_000_000.0,
    y: -1_000_000.0,
};

/// Reasons for a point to be mapped to [`OUT_OF_FRAME`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndistortFailure {
    /// The Newton step never dropped below the tolerance.
    #[error("fisheye undistortion did not converge")]
    NotConverged,

    /// The recovered angle has the opposite sign of the distorted angle.
    #[error("fisheye undistortion diverged into a flipped solution")]
    ThetaFlipped,
}

/// Undistort a single point with the equidistant fisheye model.
///
/// Solves `theta * (1 + k1 θ² + k2 θ⁴ + k3 θ⁶ + k4 θ⁸) = theta_d` for `theta`
/// with at most [`UNDISTORT_MAX_ITER`] Newton steps. The iteration stops once a
/// step drops below [`UNDISTORT_EPS`], or [`UNDISTORT_EPS_F32`] in single
/// precision.
///
/// # Arguments
///
/// * `src` - The distorted point in pixels.
/// * `f` - The focal length (fx, fy) at calibration resolution.
/// * `c` - The principal point (cx, cy) at calibration resolution.
/// * `k` - The distortion coefficients (k1, k2, k3, k4).
/// * `input_scale` - Resolution in use divided by the calibration resolution.
/// * `output_scale` - Zoom applied around the principal point to the result.
///
/// # Returns
///
/// The undistorted point in pixels. Points within [`UNDISTORT_EPS`] of the
/// principal point map to the principal point.
///
/// # Errors
///
/// [`UndistortFailure::ThetaFlipped`] when the solution changed sign and
/// [`UndistortFailure::NotConverged`] when the iteration cap was reached.
///
/// # Example
///
/// ```
/// use trajvis_geometry::calibration::undistort_point_fisheye;
///
/// let dst = undistort_point_fisheye(
///     [967.0f32, 569.0],
///     [1222.0, 1214.0],
///     [967.0, 569.0],
///     [-0.088, 0.038, -0.060, 0.033],
///     [1.0, 1.0],
///     0.5,
/// )
/// .unwrap();
///
/// assert_eq!(dst, [967.0, 569.0]);
/// ```
pub fn undistort_point_fisheye<T>(
    src: [T; 2],
    f: [T; 2],
    c: [T; 2],
    k: [T; 4],
    input_scale: [T; 2],
    output_scale: T,
) -> Result<[T; 2], UndistortFailure>
where
    T: Float + FloatConst + 'static,
    f64: AsPrimitive<T>,
{
    let eps: T = UNDISTORT_EPS.as_();
    let step_eps: T = if T::epsilon() > eps {
        UNDISTORT_EPS_F32.as_()
    } else {
        eps
    };
    let (one, three, five, seven, nine): (T, T, T, T, T) = (
        1.0_f64.as_(),
        3.0_f64.as_(),
        5.0_f64.as_(),
        7.0_f64.as_(),
        9.0_f64.as_(),
    );

    // rescale the intrinsics to the resolution in use
    let f_ = [f[0] * input_scale[0], f[1] * input_scale[1]];
    let c_ = [c[0] * input_scale[0], c[1] * input_scale[1]];

    // normalized coordinates
    let pw = [(src[0] - c_[0]) / f_[0], (src[1] - c_[1]) / f_[1]];

    let half_pi = T::FRAC_PI_2();
    let theta_d = (pw[0] * pw[0] + pw[1] * pw[1])
        .sqrt()
        .max(-half_pi)
        .min(half_pi);

    let mut converged = false;
    let mut theta = theta_d;
    let mut scale = T::zero();

    if theta_d.abs() > eps {
        for _ in 0..UNDISTORT_MAX_ITER {
            let theta2 = theta * theta;
            let theta4 = theta2 * theta2;
            let theta6 = theta4 * theta2;
            let theta8 = theta6 * theta2;
            let k0_theta2 = k[0] * theta2;
            let k1_theta4 = k[1] * theta4;
            let k2_theta6 = k[2] * theta6;
            let k3_theta8 = k[3] * theta8;
            let theta_fix = (theta * (one + k0_theta2 + k1_theta4 + k2_theta6 + k3_theta8)
                - theta_d)
                / (one
                    + three * k0_theta2
                    + five * k1_theta4
                    + seven * k2_theta6
                    + nine * k3_theta8);
            theta = theta - theta_fix;
            if theta_fix.abs() < step_eps {
                converged = true;
                break;
            }
        }
        scale = theta.tan() / theta_d;
    } else {
        converged = true;
    }

    let zero = T::zero();
    let theta_flipped = (theta_d < zero && theta > zero) || (theta_d > zero && theta < zero);
    if theta_flipped {
        return Err(UndistortFailure::ThetaFlipped);
    }
    if !converged {
        return Err(UndistortFailure::NotConverged);
    }

    Ok([
        pw[0] * scale * f_[0] * output_scale + c_[0],
        pw[1] * scale * f_[1] * output_scale + c_[1],
    ])
}

/// Undistorts points for one configured fisheye camera.
///
/// # Example
///
/// ```
/// use trajvis_geometry::calibration::{
///     CameraIntrinsic, FisheyeDistortion, FisheyeUndistorter, InputScale,
/// };
/// use trajvis_geometry::Point2;
///
/// let undistorter = FisheyeUndistorter::new(
///     CameraIntrinsic { fx: 1222.0, fy: 1214.0, cx: 967.0, cy: 569.0 },
///     FisheyeDistortion::from([-0.088, 0.038, -0.060, 0.033]),
///     InputScale::IDENTITY,
///     1.0,
/// );
///
/// let p = undistorter.undistort(Point2::new(967.0, 569.0));
/// assert_eq!(p, Point2::new(967.0, 569.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FisheyeUndistorter {
    /// Intrinsics at calibration resolution.
    pub intrinsic: CameraIntrinsic,
    /// Fisheye distortion coefficients.
    pub distortion: FisheyeDistortion,
    /// Resolution in use divided by the calibration resolution.
    pub input_scale: InputScale,
    /// Zoom applied around the principal point to the undistorted points.
    pub output_scale: f64,
}

impl FisheyeUndistorter {
    /// Create a new undistorter.
    pub fn new(
        intrinsic: CameraIntrinsic,
        distortion: FisheyeDistortion,
        input_scale: InputScale,
        output_scale: f64,
    ) -> Self {
        Self {
            intrinsic,
            distortion,
            input_scale,
            output_scale,
        }
    }

    /// The principal point at the resolution in use.
    pub fn principal_point(&self) -> Point2 {
        let scaled = self.intrinsic.scaled(self.input_scale);
        Point2::new(scaled.cx, scaled.cy)
    }

    /// Undistort a point, reporting why it failed.
    pub fn try_undistort(&self, src: Point2) -> Result<Point2, UndistortFailure> {
        let (i, k) = (&self.intrinsic, &self.distortion);
        undistort_point_fisheye(
            [src.x, src.y],
            [i.fx, i.fy],
            [i.cx, i.cy],
            [k.k1, k.k2, k.k3, k.k4],
            [self.input_scale.sx, self.input_scale.sy],
            self.output_scale,
        )
        .map(Point2::from)
    }

    /// Undistort a point, failures map to [`OUT_OF_FRAME`].
    pub fn undistort(&self, src: Point2) -> Point2 {
        self.try_undistort(src).unwrap_or(OUT_OF_FRAME)
    }

    /// Undistort a batch of points into `dst`.
    ///
    /// PRECONDITION: `dst` has the same length as `src`.
    pub fn undistort_points(
        &self,
        src: &[Point2],
        dst: &mut [Point2],
        strategy: ExecutionStrategy,
    ) -> Result<(), ParallelError> {
        src.execute_with(strategy, dst, |(s, d)| *d = self.undistort(*s))
    }
}

/// Whether a point is the undistortion failure marker.
pub fn is_out_of_frame(p: &Point2) -> bool {
    p.x == OUT_OF_FRAME.x && p.y == OUT_OF_FRAME.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera3() -> FisheyeUndistorter {
        FisheyeUndistorter::new(
            CameraIntrinsic {
                fx: 1222.78852772764,
                fy: 1214.377234799321,
                cx: 967.8020317677116,
                cy: 569.3667691760459,
            },
            FisheyeDistortion::from([
                -0.08809225804249926,
                0.03839093574614055,
                -0.060501971675431955,
                0.033162385302275665,
            ]),
            InputScale::new(1280.0 / 1920.0, 1280.0 / 1920.0),
            0.5,
        )
    }

    #[test]
    fn undistort_principal_point() {
        let undistorter = camera3();
        let c = undistorter.principal_point();
        let p = undistorter.undistort(c);
        assert_relative_eq!(p.x, c.x, epsilon = 1e-9);
        assert_relative_eq!(p.y, c.y, epsilon = 1e-9);
    }

    #[test]
    fn undistort_known_points() -> Result<(), UndistortFailure> {
        let undistorter = camera3();
        let p = undistorter.try_undistort(Point2::new(598.0, 246.0))?;
        assert_relative_eq!(p.x, 621.2919152037745, epsilon = 1e-9);
        assert_relative_eq!(p.y, 311.9151394498683, epsilon = 1e-9);

        let p = undistorter.try_undistort(Point2::new(1077.0, 624.0))?;
        assert_relative_eq!(p.x, 903.2538801823991, epsilon = 1e-9);
        assert_relative_eq!(p.y, 525.6499906187644, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn undistort_zero_distortion_is_tan() -> Result<(), UndistortFailure> {
        let undistorter = FisheyeUndistorter::new(
            CameraIntrinsic {
                fx: 100.0,
                fy: 100.0,
                cx: 50.0,
                cy: 50.0,
            },
            FisheyeDistortion::default(),
            InputScale::IDENTITY,
            1.0,
        );
        // theta_d = 0.5 is already the solution
        let p = undistorter.try_undistort(Point2::new(100.0, 50.0))?;
        assert_relative_eq!(p.x, 50.0 + 100.0 * 0.5f64.tan(), epsilon = 1e-9);
        assert_relative_eq!(p.y, 50.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn undistort_theta_flipped() {
        let undistorter = FisheyeUndistorter::new(
            CameraIntrinsic {
                fx: 100.0,
                fy: 100.0,
                cx: 100.0,
                cy: 100.0,
            },
            FisheyeDistortion::from([-5.0, 0.0, 0.0, 0.0]),
            InputScale::IDENTITY,
            1.0,
        );
        let src = Point2::new(200.0, 100.0);
        assert_eq!(
            undistorter.try_undistort(src),
            Err(UndistortFailure::ThetaFlipped)
        );
        let p = undistorter.undistort(src);
        assert_eq!(p.x, -1000000.0);
        assert_eq!(p.y, -1000000.0);
        assert!(is_out_of_frame(&p));
    }

    #[test]
    fn undistort_not_converged() {
        // the Newton step oscillates between 0.5 and 0.0
        let undistorter = FisheyeUndistorter::new(
            CameraIntrinsic {
                fx: 100.0,
                fy: 100.0,
                cx: 100.0,
                cy: 100.0,
            },
            FisheyeDistortion::from([-2.0, 0.0, 0.0, 0.0]),
            InputScale::IDENTITY,
            1.0,
        );
        let src = Point2::new(150.0, 100.0);
        assert_eq!(
            undistorter.try_undistort(src),
            Err(UndistortFailure::NotConverged)
        );
        assert_eq!(undistorter.undistort(src), OUT_OF_FRAME);
    }

    #[test]
    fn undistort_is_deterministic() {
        let undistorter = camera3();
        let src = Point2::new(1047.0, 276.0);
        let a = undistorter.undistort(src);
        let b = undistorter.undistort(src);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    const CAMERA3_F: [f64; 2] = [1222.78852772764, 1214.377234799321];
    const CAMERA3_C: [f64; 2] = [967.8020317677116, 569.3667691760459];
    const CAMERA3_K: [f64; 4] = [
        -0.08809225804249926,
        0.03839093574614055,
        -0.060501971675431955,
        0.033162385302275665,
    ];

    fn undistort_both(
        src: [f64; 2],
        s: [f64; 2],
        output_scale: f64,
    ) -> (Result<[f64; 2], UndistortFailure>, Result<[f32; 2], UndistortFailure>) {
        let p64 = undistort_point_fisheye(src, CAMERA3_F, CAMERA3_C, CAMERA3_K, s, output_scale);
        let p32 = undistort_point_fisheye(
            src.map(|v| v as f32),
            CAMERA3_F.map(|v| v as f32),
            CAMERA3_C.map(|v| v as f32),
            CAMERA3_K.map(|v| v as f32),
            s.map(|v| v as f32),
            output_scale as f32,
        );
        (p64, p32)
    }

    #[test]
    fn undistort_f32_matches_f64() -> Result<(), UndistortFailure> {
        let s = 1280.0 / 1920.0;
        let (p64, p32) = undistort_both([690.0, 400.0], [s, s], 0.5);
        let (p64, p32) = (p64?, p32?);

        assert_relative_eq!(p32[0] as f64, p64[0], epsilon = 1e-2);
        assert_relative_eq!(p32[1] as f64, p64[1], epsilon = 1e-2);
        Ok(())
    }

    #[test]
    fn undistort_f32_converges_near_corners() -> Result<(), UndistortFailure> {
        let s = [1280.0 / 1920.0, 720.0 / 1080.0];

        // theta is close to one radian here, below f32 resolution of 1e-7
        for src in [[30.0, 10.0], [20.0, 200.0], [0.0, 620.0], [20.0, 20.0]] {
            let (p64, p32) = undistort_both(src, s, 1.0);
            let (p64, p32) = (p64?, p32?);
            assert_relative_eq!(p32[0] as f64, p64[0], epsilon = 1e-2);
            assert_relative_eq!(p32[1] as f64, p64[1], epsilon = 1e-2);
        }

        // every point f64 undistorts also undistorts in f32
        for x in (0..=1280).step_by(10) {
            for y in (0..=720).step_by(10) {
                let (p64, p32) = undistort_both([x as f64, y as f64], s, 1.0);
                if p64.is_ok() {
                    assert!(p32.is_ok(), "f32 failed at [{x}, {y}]: {p32:?}");
                }
            }
        }
        Ok(())
    }

    #[test]
    fn undistort_points_batch() -> Result<(), ParallelError> {
        let undistorter = camera3();
        let src = vec![
            Point2::new(598.0, 246.0),
            Point2::new(1047.0, 276.0),
            Point2::new(1077.0, 624.0),
            Point2::new(537.0, 601.0),
        ];
        let mut parallel = vec![Point2::default(); src.len()];
        let mut serial = vec![Point2::default(); src.len()];
        undistorter.undistort_points(&src, &mut parallel, ExecutionStrategy::ParallelElements)?;
        undistorter.undistort_points(&src, &mut serial, ExecutionStrategy::Serial)?;
        assert_eq!(parallel, serial);
        assert_eq!(serial[1], undistorter.undistort(src[1]));
        Ok(())
    }
}
