use serde::{Deserialize, Serialize};
use trajvis_linalg::{LinalgError, LinearSystem};

use crate::parallel::{ExecuteExt, ExecutionStrategy, ParallelError};
use crate::point::{Point2, Quad};

/// A 3x3 perspective transform stored in row-major order.
///
/// The last entry is fixed to `1.0` when solved from point pairs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Homography([f64; 9]);

impl Homography {
    /// The identity transform.
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    ]);

    /// Create a homography from 9 values in row-major order.
    pub const fn from_row_major(m: [f64; 9]) -> Self {
        Self(m)
    }

    /// The 9 values in row-major order.
    pub fn as_row_major(&self) -> &[f64; 9] {
        &self.0
    }

    /// The 9 values in column-major order, the layout of a GLSL `mat3`.
    #[rustfmt::skip]
    pub fn to_column_major(&self) -> [f64; 9] {
        let m = &self.0;
        [
            m[0], m[3], m[6],
            m[1], m[4], m[7],
            m[2], m[5], m[8],
        ]
    }

    /// Column-major single precision values for a shader uniform.
    pub fn to_column_major_f32(&self) -> [f32; 9] {
        self.to_column_major().map(|v| v as f32)
    }

    /// Apply the transform to a point with the homogeneous divide.
    ///
    /// Points on the line at infinity map to non finite coordinates.
    pub fn transform_point(&self, p: Point2) -> Point2 {
        let m = &self.0;
        let w = p.x * m[6] + p.y * m[7] + m[8];
        Point2::new(
            (p.x * m[0] + p.y * m[1] + m[2]) / w,
            (p.x * m[3] + p.y * m[4] + m[5]) / w,
        )
    }

    /// Apply the transform to a batch of points.
    ///
    /// PRECONDITION: `dst` has the same length as `src`.
    pub fn transform_points(
        &self,
        src: &[Point2],
        dst: &mut [Point2],
        strategy: ExecutionStrategy,
    ) -> Result<(), ParallelError> {
        src.execute_with(strategy, dst, |(s, d)| *d = self.transform_point(*s))
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compute the perspective transform that maps 4 source points onto 4 destination points.
///
/// Each pair contributes one equation for x and one for y. The 8x8 system is
/// solved with [`trajvis_linalg::solve_linear_system`], the last matrix entry is
/// fixed to `1.0`.
///
/// # Arguments
///
/// * `src` - The source points.
/// * `dst` - The destination points, in the same order as `src`.
///
/// # Returns
///
/// The homography mapping `src[i]` onto `dst[i]`, or [`LinalgError::Singular`]
/// when three or more points are collinear or points are repeated.
pub fn get_perspective_transform(src: &Quad, dst: &Quad) -> Result<Homography, LinalgError> {
    let mut a = [[0.0; 8]; 8];
    let mut b = [0.0; 8];

    // rows 0..4 hold the x equations, rows 4..8 the y equations
    for i in 0..4 {
        let (s, d) = (src[i], dst[i]);
        a[i] = [s.x, s.y, 1.0, 0.0, 0.0, 0.0, -s.x * d.x, -s.y * d.x];
        a[i + 4] = [0.0, 0.0, 0.0, s.x, s.y, 1.0, -s.x * d.y, -s.y * d.y];
        b[i] = d.x;
        b[i + 4] = d.y;
    }

    let h = LinearSystem::new(a, b).solve()?;

    #[rustfmt::skip]
    let m = [
        h[0], h[1], h[2],
        h[3], h[4], h[5],
        h[6], h[7], 1.0,
    ];

    Ok(Homography(m))
}
