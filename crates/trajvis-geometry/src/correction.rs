//! Per-point correction: fisheye undistortion followed by a perspective transform.
//!
//! A [`CorrectionPipeline`] is built once per render pass from immutable camera
//! configuration and then applied to every trajectory point. The same mapping
//! is used for the reference border, the trajectories and, through
//! [`Homography::to_column_major_f32`], a shader uniform.

use crate::calibration::{FisheyeUndistorter, UndistortFailure};
use crate::error::GeometryError;
use crate::parallel::{ExecuteExt, ExecutionStrategy};
use crate::point::{Point2, Quad, Size};
use crate::warp::{fit_rect, get_perspective_transform, Homography};

/// Ground-plane transform settings.
///
/// # Fields
///
/// * `source` - Four points on the ground in camera pixels.
/// * `real_width` - Real world length of the `source[0]`-`source[1]` edge.
/// * `real_height` - Real world length of the `source[1]`-`source[2]` edge.
/// * `zoom` - Scale of the fitted rectangle inside the output canvas.
/// * `offset` - Translation added after the transform, in output pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveParams {
    /// Four points on the ground in camera pixels.
    pub source: Quad,
    /// Real world length of the first edge.
    pub real_width: f64,
    /// Real world length of the second edge.
    pub real_height: f64,
    /// Scale of the fitted rectangle inside the output canvas.
    pub zoom: f64,
    /// Translation added after the transform, in output pixels.
    pub offset: Point2,
}

impl PerspectiveParams {
    /// Use the corners of the input frame as the source quad.
    pub fn from_frame(input: Size, zoom: f64, offset: Point2) -> Self {
        Self {
            source: input.corners(),
            real_width: input.width,
            real_height: input.height,
            zoom,
            offset,
        }
    }
}

/// Maps camera pixels to output canvas pixels.
///
/// # Example
///
/// ```
/// use trajvis_geometry::{CorrectionPipeline, PerspectiveParams, Point2, Size};
///
/// let params = PerspectiveParams {
///     source: [
///         Point2::new(598.0, 246.0),
///         Point2::new(1047.0, 276.0),
///         Point2::new(1077.0, 624.0),
///         Point2::new(537.0, 601.0),
///     ],
///     real_width: 2.334,
///     real_height: 1.8,
///     zoom: 0.3,
///     offset: Point2::new(0.0, 0.0),
/// };
///
/// let pipeline = CorrectionPipeline::new(None, Some(&params), Size::new(1280.0, 720.0)).unwrap();
/// let p = pipeline.project(Point2::new(598.0, 246.0));
///
/// assert!((p.x - 499.96).abs() < 1e-6);
/// assert!((p.y - 252.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrectionPipeline {
    undistorter: Option<FisheyeUndistorter>,
    homography: Homography,
    offset: Point2,
    border: Option<(Quad, Quad)>,
}

impl CorrectionPipeline {
    /// A pipeline that returns every point unchanged.
    pub fn identity() -> Self {
        Self {
            undistorter: None,
            homography: Homography::IDENTITY,
            offset: Point2::default(),
            border: None,
        }
    }

    /// A pipeline that only undistorts, without a ground-plane transform.
    pub fn untransformed(undistorter: Option<FisheyeUndistorter>) -> Self {
        Self {
            undistorter,
            ..Self::identity()
        }
    }

    /// Build the pipeline.
    ///
    /// The source quad is undistorted first when an undistorter is given, then
    /// mapped onto [`fit_rect`] of the real edge lengths inside `output`.
    ///
    /// # Errors
    ///
    /// [`GeometryError::Singular`] when the corrected source points do not
    /// define a transform. The caller should fall back to
    /// [`CorrectionPipeline::untransformed`].
    pub fn new(
        undistorter: Option<FisheyeUndistorter>,
        perspective: Option<&PerspectiveParams>,
        output: Size,
    ) -> Result<Self, GeometryError> {
        let Some(params) = perspective else {
            return Ok(Self::untransformed(undistorter));
        };

        let corrected = match &undistorter {
            Some(u) => params.source.map(|p| u.undistort(p)),
            None => params.source,
        };

        let destination = fit_rect(
            params.real_width,
            params.real_height,
            output.width,
            output.height,
            params.zoom,
        );

        let homography = get_perspective_transform(&corrected, &destination)?;
        log::debug!("perspective transform: {:?}", homography.as_row_major());

        Ok(Self {
            undistorter,
            homography,
            offset: params.offset,
            border: Some((params.source, destination)),
        })
    }

    /// The transform applied after undistortion.
    pub fn homography(&self) -> &Homography {
        &self.homography
    }

    /// The undistorter, if correction is enabled.
    pub fn undistorter(&self) -> Option<&FisheyeUndistorter> {
        self.undistorter.as_ref()
    }

    /// The translation added to every projected point.
    pub fn offset(&self) -> Point2 {
        self.offset
    }

    /// Whether a ground-plane transform is applied.
    pub fn is_transformed(&self) -> bool {
        self.border.is_some()
    }

    /// The configured source quad, in camera pixels.
    pub fn source_quad(&self) -> Option<Quad> {
        self.border.map(|(source, _)| source)
    }

    /// The fitted rectangle the source quad maps onto, before the offset.
    pub fn destination_quad(&self) -> Option<Quad> {
        self.border.map(|(_, destination)| destination)
    }

    /// The source quad run through [`CorrectionPipeline::project`], for drawing a border.
    pub fn border(&self) -> Option<Quad> {
        self.border
            .map(|(source, _)| source.map(|p| self.project(p)))
    }

    /// Map one camera pixel to the output canvas.
    ///
    /// A point that fails to undistort is carried through the transform as
    /// [`crate::calibration::OUT_OF_FRAME`] and lands far outside the canvas.
    pub fn project(&self, p: Point2) -> Point2 {
        let p = match &self.undistorter {
            Some(u) => u.undistort(p),
            None => p,
        };
        self.transform(p)
    }

    /// Map one camera pixel, reporting points that fail to undistort.
    pub fn try_project(&self, p: Point2) -> Result<Point2, UndistortFailure> {
        let p = match &self.undistorter {
            Some(u) => u.try_undistort(p)?,
            None => p,
        };
        Ok(self.transform(p))
    }

    fn transform(&self, p: Point2) -> Point2 {
        let p = self.homography.transform_point(p);
        Point2::new(p.x + self.offset.x, p.y + self.offset.y)
    }

    /// Map a batch of points.
    ///
    /// PRECONDITION: `dst` has the same length as `src`.
    pub fn project_points(
        &self,
        src: &[Point2],
        dst: &mut [Point2],
        strategy: ExecutionStrategy,
    ) -> Result<(), GeometryError> {
        src.execute_with(strategy, dst, |(s, d)| *d = self.project(*s))?;
        Ok(())
    }
}

impl Default for CorrectionPipeline {
    fn default() -> Self {
        Self::identity()
    }
}
