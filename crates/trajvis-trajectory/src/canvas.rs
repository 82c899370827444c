use trajvis_geometry::{Point2, Size};

/// Fits the bounding box of raw trajectories into a canvas.
///
/// The aspect ratio is kept and the leftover space is split evenly on both
/// sides of the shorter axis. Used when no camera calibration is available.
///
/// # Example
///
/// ```
/// use trajvis_geometry::{Point2, Size};
/// use trajvis_trajectory::canvas::CanvasFit;
///
/// let points = [Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)];
/// let fit = CanvasFit::from_points(points.iter().copied(), Size::new(200.0, 100.0)).unwrap();
///
/// assert_eq!(fit.apply(Point2::new(0.0, 0.0)), Point2::new(50.0, 0.0));
/// assert_eq!(fit.apply(Point2::new(10.0, 10.0)), Point2::new(150.0, 100.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasFit {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    canvas: Size,
}

impl CanvasFit {
    /// Compute the fit from every trajectory point.
    ///
    /// Returns `None` when the points span no area.
    pub fn from_points(points: impl IntoIterator<Item = Point2>, canvas: Size) -> Option<Self> {
        let (min, max) = points.into_iter().fold(None::<(Point2, Point2)>, |acc, p| {
            Some(match acc {
                None => (p, p),
                Some((min, max)) => (
                    Point2::new(f64::min(min.x, p.x), f64::min(min.y, p.y)),
                    Point2::new(f64::max(max.x, p.x), f64::max(max.y, p.y)),
                ),
            })
        })?;

        let (width, height) = (max.x - min.x, max.y - min.y);
        if !(width > 0.0 && height > 0.0) {
            log::debug!("trajectories span no area: {width}x{height}");
            return None;
        }

        Some(Self {
            left: min.x,
            top: min.y,
            width,
            height,
            canvas,
        })
    }

    /// Map a trajectory point into the canvas.
    pub fn apply(&self, p: Point2) -> Point2 {
        let trajectory_aspect = self.width / self.height;
        let canvas_aspect = self.canvas.aspect();

        if trajectory_aspect > canvas_aspect {
            let x = (p.x - self.left) / self.width;
            let y = (p.y - self.top) / self.width;
            let gap = 1.0 / canvas_aspect - 1.0 / trajectory_aspect;
            Point2::new(x * self.canvas.width, (y + gap * 0.5) * self.canvas.width)
        } else {
            let x = (p.x - self.left) / self.height;
            let y = (p.y - self.top) / self.height;
            let gap = canvas_aspect - trajectory_aspect;
            Point2::new((x + gap * 0.5) * self.canvas.height, y * self.canvas.height)
        }
    }
}
