use serde::{Deserialize, Serialize};

/// A point in 2d pixel coordinates.
///
/// Serialized as a two element array `[x, y]`.
///
/// # Example
///
/// ```
/// use trajvis_geometry::Point2;
///
/// let p = Point2::new(1.0, 2.0);
/// let q: Point2 = [1.0, 2.0].into();
///
/// assert_eq!(p, q);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    /// The x coordinate
    pub x: f64,
    /// The y coordinate
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Point2 { x: p[0], y: p[1] }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from(p: (f64, f64)) -> Self {
        Point2 { x: p.0, y: p.1 }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// Four points in the order top-left, top-right, bottom-right, bottom-left.
pub type Quad = [Point2; 4];

/// A width and height pair in pixels or in real world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// The width
    pub width: f64,
    /// The height
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// The four corners of a rectangle of this size anchored at the origin.
    pub fn corners(&self) -> Quad {
        [
            Point2::new(0.0, 0.0),
            Point2::new(self.width, 0.0),
            Point2::new(self.width, self.height),
            Point2::new(0.0, self.height),
        ]
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Size {{ width: {}, height: {} }}", self.width, self.height)
    }
}

impl From<[f64; 2]> for Size {
    fn from(size: [f64; 2]) -> Self {
        Size {
            width: size[0],
            height: size[1],
        }
    }
}
