use trajvis_geometry::GeometryError;

/// An error type for the trajectory module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TrajectoryError {
    /// A pose row does not hold the expected number of values.
    #[error("expected {expected} values in a pose row, got {actual}")]
    InvalidPoseRow {
        /// The number of values expected.
        expected: usize,
        /// The number of values found.
        actual: usize,
    },

    /// Every joint used for averaging has zero confidence.
    #[error("no confident joint in frame {frame} for person {person}")]
    NoConfidentJoint {
        /// The frame of the pose.
        frame: i64,
        /// The person of the pose.
        person: i64,
    },

    /// A mesh cell size or the saturation count is zero.
    #[error("invalid mesh parameters: cell {0}x{1}, max {2}")]
    InvalidMesh(usize, usize, u32),

    /// Error raised while projecting points.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
