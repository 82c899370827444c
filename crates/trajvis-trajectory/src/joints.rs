use serde::{Deserialize, Serialize};
use trajvis_geometry::Point2;

use crate::error::TrajectoryError;
use crate::rows::TrajectoryRow;

/// Number of joints in a body pose.
pub const JOINT_COUNT: usize = 25;

/// Indices of the ankle, heel and toe joints.
pub const FOOT_JOINTS: [usize; 8] = [11, 14, 19, 20, 21, 22, 23, 24];

/// A detected body joint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Horizontal position in camera pixels.
    pub x: f64,
    /// Vertical position in camera pixels.
    pub y: f64,
    /// Detection confidence, zero for a missing joint.
    pub confidence: f64,
}

/// The body pose of one person in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseRow {
    /// The video frame index.
    pub frame: i64,
    /// The tracking id of the person.
    pub person: i64,
    /// The joints in body model order.
    pub joints: [Joint; JOINT_COUNT],
}

impl PoseRow {
    /// Parse a flat row `frame, person, x0, y0, c0, ..., x24, y24, c24`.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError::InvalidPoseRow`] when the row has the wrong length.
    pub fn from_values(values: &[f64]) -> Result<Self, TrajectoryError> {
        let expected = 2 + 3 * JOINT_COUNT;
        if values.len() != expected {
            return Err(TrajectoryError::InvalidPoseRow {
                expected,
                actual: values.len(),
            });
        }

        let mut joints = [Joint::default(); JOINT_COUNT];
        for (joint, v) in joints.iter_mut().zip(values[2..].chunks_exact(3)) {
            *joint = Joint {
                x: v[0],
                y: v[1],
                confidence: v[2],
            };
        }

        Ok(Self {
            frame: values[0] as i64,
            person: values[1] as i64,
            joints,
        })
    }

    /// Reduce the pose to a single trajectory position.
    ///
    /// See [`average_joints`].
    pub fn to_trajectory_row(&self, foot_only: bool) -> Result<TrajectoryRow, TrajectoryError> {
        let p = average_joints(&self.joints, foot_only).ok_or(
            TrajectoryError::NoConfidentJoint {
                frame: self.frame,
                person: self.person,
            },
        )?;
        Ok(TrajectoryRow {
            frame: self.frame,
            person: self.person,
            x: p.x,
            y: p.y,
        })
    }
}

/// Confidence weighted mean of the joint positions.
///
/// With `foot_only` only the joints in [`FOOT_JOINTS`] are used. Returns
/// `None` when the total confidence is zero.
///
/// # Example
///
/// ```
/// use trajvis_trajectory::joints::{average_joints, Joint, JOINT_COUNT};
///
/// let mut joints = [Joint::default(); JOINT_COUNT];
/// joints[0] = Joint { x: 10.0, y: 0.0, confidence: 1.0 };
/// joints[1] = Joint { x: 20.0, y: 30.0, confidence: 3.0 };
///
/// let p = average_joints(&joints, false).unwrap();
/// assert_eq!((p.x, p.y), (17.5, 22.5));
/// ```
pub fn average_joints(joints: &[Joint; JOINT_COUNT], foot_only: bool) -> Option<Point2> {
    let selected: Box<dyn Iterator<Item = &Joint>> = if foot_only {
        Box::new(FOOT_JOINTS.iter().map(|&i| &joints[i]))
    } else {
        Box::new(joints.iter())
    };

    let (sx, sy, sc) = selected.fold((0.0, 0.0, 0.0), |(sx, sy, sc), j| {
        (sx + j.x * j.confidence, sy + j.y * j.confidence, sc + j.confidence)
    });

    (sc > 0.0).then(|| Point2::new(sx / sc, sy / sc))
}
