use serde::{Deserialize, Serialize};
use trajvis_geometry::Point2;

/// One tracked position of one person in one frame.
///
/// `person` also reads from a `people` column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRow {
    /// The video frame index.
    pub frame: i64,
    /// The tracking id of the person.
    #[serde(alias = "people")]
    pub person: i64,
    /// Horizontal position in camera pixels.
    pub x: f64,
    /// Vertical position in camera pixels.
    pub y: f64,
}

impl TrajectoryRow {
    /// The position as a point.
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// The capture time of a frame, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimestampRow {
    /// The video frame index.
    pub frame: i64,
    /// Milliseconds since the start of the recording.
    pub timestamp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn people_alias() -> Result<(), serde_json::Error> {
        let row: TrajectoryRow =
            serde_json::from_str(r#"{"frame": 3, "people": 7, "x": 1.5, "y": 2.0}"#)?;
        assert_eq!(row.person, 7);
        assert_eq!(row.position(), Point2::new(1.5, 2.0));
        Ok(())
    }
}
