use serde::Serialize;
use trajvis_geometry::calibration::is_out_of_frame;
use trajvis_geometry::parallel::{ExecuteExt, ExecutionStrategy};
use trajvis_geometry::{CorrectionPipeline, GeometryError, Point2};

use crate::color::{person_color, Rgb};
use crate::rows::TrajectoryRow;

/// The polyline walked by one person.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stroke {
    /// The tracking id of the person.
    pub person: i64,
    /// Positions in frame order.
    pub points: Vec<Point2>,
}

/// What to do with points that fail to undistort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailedPoints {
    /// Keep them at the far away marker position, outside any canvas.
    #[default]
    Keep,
    /// Remove them from the stroke.
    Drop,
}

impl Stroke {
    /// The stroke color of this person.
    pub fn color(&self) -> Rgb {
        person_color(self.person)
    }

    /// Number of points sitting at the undistortion failure marker.
    pub fn failed_points(&self) -> usize {
        self.points.iter().filter(|p| is_out_of_frame(p)).count()
    }

    /// Map every point through the correction pipeline.
    pub fn project(
        &self,
        pipeline: &CorrectionPipeline,
        failed: FailedPoints,
        strategy: ExecutionStrategy,
    ) -> Result<Stroke, GeometryError> {
        let points = match failed {
            FailedPoints::Keep => {
                let mut dst = vec![Point2::default(); self.points.len()];
                pipeline.project_points(&self.points, &mut dst, strategy)?;
                let failed = dst.iter().filter(|p| is_out_of_frame(p)).count();
                if failed > 0 {
                    log::debug!(
                        "person {}: {failed} points failed to undistort",
                        self.person
                    );
                }
                dst
            }
            FailedPoints::Drop => {
                let mut dst = vec![None; self.points.len()];
                self.points
                    .as_slice()
                    .execute_with(strategy, &mut dst, |(s, d)| {
                        *d = pipeline.try_project(*s).ok()
                    })?;
                let kept: Vec<Point2> = dst.into_iter().flatten().collect();
                if kept.len() < self.points.len() {
                    log::debug!(
                        "person {}: dropped {} points that failed to undistort",
                        self.person,
                        self.points.len() - kept.len()
                    );
                }
                kept
            }
        };

        Ok(Stroke {
            person: self.person,
            points,
        })
    }
}

/// Group rows into one stroke per person.
///
/// Rows are ordered by person then frame before grouping, strokes come out in
/// ascending person order. With `frames`, only rows whose frame lies in the
/// inclusive range are used.
///
/// # Example
///
/// ```
/// use trajvis_trajectory::{group_strokes, TrajectoryRow};
///
/// let rows = [
///     TrajectoryRow { frame: 1, person: 2, x: 1.0, y: 1.0 },
///     TrajectoryRow { frame: 0, person: 2, x: 0.0, y: 0.0 },
///     TrajectoryRow { frame: 0, person: 1, x: 5.0, y: 5.0 },
/// ];
///
/// let strokes = group_strokes(&rows, None);
/// assert_eq!(strokes.len(), 2);
/// assert_eq!(strokes[1].points[0].x, 0.0);
/// ```
pub fn group_strokes(rows: &[TrajectoryRow], frames: Option<(i64, i64)>) -> Vec<Stroke> {
    let mut selected: Vec<&TrajectoryRow> = rows
        .iter()
        .filter(|row| frames.map_or(true, |(start, stop)| start <= row.frame && row.frame <= stop))
        .collect();
    selected.sort_by_key(|row| (row.person, row.frame));

    let mut strokes: Vec<Stroke> = Vec::new();
    for row in selected {
        match strokes.last_mut() {
            Some(stroke) if stroke.person == row.person => stroke.points.push(row.position()),
            _ => strokes.push(Stroke {
                person: row.person,
                points: vec![row.position()],
            }),
        }
    }

    log::debug!("grouped {} rows into {} strokes", rows.len(), strokes.len());
    strokes
}

/// Project a set of strokes through the correction pipeline.
pub fn project_strokes(
    strokes: &[Stroke],
    pipeline: &CorrectionPipeline,
    failed: FailedPoints,
    strategy: ExecutionStrategy,
) -> Result<Vec<Stroke>, GeometryError> {
    strokes
        .iter()
        .map(|stroke| stroke.project(pipeline, failed, strategy))
        .collect()
}
