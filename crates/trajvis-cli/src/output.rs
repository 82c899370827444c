use serde::Serialize;
use trajvis::geometry::warp::Homography;
use trajvis::geometry::{CorrectionPipeline, Point2, Quad};
use trajvis::trajectory::mesh::MeshMap;
use trajvis::trajectory::Stroke;

/// A projected stroke with its draw color.
#[derive(Debug, Serialize)]
pub struct StrokeOutput {
    pub person: i64,
    pub color: [u8; 3],
    pub points: Vec<Point2>,
}

impl From<Stroke> for StrokeOutput {
    fn from(stroke: Stroke) -> Self {
        Self {
            person: stroke.person,
            color: stroke.color().to_rgb8(),
            points: stroke.points,
        }
    }
}

/// The document written by the command line tool.
#[derive(Debug, Serialize)]
pub struct PlotOutput {
    pub width: f64,
    pub height: f64,
    /// Row-major transform.
    pub homography: Homography,
    /// Column-major transform for a `mat3` uniform.
    pub uniform: [f32; 9],
    pub border: Option<Quad>,
    pub strokes: Vec<StrokeOutput>,
    pub mesh: Option<MeshOutput>,
}

impl PlotOutput {
    pub fn new(pipeline: &CorrectionPipeline, width: f64, height: f64, draw_border: bool) -> Self {
        let homography = *pipeline.homography();
        Self {
            width,
            height,
            homography,
            uniform: homography.to_column_major_f32(),
            border: if draw_border { pipeline.border() } else { None },
            strokes: Vec::new(),
            mesh: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeshOutput {
    pub columns: usize,
    pub rows: usize,
    pub intensities: Vec<f64>,
}

impl From<&MeshMap> for MeshOutput {
    fn from(mesh: &MeshMap) -> Self {
        Self {
            columns: mesh.columns(),
            rows: mesh.rows(),
            intensities: mesh.intensities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_document() -> Result<(), serde_json::Error> {
        let mut output = PlotOutput::new(&CorrectionPipeline::identity(), 1280.0, 720.0, true);
        output.strokes.push(
            Stroke {
                person: 0,
                points: vec![Point2::new(1.0, 2.0)],
            }
            .into(),
        );

        let value = serde_json::to_value(&output)?;
        assert_eq!(value["homography"][0], 1.0);
        assert_eq!(value["uniform"][8], 1.0);
        assert!(value["border"].is_null());
        assert_eq!(value["strokes"][0]["color"], serde_json::json!([255, 128, 128]));
        assert_eq!(value["strokes"][0]["points"][0], serde_json::json!([1.0, 2.0]));
        Ok(())
    }
}
