use trajvis_geometry::{Point2, Size};

use crate::error::TrajectoryError;
use crate::stroke::Stroke;

/// Settings of a [`MeshMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshParams {
    /// Cell width in output pixels.
    pub cell_width: usize,
    /// Cell height in output pixels.
    pub cell_height: usize,
    /// Amount added to a cell per point.
    pub countup: u32,
    /// Count at which a cell reaches full intensity.
    pub max: u32,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            cell_width: 10,
            cell_height: 10,
            countup: 1,
            max: 100,
        }
    }
}

/// Point density over the output canvas.
///
/// # Example
///
/// ```
/// use trajvis_geometry::{Point2, Size};
/// use trajvis_trajectory::mesh::{MeshMap, MeshParams};
///
/// let params = MeshParams { cell_width: 10, cell_height: 10, countup: 1, max: 2 };
/// let mut mesh = MeshMap::new(Size::new(100.0, 50.0), params).unwrap();
///
/// mesh.add(Point2::new(5.0, 5.0));
/// mesh.add(Point2::new(-5.0, 5.0));
///
/// assert_eq!(mesh.intensity(0, 0), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MeshMap {
    columns: usize,
    rows: usize,
    canvas: Size,
    params: MeshParams,
    counts: Vec<u32>,
}

impl MeshMap {
    /// Create an empty map covering `canvas`.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError::InvalidMesh`] for a zero cell size or a zero `max`.
    pub fn new(canvas: Size, params: MeshParams) -> Result<Self, TrajectoryError> {
        if params.cell_width == 0 || params.cell_height == 0 || params.max == 0 {
            return Err(TrajectoryError::InvalidMesh(
                params.cell_width,
                params.cell_height,
                params.max,
            ));
        }

        let columns = (canvas.width.max(0.0) / params.cell_width as f64).ceil() as usize;
        let rows = (canvas.height.max(0.0) / params.cell_height as f64).ceil() as usize;

        Ok(Self {
            columns,
            rows,
            canvas,
            params,
            counts: vec![0; columns * rows],
        })
    }

    /// Number of cells along x.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells along y.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Count a point. Points outside the canvas are ignored.
    pub fn add(&mut self, p: Point2) {
        let inside = p.x >= 0.0 && p.y >= 0.0 && p.x < self.canvas.width && p.y < self.canvas.height;
        if !inside {
            return;
        }

        let col = (p.x / self.params.cell_width as f64) as usize;
        let row = (p.y / self.params.cell_height as f64) as usize;
        if let Some(count) = self.counts.get_mut(row * self.columns + col) {
            *count = count.saturating_add(self.params.countup);
        }
    }

    /// Count every point of a stroke.
    pub fn add_stroke(&mut self, stroke: &Stroke) {
        stroke.points.iter().for_each(|p| self.add(*p));
    }

    /// The raw count of a cell, zero outside the map.
    pub fn count(&self, col: usize, row: usize) -> u32 {
        if col >= self.columns || row >= self.rows {
            return 0;
        }
        self.counts[row * self.columns + col]
    }

    /// The count of a cell saturated at `max` and scaled to `[0, 1]`.
    pub fn intensity(&self, col: usize, row: usize) -> f64 {
        self.count(col, row).min(self.params.max) as f64 / self.params.max as f64
    }

    /// Intensities of every cell in row-major order.
    pub fn intensities(&self) -> Vec<f64> {
        let max = self.params.max;
        self.counts
            .iter()
            .map(|c| (*c).min(max) as f64 / max as f64)
            .collect()
    }
}
