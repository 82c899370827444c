use serde::{Deserialize, Serialize};

use crate::calibration::{CameraIntrinsic, FisheyeDistortion, FisheyeUndistorter, InputScale};
use crate::correction::{CorrectionPipeline, PerspectiveParams};
use crate::error::GeometryError;
use crate::point::{Point2, Size};

fn default_output_scale() -> f64 {
    1.0
}

/// Camera and ground-plane settings for one camera view.
///
/// The field names follow the JSON layout used for saved camera presets.
/// Unknown fields are ignored so presets may carry extra rendering options.
///
/// # Example
///
/// ```
/// use trajvis_geometry::config::CameraConfig;
///
/// let config = CameraConfig::preset("camera3").unwrap();
///
/// assert_eq!(config.calib_width, 1920.0);
/// assert_eq!(config.zoom(), 0.3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Width of the frames the trajectories were extracted from.
    pub input_width: f64,
    /// Height of the frames the trajectories were extracted from.
    pub input_height: f64,
    /// Width of the output canvas.
    pub output_width: f64,
    /// Height of the output canvas.
    pub output_height: f64,

    /// Undistort points before the transform.
    pub enable_correction: bool,
    /// Focal lengths `[fx, fy]` at the calibration resolution.
    pub f: [f64; 2],
    /// Principal point `[cx, cy]` at the calibration resolution.
    pub c: [f64; 2],
    /// Fisheye coefficients `[k1, k2, k3, k4]`.
    pub k: [f64; 4],
    /// Width of the images used for calibration.
    pub calib_width: f64,
    /// Height of the images used for calibration.
    pub calib_height: f64,
    /// Magnification of the undistorted points.
    #[serde(default = "default_output_scale")]
    pub output_scale: f64,

    /// Apply the ground-plane transform.
    pub enable_transform: bool,
    /// First ground point, top-left of the reference rectangle.
    pub p1: Point2,
    /// Second ground point, top-right.
    pub p2: Point2,
    /// Third ground point, bottom-right.
    pub p3: Point2,
    /// Fourth ground point, bottom-left.
    pub p4: Point2,
    /// Real world distance between `p1` and `p2`.
    pub p1_p2_distance: f64,
    /// Real world distance between `p2` and `p3`.
    pub p2_p3_distance: f64,
    /// Size of the reference rectangle in percent of the canvas.
    pub transform_scale: f64,
    /// Horizontal translation of the result in output pixels.
    pub transform_offset_x: f64,
    /// Vertical translation of the result in output pixels.
    pub transform_offset_y: f64,
    /// Draw the reference rectangle on top of the trajectories.
    #[serde(default)]
    pub draw_border: bool,
}

/// Names accepted by [`CameraConfig::preset`].
pub const PRESET_NAMES: [&str; 4] = ["camera1", "camera2", "camera3", "camera4"];

const CAMERA12_F: [f64; 2] = [1219.0406537545712, 1212.9035553155306];
const CAMERA12_C: [f64; 2] = [666.8420423491999, 300.4775270052086];
#[rustfmt::skip]
const CAMERA12_K: [f64; 4] = [
    -0.08337977502879604, 0.017859811179103444, 0.023083914028110008, -0.12379071119490138,
];

const CAMERA34_F: [f64; 2] = [1222.78852772764, 1214.377234799321];
const CAMERA34_C: [f64; 2] = [967.8020317677116, 569.3667691760459];
#[rustfmt::skip]
const CAMERA34_K: [f64; 4] = [
    -0.08809225804249926, 0.03839093574614055, -0.060501971675431955, 0.033162385302275665,
];

impl CameraConfig {
    /// Look up a built-in camera preset by name.
    ///
    /// Returns `None` for names not in [`PRESET_NAMES`].
    pub fn preset(name: &str) -> Option<Self> {
        let base = |f, c, k, calib: [f64; 2], quad: [[f64; 2]; 4], scale, offset: [f64; 2]| Self {
            input_width: 1280.0,
            input_height: 720.0,
            output_width: 1280.0,
            output_height: 720.0,
            enable_correction: false,
            f,
            c,
            k,
            calib_width: calib[0],
            calib_height: calib[1],
            output_scale: 1.0,
            enable_transform: false,
            p1: quad[0].into(),
            p2: quad[1].into(),
            p3: quad[2].into(),
            p4: quad[3].into(),
            p1_p2_distance: 2.334,
            p2_p3_distance: 1.8,
            transform_scale: scale,
            transform_offset_x: offset[0],
            transform_offset_y: offset[1],
            draw_border: true,
        };

        let config = match name {
            "camera1" => base(
                CAMERA12_F,
                CAMERA12_C,
                CAMERA12_K,
                [1280.0, 720.0],
                [[343.0, 226.0], [686.0, 260.0], [301.0, 578.0], [21.0, 460.0]],
                30.0,
                [200.0, 100.0],
            ),
            "camera2" => Self {
                p1_p2_distance: 4.0,
                p2_p3_distance: 3.0,
                ..base(
                    CAMERA12_F,
                    CAMERA12_C,
                    CAMERA12_K,
                    [1280.0, 720.0],
                    [[196.0, 53.0], [320.0, 68.0], [299.0, 136.0], [160.0, 118.0]],
                    14.0,
                    [-400.0, -150.0],
                )
            },
            "camera3" => base(
                CAMERA34_F,
                CAMERA34_C,
                CAMERA34_K,
                [1920.0, 1080.0],
                [[598.0, 246.0], [1047.0, 276.0], [1077.0, 624.0], [537.0, 601.0]],
                30.0,
                [200.0, 100.0],
            ),
            "camera4" => base(
                CAMERA34_F,
                CAMERA34_C,
                CAMERA34_K,
                [1920.0, 1080.0],
                [[789.0, 191.0], [1192.0, 328.0], [1134.0, 674.0], [649.0, 518.0]],
                20.0,
                [430.0, 40.0],
            ),
            _ => return None,
        };
        Some(config)
    }

    /// Size of the frames the trajectories were extracted from.
    pub fn input_size(&self) -> Size {
        Size::new(self.input_width, self.input_height)
    }

    /// Size of the output canvas.
    pub fn output_size(&self) -> Size {
        Size::new(self.output_width, self.output_height)
    }

    /// Size of the calibration images.
    pub fn calibration_size(&self) -> Size {
        Size::new(self.calib_width, self.calib_height)
    }

    /// Intrinsics at the calibration resolution.
    pub fn intrinsic(&self) -> CameraIntrinsic {
        CameraIntrinsic {
            fx: self.f[0],
            fy: self.f[1],
            cx: self.c[0],
            cy: self.c[1],
        }
    }

    /// Fisheye distortion coefficients.
    pub fn distortion(&self) -> FisheyeDistortion {
        FisheyeDistortion::from(self.k)
    }

    /// Ratio of the input resolution to the calibration resolution.
    pub fn input_scale(&self) -> InputScale {
        InputScale::from_sizes(self.input_size(), self.calibration_size())
    }

    /// The transform zoom as a fraction.
    pub fn zoom(&self) -> f64 {
        self.transform_scale * 0.01
    }

    /// The undistorter, or `None` when correction is disabled.
    pub fn undistorter(&self) -> Option<FisheyeUndistorter> {
        self.enable_correction.then(|| {
            FisheyeUndistorter::new(
                self.intrinsic(),
                self.distortion(),
                self.input_scale(),
                self.output_scale,
            )
        })
    }

    /// The ground-plane settings, or `None` when the transform is disabled.
    pub fn perspective(&self) -> Option<PerspectiveParams> {
        self.enable_transform.then(|| PerspectiveParams {
            source: [self.p1, self.p2, self.p3, self.p4],
            real_width: self.p1_p2_distance,
            real_height: self.p2_p3_distance,
            zoom: self.zoom(),
            offset: Point2::new(self.transform_offset_x, self.transform_offset_y),
        })
    }

    /// Check that every size is positive and finite.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let mut sizes = vec![self.input_size(), self.output_size()];
        if self.enable_correction {
            sizes.push(self.calibration_size());
        }
        if self.enable_transform {
            sizes.push(Size::new(self.p1_p2_distance, self.p2_p3_distance));
        }

        let valid = |v: f64| v.is_finite() && v > 0.0;
        match sizes.iter().find(|s| !valid(s.width) || !valid(s.height)) {
            Some(s) => Err(GeometryError::InvalidSize(s.width, s.height)),
            None => Ok(()),
        }
    }
}

impl CorrectionPipeline {
    /// Build the pipeline described by a camera configuration.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidSize`] for a size that is not positive, and
    /// [`GeometryError::Singular`] when the ground points do not define a transform.
    pub fn from_config(config: &CameraConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        Self::new(
            config.undistorter(),
            config.perspective().as_ref(),
            config.output_size(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera3_enabled() -> CameraConfig {
        CameraConfig {
            enable_correction: true,
            enable_transform: true,
            output_scale: 0.5,
            transform_offset_x: 0.0,
            transform_offset_y: 0.0,
            ..CameraConfig::preset("camera3").expect("preset")
        }
    }

    #[test]
    fn presets_exist() {
        for name in PRESET_NAMES {
            let config = CameraConfig::preset(name);
            assert!(config.is_some(), "{name}");
        }
        assert!(CameraConfig::preset("camera5").is_none());
    }

    #[test]
    fn preset_values() {
        let Some(camera2) = CameraConfig::preset("camera2") else {
            panic!("camera2 missing");
        };
        assert_eq!(camera2.p1_p2_distance, 4.0);
        assert_eq!(camera2.p3, Point2::new(299.0, 136.0));
        assert_eq!(camera2.transform_offset_x, -400.0);
        assert!(!camera2.enable_correction);
        assert!(camera2.draw_border);
    }

    #[test]
    fn derived_values() {
        let config = camera3_enabled();
        let scale = config.input_scale();
        assert_eq!(scale.sx, 1280.0 / 1920.0);
        assert_eq!(scale.sy, 720.0 / 1080.0);
        assert_eq!(config.intrinsic().cx, 967.8020317677116);
        assert_eq!(config.distortion().k4, 0.033162385302275665);
        assert_relative_eq!(config.zoom(), 0.3);
    }

    #[test]
    fn disabled_stages() {
        let config = CameraConfig::preset("camera1").expect("preset");
        assert!(config.undistorter().is_none());
        assert!(config.perspective().is_none());
    }

    #[test]
    fn pipeline_from_config() -> Result<(), GeometryError> {
        let config = camera3_enabled();
        let pipeline = CorrectionPipeline::from_config(&config)?;

        #[rustfmt::skip]
        let expected = [
            [499.96, 252.0],
            [780.04, 252.0],
            [780.04, 468.0],
            [499.96, 468.0],
        ];

        let Some(border) = pipeline.border() else {
            panic!("transform should be enabled");
        };
        for (b, e) in border.iter().zip(expected.iter()) {
            assert_relative_eq!(b.x, e[0], epsilon = 1e-6);
            assert_relative_eq!(b.y, e[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn pipeline_disabled_is_identity() -> Result<(), GeometryError> {
        let config = CameraConfig::preset("camera4").expect("preset");
        let pipeline = CorrectionPipeline::from_config(&config)?;
        assert_eq!(pipeline, CorrectionPipeline::identity());
        Ok(())
    }

    #[test]
    fn validate_rejects_zero_size() {
        let config = CameraConfig {
            output_height: 0.0,
            ..camera3_enabled()
        };
        assert_eq!(
            config.validate(),
            Err(GeometryError::InvalidSize(1280.0, 0.0))
        );
        assert!(CorrectionPipeline::from_config(&config).is_err());
    }

    #[test]
    fn json_round_trip() -> Result<(), serde_json::Error> {
        let json = r#"{
            "input_width": 1280, "input_height": 720,
            "output_width": 1280, "output_height": 720,
            "background_image": "camera3.jpg",
            "enable_correction": true,
            "f": [1222.78852772764, 1214.377234799321],
            "c": [967.8020317677116, 569.3667691760459],
            "k": [-0.08809225804249926, 0.03839093574614055, -0.060501971675431955, 0.033162385302275665],
            "calib_width": 1920, "calib_height": 1080,
            "enable_transform": true,
            "p1": [598, 246], "p2": [1047, 276], "p3": [1077, 624], "p4": [537, 601],
            "p1_p2_distance": 2.334, "p2_p3_distance": 1.8,
            "transform_scale": 30,
            "transform_offset_x": 200, "transform_offset_y": 100
        }"#;
        let config: CameraConfig = serde_json::from_str(json)?;
        assert_eq!(config.output_scale, 1.0);
        assert!(!config.draw_border);
        assert_eq!(config.p4, Point2::new(537.0, 601.0));

        let back: CameraConfig = serde_json::from_str(&serde_json::to_string(&config)?)?;
        assert_eq!(back, config);
        Ok(())
    }
}
