use std::{fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;
use trajvis::geometry::config::{CameraConfig, PRESET_NAMES};
use trajvis::trajectory::joints::PoseRow;
use trajvis::trajectory::TrajectoryRow;

/// Load a camera configuration from a JSON file or a built-in preset.
pub fn load_config(
    path: Option<&Path>,
    preset: Option<&str>,
) -> Result<CameraConfig, Box<dyn std::error::Error>> {
    match (path, preset) {
        (Some(path), _) => {
            let reader = BufReader::new(File::open(path)?);
            let config: CameraConfig = serde_json::from_reader(reader)?;
            log::debug!("loaded camera config from {}", path.display());
            Ok(config)
        }
        (None, Some(name)) => CameraConfig::preset(name).ok_or_else(|| {
            format!(
                "unknown preset '{name}', expected one of {}",
                PRESET_NAMES.join(", ")
            )
            .into()
        }),
        (None, None) => Err("either --config or --preset is required".into()),
    }
}

/// Read every row of a CSV file with a header line.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    reader.deserialize().collect()
}

/// Read pose rows and reduce each one to a trajectory position.
///
/// Poses without a confident joint are skipped.
pub fn read_poses(
    path: &Path,
    foot_only: bool,
) -> Result<Vec<TrajectoryRow>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let values: Vec<f64> = record?.deserialize(None)?;
        match PoseRow::from_values(&values)?.to_trajectory_row(foot_only) {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::debug!("{e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} poses without a confident joint");
    }
    Ok(rows)
}
