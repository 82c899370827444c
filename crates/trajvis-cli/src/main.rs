use argh::FromArgs;
use std::path::PathBuf;

use trajvis::geometry::config::CameraConfig;
use trajvis::geometry::parallel::ExecutionStrategy;
use trajvis::geometry::{CorrectionPipeline, GeometryError, Size};
use trajvis::trajectory::canvas::CanvasFit;
use trajvis::trajectory::mesh::{MeshMap, MeshParams};
use trajvis::trajectory::stroke::{project_strokes, FailedPoints};
use trajvis::trajectory::time::{format_time, frame_range, time_range};
use trajvis::trajectory::{group_strokes, Stroke, TimestampRow, TrajectoryRow};

mod input;
mod output;

use output::{MeshOutput, PlotOutput};

/// Projects pedestrian trajectories onto the ground plane and writes them as JSON
#[derive(Debug, FromArgs)]
struct Args {
    /// trajectory csv with `frame,people,x,y` columns
    #[argh(option, short = 't')]
    trajectory: PathBuf,

    /// read the trajectory csv as 25 joint poses per row
    #[argh(switch)]
    poses: bool,

    /// average only the foot joints of a pose
    #[argh(switch)]
    foot_only: bool,

    /// timestamp csv with `frame,timestamp` columns
    #[argh(option)]
    timestamps: Option<PathBuf>,

    /// camera config json
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// built-in camera preset: camera1, camera2, camera3 or camera4
    #[argh(option, short = 'p')]
    preset: Option<String>,

    /// undistort the points even if the config disables it
    #[argh(switch)]
    correct: bool,

    /// apply the ground-plane transform even if the config disables it
    #[argh(switch)]
    transform: bool,

    /// fit the raw trajectories into the canvas instead of correcting them
    #[argh(switch)]
    fit_canvas: bool,

    /// start of the time window in milliseconds
    #[argh(option)]
    start: Option<f64>,

    /// end of the time window in milliseconds
    #[argh(option)]
    stop: Option<f64>,

    /// density map cell size in output pixels, e.g. 16x16
    #[argh(option, from_str_fn(parse_cell))]
    mesh: Option<(usize, usize)>,

    /// density map increment per point
    #[argh(option, default = "1")]
    mesh_countup: u32,

    /// density map count for full intensity
    #[argh(option, default = "100")]
    mesh_max: u32,

    /// remove points that fail to undistort instead of moving them off canvas
    #[argh(switch)]
    drop_failed: bool,

    /// output file, stdout when omitted
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn parse_cell(value: &str) -> Result<(usize, usize), String> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got '{value}'"))?;
    let parse = |v: &str| v.trim().parse::<usize>().map_err(|e| e.to_string());
    Ok((parse(w)?, parse(h)?))
}

fn frames_to_draw(
    timestamps: &[TimestampRow],
    start: Option<f64>,
    stop: Option<f64>,
) -> Option<Option<(i64, i64)>> {
    let (first, last) = time_range(timestamps)?;
    let (start, stop) = (start.unwrap_or(first), stop.unwrap_or(last));
    log::info!("time window {} - {}", format_time(start), format_time(stop));
    Some(frame_range(timestamps, start, stop))
}

/// Apply the command line overrides and check the sizes used by every output mode.
fn prepare_config(
    mut config: CameraConfig,
    correct: bool,
    transform: bool,
) -> Result<CameraConfig, GeometryError> {
    config.enable_correction |= correct;
    config.enable_transform |= transform;
    config.validate()?;
    Ok(config)
}

fn build_pipeline(config: &CameraConfig) -> Result<CorrectionPipeline, GeometryError> {
    match CorrectionPipeline::from_config(config) {
        Err(GeometryError::Singular(e)) => {
            log::warn!("{e}, drawing without the ground-plane transform");
            Ok(CorrectionPipeline::untransformed(config.undistorter()))
        }
        res => res,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = prepare_config(
        input::load_config(args.config.as_deref(), args.preset.as_deref())?,
        args.correct,
        args.transform,
    )?;

    let mut rows: Vec<TrajectoryRow> = if args.poses {
        input::read_poses(&args.trajectory, args.foot_only)?
    } else {
        input::read_rows(&args.trajectory)?
    };
    log::info!("read {} trajectory rows", rows.len());

    let frames = match &args.timestamps {
        Some(path) => {
            let timestamps: Vec<TimestampRow> = input::read_rows(path)?;
            match frames_to_draw(&timestamps, args.start, args.stop) {
                Some(Some(frames)) => Some(frames),
                Some(None) => {
                    log::warn!("no frame inside the time window");
                    rows.clear();
                    None
                }
                None => {
                    log::warn!("empty timestamp table, drawing every frame");
                    None
                }
            }
        }
        None => None,
    };

    let canvas = config.output_size();
    let strokes = group_strokes(&rows, frames);
    let failed = if args.drop_failed {
        FailedPoints::Drop
    } else {
        FailedPoints::Keep
    };

    let (pipeline, strokes) = if args.fit_canvas {
        let fit = CanvasFit::from_points(rows.iter().map(|r| r.position()), canvas);
        let strokes: Vec<Stroke> = match fit {
            Some(fit) => strokes
                .into_iter()
                .map(|s| Stroke {
                    person: s.person,
                    points: s.points.into_iter().map(|p| fit.apply(p)).collect(),
                })
                .collect(),
            None => strokes,
        };
        (CorrectionPipeline::identity(), strokes)
    } else {
        let pipeline = build_pipeline(&config)?;
        let strokes = project_strokes(&strokes, &pipeline, failed, ExecutionStrategy::default())?;
        (pipeline, strokes)
    };

    let mut plot = PlotOutput::new(&pipeline, canvas.width, canvas.height, config.draw_border);

    if let Some((cell_width, cell_height)) = args.mesh {
        let mut mesh = MeshMap::new(
            Size::new(canvas.width, canvas.height),
            MeshParams {
                cell_width,
                cell_height,
                countup: args.mesh_countup,
                max: args.mesh_max,
            },
        )?;
        strokes.iter().for_each(|s| mesh.add_stroke(s));
        plot.mesh = Some(MeshOutput::from(&mesh));
    }

    plot.strokes = strokes.into_iter().map(Into::into).collect();

    match &args.output {
        Some(path) => {
            let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
            serde_json::to_writer(writer, &plot)?
        }
        None => serde_json::to_writer(std::io::stdout().lock(), &plot)?,
    }

    Ok(())
}
