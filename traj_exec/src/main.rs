//! Trajectory sampling executable entry point.
//!
//! # Architecture
//!
//! The execution consists of:
//!
//!     - Initialise the session and logging
//!     - Load the numerical parameters
//!     - Load the trajectory description (robot specs, trajectory params and the moments produced
//!       by the profile generator) from a JSON file
//!     - Apply the requested transforms in order
//!     - Sample the trajectory at a fixed period and save the samples into the session

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;

// Internal
use pathfinder::{Moment, Params, RobotSpecs, Trajectory, TrajectoryParams, Vec2D};
use util::{
    host,
    logger::{logger_init_with_targets, LevelFilter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Sample a trajectory at a fixed period, optionally mirroring or retracing it first.
#[derive(Debug, StructOpt)]
#[structopt(name = "traj_exec")]
struct Args {
    /// JSON file containing the robot specs, trajectory params and moments.
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// Transform to apply before sampling, may be given multiple times and is applied in order.
    ///
    /// One of `mirror-lr`, `mirror-fb` or `retrace`.
    #[structopt(short, long)]
    transform: Vec<Transform>,

    /// Sampling period in seconds.
    #[structopt(short, long, default_value = "0.1")]
    period: f64,

    /// Numerical parameters file, relative to the params directory.
    #[structopt(long, default_value = "pathfinder.toml")]
    params: String,

    /// Include the path library's debug and trace output in the log.
    #[structopt(short, long)]
    verbose: bool,
}

/// The contents of an input file.
#[derive(Debug, Deserialize)]
struct TrajectoryFile {
    specs: RobotSpecs,
    params: TrajectoryParams,
    moments: Vec<Moment>,
}

/// A single sample of the trajectory.
#[derive(Debug, Serialize)]
struct Sample {
    moment: Moment,
    position: Vec2D,
    left_wheel: Vec2D,
    right_wheel: Vec2D,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Transform {
    MirrorLeftRight,
    MirrorFrontBack,
    Retrace,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mirror-lr" => Ok(Transform::MirrorLeftRight),
            "mirror-fb" => Ok(Transform::MirrorFrontBack),
            "retrace" => Ok(Transform::Retrace),
            _ => Err(format!(
                "Unknown transform \"{}\", expected mirror-lr, mirror-fb or retrace",
                s
            )),
        }
    }
}

impl Transform {
    fn apply(&self, traj: &Trajectory) -> Trajectory {
        match self {
            Transform::MirrorLeftRight => traj.mirror_left_right(),
            Transform::MirrorFrontBack => traj.mirror_front_back(),
            Transform::Retrace => traj.retrace(),
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("traj_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let lib_level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    logger_init_with_targets(LevelFilter::Debug, &[("pathfinder", lib_level)], &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Pathfinder Trajectory Executable\n");
    info!("Running on: {}", host::get_platform());
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    if args.period <= 0.0 || !args.period.is_finite() {
        return Err(eyre!("The sampling period must be positive, got {}", args.period));
    }

    // ---- LOAD PARAMETERS ----

    let params: Params = match util::params::load(&args.params) {
        Ok(p) => p,
        Err(e) => {
            warn!(
                "Could not load params from {:?}, using defaults: {}",
                args.params, e
            );
            Params::default()
        }
    };

    info!("Parameters loaded: {:?}", params);

    // ---- LOAD TRAJECTORY ----

    let file = File::open(&args.input)
        .wrap_err_with(|| format!("Could not open the input file {:?}", args.input))?;
    let input: TrajectoryFile = serde_json::from_reader(BufReader::new(file))
        .wrap_err("Could not parse the input file")?;

    let mut traj = Trajectory::from_params(input.specs, input.params, input.moments, params)
        .wrap_err("Could not build the trajectory")?;

    info!(
        "Loaded trajectory with {} moments, lasting {:.3} s over {:.3}",
        traj.moments().len(),
        traj.total_time(),
        traj.path().total_length()
    );

    // ---- TRANSFORMS ----

    for transform in &args.transform {
        info!("Applying transform {:?}", transform);
        traj = transform.apply(&traj);
    }

    if !args.transform.is_empty() {
        session::save_with_timestamp("moments.json", traj.moments().to_vec());
    }

    // ---- SAMPLE ----

    let samples = sample(&traj, args.period);

    info!("Sampled {} points", samples.len());

    session.save("samples.json", samples);

    // ---- SHUTDOWN ----

    session.exit();

    Ok(())
}

/// Sample the trajectory from the start to the end (inclusive) at the given period.
fn sample(traj: &Trajectory, period: f64) -> Vec<Sample> {
    let total_time = traj.total_time();
    let num_periods = (total_time / period).floor() as usize;

    let mut times: Vec<f64> = (0..=num_periods).map(|i| i as f64 * period).collect();
    if times.last().map_or(true, |&t| t < total_time) {
        times.push(total_time);
    }

    times
        .into_iter()
        .map(|t| {
            let moment = traj.get(t);
            let s = moment.distance.abs();
            let (left_wheel, right_wheel) = traj.path().wheels_at(s);

            Sample {
                moment,
                position: traj.path().at(s),
                left_wheel,
                right_wheel,
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use pathfinder::Waypoint;

    fn three_moments() -> Trajectory {
        Trajectory::from_params(
            RobotSpecs::new(2.0, 1.0),
            TrajectoryParams::new(
                vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)],
                5.0,
            ),
            vec![
                Moment::new(0.0, 0.0, 1.0, 0.0, 0.0),
                Moment::new(5.0, 2.0, 0.0, 0.0, 2.0),
                Moment::new(10.0, 0.0, -1.0, 0.0, 4.0),
            ],
            Params::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_includes_end() {
        let samples = sample(&three_moments(), 1.5);
        let times: Vec<f64> = samples.iter().map(|s| s.moment.time).collect();

        assert_eq!(times, vec![0.0, 1.5, 3.0, 4.0]);
        assert!((samples[3].position - Vec2D::new(10.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_parse_transform() {
        assert!(matches!(
            "retrace".parse::<Transform>(),
            Ok(Transform::Retrace)
        ));
        assert!("sideways".parse::<Transform>().is_err());

        let args = Args::from_iter(vec![
            "traj_exec",
            "--input",
            "in.json",
            "-t",
            "mirror-lr",
            "-t",
            "retrace",
        ]);
        assert_eq!(args.transform.len(), 2);
        assert_eq!(args.params, "pathfinder.toml");
    }

    #[test]
    fn test_load_file() {
        let input: TrajectoryFile =
            serde_json::from_str(include_str!("../../demos/straight.json")).unwrap();

        assert!(input.params.is_tank);
        assert_eq!(input.moments.len(), 3);

        let traj = Trajectory::from_params(input.specs, input.params, input.moments, Params::default())
            .unwrap();
        assert_eq!(traj.path().base_radius(), 0.25);
    }
}
