//! Robot specifications and trajectory generation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::{segment::PathType, waypoint::Waypoint};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Physical limits and dimensions of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotSpecs {
    /// Units: distance units per second
    pub max_velocity: f64,

    /// Units: distance units per second squared
    pub max_acceleration: f64,

    /// Distance between the left and right wheels. Required for tank trajectories.
    #[serde(default)]
    pub base_width: Option<f64>,
}

/// The parameters a trajectory was generated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryParams {
    pub waypoints: Vec<Waypoint>,

    /// Tangent scale at each waypoint, see [`crate::Path::new`].
    pub alpha: f64,

    /// Number of moments the profile generator was asked for.
    #[serde(default)]
    pub sample_count: usize,

    /// If true the robot has a tank (differential) drivetrain and wheel positions are available.
    #[serde(default)]
    pub is_tank: bool,

    #[serde(default)]
    pub path_type: PathType,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RobotSpecs {
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            base_width: None,
        }
    }

    pub fn with_base_width(max_velocity: f64, max_acceleration: f64, base_width: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            base_width: Some(base_width),
        }
    }
}

impl TrajectoryParams {
    pub fn new(waypoints: Vec<Waypoint>, alpha: f64) -> Self {
        Self {
            waypoints,
            alpha,
            sample_count: 0,
            is_tank: false,
            path_type: PathType::default(),
        }
    }
}
