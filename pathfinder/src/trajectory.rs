//! # Trajectory
//!
//! A trajectory binds a time ordered list of [`Moment`]s, produced by an external motion profile
//! generator, to the [`Path`] they were generated against.
//!
//! Lookups by time interpolate between the two moments either side of the requested time, linearly
//! for the scalar quantities and along the shortest angular path for the heading. Times outside
//! the trajectory are clamped to the first or last moment.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

// Internal
use crate::{
    moment::Moment,
    params::Params,
    path::{Path, PathError},
    specs::{RobotSpecs, TrajectoryParams},
    Vec2D,
};
use util::maths::{mirror_angle, wrap_pi};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Relative tolerance allowed on moment distances beyond the end of the path, to absorb the
/// difference between the generator's and the path's length integration.
const DISTANCE_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A time parameterised motion along a path.
#[derive(Debug, Clone)]
pub struct Trajectory {
    path: Arc<Path>,

    moments: Vec<Moment>,

    /// Direction the robot faces at the start of the trajectory.
    init_facing: f64,

    specs: RobotSpecs,

    params: TrajectoryParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while building a [`Trajectory`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrajectoryError {
    #[error("A trajectory needs at least one moment")]
    EmptyMoments,

    #[error("Moment {0} is earlier than the moment before it")]
    NonMonotonicTime(usize),

    #[error("Moment {0} contains a non-finite value")]
    NonFiniteMoment(usize),

    #[error("The distance of moment {0} is beyond the end of the path")]
    DistanceOutOfRange(usize),

    #[error("A tank trajectory requires the robot's base width")]
    MissingBaseWidth,

    #[error("The trajectory params do not describe the given path")]
    ParamsMismatch,

    #[error("Cannot build the path: {0}")]
    Path(#[from] PathError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectoryError {
    /// True if the error was caused by an invalid argument given by the caller.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            TrajectoryError::Path(e) => e.is_invalid_argument(),
            TrajectoryError::EmptyMoments
            | TrajectoryError::NonMonotonicTime(_)
            | TrajectoryError::NonFiniteMoment(_)
            | TrajectoryError::DistanceOutOfRange(_)
            | TrajectoryError::MissingBaseWidth
            | TrajectoryError::ParamsMismatch => true,
        }
    }
}

impl Trajectory {
    /// Bind a list of moments to the path they were generated against.
    ///
    /// The moments must be non-empty, finite, in non-decreasing order of time, and their
    /// distances must lie on the path. The waypoints, alpha and path type in `params` must be
    /// the ones the path was built from. The facing data of every moment is overwritten from the
    /// path.
    pub fn new(
        path: Arc<Path>,
        moments: Vec<Moment>,
        specs: RobotSpecs,
        params: TrajectoryParams,
    ) -> Result<Self, TrajectoryError> {
        if path.waypoints() != params.waypoints.as_slice()
            || path.alpha() != params.alpha
            || path.path_type() != params.path_type
        {
            return Err(TrajectoryError::ParamsMismatch);
        }

        if moments.is_empty() {
            return Err(TrajectoryError::EmptyMoments);
        }

        let max_dist = path.total_length() + DISTANCE_TOLERANCE * path.total_length().max(1.0);

        for (i, m) in moments.iter().enumerate() {
            if !m.is_finite() {
                return Err(TrajectoryError::NonFiniteMoment(i));
            }
            if i > 0 && m.time < moments[i - 1].time {
                return Err(TrajectoryError::NonMonotonicTime(i));
            }
            if m.distance.abs() > max_dist {
                return Err(TrajectoryError::DistanceOutOfRange(i));
            }
        }

        let traj = Self::from_parts(path, moments, specs, params);

        debug!(
            "Built trajectory with {} moments over {:.3} s",
            traj.moments.len(),
            traj.total_time()
        );

        Ok(traj)
    }

    /// Build the path described by `params` and bind the moments to it.
    ///
    /// For tank trajectories the path's base radius is set to half the robot's base width.
    pub fn from_params(
        specs: RobotSpecs,
        params: TrajectoryParams,
        moments: Vec<Moment>,
        numeric_params: Params,
    ) -> Result<Self, TrajectoryError> {
        let mut path = Path::with_params(
            params.waypoints.clone(),
            params.alpha,
            params.path_type,
            numeric_params,
        )?;

        if params.is_tank {
            let base_width = specs
                .base_width
                .ok_or(TrajectoryError::MissingBaseWidth)?;
            path.set_base_radius(base_width / 2.0)?;
        }

        Self::new(Arc::new(path), moments, specs, params)
    }

    // ---- LOOKUP ----

    /// Time of the last moment.
    pub fn total_time(&self) -> f64 {
        self.last().time
    }

    /// The moment at the given time.
    ///
    /// Times at or after the end return the last moment, times at or before the start (or NaN)
    /// return the first. A time which matches a moment exactly returns that moment unchanged,
    /// otherwise the two moments either side are interpolated.
    pub fn get(&self, time: f64) -> Moment {
        let first = &self.moments[0];
        let last = self.last();

        if time >= last.time {
            return *last;
        }
        if time.is_nan() || time <= first.time {
            return *first;
        }

        // Index of the last moment at or before the time, which can't be the last moment
        let i = self.moments.partition_point(|m| m.time <= time) - 1;
        let before = &self.moments[i];

        if before.time == time {
            *before
        } else {
            before.interpolate(&self.moments[i + 1], time)
        }
    }

    /// Position of the robot at the given time.
    pub fn position_at(&self, time: f64) -> Vec2D {
        self.path.at(self.get(time).distance.abs())
    }

    /// Positions of the left and right wheels at the given time, as `(left, right)`.
    pub fn wheels_at(&self, time: f64) -> (Vec2D, Vec2D) {
        self.path.wheels_at(self.get(time).distance.abs())
    }

    // ---- TRANSFORMS ----

    /// A new trajectory along the mirror image of the path, see [`Path::mirror_left_right`].
    pub fn mirror_left_right(&self) -> Self {
        let h0 = self.reference_heading();

        let moments = self
            .moments
            .iter()
            .map(|m| Moment {
                heading: mirror_angle(m.heading, h0),
                ..*m
            })
            .collect();

        trace!("Mirrored trajectory left/right about {:.4} rad", h0);

        self.transformed(self.path.mirror_left_right(), moments)
    }

    /// A new trajectory along the front/back mirror image of the path, driven in the opposite
    /// direction. See [`Path::mirror_front_back`].
    pub fn mirror_front_back(&self) -> Self {
        let axis = self.reference_heading() + FRAC_PI_2;

        let moments = self
            .moments
            .iter()
            .map(|m| Moment {
                distance: -m.distance,
                velocity: -m.velocity,
                acceleration: -m.acceleration,
                heading: mirror_angle(m.heading, axis),
                ..*m
            })
            .collect();

        trace!("Mirrored trajectory front/back about {:.4} rad", axis);

        self.transformed(self.path.mirror_front_back(), moments)
    }

    /// A new trajectory which drives back along the path from its end to its start, in the same
    /// time. See [`Path::retrace`].
    ///
    /// The moment at time `t` of the new trajectory is at the same place as the moment at
    /// `total_time - t` of this one. Distances are measured from the end of the path, which is the
    /// start of the retraced one, so a profile which stops short of the end of the path starts
    /// part way along the retraced path.
    pub fn retrace(&self) -> Self {
        let last = *self.last();
        let path = self.path.retrace();
        let length = self.path.total_length();
        let sign = if path.is_backwards() { -1.0 } else { 1.0 };

        let moments = self
            .moments
            .iter()
            .rev()
            .map(|m| Moment {
                distance: sign * (length - m.distance.abs()).max(0.0),
                velocity: -m.velocity,
                acceleration: m.acceleration,
                heading: wrap_pi(m.heading + PI),
                time: last.time - m.time,
                ..*m
            })
            .collect();

        trace!("Retraced trajectory");

        self.transformed(path, moments)
    }

    // ---- ACCESSORS ----

    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// The shared path the trajectory follows.
    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    pub fn init_facing(&self) -> f64 {
        self.init_facing
    }

    pub fn specs(&self) -> &RobotSpecs {
        &self.specs
    }

    pub fn params(&self) -> &TrajectoryParams {
        &self.params
    }

    pub fn is_tank(&self) -> bool {
        self.params.is_tank
    }

    // ---- PRIVATE ----

    /// Bind already validated moments to a path, setting their facing data from it.
    fn from_parts(
        path: Arc<Path>,
        mut moments: Vec<Moment>,
        specs: RobotSpecs,
        params: TrajectoryParams,
    ) -> Self {
        let backwards = path.is_backwards();
        let start_heading = path.waypoints()[0].heading;
        let init_facing = if backwards {
            wrap_pi(start_heading + PI)
        } else {
            start_heading
        };

        for m in moments.iter_mut() {
            m.init_facing = init_facing;
            m.backwards = backwards;
        }

        Self {
            path,
            moments,
            init_facing,
            specs,
            params,
        }
    }

    fn transformed(&self, path: Path, moments: Vec<Moment>) -> Self {
        let params = TrajectoryParams {
            waypoints: path.waypoints().to_vec(),
            ..self.params.clone()
        };

        Self::from_parts(Arc::new(path), moments, self.specs, params)
    }

    /// Heading of the path's first waypoint, the reference for the mirror transforms.
    fn reference_heading(&self) -> f64 {
        self.path.waypoints()[0].heading
    }

    fn last(&self) -> &Moment {
        &self.moments[self.moments.len() - 1]
    }
}
