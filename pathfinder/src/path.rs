//! # Path
//!
//! A path is a continuous curve through an ordered list of waypoints, made up of one segment per
//! pair of neighbouring waypoints.
//!
//! Geometry queries are made by arc length `s`. Internally each query is converted into the path
//! parameter `t`, where `t` lies in [0, N] for a path of N segments. The integer part of `t`
//! selects the segment and the fractional part is the parameter local to that segment.
//!
//! The conversion from `s` to `t` uses a table of cumulative segment lengths built when the path
//! is constructed (see [`Path::compute_len`]) and a safeguarded Newton iteration inside the
//! segment.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};

// Internal
use crate::{
    params::{simpson_samples, Params},
    segment::{PathType, Segment},
    waypoint::Waypoint,
    Vec2D,
};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Speeds below this are treated as zero by the `s2t` Newton step, which then bisects instead.
const MIN_NEWTON_SPEED: f64 = 1e-12;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A continuous path through a list of waypoints.
#[derive(Debug, Clone)]
pub struct Path {
    waypoints: Vec<Waypoint>,

    alpha: f64,

    path_type: PathType,

    params: Params,

    segments: Vec<Segment>,

    /// Arc length at the start of each segment, with the total length as the final element.
    seg_starts: Vec<f64>,

    /// Half the distance between the left and right wheels.
    base_radius: f64,

    backwards: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while building or modifying a [`Path`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("A path needs at least 2 waypoints, got {0}")]
    InsufficientWaypoints(usize),

    #[error("Alpha must be positive and finite, got {0}")]
    InvalidAlpha(f64),

    #[error("Waypoint {0} contains a non-finite value")]
    NonFiniteWaypoint(usize),

    #[error("The base radius must be non-negative and finite, got {0}")]
    NegativeBaseRadius(f64),

    #[error("Invalid numerical parameters: {0}")]
    InvalidParams(&'static str),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathError {
    /// True if the error was caused by an invalid argument given by the caller.
    ///
    /// All path errors are currently of this kind.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            PathError::InsufficientWaypoints(_)
            | PathError::InvalidAlpha(_)
            | PathError::NonFiniteWaypoint(_)
            | PathError::NegativeBaseRadius(_)
            | PathError::InvalidParams(_) => true,
        }
    }
}

impl Path {
    /// Build a quintic Hermite path with the default numerical parameters.
    ///
    /// The tangent at each waypoint is `alpha * (cos(heading), sin(heading))`, larger values of
    /// `alpha` give wider turns.
    pub fn new(waypoints: Vec<Waypoint>, alpha: f64) -> Result<Self, PathError> {
        Self::with_params(waypoints, alpha, PathType::default(), Params::default())
    }

    /// Build a path of the given type using the given numerical parameters.
    pub fn with_params(
        waypoints: Vec<Waypoint>,
        alpha: f64,
        path_type: PathType,
        params: Params,
    ) -> Result<Self, PathError> {
        params.validate()?;

        if waypoints.len() < 2 {
            return Err(PathError::InsufficientWaypoints(waypoints.len()));
        }

        if alpha <= 0.0 || !alpha.is_finite() {
            return Err(PathError::InvalidAlpha(alpha));
        }

        if let Some(i) = waypoints.iter().position(|w| !w.is_finite()) {
            return Err(PathError::NonFiniteWaypoint(i));
        }

        let path = Self::from_parts(waypoints, alpha, path_type, params, 0.0, false);

        debug!(
            "Built {:?} path with {} segments, length {:.4}",
            path.path_type,
            path.segments.len(),
            path.total_length()
        );

        Ok(path)
    }

    // ---- GEOMETRY ----

    /// Position on the path at arc length `s`.
    ///
    /// `s` is clamped into [0, total_length].
    pub fn at(&self, s: f64) -> Vec2D {
        let (seg, u) = self.segment_at(self.s2t(s));
        seg.position(u)
    }

    /// Derivative of the position with respect to the segment parameter at arc length `s`.
    ///
    /// The direction is the direction of travel of the curve, the magnitude is the speed of the
    /// segment's parameterisation rather than 1.
    pub fn deriv_at(&self, s: f64) -> Vec2D {
        let (seg, u) = self.segment_at(self.s2t(s));
        seg.velocity(u)
    }

    /// Second derivative of the position with respect to the segment parameter at arc length `s`.
    pub fn second_deriv_at(&self, s: f64) -> Vec2D {
        let (seg, u) = self.segment_at(self.s2t(s));
        seg.acceleration(u)
    }

    /// Signed curvature at arc length `s`, positive when turning anticlockwise.
    pub fn curvature_at(&self, s: f64) -> f64 {
        let (seg, u) = self.segment_at(self.s2t(s));
        seg.curvature(u)
    }

    /// Positions of the left and right wheels at arc length `s`, as `(left, right)`.
    ///
    /// The left wheel is offset by `base_radius` along the tangent rotated 90 degrees
    /// anticlockwise. When the path is driven backwards the robot faces the other way, so the two
    /// wheels are swapped.
    pub fn wheels_at(&self, s: f64) -> (Vec2D, Vec2D) {
        let (seg, u) = self.segment_at(self.s2t(s));
        let pos = seg.position(u);
        let deriv = seg.velocity(u);

        let heading = deriv.y.atan2(deriv.x);
        let offset = Vec2D::new(-heading.sin(), heading.cos()) * self.base_radius;

        let left = pos + offset;
        let right = pos - offset;

        if self.backwards {
            (right, left)
        } else {
            (left, right)
        }
    }

    // ---- ARC LENGTH ----

    /// Total arc length of the path.
    pub fn total_length(&self) -> f64 {
        self.seg_starts.last().copied().unwrap_or(0.0)
    }

    /// Recompute the length of the path with the given number of integration intervals per
    /// segment, returning the new total length.
    ///
    /// The count is rounded up to an even number of at least 2. Every later `s2t`/`t2s` query uses
    /// the new table, so repeated calls with the same count always give the same result.
    pub fn compute_len(&mut self, samples: usize) -> f64 {
        self.params.integration_samples = simpson_samples(samples);
        self.seg_starts = cumulative_lengths(&self.segments, self.params.integration_samples);

        trace!(
            "Path length with {} samples per segment: {}",
            self.params.integration_samples,
            self.total_length()
        );

        self.total_length()
    }

    /// Convert an arc length into the path parameter.
    ///
    /// `s` is clamped into [0, total_length] (NaN maps to 0). The result is within the configured
    /// `s2t_tolerance` in arc length of the true inverse. If the root finder does not converge
    /// within `s2t_max_iterations` the best estimate found is returned and a warning is logged.
    pub fn s2t(&self, s: f64) -> f64 {
        let num_segs = self.segments.len();
        let total = self.total_length();

        if s.is_nan() || s <= 0.0 {
            return 0.0;
        }
        if s >= total {
            return num_segs as f64;
        }

        // Index of the segment containing s
        let i = self.seg_starts[1..num_segs].partition_point(|&c| c <= s);
        let seg = &self.segments[i];
        let target = s - self.seg_starts[i];
        let seg_len = self.seg_starts[i + 1] - self.seg_starts[i];

        if seg_len <= 0.0 {
            return i as f64;
        }

        let samples = self.params.integration_samples;
        let tol = self.params.s2t_tolerance;

        let mut lo = 0.0;
        let mut hi = 1.0;
        let mut u = clamp(&(target / seg_len), &0.0, &1.0);
        let mut best = (f64::INFINITY, u);

        for _ in 0..self.params.s2t_max_iterations {
            let err = seg.length_to(u, samples) - target;

            if err.abs() < best.0 {
                best = (err.abs(), u);
            }
            if err.abs() <= tol {
                return i as f64 + u;
            }

            // Shrink the bracket around the root
            if err > 0.0 {
                hi = u;
            } else {
                lo = u;
            }

            let speed = seg.speed(u);
            let newton = u - err / speed;

            u = if speed > MIN_NEWTON_SPEED && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
        }

        warn!(
            "s2t did not converge for s = {} within {} iterations, error {:e}",
            s, self.params.s2t_max_iterations, best.0
        );

        i as f64 + best.1
    }

    /// Convert a path parameter into arc length.
    ///
    /// `t` is clamped into [0, N] for a path of N segments (NaN maps to 0).
    pub fn t2s(&self, t: f64) -> f64 {
        let num_segs = self.segments.len();

        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        let t = t.min(num_segs as f64);

        let i = (t.floor() as usize).min(num_segs - 1);
        let u = t - i as f64;

        self.seg_starts[i] + self.segments[i].length_to(u, self.params.integration_samples)
    }

    // ---- TRANSFORMS ----

    /// A new path which is the mirror image of this one about the direction of travel at the
    /// first waypoint, turning left turns into right turns and vice versa.
    pub fn mirror_left_right(&self) -> Self {
        let (origin, h0) = self.reference();

        let waypoints = self
            .waypoints
            .iter()
            .map(|w| w.reflected(&origin, h0))
            .collect();

        self.transformed(waypoints, self.backwards)
    }

    /// A new path which is the mirror image of this one about the line through the first waypoint
    /// perpendicular to its heading.
    ///
    /// The robot still faces the original direction at the start, so the new path is driven
    /// backwards.
    pub fn mirror_front_back(&self) -> Self {
        let (origin, h0) = self.reference();
        let axis = h0 + std::f64::consts::FRAC_PI_2;

        let waypoints = self
            .waypoints
            .iter()
            .map(|w| {
                let mut r = w.reflected(&origin, axis);
                r.velocity = r.velocity.map(|v| -v);
                r
            })
            .collect();

        self.transformed(waypoints, !self.backwards)
    }

    /// A new path which follows the same curve from the last waypoint back to the first.
    ///
    /// The robot keeps facing the same way, so the new path is driven in the opposite direction.
    /// `retrace().at(total_length - s)` is the same point as `at(s)`.
    pub fn retrace(&self) -> Self {
        let waypoints = self.waypoints.iter().rev().map(Waypoint::reversed).collect();

        self.transformed(waypoints, !self.backwards)
    }

    // ---- ACCESSORS ----

    /// Set the half distance between the left and right wheels used by [`Path::wheels_at`].
    pub fn set_base_radius(&mut self, base_radius: f64) -> Result<(), PathError> {
        if base_radius < 0.0 || !base_radius.is_finite() {
            return Err(PathError::NegativeBaseRadius(base_radius));
        }

        self.base_radius = base_radius;
        Ok(())
    }

    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    /// Set whether the robot drives the path in reverse.
    ///
    /// This does not change the shape of the path, only which side the wheels are on.
    pub fn set_backwards(&mut self, backwards: bool) {
        self.backwards = backwards;
    }

    pub fn is_backwards(&self) -> bool {
        self.backwards
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    // ---- PRIVATE ----

    /// Build a path from already validated parts.
    fn from_parts(
        waypoints: Vec<Waypoint>,
        alpha: f64,
        path_type: PathType,
        params: Params,
        base_radius: f64,
        backwards: bool,
    ) -> Self {
        let segments: Vec<Segment> = waypoints
            .windows(2)
            .map(|w| {
                Segment::new(
                    path_type,
                    w[0].position(),
                    w[1].position(),
                    w[0].tangent(alpha),
                    w[1].tangent(alpha),
                )
            })
            .collect();

        let seg_starts = cumulative_lengths(&segments, params.integration_samples);

        Self {
            waypoints,
            alpha,
            path_type,
            params,
            segments,
            seg_starts,
            base_radius,
            backwards,
        }
    }

    /// A new path through the given waypoints, sharing every other setting with this one.
    fn transformed(&self, waypoints: Vec<Waypoint>, backwards: bool) -> Self {
        Self::from_parts(
            waypoints,
            self.alpha,
            self.path_type,
            self.params,
            self.base_radius,
            backwards,
        )
    }

    /// Position and heading of the first waypoint, the reference for the mirror transforms.
    fn reference(&self) -> (Vec2D, f64) {
        let first = &self.waypoints[0];
        (first.position(), first.heading)
    }

    /// The segment and local parameter for path parameter `t`.
    fn segment_at(&self, t: f64) -> (&Segment, f64) {
        let last = self.segments.len() - 1;
        let i = if t > 0.0 {
            (t.floor() as usize).min(last)
        } else {
            0
        };

        (&self.segments[i], t - i as f64)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn cumulative_lengths(segments: &[Segment], samples: usize) -> Vec<f64> {
    let mut starts = Vec::with_capacity(segments.len() + 1);
    let mut total = 0.0;

    starts.push(total);
    for seg in segments {
        total += seg.length(samples);
        starts.push(total);
    }

    starts
}
