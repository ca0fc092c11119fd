//! # Path segments
//!
//! A segment is one smooth parametric curve between two neighbouring waypoints, parameterised by
//! `t` in [0, 1]. Three curve kinds are supported, all built from the same Hermite data (end point
//! positions and tangents):
//!
//! - `Bezier`: cubic Bezier with control points `P0, P0 + V0/3, P1 - V1/3, P1`.
//! - `CubicHermite`: cubic Hermite spline.
//! - `QuinticHermite`: quintic Hermite spline with zero second derivative at both ends.
//!
//! The cubic kinds describe the same curve, they are kept separate so paths generated with either
//! can be reproduced exactly.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::{params::simpson_samples, Vec2D};
use util::maths::{clamp, curvature};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The kind of curve used for every segment of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    Bezier,
    CubicHermite,
    QuinticHermite,
}

/// One segment of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Bezier {
        control_points: [Vec2D; 4],
    },
    CubicHermite {
        p0: Vec2D,
        p1: Vec2D,
        v0: Vec2D,
        v1: Vec2D,
    },
    QuinticHermite {
        p0: Vec2D,
        p1: Vec2D,
        v0: Vec2D,
        v1: Vec2D,
        a0: Vec2D,
        a1: Vec2D,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PathType {
    fn default() -> Self {
        PathType::QuinticHermite
    }
}

impl Segment {
    /// Build a segment of the given kind from end point positions and tangents.
    ///
    /// Quintic segments get zero second derivatives at both ends.
    pub fn new(path_type: PathType, p0: Vec2D, p1: Vec2D, v0: Vec2D, v1: Vec2D) -> Self {
        match path_type {
            PathType::Bezier => Segment::Bezier {
                control_points: [p0, p0 + v0 / 3.0, p1 - v1 / 3.0, p1],
            },
            PathType::CubicHermite => Segment::CubicHermite { p0, p1, v0, v1 },
            PathType::QuinticHermite => Segment::QuinticHermite {
                p0,
                p1,
                v0,
                v1,
                a0: Vec2D::zeros(),
                a1: Vec2D::zeros(),
            },
        }
    }

    /// The kind of curve this segment is.
    pub fn path_type(&self) -> PathType {
        match self {
            Segment::Bezier { .. } => PathType::Bezier,
            Segment::CubicHermite { .. } => PathType::CubicHermite,
            Segment::QuinticHermite { .. } => PathType::QuinticHermite,
        }
    }

    /// Position on the segment.
    ///
    /// `t` is clamped into [0, 1].
    pub fn position(&self, t: f64) -> Vec2D {
        let t = clamp(&t, &0.0, &1.0);

        match self {
            Segment::Bezier { control_points: p } => {
                let u = 1.0 - t;
                p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t)
                    + p[3] * (t * t * t)
            }
            Segment::CubicHermite { p0, p1, v0, v1 } => {
                let (t2, t3) = (t * t, t * t * t);
                p0 * (2.0 * t3 - 3.0 * t2 + 1.0)
                    + v0 * (t3 - 2.0 * t2 + t)
                    + p1 * (-2.0 * t3 + 3.0 * t2)
                    + v1 * (t3 - t2)
            }
            Segment::QuinticHermite {
                p0,
                p1,
                v0,
                v1,
                a0,
                a1,
            } => {
                let (t2, t3, t4, t5) = powers(t);
                p0 * (1.0 - 10.0 * t3 + 15.0 * t4 - 6.0 * t5)
                    + v0 * (t - 6.0 * t3 + 8.0 * t4 - 3.0 * t5)
                    + a0 * (0.5 * t2 - 1.5 * t3 + 1.5 * t4 - 0.5 * t5)
                    + a1 * (0.5 * t3 - t4 + 0.5 * t5)
                    + v1 * (-4.0 * t3 + 7.0 * t4 - 3.0 * t5)
                    + p1 * (10.0 * t3 - 15.0 * t4 + 6.0 * t5)
            }
        }
    }

    /// First derivative of the position with respect to `t`.
    ///
    /// `t` is clamped into [0, 1].
    pub fn velocity(&self, t: f64) -> Vec2D {
        let t = clamp(&t, &0.0, &1.0);

        match self {
            Segment::Bezier { control_points: p } => {
                let u = 1.0 - t;
                (p[1] - p[0]) * (3.0 * u * u)
                    + (p[2] - p[1]) * (6.0 * u * t)
                    + (p[3] - p[2]) * (3.0 * t * t)
            }
            Segment::CubicHermite { p0, p1, v0, v1 } => {
                let t2 = t * t;
                p0 * (6.0 * t2 - 6.0 * t)
                    + v0 * (3.0 * t2 - 4.0 * t + 1.0)
                    + p1 * (-6.0 * t2 + 6.0 * t)
                    + v1 * (3.0 * t2 - 2.0 * t)
            }
            Segment::QuinticHermite {
                p0,
                p1,
                v0,
                v1,
                a0,
                a1,
            } => {
                let (t2, t3, t4, _) = powers(t);
                p0 * (-30.0 * t2 + 60.0 * t3 - 30.0 * t4)
                    + v0 * (1.0 - 18.0 * t2 + 32.0 * t3 - 15.0 * t4)
                    + a0 * (t - 4.5 * t2 + 6.0 * t3 - 2.5 * t4)
                    + a1 * (1.5 * t2 - 4.0 * t3 + 2.5 * t4)
                    + v1 * (-12.0 * t2 + 28.0 * t3 - 15.0 * t4)
                    + p1 * (30.0 * t2 - 60.0 * t3 + 30.0 * t4)
            }
        }
    }

    /// Second derivative of the position with respect to `t`.
    ///
    /// `t` is clamped into [0, 1].
    pub fn acceleration(&self, t: f64) -> Vec2D {
        let t = clamp(&t, &0.0, &1.0);

        match self {
            Segment::Bezier { control_points: p } => {
                let u = 1.0 - t;
                (p[2] - p[1] * 2.0 + p[0]) * (6.0 * u) + (p[3] - p[2] * 2.0 + p[1]) * (6.0 * t)
            }
            Segment::CubicHermite { p0, p1, v0, v1 } => {
                p0 * (12.0 * t - 6.0)
                    + v0 * (6.0 * t - 4.0)
                    + p1 * (-12.0 * t + 6.0)
                    + v1 * (6.0 * t - 2.0)
            }
            Segment::QuinticHermite {
                p0,
                p1,
                v0,
                v1,
                a0,
                a1,
            } => {
                let (t2, t3, _, _) = powers(t);
                p0 * (-60.0 * t + 180.0 * t2 - 120.0 * t3)
                    + v0 * (-36.0 * t + 96.0 * t2 - 60.0 * t3)
                    + a0 * (1.0 - 9.0 * t + 18.0 * t2 - 10.0 * t3)
                    + a1 * (3.0 * t - 12.0 * t2 + 10.0 * t3)
                    + v1 * (-24.0 * t + 84.0 * t2 - 60.0 * t3)
                    + p1 * (60.0 * t - 180.0 * t2 + 120.0 * t3)
            }
        }
    }

    /// Speed of the curve at `t`, i.e. the arc length integrand `|velocity(t)|`.
    pub fn speed(&self, t: f64) -> f64 {
        self.velocity(t).norm()
    }

    /// Signed curvature at `t`, positive when turning anticlockwise.
    pub fn curvature(&self, t: f64) -> f64 {
        let d = self.velocity(t);
        let dd = self.acceleration(t);

        curvature(d.x, dd.x, d.y, dd.y)
    }

    /// Arc length of the segment from its start to `t`.
    ///
    /// The speed is integrated with the composite Simpson's rule on a fixed grid of `samples`
    /// intervals over [0, 1] (rounded up to an even number, at least 2). Whole panels below `t` are
    /// summed and the panel containing `t` is integrated up to `t` only, so the result is
    /// non-decreasing in `t`. The error falls as `samples^-4`.
    pub fn length_to(&self, t: f64, samples: usize) -> f64 {
        let t = clamp(&t, &0.0, &1.0);
        if t == 0.0 {
            return 0.0;
        }

        let num_panels = simpson_samples(samples) / 2;
        let width = 1.0 / num_panels as f64;

        // Panel containing t, t = 1 belongs to the last panel
        let k = ((t / width).floor() as usize).min(num_panels - 1);

        let whole: f64 = (0..k)
            .map(|j| self.simpson_panel(j as f64 * width, (j + 1) as f64 * width))
            .sum();

        let start = k as f64 * width;
        let panel = self.simpson_panel(start, start + width);
        let partial = clamp(&self.simpson_panel(start, t), &0.0, &panel);

        whole + partial
    }

    /// Total arc length of the segment.
    pub fn length(&self, samples: usize) -> f64 {
        self.length_to(1.0, samples)
    }

    /// Simpson's rule for the speed over [a, b].
    fn simpson_panel(&self, a: f64, b: f64) -> f64 {
        (b - a) / 6.0 * (self.speed(a) + 4.0 * self.speed(0.5 * (a + b)) + self.speed(b))
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn powers(t: f64) -> (f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    (t2, t3, t3 * t, t3 * t2)
}
