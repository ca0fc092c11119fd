//! # Moments
//!
//! A moment is a single time-stamped sample of the robot's motion along a path, as produced by a
//! motion profile generator.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{langle, lerp, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A kinematic sample of the robot at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    /// Distance travelled along the path since the start.
    ///
    /// Negative when the path is being driven backwards.
    pub distance: f64,

    pub velocity: f64,

    pub acceleration: f64,

    /// Direction of travel.
    ///
    /// Units: radians
    pub heading: f64,

    /// Time since the start of the trajectory.
    ///
    /// Units: seconds
    pub time: f64,

    /// Heading of the robot at the start of the trajectory.
    #[serde(default)]
    pub init_facing: f64,

    /// True if the robot is driving in reverse, i.e. facing opposite to the direction of travel.
    #[serde(default)]
    pub backwards: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Moment {
    pub fn new(distance: f64, velocity: f64, acceleration: f64, heading: f64, time: f64) -> Self {
        Self {
            distance,
            velocity,
            acceleration,
            heading,
            time,
            init_facing: 0.0,
            backwards: false,
        }
    }

    /// The direction the robot is facing in the world frame.
    pub fn facing_absolute(&self) -> f64 {
        if self.backwards {
            wrap_pi(self.heading + std::f64::consts::PI)
        } else {
            self.heading
        }
    }

    /// The direction the robot is facing relative to where it faced at the start.
    pub fn facing_relative(&self) -> f64 {
        wrap_pi(self.facing_absolute() - self.init_facing)
    }

    /// True if every numerical field is finite.
    pub fn is_finite(&self) -> bool {
        self.distance.is_finite()
            && self.velocity.is_finite()
            && self.acceleration.is_finite()
            && self.heading.is_finite()
            && self.time.is_finite()
            && self.init_facing.is_finite()
    }

    /// Interpolate between `self` and `other` at the given time.
    ///
    /// Scalar quantities are interpolated linearly, the heading along the shortest angular path.
    /// The facing data is taken from `self`.
    pub(crate) fn interpolate(&self, other: &Moment, time: f64) -> Moment {
        let f = (time - self.time) / (other.time - self.time);

        Moment {
            distance: lerp(self.distance, other.distance, f),
            velocity: lerp(self.velocity, other.velocity, f),
            acceleration: lerp(self.acceleration, other.acceleration, f),
            heading: langle(self.heading, other.heading, f),
            time,
            ..*self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_facing() {
        let mut m = Moment::new(1.0, 1.0, 0.0, 0.5, 1.0);
        m.init_facing = 0.25;

        assert_eq!(m.facing_absolute(), 0.5);
        assert!((m.facing_relative() - 0.25).abs() < 1e-12);

        m.backwards = true;
        assert!((m.facing_absolute() - (0.5 - PI)).abs() < 1e-12);
        assert!((m.facing_relative() - (0.25 - PI)).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate() {
        let a = Moment::new(0.0, 0.0, 1.0, 3.0, 0.0);
        let b = Moment::new(5.0, 2.0, 0.0, -3.0, 2.0);

        let m = a.interpolate(&b, 1.0);
        assert_eq!(m.distance, 2.5);
        assert_eq!(m.velocity, 1.0);
        assert_eq!(m.acceleration, 0.5);
        assert_eq!(m.time, 1.0);
        assert!((m.heading.abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_deserialise_defaults() {
        let m: Moment = serde_json::from_str(
            r#"{"distance": 1.0, "velocity": 2.0, "acceleration": 0.0, "heading": 0.0, "time": 3.0}"#,
        )
        .unwrap();

        assert_eq!(m, Moment::new(1.0, 2.0, 0.0, 0.0, 3.0));
        assert!(m.is_finite());
    }
}
