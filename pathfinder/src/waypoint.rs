//! # Waypoints
//!
//! A waypoint is a point the path is required to pass through, along with the direction of travel
//! at that point.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::Vec2D;
use util::maths::{mirror_angle, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point on the path with a heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,

    pub y: f64,

    /// Direction of travel at the waypoint, measured anticlockwise from the +ve x axis.
    ///
    /// Units: radians
    pub heading: f64,

    /// Optional velocity the robot should have when passing the waypoint.
    ///
    /// This is only carried through to the profile generator, the path geometry does not use it.
    #[serde(default)]
    pub velocity: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Waypoint {
    /// Create a new waypoint with no velocity constraint.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading,
            velocity: None,
        }
    }

    /// Create a new waypoint which must be passed with the given velocity.
    pub fn with_velocity(x: f64, y: f64, heading: f64, velocity: f64) -> Self {
        Self {
            x,
            y,
            heading,
            velocity: Some(velocity),
        }
    }

    /// The position of the waypoint.
    pub fn position(&self) -> Vec2D {
        Vec2D::new(self.x, self.y)
    }

    /// The tangent at the waypoint, i.e. the unit heading vector scaled by `alpha`.
    pub fn tangent(&self, alpha: f64) -> Vec2D {
        Vec2D::new(self.heading.cos(), self.heading.sin()) * alpha
    }

    /// True if every field of the waypoint is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.heading.is_finite()
            && self.velocity.map_or(true, f64::is_finite)
    }

    /// Reflect the waypoint across the line through `origin` at angle `axis_rad`.
    pub(crate) fn reflected(&self, origin: &Vec2D, axis_rad: f64) -> Self {
        let axis = Vec2D::new(axis_rad.cos(), axis_rad.sin());
        let rel = self.position() - origin;
        let pos = origin + axis * (2.0 * axis.dot(&rel)) - rel;

        Self {
            x: pos.x,
            y: pos.y,
            heading: mirror_angle(self.heading, axis_rad),
            velocity: self.velocity,
        }
    }

    /// The same waypoint driven in the opposite direction.
    pub(crate) fn reversed(&self) -> Self {
        Self {
            heading: wrap_pi(self.heading + std::f64::consts::PI),
            velocity: self.velocity.map(|v| -v),
            ..*self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_reflected_across_x_axis() {
        let w = Waypoint::with_velocity(3.0, 2.0, 0.5, 1.5);
        let r = w.reflected(&Vec2D::zeros(), 0.0);

        assert!((r.x - 3.0).abs() < 1e-12);
        assert!((r.y + 2.0).abs() < 1e-12);
        assert!((r.heading + 0.5).abs() < 1e-12);
        assert_eq!(r.velocity, Some(1.5));
    }

    #[test]
    fn test_reflected_offset_axis() {
        // Reflect across the vertical line x = 1
        let w = Waypoint::new(3.0, 5.0, 0.0);
        let r = w.reflected(&Vec2D::new(1.0, 0.0), PI / 2.0);

        assert!((r.x + 1.0).abs() < 1e-12);
        assert!((r.y - 5.0).abs() < 1e-12);
        assert!((r.heading.abs() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_reversed() {
        let w = Waypoint::with_velocity(1.0, 1.0, PI / 4.0, 2.0);
        let r = w.reversed();

        assert_eq!(r.position(), w.position());
        assert!((r.heading + 3.0 * PI / 4.0).abs() < 1e-12);
        assert_eq!(r.velocity, Some(-2.0));
    }

    #[test]
    fn test_deserialise_without_velocity() {
        let w: Waypoint = serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "heading": 0.0}"#).unwrap();

        assert_eq!(w, Waypoint::new(1.0, 2.0, 0.0));
    }
}
