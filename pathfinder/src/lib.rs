//! # Pathfinder
//!
//! Smooth paths through waypoints for wheeled robots, and time based lookup of the motion profiles
//! generated along them.
//!
//! A [`Path`] is built once from a list of [`Waypoint`]s and queried by arc length. A
//! [`Trajectory`] binds a time ordered list of [`Moment`]s, generated externally, to a shared
//! path and is queried by time. Both can be mirrored or retraced to produce new, independent
//! objects.
//!
//! # Conventions
//!
//! - [`Path::deriv_at`] and [`Path::second_deriv_at`] are derivatives with respect to the segment
//!   parameter, not arc length. The direction of `deriv_at` is the direction of travel but its
//!   length is not 1, normalise it to get the unit tangent.
//! - The left wheel is on the left of the direction of travel of the curve, and swaps sides with
//!   the right wheel when the path is driven backwards.
//! - A negative moment distance means the robot drives backwards, spatial lookups use its
//!   magnitude.
//!
//! ```no_run
//! use pathfinder::{Path, Waypoint};
//!
//! let path = Path::new(
//!     vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)],
//!     5.0,
//! )?;
//! let mid = path.at(path.total_length() / 2.0);
//! # Ok::<(), pathfinder::PathError>(())
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod moment;
mod params;
mod path;
mod segment;
mod specs;
mod trajectory;
mod waypoint;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use moment::Moment;
pub use params::Params;
pub use path::{Path, PathError};
pub use segment::{PathType, Segment};
pub use specs::{RobotSpecs, TrajectoryParams};
pub use trajectory::{Trajectory, TrajectoryError};
pub use waypoint::Waypoint;

/// Re-export of the maths helpers used for interpolation.
pub use util::maths::{langle, lerp};

/// A 2D vector, used for positions and derivatives.
pub type Vec2D = nalgebra::Vector2<f64>;
