//! Numerical parameters for path length computation and arc length inversion

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::path::PathError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters controlling the numerical approximations made by a [`crate::Path`].
///
/// All fields have defaults so a parameter file only needs to list the values it overrides.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Number of Simpson's rule intervals used when integrating the speed of a segment.
    ///
    /// Higher values increase the accuracy of every length computation (and so of `s2t`/`t2s`)
    /// at a linear cost in evaluation time. Odd values are rounded up to the next even number.
    pub integration_samples: usize,

    /// Absolute arc length tolerance of the `s2t` inversion.
    ///
    /// Units: same as the waypoint positions.
    pub s2t_tolerance: f64,

    /// Maximum number of iterations of the `s2t` root finder. Bounds the worst case cost of a
    /// single query.
    pub s2t_max_iterations: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            integration_samples: 100,
            s2t_tolerance: 1e-9,
            s2t_max_iterations: 64,
        }
    }
}

impl Params {
    /// Check that the parameters can be used to build a path.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.integration_samples == 0 {
            return Err(PathError::InvalidParams("integration_samples must be non-zero"));
        }
        if self.s2t_tolerance <= 0.0 || !self.s2t_tolerance.is_finite() {
            return Err(PathError::InvalidParams(
                "s2t_tolerance must be positive and finite",
            ));
        }
        if self.s2t_max_iterations == 0 {
            return Err(PathError::InvalidParams("s2t_max_iterations must be non-zero"));
        }

        Ok(())
    }
}

/// Round a requested sample count to the even count Simpson's rule needs.
pub(crate) fn simpson_samples(samples: usize) -> usize {
    let samples = samples.max(2);
    samples + samples % 2
}
