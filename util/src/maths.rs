//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Linearly interpolate between `a` and `b`.
///
/// `f` is the fraction of the way from `a` to `b`, a value of 0 gives `a` and a value of 1 gives
/// `b`. Values outside [0, 1] extrapolate.
pub fn lerp<T>(a: T, b: T, f: T) -> T
where
    T: Float,
{
    a + (b - a) * f
}

/// Interpolate between two angles along the shortest angular path.
///
/// The result is wrapped into (-pi, pi]. For example interpolating half way between 3.0 and -3.0
/// gives a value close to pi rather than 0.
pub fn langle<T>(a: T, b: T, f: T) -> T
where
    T: Float,
{
    wrap_pi(a + get_ang_dist(a, b) * f)
}

/// Clamp `value` into the range [`min`, `max`].
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Get the signed angular distance from `a` to `b`.
///
/// The result is the shortest signed rotation which takes `a` onto `b`, in the range (-pi, pi].
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float,
{
    wrap_pi(b - a)
}

/// Wrap an angle into the range (-pi, pi].
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float,
{
    let pi_t: T = pi();
    let tau_t: T = tau();

    let wrapped = rem_euclid(value + pi_t, tau_t) - pi_t;

    // rem_euclid gives [-pi, pi), move the lower bound over to the upper one
    if wrapped <= -pi_t {
        wrapped + tau_t
    } else {
        wrapped
    }
}

/// Reflect `angle` across the line through the origin at `ref_angle`.
///
/// The result is wrapped into (-pi, pi]. Applying the same reflection twice gives back the
/// original angle (modulo 2pi).
pub fn mirror_angle<T>(angle: T, ref_angle: T) -> T
where
    T: Float,
{
    wrap_pi(ref_angle + ref_angle - angle)
}

/// Signed curvature of a planar parametric curve from its first and second derivatives.
///
/// Positive curvature turns to the left (anticlockwise). If the curve has zero speed at the point
/// the curvature is undefined and zero is returned.
pub fn curvature<T>(x_deriv: T, x_second_deriv: T, y_deriv: T, y_second_deriv: T) -> T
where
    T: Float,
{
    let speed_sq = x_deriv * x_deriv + y_deriv * y_deriv;

    if speed_sq <= T::epsilon() {
        return T::zero();
    }

    (x_deriv * y_second_deriv - y_deriv * x_second_deriv) / (speed_sq * speed_sq.sqrt())
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn pi<T: Float>() -> T {
    T::from(std::f64::consts::PI).unwrap_or_else(T::nan)
}

fn tau<T: Float>() -> T {
    T::from(std::f64::consts::TAU).unwrap_or_else(T::nan)
}

#[cfg(test)]
mod test {
    use super::*;

    const TAU: f64 = std::f64::consts::TAU;
    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0f64)).abs() < 1e-12);
        assert!((wrap_pi(PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(-PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(3.0 * PI) - PI).abs() < 1e-9);
        assert!((wrap_pi(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_pi(-TAU - 0.5) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0f64, 10f64, 0.25), 2.5);
        assert_eq!(lerp(-2f64, 2f64, 0.5), 0.0);
        assert_eq!(lerp(1f64, 3f64, 0.0), 1.0);
        assert_eq!(lerp(1f64, 3f64, 1.0), 3.0);
    }

    #[test]
    fn test_langle_wraparound() {
        // 3.0 and -3.0 are ~0.28 rad apart through pi, the midpoint must be near +/- pi
        let mid = langle(3.0f64, -3.0f64, 0.5);
        assert!((mid.abs() - PI).abs() < 1e-9, "got {}", mid);

        // Ordinary interpolation with no wrap
        assert!((langle(0.0f64, 1.0, 0.5) - 0.5).abs() < 1e-12);
        assert!((langle(-0.5f64, 0.5, 0.25) + 0.25).abs() < 1e-12);

        // End points are reproduced
        assert!((langle(3.0f64, -3.0, 0.0) - 3.0).abs() < 1e-12);
        assert!((langle(3.0f64, -3.0, 1.0) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_angle() {
        assert!((mirror_angle(0.5f64, 0.0) + 0.5).abs() < 1e-12);
        assert!((mirror_angle(PI / 2.0, PI / 4.0)).abs() < 1e-12);

        // Involution
        let a = 2.7f64;
        let r = -1.1f64;
        assert!(get_ang_dist(a, mirror_angle(mirror_angle(a, r), r)).abs() < 1e-12);
    }

    #[test]
    fn test_curvature() {
        // Unit circle traversed anticlockwise: x = cos t, y = sin t
        let t = 0.3f64;
        let k = curvature(-t.sin(), -t.cos(), t.cos(), -t.sin());
        assert!((k - 1.0).abs() < 1e-12);

        // Clockwise (x = sin t, y = cos t) gives negative curvature
        let k = curvature(t.cos(), -t.sin(), -t.sin(), -t.cos());
        assert!((k + 1.0).abs() < 1e-12);

        // Degenerate
        assert_eq!(curvature(0f64, 1.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5f64, &0.0, &1.0), 1.0);
        assert_eq!(clamp(&-5f64, &0.0, &1.0), 0.0);
        assert_eq!(clamp(&0.5f64, &0.0, &1.0), 0.5);
    }
}
