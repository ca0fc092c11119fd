//! Property tests over randomly generated paths and trajectories.

use approx::{abs_diff_eq, assert_abs_diff_eq};
use proptest::prelude::*;
use std::f64::consts::PI;

use pathfinder::{
    langle, Moment, Params, Path, PathType, RobotSpecs, Trajectory, TrajectoryParams, Vec2D,
    Waypoint,
};

const POS_EPS: f64 = 1e-6;

// ---------------------------------------------------------------------------
// STRATEGIES
// ---------------------------------------------------------------------------

/// Waypoints which move forwards in x with moderate headings, so the path has no cusps.
fn waypoints() -> impl Strategy<Value = Vec<Waypoint>> {
    prop::collection::vec((3.0f64..6.0, -2.0f64..2.0, -1.0f64..1.0), 1..5).prop_map(|steps| {
        let mut wps = vec![Waypoint::new(0.0, 0.0, 0.0)];
        let (mut x, mut y) = (0.0, 0.0);
        for (dx, dy, heading) in steps {
            x += dx;
            y += dy;
            wps.push(Waypoint::new(x, y, heading));
        }
        wps
    })
}

/// Waypoints with arbitrary headings, which can point against the direction of travel and make the
/// path loop or almost stop.
fn looping_waypoints() -> impl Strategy<Value = Vec<Waypoint>> {
    prop::collection::vec((-3.0f64..3.0, -3.0f64..3.0, -PI..PI), 2..5).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, heading))| Waypoint::new(x + 4.0 * i as f64, y, heading))
            .collect()
    })
}

fn path_type() -> impl Strategy<Value = PathType> {
    prop_oneof![
        Just(PathType::Bezier),
        Just(PathType::CubicHermite),
        Just(PathType::QuinticHermite),
    ]
}

fn path() -> impl Strategy<Value = Path> {
    (waypoints(), 2.0f64..5.0, path_type()).prop_map(|(wps, alpha, path_type)| {
        Path::with_params(wps, alpha, path_type, Params::default()).unwrap()
    })
}

/// A constant velocity trajectory along a random path, which may stop before the end of the path.
fn trajectory() -> impl Strategy<Value = Trajectory> {
    let end = prop_oneof![Just(1.0), 0.2f64..1.0];

    (waypoints(), 2.0f64..5.0, 2usize..50, end).prop_map(|(wps, alpha, num_moments, end)| {
        let length = end * Path::new(wps.clone(), alpha).unwrap().total_length();
        let moments = (0..num_moments)
            .map(|i| {
                let f = i as f64 / (num_moments - 1) as f64;
                Moment::new(f * length, 1.0, 0.0, (f - 0.5) * 2.0, f * length)
            })
            .collect();

        Trajectory::from_params(
            RobotSpecs::new(1.0, 1.0),
            TrajectoryParams::new(wps, alpha),
            moments,
            Params::default(),
        )
        .unwrap()
    })
}

/// Reflect a point across the line through `origin` at angle `axis`.
fn reflect(p: Vec2D, origin: Vec2D, axis: f64) -> Vec2D {
    let dir = Vec2D::new(axis.cos(), axis.sin());
    let d = p - origin;
    origin + dir * (2.0 * d.dot(&dir)) - d
}

fn close(a: Vec2D, b: Vec2D) -> bool {
    (a - b).norm() < POS_EPS
}

// ---------------------------------------------------------------------------
// PROPERTIES
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn segments_are_c1_continuous(path in path()) {
        for pair in path.segments().windows(2) {
            prop_assert!((pair[0].position(1.0) - pair[1].position(0.0)).norm() < 1e-9);
            prop_assert!((pair[0].velocity(1.0) - pair[1].velocity(0.0)).norm() < 1e-9);
        }
    }

    #[test]
    fn arc_length_inversion_round_trips(path in path(), f in 0.0f64..=1.0) {
        let n = path.segments().len() as f64;

        let t = f * n;
        prop_assert!((path.s2t(path.t2s(t)) - t).abs() < 1e-6, "t = {}", t);

        let s = f * path.total_length();
        prop_assert!(abs_diff_eq!(path.t2s(path.s2t(s)), s, epsilon = 1e-8), "s = {}", s);
    }

    #[test]
    fn t2s_is_monotonic(path in path(), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let n = path.segments().len() as f64;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };

        prop_assert!(path.t2s(lo * n) <= path.t2s(hi * n) + 1e-12);
    }

    #[test]
    fn t2s_is_monotonic_on_looping_paths(wps in looping_waypoints(), alpha in 1.0f64..10.0) {
        let path = Path::new(wps, alpha).unwrap();
        let n = path.segments().len();

        let mut prev = 0.0;
        for i in 0..=(n * 500) {
            let t = i as f64 / 500.0;
            let s = path.t2s(t);
            prop_assert!(s >= prev - 1e-12, "t = {}", t);
            if i % 25 == 0 {
                prop_assert!(abs_diff_eq!(path.t2s(path.s2t(s)), s, epsilon = 1e-8), "t = {}", t);
            }
            prev = s;
        }
    }

    #[test]
    fn compute_len_is_idempotent(mut path in path(), samples in 2usize..200) {
        let first = path.compute_len(samples);
        let second = path.compute_len(samples);

        prop_assert_eq!(first, second);
        prop_assert_eq!(path.total_length(), first);
    }

    #[test]
    fn retrace_reverses_traversal(path in path(), f in 0.0f64..=1.0) {
        let back = path.retrace();
        let total = path.total_length();
        let s = f * total;

        prop_assert!(abs_diff_eq!(back.total_length(), total, epsilon = 1e-9));
        prop_assert!(close(back.at(total - s), path.at(s)));
        prop_assert!(close(back.retrace().at(s), path.at(s)));
    }

    #[test]
    fn mirrors_are_involutions(path in path(), f in 0.0f64..=1.0) {
        let s = f * path.total_length();

        let lr = path.mirror_left_right();
        prop_assert!(abs_diff_eq!(lr.total_length(), path.total_length(), epsilon = 1e-9));
        prop_assert!(close(lr.mirror_left_right().at(s), path.at(s)));

        let fb = path.mirror_front_back();
        prop_assert!(abs_diff_eq!(fb.total_length(), path.total_length(), epsilon = 1e-9));
        prop_assert!(close(fb.mirror_front_back().at(s), path.at(s)));
        prop_assert_eq!(fb.mirror_front_back().is_backwards(), path.is_backwards());
    }

    #[test]
    fn get_stays_within_bounds(traj in trajectory(), f in -0.5f64..1.5) {
        let time = f * traj.total_time();
        let m = traj.get(time);
        let first = traj.moments()[0];
        let last = traj.moments()[traj.moments().len() - 1];

        prop_assert!(m.distance >= first.distance - 1e-12);
        prop_assert!(m.distance <= last.distance + 1e-12);
        if time >= traj.total_time() {
            prop_assert_eq!(m, last);
        }
        if time <= 0.0 {
            prop_assert_eq!(m, first);
        }
    }

    #[test]
    fn retrace_commutes_with_get(traj in trajectory(), f in 0.0f64..=1.0) {
        let back = traj.retrace();
        let total = traj.total_time();
        let time = f * total;

        let m = traj.get(time);
        let m_back = back.get(total - time);

        prop_assert!(abs_diff_eq!(m_back.velocity, -m.velocity, epsilon = 1e-9));
        prop_assert!(abs_diff_eq!(
            m_back.distance,
            -(traj.path().total_length() - m.distance),
            epsilon = 1e-9
        ));
        prop_assert!(abs_diff_eq!(
            util::maths::get_ang_dist(m_back.heading, m.heading + PI),
            0.0,
            epsilon = 1e-9
        ));
        prop_assert!(close(back.position_at(total - time), traj.position_at(time)));
    }

    #[test]
    fn mirrors_commute_with_get(traj in trajectory(), f in 0.0f64..=1.0) {
        let time = f * traj.total_time();
        let m = traj.get(time);
        let origin = traj.path().waypoints()[0].position();
        let h0 = traj.path().waypoints()[0].heading;
        let pos = traj.position_at(time);

        let lr_traj = traj.mirror_left_right();
        prop_assert!(close(lr_traj.position_at(time), reflect(pos, origin, h0)));

        let fb_traj = traj.mirror_front_back();
        prop_assert!(close(fb_traj.position_at(time), reflect(pos, origin, h0 + PI / 2.0)));

        let lr = lr_traj.get(time);
        prop_assert!(abs_diff_eq!(lr.distance, m.distance, epsilon = 1e-12));
        prop_assert!(abs_diff_eq!(
            util::maths::get_ang_dist(lr.heading, -m.heading),
            0.0,
            epsilon = 1e-9
        ));

        let fb = fb_traj.get(time);
        prop_assert!(abs_diff_eq!(fb.distance, -m.distance, epsilon = 1e-12));
        prop_assert!(fb.backwards);
    }

    #[test]
    fn langle_takes_the_short_way(a in -PI..PI, b in -PI..PI, f in 0.0f64..=1.0) {
        let h = langle(a, b, f);
        let full = util::maths::get_ang_dist(a, b);
        let part = util::maths::get_ang_dist(a, h);

        prop_assert!(h > -PI - 1e-12 && h <= PI + 1e-12);
        prop_assert!(part.abs() <= full.abs() + 1e-9);
    }
}

#[test]
fn straight_line_path() {
    let path = Path::new(
        vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)],
        5.0,
    )
    .unwrap();

    assert_abs_diff_eq!(path.total_length(), 10.0, epsilon = 1e-6);

    let mid = path.at(5.0);
    assert_abs_diff_eq!(mid.x, 5.0, epsilon = POS_EPS);
    assert_abs_diff_eq!(mid.y, 0.0, epsilon = POS_EPS);

    let d = path.deriv_at(2.0).normalize();
    assert_abs_diff_eq!(d.x, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(d.y, 0.0, epsilon = 1e-12);
}
