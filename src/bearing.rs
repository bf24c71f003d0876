use crate::fix::Position;
use uom::si::{
    angle::{degree, radian},
    f64::Angle,
};

/// Computes the great-circle initial bearing from `from` towards `to`.
///
/// The bearing is taken CW from true north and is always within [0, 360)
/// degrees. Identical points produce a bearing of zero, but callers should not
/// rely on that value.
pub fn bearing(from: &Position, to: &Position) -> Angle {
    let lat1 = from.latitude.get::<radian>();
    let lat2 = to.latitude.get::<radian>();
    let delta_lon = to.longitude.get::<radian>() - from.longitude.get::<radian>();

    let x = delta_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let deg = x.atan2(y).to_degrees();

    Angle::new::<degree>(normalize(deg))
}

/// Wraps an angle in degrees into [0, 360).
fn normalize(deg: f64) -> f64 {
    let wrapped = (deg + 360.) % 360.;

    // (-tiny + 360) % 360 rounds to exactly 360.
    if wrapped >= 360. { 0. } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    fn p(lat: f64, lon: f64) -> Position {
        Position::from_degrees(lat, lon)
    }

    #[rstest]
    #[case(p(0., 0.), p(0., 1.), 90.)]
    #[case(p(0., 0.), p(1., 0.), 0.)]
    #[case(p(0., 0.), p(0., -1.), 270.)]
    #[case(p(0., 0.), p(-1., 0.), 180.)]
    fn cardinal_bearings(#[case] from: Position, #[case] to: Position, #[case] expected: f64) {
        assert_relative_eq!(
            bearing(&from, &to).get::<degree>(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn known_bearing() {
        // Kingston to Ottawa is roughly north east.
        let deg = bearing(&p(44.2312, -76.4860), &p(45.4215, -75.6972)).get::<degree>();
        assert_relative_eq!(deg, 24.8967, epsilon = 1e-3);
    }

    #[test]
    fn identical_points_are_deterministic() {
        let here = p(44.2187, -76.4747);
        let first = bearing(&here, &here);
        let second = bearing(&here, &here);
        assert_eq!(first, second);
    }

    #[quickcheck]
    fn bearing_in_range(lat1: i16, lon1: i16, lat2: i16, lon2: i16) -> TestResult {
        // Map onto valid latitudes and longitudes with sub-degree resolution.
        let lat = |v: i16| (v as f64 / i16::MAX as f64) * 90.;
        let lon = |v: i16| (v as f64 / i16::MAX as f64) * 180.;

        let deg = bearing(&p(lat(lat1), lon(lon1)), &p(lat(lat2), lon(lon2))).get::<degree>();
        TestResult::from_bool((0.0..360.0).contains(&deg))
    }
}
