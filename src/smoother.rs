use crate::fix::Position;
use std::collections::VecDeque;
use uom::{
    ConstZero,
    si::f64::{Angle, Velocity},
};

/// Number of recent positions and speeds kept for smoothing.
pub const WINDOW_CAPACITY: usize = 5;

/// Rolling average over the most recent positions and speeds.
///
/// Both histories evict their oldest entry once `capacity` is exceeded.
#[derive(Clone, Debug)]
pub struct FixSmoother {
    positions: VecDeque<Position>,
    speeds: VecDeque<Velocity>,
    capacity: usize,
}

impl FixSmoother {
    /// Creates a new `FixSmoother` holding at most `capacity` entries.
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            positions: VecDeque::with_capacity(capacity),
            speeds: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a new position and speed.
    pub fn observe(&mut self, position: Position, speed: Velocity) {
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(position);

        if self.speeds.len() == self.capacity {
            self.speeds.pop_front();
        }
        self.speeds.push_back(speed);
    }

    /// Returns the arithmetic mean of the held positions.
    ///
    /// Panics if nothing has been observed yet.
    pub fn average_position(&self) -> Position {
        assert!(
            !self.positions.is_empty(),
            "average_position requires at least one observation"
        );

        let n = self.positions.len() as f64;
        let (lat, lon) = self
            .positions
            .iter()
            .fold((Angle::ZERO, Angle::ZERO), |(lat, lon), pos| {
                (lat + pos.latitude, lon + pos.longitude)
            });

        Position::new(lat / n, lon / n)
    }

    /// Returns the arithmetic mean of the held speeds.
    ///
    /// Panics if nothing has been observed yet.
    pub fn average_speed(&self) -> Velocity {
        assert!(
            !self.speeds.is_empty(),
            "average_speed requires at least one observation"
        );

        let sum = self
            .speeds
            .iter()
            .fold(Velocity::ZERO, |acc, speed| acc + *speed);
        sum / self.speeds.len() as f64
    }

    /// Returns the absolute change from the most recently observed speed to
    /// `current`, or zero if no speed has been observed.
    pub fn speed_delta(&self, current: Velocity) -> Velocity {
        match self.speeds.back() {
            Some(last) => (current - *last).abs(),
            None => Velocity::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FixSmoother {
    fn default() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use uom::si::{angle::degree, velocity::meter_per_second};

    fn v(mps: f64) -> Velocity {
        Velocity::new::<meter_per_second>(mps)
    }

    #[test]
    fn eviction_keeps_last_five() {
        let mut smoother = FixSmoother::default();
        for i in 0..7 {
            smoother.observe(Position::from_degrees(i as f64, -(i as f64)), v(i as f64));
        }

        assert_eq!(smoother.len(), WINDOW_CAPACITY);

        // Only 2, 3, 4, 5, 6 remain.
        let avg = smoother.average_position();
        assert_relative_eq!(avg.latitude.get::<degree>(), 4.0, epsilon = 1e-9);
        assert_relative_eq!(avg.longitude.get::<degree>(), -4.0, epsilon = 1e-9);
        assert_relative_eq!(smoother.average_speed().get::<meter_per_second>(), 4.0);
    }

    #[test]
    fn single_observation_is_its_own_average() {
        let mut smoother = FixSmoother::default();
        smoother.observe(Position::from_degrees(44.2187, -76.4747), v(1.25));

        let avg = smoother.average_position();
        assert_relative_eq!(avg.latitude.get::<degree>(), 44.2187, epsilon = 1e-9);
        assert_relative_eq!(avg.longitude.get::<degree>(), -76.4747, epsilon = 1e-9);
        assert_relative_eq!(smoother.average_speed().get::<meter_per_second>(), 1.25);
    }

    #[test]
    fn first_speed_delta_is_zero() {
        let smoother = FixSmoother::default();
        assert_eq!(smoother.speed_delta(v(3.0)), Velocity::ZERO);
    }

    #[rstest]
    #[case(1.0, 1.5, 0.5)]
    #[case(1.5, 1.0, 0.5)]
    #[case(0.05, 0.05, 0.0)]
    fn speed_delta_is_absolute(#[case] last: f64, #[case] current: f64, #[case] delta: f64) {
        let mut smoother = FixSmoother::default();
        smoother.observe(Position::from_degrees(0., 0.), v(last));
        assert_relative_eq!(
            smoother.speed_delta(v(current)).get::<meter_per_second>(),
            delta,
            epsilon = 1e-12
        );
    }

    #[test]
    #[should_panic]
    fn empty_average_position_panics() {
        FixSmoother::default().average_position();
    }

    #[test]
    #[should_panic]
    fn empty_average_speed_panics() {
        FixSmoother::default().average_speed();
    }
}
