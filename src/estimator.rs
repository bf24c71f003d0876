use crate::{
    bearing::bearing,
    fix::{Fix, Position},
    smoother::FixSmoother,
};
use log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::degree,
    f64::{Angle, Time, Velocity},
    time::second,
    velocity::meter_per_second,
};

/// Speed change or average speed above which the heading is recomputed.
pub fn motion_threshold() -> Velocity {
    Velocity::new::<meter_per_second>(0.2)
}

/// A calculated heading paired with the heading reported by the receiver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeadingSample {
    pub elapsed: Time,
    pub calculated: Angle,
    pub reported: Angle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No heading can be computed until a second fix arrives.
    AwaitingSecondFix,
    Tracking,
}

/// The branch taken by the most recent call to `HeadingEstimator::update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// First fix of the session, only recorded.
    Initialized,

    /// First heading, computed from the raw previous and current positions.
    Bootstrapped,

    /// Heading recomputed from the smoothed position.
    Recomputed,

    /// Not enough motion to trust a new bearing, previous heading kept.
    Held,
}

/// Estimates the heading of a moving receiver from consecutive fixes.
///
/// Each fix is fed to `update` in order. The first fix only primes the
/// estimator. The second fix always yields a heading using the raw bearing
/// between the two positions. Afterwards the heading is recomputed from the
/// smoothed position only when the receiver shows enough motion, and held
/// otherwise.
#[derive(Clone, Debug)]
pub struct HeadingEstimator {
    smoother: FixSmoother,
    previous_position: Option<Position>,
    last_known_speed: Option<Velocity>,
    last_valid_heading: Option<Angle>,
    has_computed_first_heading: bool,
    phase: Phase,
    last_decision: Option<Decision>,
}

impl HeadingEstimator {
    pub fn new() -> Self {
        Self::with_smoother(FixSmoother::default())
    }

    pub fn with_smoother(smoother: FixSmoother) -> Self {
        Self {
            smoother,
            previous_position: None,
            last_known_speed: None,
            last_valid_heading: None,
            has_computed_first_heading: false,
            phase: Phase::AwaitingSecondFix,
            last_decision: None,
        }
    }

    /// Consumes one valid fix.
    ///
    /// Returns a `HeadingSample` when a heading is known and `fix` carries a
    /// reported heading to compare against.
    pub fn update(&mut self, fix: &Fix) -> Option<HeadingSample> {
        let speed_diff = self.smoother.speed_delta(fix.speed);
        self.smoother.observe(fix.position, fix.speed);

        let Some(previous) = self.previous_position else {
            self.previous_position = Some(fix.position);
            self.last_known_speed = Some(fix.speed);
            self.last_decision = Some(Decision::Initialized);
            return None;
        };

        let avg_speed = self.smoother.average_speed();
        let decision = if !self.has_computed_first_heading {
            self.last_valid_heading = Some(bearing(&previous, &fix.position));
            self.has_computed_first_heading = true;
            Decision::Bootstrapped
        } else if speed_diff > motion_threshold() || avg_speed > motion_threshold() {
            let smoothed = self.smoother.average_position();
            self.last_valid_heading = Some(bearing(&smoothed, &fix.position));
            Decision::Recomputed
        } else {
            if let Some(heading) = self.last_valid_heading {
                debug!(
                    "speed change too small (delta={:.3} m/s), keeping last heading {:.2} deg",
                    speed_diff.get::<meter_per_second>(),
                    heading.get::<degree>()
                );
            }
            Decision::Held
        };
        self.last_decision = Some(decision);

        let sample = match (self.last_valid_heading, fix.reported_heading) {
            (Some(calculated), Some(reported)) => {
                info!(
                    "time: {:.1}s | speed: {:.2} m/s | delta speed: {:.3} m/s | avg speed: {:.2} m/s | calc heading: {:.2} deg | reported heading: {:.2} deg",
                    fix.elapsed.get::<second>(),
                    fix.speed.get::<meter_per_second>(),
                    speed_diff.get::<meter_per_second>(),
                    avg_speed.get::<meter_per_second>(),
                    calculated.get::<degree>(),
                    reported.get::<degree>(),
                );
                Some(HeadingSample {
                    elapsed: fix.elapsed,
                    calculated,
                    reported,
                })
            }
            _ => None,
        };

        self.previous_position = Some(fix.position);
        self.last_known_speed = Some(fix.speed);
        self.phase = Phase::Tracking;

        sample
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    pub fn last_valid_heading(&self) -> Option<Angle> {
        self.last_valid_heading
    }

    pub fn last_known_speed(&self) -> Option<Velocity> {
        self.last_known_speed
    }

    pub fn previous_position(&self) -> Option<Position> {
        self.previous_position
    }

    pub fn has_computed_first_heading(&self) -> bool {
        self.has_computed_first_heading
    }

    pub fn smoother(&self) -> &FixSmoother {
        &self.smoother
    }
}

impl Default for HeadingEstimator {
    fn default() -> Self {
        Self::new()
    }
}
