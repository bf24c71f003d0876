#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::degree,
    f64::{Angle, Time, Velocity},
    time::second,
    velocity::meter_per_second,
};

/// A point on the WGS84 ellipsoid, ignoring altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub latitude: Angle,
    pub longitude: Angle,
}

impl Position {
    pub fn new(latitude: Angle, longitude: Angle) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a new `Position` from a latitude and longitude in degrees.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self::new(
            Angle::new::<degree>(latitude),
            Angle::new::<degree>(longitude),
        )
    }
}

impl From<(f64, f64)> for Position {
    fn from(tuple: (f64, f64)) -> Self {
        let (latitude, longitude) = tuple;
        Self::from_degrees(latitude, longitude)
    }
}

/// One decoded position, velocity and course report with a valid status.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fix {
    pub position: Position,

    /// Speed over ground.
    pub speed: Velocity,

    /// Course over ground as reported by the receiver, taken CW from true north.
    ///
    /// Receivers leave the course empty when they cannot determine one.
    pub reported_heading: Option<Angle>,

    /// Time since the start of the session.
    pub elapsed: Time,
}

impl Fix {
    pub fn new(
        position: Position,
        speed: Velocity,
        reported_heading: Option<Angle>,
        elapsed: Time,
    ) -> Self {
        Self {
            position,
            speed,
            reported_heading,
            elapsed,
        }
    }

    /// Convenience constructor taking plain degrees, m/s and seconds.
    pub fn from_raw(
        elapsed_s: f64,
        (latitude, longitude): (f64, f64),
        speed_mps: f64,
        reported_heading_deg: Option<f64>,
    ) -> Self {
        Self::new(
            Position::from_degrees(latitude, longitude),
            Velocity::new::<meter_per_second>(speed_mps),
            reported_heading_deg.map(Angle::new::<degree>),
            Time::new::<second>(elapsed_s),
        )
    }
}
