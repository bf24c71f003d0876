// #![warn(missing_docs)]

//! GNSS Heading Evaluation Utilities
//!
//! Estimates the heading of a moving receiver from consecutive position fixes
//! and pairs it with the course reported by the receiver, so the accuracy of
//! the reported course can be evaluated offline.

pub mod bearing;
#[allow(missing_docs)]
pub mod error;
pub mod estimator;
pub mod fix;
pub mod iter;
pub mod session;
pub mod sink;
pub mod smoother;
pub mod source;

pub mod prelude {
    pub use crate::bearing::bearing;
    pub use crate::error::Error;
    pub use crate::estimator::{Decision, HeadingEstimator, HeadingSample, Phase};
    pub use crate::fix::{Fix, Position};
    pub use crate::iter::FixIterator;
    pub use crate::session::{Budget, Session, SessionReport, StopReason};
    pub use crate::sink::{CsvSink, ResultSink, Summary};
    pub use crate::smoother::FixSmoother;
    pub use crate::source::{RmcSource, TimeBase};
}
