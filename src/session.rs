use crate::{
    estimator::{HeadingEstimator, HeadingSample},
    fix::Fix,
    source::RmcSource,
};
use log::info;
use std::{
    io::BufRead,
    time::{Duration, Instant},
};

/// Limits on how long a session keeps pulling fixes.
///
/// A session with no limits runs until its source is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Budget {
    pub duration: Option<Duration>,
    pub max_fixes: Option<usize>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_max_fixes(mut self, max_fixes: usize) -> Self {
        self.max_fixes = Some(max_fixes);
        self
    }

    /// The instant at which a session started at `started` runs out of time.
    pub fn deadline(&self, started: Instant) -> Option<Instant> {
        self.duration.map(|duration| started + duration)
    }
}

/// Why a session stopped pulling fixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    SourceExhausted,
    DurationElapsed,
    FixLimitReached,
}

/// Outcome of one evaluation session.
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub samples: Vec<HeadingSample>,
    pub fixes_consumed: usize,
    pub stop_reason: StopReason,
}

/// Drives a `HeadingEstimator` with fixes until the budget is spent.
pub struct Session {
    estimator: HeadingEstimator,
    budget: Budget,
}

impl Session {
    pub fn new(budget: Budget) -> Self {
        Self {
            estimator: HeadingEstimator::new(),
            budget,
        }
    }

    pub fn with_estimator(mut self, estimator: HeadingEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Pulls fixes from `source`, ending it at the duration budget.
    ///
    /// The deadline is handed to the source, which checks it for every line
    /// it reads. Rejected sentences therefore cannot keep the session alive.
    pub fn run_source<R: BufRead>(self, source: &mut RmcSource<R>) -> SessionReport {
        let started = Instant::now();
        if let Some(deadline) = self.budget.deadline(started) {
            source.set_deadline(deadline);
        }
        self.run_from(started, source)
    }

    /// Pulls fixes from `fixes` one at a time.
    ///
    /// The duration budget is checked before each fix is requested, so an
    /// iterator that blocks inside `next` delays the stop. Use `run_source`
    /// for `RmcSource`s.
    pub fn run<I>(self, fixes: I) -> SessionReport
    where
        I: IntoIterator<Item = Fix>,
    {
        self.run_from(Instant::now(), fixes)
    }

    fn run_from<I>(mut self, started: Instant, fixes: I) -> SessionReport
    where
        I: IntoIterator<Item = Fix>,
    {
        let out_of_time = |budget: &Budget| {
            budget
                .duration
                .is_some_and(|duration| started.elapsed() >= duration)
        };
        let mut fixes = fixes.into_iter();
        let mut samples = Vec::new();
        let mut fixes_consumed = 0;

        let stop_reason = loop {
            if out_of_time(&self.budget) {
                break StopReason::DurationElapsed;
            }
            if self
                .budget
                .max_fixes
                .is_some_and(|max_fixes| fixes_consumed >= max_fixes)
            {
                break StopReason::FixLimitReached;
            }

            let Some(fix) = fixes.next() else {
                if out_of_time(&self.budget) {
                    break StopReason::DurationElapsed;
                }
                break StopReason::SourceExhausted;
            };
            fixes_consumed += 1;

            if let Some(sample) = self.estimator.update(&fix) {
                samples.push(sample);
            }
        };

        info!(
            "session stopped ({stop_reason:?}) after {fixes_consumed} fixes and {} samples",
            samples.len()
        );

        SessionReport {
            samples,
            fixes_consumed,
            stop_reason,
        }
    }
}
