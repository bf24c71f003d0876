use crate::{
    estimator::{HeadingEstimator, HeadingSample},
    fix::Fix,
};

/// A `Iterator` wrapper for `Fix`.
/// This trait exposes additional functions on an `Iterator` over `Fix`.
pub trait FixIterator: Iterator<Item = Fix> {
    /// Feeds every fix through `estimator`, yielding the emitted samples.
    fn heading_samples(self, estimator: HeadingEstimator) -> HeadingSamples<Self>
    where
        Self: Sized,
    {
        HeadingSamples {
            fixes: self,
            estimator,
        }
    }
}

impl<I: Iterator<Item = Fix>> FixIterator for I {}

/// Iterator over the `HeadingSample`s produced from a stream of fixes.
///
/// Created by `FixIterator::heading_samples`.
pub struct HeadingSamples<I> {
    fixes: I,
    estimator: HeadingEstimator,
}

impl<I> HeadingSamples<I> {
    pub fn estimator(&self) -> &HeadingEstimator {
        &self.estimator
    }

    pub fn into_inner(self) -> (I, HeadingEstimator) {
        (self.fixes, self.estimator)
    }
}

impl<I: Iterator<Item = Fix>> Iterator for HeadingSamples<I> {
    type Item = HeadingSample;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let fix = self.fixes.next()?;
            if let Some(sample) = self.estimator.update(&fix) {
                return Some(sample);
            }
        }
    }
}
