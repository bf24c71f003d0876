use courseval::prelude::*;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Duration,
};
use uom::si::{angle::degree, time::second};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn source<P: AsRef<Path>>(path: P) -> RmcSource<BufReader<File>> {
    let file = File::open(path).expect("fixture exists");
    RmcSource::new(BufReader::new(file)).with_time_base(TimeBase::Sentence)
}

#[test]
fn replay_eastbound_log() {
    let mut source = source(fixture_path("eastbound.nmea"));
    let report = Session::new(Budget::unlimited()).run_source(&mut source);

    assert_eq!(report.stop_reason, StopReason::SourceExhausted);
    assert_eq!(report.fixes_consumed, 11);
    assert_eq!(source.skipped(), 2);
    assert!(source.take_error().is_none());

    // The first fix has no course and only primes the estimator.
    assert_eq!(report.samples.len(), 10);
    let times: Vec<f64> = report
        .samples
        .iter()
        .map(|sample| sample.elapsed.get::<second>())
        .collect();
    assert_eq!(
        times,
        vec![2., 4., 6., 8., 10., 12., 14., 16., 18., 20.]
    );

    for sample in &report.samples {
        let calculated = sample.calculated.get::<degree>();
        assert!(
            (calculated - 90.).abs() < 1.,
            "calculated heading was {calculated}"
        );
    }

    let summary = Summary::from_samples(&report.samples);
    assert_eq!(summary.count, 10);
    assert!(summary.max_abs_error_deg < 1.);
}

#[test]
fn replay_with_fix_budget() {
    let report = Session::new(Budget::unlimited().with_max_fixes(3))
        .run(source(fixture_path("eastbound.nmea")));

    assert_eq!(report.stop_reason, StopReason::FixLimitReached);
    assert_eq!(report.fixes_consumed, 3);
    assert_eq!(report.samples.len(), 2);
}

#[test]
fn replay_through_iterator_adapter() {
    let samples: Vec<HeadingSample> = source(fixture_path("eastbound.nmea"))
        .heading_samples(HeadingEstimator::new())
        .collect();

    assert_eq!(samples.len(), 10);
}

/// A receiver without satellite lock, streaming void sentences forever.
struct NoLock;

impl Read for NoLock {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let line = b"$GPRMC,123520,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W,N*15\r\n";
        let n = line.len().min(buf.len());
        buf[..n].copy_from_slice(&line[..n]);
        Ok(n)
    }
}

#[test]
fn duration_budget_ends_session_without_fixes() {
    let mut source = RmcSource::new(BufReader::new(NoLock));
    let report = Session::new(Budget::unlimited().with_duration(Duration::from_millis(200)))
        .run_source(&mut source);

    assert_eq!(report.stop_reason, StopReason::DurationElapsed);
    assert_eq!(report.fixes_consumed, 0);
    assert!(report.samples.is_empty());
    assert!(source.skipped() > 0);
}
