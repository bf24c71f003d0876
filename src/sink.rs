use crate::{error::Error, estimator::HeadingSample};
use std::{fmt, io::Write};
use uom::si::{
    angle::{degree, radian},
    time::second,
};

/// Consumes the ordered samples of one session.
pub trait ResultSink {
    fn accept(&mut self, samples: &[HeadingSample]) -> Result<(), Error>;
}

/// Writes samples as CSV rows of elapsed seconds and headings in radians.
pub struct CsvSink<W> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn accept(&mut self, samples: &[HeadingSample]) -> Result<(), Error> {
        writeln!(self.writer, "elapsed_s,calculated_rad,reported_rad").map_err(Error::Write)?;

        for sample in samples {
            writeln!(
                self.writer,
                "{:.3},{:.6},{:.6}",
                sample.elapsed.get::<second>(),
                sample.calculated.get::<radian>(),
                sample.reported.get::<radian>(),
            )
            .map_err(Error::Write)?;
        }

        self.writer.flush().map_err(Error::Write)
    }
}

/// Accuracy of the calculated headings against the reported ones.
///
/// Errors are the calculated minus the reported heading, wrapped into
/// [-180, 180) degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_abs_error_deg: f64,
    pub rms_error_deg: f64,
    pub max_abs_error_deg: f64,
}

impl Summary {
    pub fn from_samples(samples: &[HeadingSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let errors: Vec<f64> = samples.iter().map(heading_error_deg).collect();
        let n = errors.len() as f64;

        Self {
            count: errors.len(),
            mean_abs_error_deg: errors.iter().map(|e| e.abs()).sum::<f64>() / n,
            rms_error_deg: (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt(),
            max_abs_error_deg: errors.iter().map(|e| e.abs()).fold(0., f64::max),
        }
    }
}

impl ResultSink for Summary {
    fn accept(&mut self, samples: &[HeadingSample]) -> Result<(), Error> {
        *self = Self::from_samples(samples);
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 20;
        writeln!(f, "{:WIDTH$} {}", "samples", self.count)?;
        writeln!(f, "{:WIDTH$} {:.2}", "mean_abs_error_deg", self.mean_abs_error_deg)?;
        writeln!(f, "{:WIDTH$} {:.2}", "rms_error_deg", self.rms_error_deg)?;
        write!(f, "{:WIDTH$} {:.2}", "max_abs_error_deg", self.max_abs_error_deg)
    }
}

/// Signed difference between the calculated and reported heading.
pub fn heading_error_deg(sample: &HeadingSample) -> f64 {
    let diff = sample.calculated.get::<degree>() - sample.reported.get::<degree>();
    (diff + 180.).rem_euclid(360.) - 180.
}
