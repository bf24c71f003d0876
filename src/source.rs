//! Decoding of NMEA 0183 RMC sentences into `Fix`es.

use crate::{
    error::Error,
    fix::{Fix, Position},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, error, warn};
use nmea0183::{ParseResult, Parser};
use std::{
    io::{BufRead, ErrorKind},
    time::Instant,
};
use uom::si::{
    angle::degree,
    f64::{Angle, Time, Velocity},
    time::second,
    velocity::knot,
};

/// Sentence prefixes accepted by `RmcSource`.
const RMC_PREFIXES: [&str; 2] = ["$GPRMC", "$GNRMC"];

/// Selects how fixes are stamped with their elapsed time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeBase {
    /// Time since the source was created, as measured by the host.
    #[default]
    WallClock,

    /// UTC time carried by each sentence, relative to the first accepted fix.
    ///
    /// Use this to replay recorded logs with their original timing.
    Sentence,
}

/// Yields valid `Fix`es from a newline framed stream of NMEA 0183 text.
///
/// Only `$GPRMC` and `$GNRMC` sentences with an active status are turned into
/// fixes. Everything else, including sentences with bad checksums or
/// malformed fields, is skipped. The stream ends at EOF or on the first
/// non-transient read error, which can be recovered with `take_error`, or
/// once the optional deadline has passed. The deadline is checked for every
/// line read, so a receiver streaming only void sentences cannot hold the
/// stream open past it.
pub struct RmcSource<R> {
    reader: R,
    time_base: TimeBase,
    started: Instant,
    deadline: Option<Instant>,
    first_timestamp: Option<NaiveDateTime>,
    buffer: Vec<u8>,
    skipped: usize,
    error: Option<Error>,
}

impl<R: BufRead> RmcSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            time_base: TimeBase::default(),
            started: Instant::now(),
            deadline: None,
            first_timestamp: None,
            buffer: Vec::new(),
            skipped: 0,
            error: None,
        }
    }

    pub fn with_time_base(mut self, time_base: TimeBase) -> Self {
        self.time_base = time_base;
        self
    }

    /// Ends the stream at the first line read after `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns the number of RMC sentences that were rejected.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the read error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Reads the next line, replacing invalid UTF-8.
    ///
    /// Returns `None` at EOF or after a fatal read error.
    fn next_line(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }

        self.buffer.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) if self.buffer.is_empty() => return None,
                Ok(_) => break,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
                    ) =>
                {
                    if self.deadline_passed() {
                        return None;
                    }
                    warn!("transient read error, retrying: {err}");
                    continue;
                }
                Err(err) => {
                    error!("failed to read fix stream: {err}");
                    self.error = Some(Error::Read(err));
                    return None;
                }
            }
        }

        Some(String::from_utf8_lossy(&self.buffer).trim().to_string())
    }

    fn decode(&mut self, line: &str) -> Option<Fix> {
        if !RMC_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            return None;
        }

        let fix = self.decode_rmc(line);
        if fix.is_none() {
            self.skipped += 1;
        }
        fix
    }

    fn decode_rmc(&mut self, line: &str) -> Option<Fix> {
        let fields: Vec<&str> = line.split(['*', ',']).collect();
        if fields.get(2) != Some(&"A") {
            debug!("skipping sentence without a valid fix: {line}");
            return None;
        }

        // A fresh parser per line keeps a truncated sentence from swallowing
        // the start of the next one.
        let mut parser = Parser::new();
        let mut parsed = None;
        for byte in line.bytes().chain(b"\r\n".iter().copied()) {
            if let Some(result) = parser.parse_from_byte(byte) {
                parsed = Some(result);
            }
        }

        let rmc = match parsed {
            Some(Ok(ParseResult::RMC(Some(rmc)))) => rmc,
            Some(Ok(_)) => {
                debug!("skipping sentence without a valid fix: {line}");
                return None;
            }
            Some(Err(err)) => {
                debug!("skipping malformed sentence ({err}): {line}");
                return None;
            }
            None => {
                debug!("skipping incomplete sentence: {line}");
                return None;
            }
        };

        let elapsed = match self.time_base {
            TimeBase::WallClock => Time::new::<second>(self.started.elapsed().as_secs_f64()),
            TimeBase::Sentence => {
                let Some(timestamp) = sentence_timestamp(&fields) else {
                    debug!("skipping sentence with malformed time or date: {line}");
                    return None;
                };
                let first = *self.first_timestamp.get_or_insert(timestamp);
                let millis = (timestamp - first).num_milliseconds();
                Time::new::<second>(millis as f64 / 1000.)
            }
        };

        Some(Fix::new(
            Position::from_degrees(rmc.latitude.as_f64(), rmc.longitude.as_f64()),
            Velocity::new::<knot>(widen(rmc.speed.as_knots())),
            rmc.course.map(|course| Angle::new::<degree>(widen(course.degrees))),
            elapsed,
        ))
    }
}

impl<R: BufRead> Iterator for RmcSource<R> {
    type Item = Fix;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.deadline_passed() {
                return None;
            }
            let line = self.next_line()?;
            if let Some(fix) = self.decode(&line) {
                return Some(fix);
            }
        }
    }
}

/// Widens a decoded `f32` through its shortest decimal form, so `84.4`
/// becomes `84.4` rather than `84.40000152`.
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

/// Reads the UTC time (field 1) and date (field 9) of an RMC sentence.
fn sentence_timestamp(fields: &[&str]) -> Option<NaiveDateTime> {
    let time = NaiveTime::parse_from_str(fields.get(1)?, "%H%M%S%.f").ok()?;
    let date = NaiveDate::parse_from_str(fields.get(9)?, "%d%m%y").ok()?;
    Some(NaiveDateTime::new(date, time))
}
