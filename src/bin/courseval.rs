use clap::{Parser, ValueEnum};
use courseval::prelude::*;
use log::{info, warn};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// NMEA source: a serial device node, a recorded log, or `-` for stdin.
    input: PathBuf,

    /// Test duration in seconds.
    #[arg(short, long, default_value_t = 60)]
    duration: u64,

    /// Stop after this many valid fixes.
    #[arg(long)]
    max_fixes: Option<usize>,

    /// Write samples to this CSV file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Clock::WallClock)]
    clock: Clock,
}

#[derive(Clone, Copy, ValueEnum)]
enum Clock {
    WallClock,
    Sentence,
}

impl From<Clock> for TimeBase {
    fn from(clock: Clock) -> Self {
        match clock {
            Clock::WallClock => TimeBase::WallClock,
            Clock::Sentence => TimeBase::Sentence,
        }
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path).map_err(|err| {
        Error::InvalidInput(format!("cannot open {}: {err}", path.display()))
    })?;
    Ok(Box::new(BufReader::new(file)))
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut budget = Budget::unlimited().with_duration(Duration::from_secs(args.duration));
    if let Some(max_fixes) = args.max_fixes {
        budget = budget.with_max_fixes(max_fixes);
    }

    info!("listening for NMEA RMC messages on {}", args.input.display());
    let mut source = RmcSource::new(open_input(&args.input)?).with_time_base(args.clock.into());
    let report = Session::new(budget).run_source(&mut source);

    info!(
        "test complete: {} fixes consumed, {} sentences rejected",
        report.fixes_consumed,
        source.skipped()
    );
    if let Some(err) = source.take_error() {
        warn!("session ended early: {err}");
    }

    if report.samples.is_empty() {
        println!("No valid data received.");
        return Ok(());
    }

    if let Some(path) = &args.output {
        let file = File::create(path).map_err(Error::Write)?;
        CsvSink::new(BufWriter::new(file)).accept(&report.samples)?;
        info!("wrote {} samples to {}", report.samples.len(), path.display());
    }

    let mut summary = Summary::default();
    summary.accept(&report.samples)?;
    println!("{summary}");

    Ok(())
}
