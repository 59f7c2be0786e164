//! Logger setup for the CLI.
//!
//! All user-facing output goes through the `log` macros so `--quiet` and
//! `--logfile` apply uniformly. Normal output is the bare message; `--verbose`
//! adds a timestamp, level and target.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

use crate::CliError;

/// Writes to stdout and, when set, to a log file with ANSI codes stripped.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = match logfile {
        Some(path) => Some(File::create(path).map_err(|e| {
            CliError::config(format!("Cannot open log file {}: {}", path.display(), e))
        })?),
        None => None,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.format(move |buf, record| {
        if verbose {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args(),
            )
        } else {
            writeln!(buf, "{}", record.args())
        }
    });

    builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
    builder
        .try_init()
        .map_err(|e| CliError::config(format!("Logger already initialised: {}", e)))
}
