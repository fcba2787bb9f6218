//! Installation of the global tracing subscriber.
//!
//! The library only emits events; binaries decide where they go.

use std::fs::File;

use anyhow::Context;
use time::{
    format_description::{self, parse},
    OffsetDateTime,
};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

/// Installs a subscriber writing every event, with local timestamps.
///
/// When `to_file` is set, events go to a new `<date>_<time>_rotation_log.txt` file in the
/// working directory, otherwise to stderr.
///
/// # Errors
/// Returned if the log file cannot be created or a global subscriber is already set.
pub fn init_logger(to_file: bool) -> anyhow::Result<()> {
    let local_offset =
        time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")?,
    );

    let writer = if to_file {
        let file_name = get_log_file_name()?;
        let file = File::create(&file_name)
            .with_context(|| format!("could not create log file {file_name}"))?;
        BoxMakeWriter::new(file)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber)
        .context("Could not set global default tracing subscriber, one is already set")
}

fn get_log_file_name() -> anyhow::Result<String> {
    let format = parse("[year]-[month]-[day]_[hour]-[minute]-[second]_rotation_log.txt")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(&format)?)
}

#[cfg(test)]
mod logger_tests {
    use super::*;

    #[test]
    fn log_file_name_is_dated() {
        let name = get_log_file_name().unwrap();
        assert!(name.ends_with("_rotation_log.txt"));
        assert!(name.starts_with("20"));
        assert!(!name.contains(':'));
    }
}
