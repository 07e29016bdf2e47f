//! Station logging.
//!
//! [`init_with_level`] installs a `log` backend that writes one line per
//! record to stderr:
//!
//! ```text
//! [  0.412s I ringscore] detected 1 candidate regions
//! ```
//!
//! Records from this workspace pass at the requested level. Records from
//! other crates are held to `Warn` so decoder chatter stays out of the way
//! at `debug`. With the `tracing` feature, `init_tracing` sets up
//! `tracing-subscriber` instead.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

const OWN_PREFIX: &str = "ringscore";
const FOREIGN_LEVEL: LevelFilter = LevelFilter::Warn;

struct StationLogger {
    level: LevelFilter,
    started: Instant,
}

impl StationLogger {
    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_PREFIX) {
            self.level
        } else {
            self.level.min(FOREIGN_LEVEL)
        }
    }
}

/// `ringscore_cascade::detector` -> `cascade`, `ringscore` -> `ringscore`.
fn short_target(target: &str) -> &str {
    let krate = target.split("::").next().unwrap_or(target);
    krate
        .strip_prefix("ringscore_")
        .filter(|rest| !rest.is_empty())
        .unwrap_or(krate)
}

fn level_letter(level: Level) -> char {
    match level {
        Level::Error => 'E',
        Level::Warn => 'W',
        Level::Info => 'I',
        Level::Debug => 'D',
        Level::Trace => 'T',
    }
}

impl Log for StationLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{:7.3}s {} {}] {}\n",
            self.started.elapsed().as_secs_f64(),
            level_letter(record.level()),
            short_target(record.target()),
            record.args()
        );
        // One write per record keeps lines whole when threads interleave.
        let _ = io::stderr().lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: OnceLock<StationLogger> = OnceLock::new();

/// Install the stderr logger.
///
/// Only the first call has any effect; the level cannot be changed later.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StationLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Parse `"off" | "error" | "warn" | "info" | "debug" | "trace"`, falling
/// back to `Info` for anything else.
pub fn parse_level(s: &str) -> LevelFilter {
    LevelFilter::from_str(s.trim()).unwrap_or(LevelFilter::Info)
}

/// Install a `tracing` subscriber with span-close timing.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this workspace
/// and other crates are held to `warn`.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(feature = "tracing")]
fn default_directives(level: LevelFilter) -> String {
    let own = level.to_string().to_lowercase();
    let foreign = level.min(FOREIGN_LEVEL).to_string().to_lowercase();
    format!(
        "{foreign},ringscore={own},ringscore_core={own},ringscore_cascade={own},ringscore_scoring={own}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: LevelFilter) -> StationLogger {
        StationLogger {
            level,
            started: Instant::now(),
        }
    }

    #[test]
    fn parse_level_accepts_names_and_defaults() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn foreign_crates_are_held_to_warn() {
        let l = logger(LevelFilter::Debug);
        assert_eq!(l.limit_for("ringscore_cascade::detector"), LevelFilter::Debug);
        assert_eq!(l.limit_for("image::codecs::png"), LevelFilter::Warn);
        assert_eq!(logger(LevelFilter::Error).limit_for("png"), LevelFilter::Error);
    }

    #[test]
    fn targets_are_shortened() {
        assert_eq!(short_target("ringscore_cascade::detector"), "cascade");
        assert_eq!(short_target("ringscore::pipeline"), "ringscore");
        assert_eq!(short_target("image::codecs"), "image");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_directives_follow_level() {
        let d = default_directives(LevelFilter::Debug);
        assert!(d.starts_with("warn,"));
        assert!(d.contains("ringscore_cascade=debug"));
    }
}
