//! ## tgreports-telemetry::logging
//! **File journal and error log for reports**
//!
//! Reports are emitted as `tracing` events on two targets:
//! - [`JOURNAL_TARGET`]: every report, written to the journal file
//! - [`ERROR_TARGET`]: warnings, errors and failed chat deliveries, written to
//!   both the journal and the error log
//!
//! Files are appended to through non-blocking writers; keep the returned
//! [`LogGuard`] alive for as long as the process logs.

use std::str::FromStr;

use tgreports_config::LoggingConfig;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::TelemetryError;

pub const JOURNAL_TARGET: &str = "tgreports::journal";
pub const ERROR_TARGET: &str = "tgreports::errors";

/// Flushes the file writers when dropped.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct ReportLogger;

impl ReportLogger {
    /// Installs the global subscriber: journal file, error file and, when
    /// enabled, a console mirror filtered by `RUST_LOG` (default `info`).
    pub fn init(config: &LoggingConfig) -> Result<LogGuard, TelemetryError> {
        let (layers, guard) = Self::layers(config)?;
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|_| TelemetryError::AlreadyInitialized)?;
        Ok(guard)
    }

    /// Builds the layers without installing them.
    pub fn layers<S>(config: &LoggingConfig) -> Result<(Vec<BoxedLayer<S>>, LogGuard), TelemetryError>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync + 'static,
    {
        let level = Level::from_str(&config.level)
            .map_err(|_| TelemetryError::InvalidLevel(config.level.clone()))?;
        let rotation = parse_rotation(&config.rotation)?;

        std::fs::create_dir_all(&config.directory)
            .map_err(|e| TelemetryError::LogDirectory(config.directory.clone(), e))?;

        let mut guards = Vec::new();
        let mut layers: Vec<BoxedLayer<S>> = Vec::new();

        let journal = RollingFileAppender::builder()
            .rotation(rotation.clone())
            .filename_prefix(&config.journal_file)
            .build(&config.directory)?;
        let (journal_writer, guard) = tracing_appender::non_blocking(journal);
        guards.push(guard);
        layers.push(
            fmt::layer()
                .with_writer(journal_writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(
                    Targets::new()
                        .with_target(JOURNAL_TARGET, level)
                        .with_target(ERROR_TARGET, level),
                )
                .boxed(),
        );

        let errors = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(&config.error_file)
            .build(&config.directory)?;
        let (error_writer, guard) = tracing_appender::non_blocking(errors);
        guards.push(guard);
        layers.push(
            fmt::layer()
                .with_writer(error_writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(Targets::new().with_target(ERROR_TARGET, Level::WARN))
                .boxed(),
        );

        if config.console {
            let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            guards.push(guard);
            layers.push(
                fmt::layer()
                    .with_writer(console_writer)
                    .with_target(false)
                    .with_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("info")),
                    )
                    .boxed(),
            );
        }

        Ok((layers, LogGuard { _guards: guards }))
    }
}

fn parse_rotation(rotation: &str) -> Result<Rotation, TelemetryError> {
    match rotation.to_lowercase().as_str() {
        "never" => Ok(Rotation::NEVER),
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        _ => Err(TelemetryError::InvalidRotation(rotation.to_string())),
    }
}
