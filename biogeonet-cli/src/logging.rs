//! Structured logging for the `biogeonet` binary.
//!
//! Spans and events from the core and provider crates are written to
//! `stderr`, as text or JSON lines. `log` records are forwarded to `tracing`.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Selects the output format.
pub const LOG_FORMAT_ENV: &str = "BIOGEONET_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Output format of the log stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per event, with the enclosing span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Failures while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `BIOGEONET_LOG_FORMAT` is not valid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Variable name.
        name: &'static str,
        /// Lookup failure.
        #[source]
        source: env::VarError,
    },
    /// `BIOGEONET_LOG_FORMAT` names an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value.
        provided: String,
    },
    /// The global subscriber slot is taken.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error from `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber once; later calls return immediately.
///
/// `RUST_LOG` filters events (default `info`) and
/// [`LOG_FORMAT_ENV`] picks the [`LogFormat`].
///
/// # Errors
/// Returns [`LoggingError`] when the format variable is unreadable or
/// unknown. A subscriber installed by someone else is reported on `stderr`
/// and is not an error.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let format = format_from_env()?;
    if let Err(LoggingError::InstallFailed { source }) = install_subscriber(format) {
        report_existing_subscriber(&source);
    }
    let _ = INSTALLED.set(format);
    Ok(())
}

fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => raw.parse(),
        Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
        Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
            source,
        }),
    }
}

#[expect(
    clippy::print_stderr,
    reason = "tracing cannot report that it was already installed"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("biogeonet: keeping the existing log subscriber: {source}");
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let base = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let output = match format {
        LogFormat::Human => base.boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // The `log` slot may already be owned.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}
