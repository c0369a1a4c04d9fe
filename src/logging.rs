//! Logging setup on tracing + tracing-subscriber
//!
//! Console output goes to stderr so command results on stdout stay
//! machine-readable. An optional rolling file layer mirrors everything.
//! `RUST_LOG` is honored for per-module filtering.

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Keeps the non-blocking file writer alive; dropping it flushes pending lines.
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `-v`/`-vv` raise the configured level, `--quiet` drops to errors only.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = determine_level(settings, verbose, quiet);
    let env_filter = build_env_filter(level)?;
    let console_layer = build_console_layer(settings.json_format);

    let (file_layer, file_guard) = match settings.file {
        Some(ref log_file) => {
            let (layer, guard) = build_file_layer(log_file, settings)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::ConfigValidation {
            message: format!("failed to initialize logging: {}", e),
            field: None,
        })?;

    tracing::debug!(
        level = %level,
        file = ?settings.file,
        json = settings.json_format,
        "Logging initialized"
    );

    Ok(LogGuards {
        _file_guard: file_guard,
    })
}

fn determine_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => parse_level(&settings.level),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn directive(raw: &str) -> Result<Directive> {
    raw.parse().map_err(|e| Error::ConfigValidation {
        message: format!("invalid log directive '{}': {}", raw, e),
        field: Some("logging.level".to_string()),
    })
}

/// Level for this crate always follows the CLI; `RUST_LOG` may tune the rest.
fn build_env_filter(level: Level) -> Result<EnvFilter> {
    let base = level.to_string().to_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&base))
        .add_directive(directive(&format!("persona_community={}", base))?);
    Ok(filter)
}

fn build_console_layer<S>(json_format: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    if json_format {
        Box::new(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
    } else {
        Box::new(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
    }
}

fn build_file_layer<S>(log_file: &str, settings: &LoggingSettings) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let path = Path::new(log_file);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory).map_err(|e| Error::IoWrite {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let file_name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("persona-community");

    // tracing-appender only rotates by time; small size caps rotate hourly.
    let rotation = if settings.max_file_size_mb > 0 && settings.max_file_size_mb < 10 {
        Rotation::HOURLY
    } else {
        Rotation::DAILY
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(file_name)
        .filename_suffix("log")
        .max_log_files(settings.max_files.max(1) as usize)
        .build(directory)
        .map_err(|e| Error::ConfigValidation {
            message: format!("failed to create log file appender: {}", e),
            field: Some("logging.file".to_string()),
        })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer: BoxedLayer<S> = if settings.json_format {
        Box::new(fmt::layer().json().with_writer(writer).with_ansi(false))
    } else {
        Box::new(
            fmt::layer()
                .with_writer(writer)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        )
    };

    Ok((layer, guard))
}
