//! Diagnostics for the console.
//!
//! Every event goes to stderr so that tables, forms and `export` JSON on
//! stdout can be piped. An optional `[logging] file` adds a rolling file sink.
//! `RUST_LOG` can tune foreign targets; the `regisena` target always follows
//! the level chosen from the config and `-v`/`-q`.

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Keeps the file writer alive. Dropping it flushes pending lines.
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Install the session subscriber: stderr console plus the optional file sink.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = determine_level(settings, verbose, quiet);
    let filter = build_env_filter(level)?;

    let (file_layer, file_guard) = match settings.file.as_deref() {
        Some(path) => {
            let (layer, guard) = build_file_layer(
                path,
                settings.max_file_size_mb,
                settings.max_files,
                settings.json_format,
            )?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(build_console_layer(settings.json_format))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

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

/// `-q` wins over `-v`; without flags the configured level applies.
fn determine_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => parse_level(&settings.level),
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Unknown names fall back to `warn`; `config validate` reports them.
fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn build_env_filter(level: Level) -> Result<EnvFilter> {
    let level_name = level.to_string().to_lowercase();
    let own_target = format!("regisena={}", level_name)
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid log directive: {}", e)))?;

    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&level_name))
        .add_directive(own_target))
}

fn build_console_layer<S>(json: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    if json {
        Box::new(layer.json().with_file(true).with_line_number(true))
    } else {
        Box::new(layer.compact())
    }
}

/// Rolling file sink next to `log_file`, named after its stem.
fn build_file_layer<S>(
    log_file: &str,
    max_size_mb: u64,
    max_files: u32,
    json: bool,
) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let path = Path::new(log_file);
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory).map_err(|e| Error::IoWrite {
        path: directory.to_path_buf(),
        source: e,
    })?;
    let prefix = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("regisena");

    // Rotation is time-based only, so small size caps rotate more often.
    let rotation = match max_size_mb {
        1..=9 => Rotation::HOURLY,
        _ => Rotation::DAILY,
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files.max(1) as usize)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Failed to create log file appender: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let layer: BoxedLayer<S> = if json {
        Box::new(layer.json())
    } else {
        Box::new(layer)
    };

    Ok((layer, guard))
}

/// Stderr-only subscriber for `config`, `catalog` and `version`.
pub fn init_simple(level: Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}
