//! Logging setup for hosts embedding the grid
//!
//! The grid itself only emits `tracing` events. Hosts that do not install their
//! own subscriber can call [`init`] to get a console layer, a rolling JSON file
//! layer, or both.

use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    /// Daily-rolling JSON files in [`LoggingConfig::log_dir`]
    File,
    Both,
}

impl LogOutput {
    fn console(self) -> bool {
        matches!(self, Self::Console | Self::Both)
    }

    fn file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub output: LogOutput,
    pub log_dir: PathBuf,
    /// Level of the dsgrid crates
    pub grid_level: Level,
    /// Level of everything else
    pub other_level: Level,
    /// Log span open/close around saves and column refreshes
    pub trace_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl LoggingConfig {
    pub fn development() -> Self {
        Self {
            output: LogOutput::Both,
            log_dir: log_directory(),
            grid_level: Level::DEBUG,
            other_level: Level::INFO,
            trace_spans: true,
        }
    }

    /// JSON files only, grid at info
    pub fn production() -> Self {
        Self {
            output: LogOutput::File,
            log_dir: log_directory(),
            grid_level: Level::INFO,
            other_level: Level::WARN,
            trace_spans: false,
        }
    }

    /// Console only, no files
    pub fn testing() -> Self {
        Self {
            output: LogOutput::Console,
            log_dir: std::env::temp_dir().join("dsgrid-tests"),
            grid_level: Level::TRACE,
            other_level: Level::DEBUG,
            trace_spans: true,
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn filter_directives(&self) -> String {
        let grid = self.grid_level.as_str().to_lowercase();
        format!(
            "{},dsgrid={},dsgrid_core={}",
            self.other_level.as_str().to_lowercase(),
            grid,
            grid
        )
    }

    fn span_events(&self) -> FmtSpan {
        // NEW rather than ENTER: awaited futures re-enter their span on every poll.
        if self.trace_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber
///
/// Fails if a global subscriber is already set or the log directory cannot be
/// created.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.output.console() {
        layers.push(console_layer(&config, filter.clone()));
    }
    if config.output.file() {
        layers.push(file_layer(&config, filter)?);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::info!(
        output = ?config.output,
        log_dir = %config.log_dir.display(),
        "Grid logging initialized"
    );
    Ok(())
}

pub fn init_default() -> anyhow::Result<()> {
    let config = if cfg!(debug_assertions) {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };
    init(config)
}

fn console_layer(config: &LoggingConfig, filter: EnvFilter) -> BoxedLayer {
    fmt::layer()
        .with_target(true)
        .with_span_events(config.span_events())
        .compact()
        .with_filter(filter)
        .boxed()
}

fn file_layer(config: &LoggingConfig, filter: EnvFilter) -> anyhow::Result<BoxedLayer> {
    std::fs::create_dir_all(&config.log_dir)?;
    let appender = tracing_appender::rolling::daily(&config.log_dir, "dsgrid.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The writer must outlive every subscriber; there is no shutdown hook.
    std::mem::forget(guard);

    Ok(fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_span_events(config.span_events())
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter)
        .boxed())
}

pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dsgrid")
        .join("logs")
}

/// Logs the elapsed time of a grid operation when dropped
pub struct TimingGuard {
    operation: &'static str,
    start: Instant,
}

impl TimingGuard {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        tracing::debug!(
            operation = self.operation,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            "Grid operation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_writes_files_only() {
        let config = LoggingConfig::production();
        assert!(config.output.file());
        assert!(!config.output.console());
        assert_eq!(config.filter_directives(), "warn,dsgrid=info,dsgrid_core=info");
    }

    #[test]
    fn test_testing_stays_on_console() {
        let config = LoggingConfig::testing();
        assert_eq!(config.output, LogOutput::Console);
        assert_eq!(config.filter_directives(), "debug,dsgrid=trace,dsgrid_core=trace");
    }

    #[test]
    fn test_log_directory_is_namespaced() {
        assert!(log_directory().ends_with("dsgrid/logs"));
    }
}
