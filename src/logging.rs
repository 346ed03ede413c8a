use crate::error::{ConfigError, Result, RgpError};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    Layer, Registry,
};

#[derive(Debug)]
pub struct LoggerConfig {
    pub directory: String,
    pub file_name: String,
    pub rotation: Rotation,
    pub level: Level,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "rgp.log".to_string(),
            rotation: Rotation::DAILY,
            level: Level::INFO,
        }
    }
}

impl LoggerConfig {
    pub fn from_config(config: &crate::config::LogConfig) -> Result<Self> {
        Ok(Self {
            directory: config.directory.clone(),
            file_name: config.filename.clone(),
            rotation: Rotation::DAILY,
            level: parse_log_level(&config.level)?,
        })
    }
}

/// Installs the global subscriber: one layer to a daily rolling file and
/// one to stdout. Libraries embedding the client should install their own.
pub fn init_logging(config: LoggerConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory).map_err(|e| {
        RgpError::Configuration(ConfigError::InvalidValue(format!(
            "Failed to create log directory {}: {}",
            config.directory, e
        )))
    })?;

    let file_appender =
        RollingFileAppender::new(config.rotation, config.directory, config.file_name);

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(file_appender)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_filter(tracing::level_filters::LevelFilter::from_level(
            config.level,
        ));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .with_filter(tracing::level_filters::LevelFilter::from_level(
            config.level,
        ));

    let subscriber = Registry::default().with(file_layer).with(stdout_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        RgpError::Configuration(ConfigError::InvalidValue(format!(
            "Failed to set global subscriber: {}",
            e
        )))
    })?;

    Ok(())
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(RgpError::Configuration(ConfigError::InvalidValue(format!(
            "Invalid log level: {}",
            level
        )))),
    }
}

/// Short label for an error variant, used as the `kind` field in logs.
pub fn error_kind(err: &RgpError) -> &'static str {
    match err {
        RgpError::Configuration(_) => "configuration",
        RgpError::Internal(_) => "internal",
        RgpError::Transport { .. } => "transport",
        RgpError::Decode(_) => "decode",
        RgpError::Encode(_) => "encode",
        RgpError::Api { .. } => "api",
        RgpError::MalformedResponse(_) => "malformed_response",
        RgpError::Request(_) => "request",
        RgpError::Io(_) => "io",
    }
}

#[macro_export]
macro_rules! log_error {
    // Tag the event with the error and its kind
    ($err:expr => $($arg:tt)*) => {{
        let err: &$crate::error::RgpError = $err;
        let kind = $crate::logging::error_kind(err);
        tracing::error!(error = %err, kind, $($arg)*)
    }};
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*);
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*);
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}
