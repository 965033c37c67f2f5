//! Logging configuration and initialization.
//!
//! Presets pick a base filter, `--log target=level` flags refine it, and
//! `RUST_LOG` replaces both when set. Output is plain text or JSON lines.

use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Startup, connects and disconnects, warnings
    #[default]
    Production,
    /// Adds HTTP request lines and build output
    Verbose,
    /// Dropped frames and routing decisions
    Debug,
    /// Every relayed message
    Trace,
    /// Warnings and errors only
    Quiet,
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target level overrides (e.g., "devrelay::relay" -> DEBUG)
    pub overrides: HashMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Create a new LogConfig from CLI arguments.
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: Vec<String>,
        format: LogFormat,
    ) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else if trace {
            LogPreset::Trace
        } else if debug {
            LogPreset::Debug
        } else if verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Production
        };

        // "relay=debug" and "devrelay::relay=debug" are equivalent
        let mut overrides = HashMap::new();
        for override_str in log_overrides {
            for part in override_str.split(',') {
                if let Some((target, level_str)) = part.split_once('=') {
                    let target = target.trim();
                    let full_target = if target.starts_with("devrelay::") || target == "tower_http" {
                        target.to_string()
                    } else {
                        format!("devrelay::{}", target)
                    };

                    if let Some(level) = parse_level(level_str.trim()) {
                        overrides.insert(full_target, level);
                    }
                }
            }
        }

        Self {
            preset,
            overrides,
            format,
        }
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        EnvFilter::try_new(self.directives()).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Filter directives for the preset with overrides applied last.
    pub fn directives(&self) -> String {
        let mut directives: Vec<String> = match self.preset {
            LogPreset::Production => vec![
                "devrelay::startup=info".into(),
                "devrelay::scaffold=info".into(),
                "devrelay::relay=info".into(),
                "devrelay::ws=info".into(),
                "devrelay::api=warn".into(),
                "devrelay::bundle=warn".into(),
                "tower_http=warn".into(),
            ],
            LogPreset::Verbose => vec![
                "devrelay=info".into(),
                "tower_http=info".into(),
            ],
            LogPreset::Debug => vec![
                "devrelay=debug".into(),
                "tower_http=debug".into(),
            ],
            LogPreset::Trace => vec![
                "devrelay=trace".into(),
                "tower_http=trace".into(),
            ],
            LogPreset::Quiet => vec![
                "devrelay=warn".into(),
                "tower_http=error".into(),
            ],
        };

        for (target, level) in &self.overrides {
            directives.push(format!("{}={}", target, level_to_str(*level)));
        }

        directives.join(",")
    }
}

fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn level_to_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_config_from_cli_preset_priority() {
        let config = LogConfig::from_cli(true, true, true, true, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Quiet);

        let config = LogConfig::from_cli(true, true, true, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Trace);

        let config = LogConfig::from_cli(true, true, false, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Debug);

        let config = LogConfig::from_cli(true, false, false, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Verbose);

        let config = LogConfig::from_cli(false, false, false, false, vec![], LogFormat::Text);
        assert_eq!(config.preset, LogPreset::Production);
    }

    #[test]
    fn test_overrides_are_prefixed_and_applied_last() {
        let config = LogConfig::from_cli(
            false, false, false, true,
            vec!["relay=trace,ws=debug".into(), "tower_http=info".into(), "bundle=loud".into()],
            LogFormat::Text,
        );

        assert_eq!(config.overrides.get("devrelay::relay"), Some(&Level::TRACE));
        assert_eq!(config.overrides.get("devrelay::ws"), Some(&Level::DEBUG));
        assert_eq!(config.overrides.get("tower_http"), Some(&Level::INFO));
        assert!(!config.overrides.contains_key("devrelay::bundle"));

        let directives = config.directives();
        assert!(directives.starts_with("devrelay=warn"));
        assert!(directives.contains("devrelay::relay=trace"));
    }
}
