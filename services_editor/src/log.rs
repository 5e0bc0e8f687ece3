//! Logging setup
//!
//! ## Environment Variable Priority
//!
//! 1. **`EDITOR_LOG`** - editor-specific filter; a bare level applies to the editor crates
//! 2. **`RUST_LOG`** - standard tracing filter, used as-is
//! 3. **Default** - `warn` globally, `info` for the editor crates
//!
//! Calling [`init`] again after a subscriber is installed is harmless.

use std::env;
use tracing_subscriber::{fmt, EnvFilter};

const EDITOR_CRATES: &[&str] = &["editor_core", "services_editor"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter used when neither environment variable is set
    pub default_directives: String,
    pub with_ansi: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directives: "warn,editor_core=info,services_editor=info".to_string(),
            with_ansi: true,
            with_target: true,
        }
    }
}

/// Install the global subscriber.
///
/// Returns false when one was already installed.
pub fn init(config: LogConfig) -> bool {
    let filter = create_filter(&config, env::var("EDITOR_LOG").ok(), env::var("RUST_LOG").ok());
    fmt()
        .with_env_filter(filter)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Initialize logging for tests
pub fn test() {
    let _ = init(LogConfig {
        with_ansi: false,
        ..LogConfig::default()
    });
}

fn create_filter(config: &LogConfig, editor_log: Option<String>, rust_log: Option<String>) -> EnvFilter {
    let directives = editor_log
        .map(|value| expand_editor_log(&value))
        .or(rust_log)
        .unwrap_or_else(|| config.default_directives.clone());

    EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directives:?}: {err}; using defaults");
        EnvFilter::new(&config.default_directives)
    })
}

/// `EDITOR_LOG=debug` becomes `warn,editor_core=debug,services_editor=debug`;
/// anything with module syntax is used as-is.
fn expand_editor_log(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }
    let mut directives = String::from("warn");
    for krate in EDITOR_CRATES {
        directives.push_str(&format!(",{krate}={value}"));
    }
    directives
}
