use thiserror::Error;
use tracing::{error, warn};

/// Error severity for display and logging decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // logged only
    Warning,  // recoverable, fallback used
    Error,    // operation failed
    Critical, // shown to the user in a modal dialog
}

impl ErrorSeverity {
    /// Whether the user gets a dialog; lower levels are only logged.
    pub fn needs_dialog(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// Domain-specific errors for ARC Raiders Market
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Failed to read price file '{path}': {source}")]
    DatabaseRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse price file: {0}")]
    DatabaseParse(#[from] serde_json::Error),

    #[error("Price file has an unexpected shape: {0}")]
    DatabaseShape(String),

    #[error("Failed to write price file '{path}': {source}")]
    DatabaseWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write app state '{path}': {source}")]
    StateWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hotkey registration failed: {0}")]
    HotkeyRegistration(String),

    #[error("Platform call failed: {0}")]
    Platform(String),

    #[error("Startup shortcut could not be created: {0}")]
    StartupShortcut(String),
}

impl MarketError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DatabaseRead { .. } => ErrorSeverity::Warning,
            Self::DatabaseParse(_) => ErrorSeverity::Warning,
            Self::DatabaseShape(_) => ErrorSeverity::Warning,
            Self::DatabaseWrite { .. } => ErrorSeverity::Info,
            Self::StateWrite { .. } => ErrorSeverity::Info,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::HotkeyRegistration(_) => ErrorSeverity::Error,
            Self::Platform(_) => ErrorSeverity::Info,
            Self::StartupShortcut(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::DatabaseRead { path, .. } => format!("Could not read prices from {}", path),
            Self::DatabaseParse(_) | Self::DatabaseShape(_) => {
                "The price file is invalid, built-in prices are used".to_string()
            }
            Self::DatabaseWrite { path, .. } | Self::StateWrite { path, .. } => {
                format!("Could not write {}", path)
            }
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::HotkeyRegistration(msg) => msg.clone(),
            Self::Platform(msg) => msg.clone(),
            Self::StartupShortcut(_) => "Could not create the startup shortcut. \
                 You may need to run the application as administrator once."
                .to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use arc_raiders_market::error::ResultExt;
///
/// // Clicks are best-effort
/// input.click_at(point).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

/// Panic in debug mode, log error in release mode.
///
/// Use for "impossible" states that should crash during development
/// but degrade gracefully in production.
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            tracing::error!("IMPOSSIBLE STATE: {}", format_args!($($fmt_arg)*));
        }
    };
}
