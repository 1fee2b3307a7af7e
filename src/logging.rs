//! Structured JSONL logging plus human-readable stderr output.
//!
//! - **JSONL to file** (`<app data>/logs/arc-raiders-market.jsonl`) for later inspection
//! - **Compact to stderr** for developers running from a terminal
//!
//! # Usage
//!
//! ```rust,ignore
//! use arc_raiders_market::logging;
//!
//! // MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "app_start", "Application started");
//! logging::log("HOTKEY", "Registered ctrl+KeyF");
//! ```

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::paths;

const LOG_FILENAME: &str = "arc-raiders-market.jsonl";

// In-memory buffer of recent lines, read by the fatal error banner
static LOG_BUFFER: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();
const MAX_LOG_LINES: usize = 50;

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
pub fn init() -> LoggingGuard {
    let _ = LOG_BUFFER.set(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));

    let log_dir = paths::log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join(LOG_FILENAME);
    eprintln!("[ARC-MARKET] JSONL log: {}", log_path.display());

    let file: Box<dyn Write + Send> = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            Box::new(std::io::sink())
        }
    };

    // Non-blocking writer so file I/O never stalls the UI thread
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gpui=warn"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    // try_init: a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init();

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Application logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    paths::log_dir().join(LOG_FILENAME)
}

/// Category-tagged info log.
///
/// Prefer tracing macros directly when structured fields matter:
/// ```rust,ignore
/// tracing::info!(category = "OVERLAY", query_len = 5, "Query changed");
/// ```
pub fn log(category: &str, message: &str) {
    add_to_buffer(category, message);
    tracing::info!(category = category, "{}", message);
}

fn add_to_buffer(category: &str, message: &str) {
    if let Some(buffer) = LOG_BUFFER.get() {
        let mut buf = buffer.lock();
        if buf.len() >= MAX_LOG_LINES {
            buf.pop_front();
        }
        buf.push_back(format!("[{}] {}", category, message));
    }
}

/// Get the last N log lines, newest first
pub fn get_last_logs(n: usize) -> Vec<String> {
    match LOG_BUFFER.get() {
        Some(buffer) => buffer.lock().iter().rev().take(n).cloned().collect(),
        None => Vec::new(),
    }
}

/// Debug-only logging - compiled out in release builds
#[cfg(debug_assertions)]
pub fn log_debug(category: &str, message: &str) {
    add_to_buffer(category, message);
    tracing::debug!(category = category, "{}", message);
}

#[cfg(not(debug_assertions))]
pub fn log_debug(_category: &str, _message: &str) {}

/// Log a UI event with structured fields
pub fn log_ui_event(component: &str, action: &str, details: Option<&str>) {
    let msg = match details {
        Some(d) => format!("{} {} - {}", component, action, d),
        None => format!("{} {}", component, action),
    };
    add_to_buffer("UI", &msg);

    tracing::info!(
        event_type = "ui_event",
        component = component,
        action = action,
        details = details,
        "{}",
        msg
    );
}

/// Log an error with structured fields and context
pub fn log_error(category: &str, error: &str, context: Option<&str>) {
    let msg = match context {
        Some(ctx) => format!("{}: {} (context: {})", category, error, ctx),
        None => format!("{}: {}", category, error),
    };
    add_to_buffer("ERROR", &msg);

    tracing::error!(
        event_type = "error",
        category = category,
        error_message = error,
        context = context,
        "{}",
        msg
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_latest_lines() {
        let _ = LOG_BUFFER.set(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));
        for i in 0..(MAX_LOG_LINES + 5) {
            log("TEST", &format!("line {}", i));
        }
        let recent = get_last_logs(usize::MAX);
        assert!(recent.len() <= MAX_LOG_LINES);
        assert!(recent.contains(&format!("[TEST] line {}", MAX_LOG_LINES + 4)));
        assert!(!recent.contains(&"[TEST] line 0".to_string()));
        assert_eq!(get_last_logs(2).len(), 2);
    }

    #[test]
    fn test_log_path_is_jsonl_in_log_dir() {
        let path = log_path();
        assert_eq!(path.file_name().unwrap(), LOG_FILENAME);
        assert!(path.starts_with(paths::log_dir()));
    }
}
