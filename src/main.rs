// Release builds on Windows run without a console window
#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

use std::io::BufRead;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use clap::Parser;

use arc_raiders_market::app::{self, RunOptions};
use arc_raiders_market::config::load_config;
use arc_raiders_market::items::{default_database_path, load_from, RunMode};
use arc_raiders_market::logging;
use arc_raiders_market::paths;

/// Price lookup overlay for ARC Raiders
#[derive(Debug, Parser)]
#[command(name = "arc-raiders-market", version)]
struct Args {
    /// Price file to load instead of the one next to the executable
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Config file to read instead of the per-user default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Development mode: seed a missing price file and wait for Enter after a crash
    #[arg(long)]
    dev: bool,

    /// Show the overlay immediately after startup
    #[arg(long)]
    show: bool,
}

fn main() {
    let args = Args::parse();
    let log_guard = logging::init();

    let config_path = args.config.clone().unwrap_or_else(paths::default_config_path);
    let config = load_config(&config_path);

    let run_mode = if args.dev {
        RunMode::Development
    } else {
        RunMode::detect()
    };

    let database_path = args
        .database
        .clone()
        .or_else(|| config.database_path.clone())
        .unwrap_or_else(default_database_path);
    let loaded = load_from(&database_path, run_mode);

    logging::log(
        "APP",
        &format!(
            "Starting: {} items from {:?}, hotkey={}, mode={:?}",
            loaded.database.len(),
            loaded.source,
            config.hotkey.display(),
            run_mode
        ),
    );

    let options = RunOptions {
        config,
        database: loaded.database,
        show_on_launch: args.show,
    };

    // Hotkeys and the tray are owned by the UI loop and are released while
    // unwinding, so a panic still leaves the system clean.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| app::run(options)));

    if let Err(payload) = outcome {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());

        logging::log("APP", "╔════════════════════════════════════════╗");
        logging::log("APP", "║  FATAL ERROR                           ║");
        logging::log("APP", "╚════════════════════════════════════════╝");
        logging::log_error("APP", &reason, Some("UI event loop"));
        for line in logging::get_last_logs(20).into_iter().rev() {
            eprintln!("  {}", line);
        }

        if run_mode.is_development() {
            eprintln!("Press Enter to exit...");
            let mut line = String::new();
            let _ = std::io::stdin().lock().read_line(&mut line);
        }
        // Flush the file writer before exit skips destructors
        drop(log_guard);
        std::process::exit(1);
    }

    logging::log("APP", "Exited cleanly");
}
