//! Application wiring
//!
//! Builds the services, opens the (hidden) overlay, starts the listener
//! threads and asks the one-time startup question.

use std::sync::Arc;

use anyhow::Context as _;
use gpui::{App, Application};

use crate::config::Config;
use crate::coordinator::HotkeyCoordinator;
use crate::dialog::open_dialog;
use crate::error::{MarketError, ResultExt};
use crate::hotkeys::{self, GlobalHotkeys};
use crate::items::ItemDatabase;
use crate::logging;
use crate::overlay::{
    open_overlay_window, start_message_pump, ui_queue, OverlayController, OverlayServices,
    UiMessage,
};
use crate::platform::{self, GlobalHotkeyService, ThreadSpawner};
use crate::startup::{
    create_startup_entry, handle_startup_answer, FirstRunFlag, STARTUP_ERROR_TITLE,
    STARTUP_PROMPT_MESSAGE, STARTUP_PROMPT_TITLE,
};

pub struct RunOptions {
    pub config: Config,
    pub database: ItemDatabase,
    /// Show the overlay right after startup
    pub show_on_launch: bool,
}

/// Run the UI event loop until Exit.
pub fn run(options: RunOptions) {
    Application::new().run(move |cx: &mut App| {
        logging::log("APP", "GPUI Application starting");
        gpui_component::init(cx);

        if let Err(e) = start(cx, options) {
            logging::log_error("APP", &format!("{:#}", e), Some("startup"));
            cx.quit();
        }
    });
}

fn start(cx: &mut App, options: RunOptions) -> anyhow::Result<()> {
    let RunOptions {
        config,
        database,
        show_on_launch,
    } = options;

    let services = platform::native_services();
    let (queue, rx) = ui_queue();

    // NOTE: the hotkey manager must be created on the main thread
    let mut global_hotkeys = GlobalHotkeys::new().context("Global hotkeys are unavailable")?;
    let summon_id = match global_hotkeys.register_hotkey(&config.hotkey) {
        Ok(id) => Some(id),
        Err(e) => {
            // The tray "Show" item still works without the chord
            logging::log_error("HOTKEY", &e.user_message(), Some("summon hotkey"));
            None
        }
    };
    let cancel_id = hotkeys::hotkey_id(&config.cancel_hotkey())
        .log_err()
        .unwrap_or_default();

    let controller = OverlayController::new(
        database,
        &config,
        OverlayServices {
            focus: Arc::clone(&services.focus),
            input: Arc::clone(&services.input),
            hotkeys: Box::new(global_hotkeys),
            spawner: Arc::new(ThreadSpawner),
            queue: queue.clone(),
        },
    );

    let (handle, view) = open_overlay_window(cx, controller, queue.clone())
        .context("Failed to open overlay window")?;
    start_message_pump(cx, handle, view.clone(), rx);

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        let label = format!("{} ({})", crate::paths::APP_TITLE, config.hotkey.label());
        match crate::tray::TrayManager::new(&label) {
            Ok(tray) => {
                crate::tray::start_tray_listener(tray.ids(), queue.clone());
                view.update(cx, |view, _cx| view.attach_tray(tray));
            }
            Err(e) => logging::log_error("TRAY", &format!("{:#}", e), Some("creating tray")),
        }
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let _ = &view;

    // Runs even without a summon chord so the cancel chord still dismisses
    HotkeyCoordinator::new(
        services.focus,
        config.target_window_keyword.clone(),
        queue.clone(),
        summon_id.unwrap_or_default(),
        cancel_id,
    )
    .start();

    ask_startup_once(cx);

    if show_on_launch {
        queue.post(UiMessage::Show);
    }

    logging::log(
        "APP",
        &format!("Ready, summon with {}", config.hotkey.display()),
    );
    Ok(())
}

/// First launch only: offer to start with the OS.
fn ask_startup_once(cx: &mut App) {
    let flag = FirstRunFlag::in_app_data();
    if flag.is_set() {
        return;
    }

    let opened = open_dialog(
        cx,
        STARTUP_PROMPT_TITLE,
        STARTUP_PROMPT_MESSAGE,
        &["Yes", "No"],
        move |choice, cx| {
            let accepted = choice == Some(0);
            if let Err(e) = handle_startup_answer(&flag, accepted, create_startup_entry) {
                logging::log_error("STARTUP", &e.to_string(), Some("creating startup entry"));
                notify_error(cx, STARTUP_ERROR_TITLE, &e);
            }
        },
    );
    opened.log_err();
}

/// Show `error` in a dialog when its severity calls for one.
fn notify_error(cx: &mut App, title: &str, error: &MarketError) {
    if !error.severity().needs_dialog() {
        return;
    }
    open_dialog(cx, title, &error.user_message(), &["OK"], |_, _| {}).log_err();
}
