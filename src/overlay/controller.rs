//! Overlay state machine
//!
//! Owns the item database and every piece of overlay state. Runs on the UI
//! thread only; background work goes through the [`Spawner`] and comes back
//! as [`UiMessage`]s. The window itself is reached through
//! [`OverlaySurface`] so the whole flow runs without a display in tests.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, HotkeyConfig};
use crate::error::ResultExt;
use crate::hotkeys::hotkey_id;
use crate::items::ItemDatabase;
use crate::logging;
use crate::matcher::{best_match, MatchSettings};
use crate::platform::{
    self, GlobalHotkeyService, HotkeyId, InputSynthesisService, ScreenPoint, Spawner,
    WindowFocusService,
};

use super::messages::{UiMessage, UiSender};
use super::state::{OverlayState, ResultDisplay};

/// The overlay window as seen by the controller.
pub trait OverlaySurface {
    /// Make the window visible, topmost and focused.
    fn show(&mut self);
    fn hide(&mut self);
    fn clear_input(&mut self);
    fn focus_input(&mut self);
    /// Screen position of the input field's center, if known.
    fn input_center(&self) -> Option<ScreenPoint>;
    /// Stop the UI event loop.
    fn quit(&mut self);
}

/// OS services the controller drives.
pub struct OverlayServices {
    pub focus: Arc<dyn WindowFocusService>,
    pub input: Arc<dyn InputSynthesisService>,
    pub hotkeys: Box<dyn GlobalHotkeyService>,
    pub spawner: Arc<dyn Spawner>,
    pub queue: UiSender,
}

pub struct OverlayController {
    database: ItemDatabase,
    settings: MatchSettings,
    state: OverlayState,
    display: ResultDisplay,
    last_query: String,
    cancel_hotkey: HotkeyConfig,
    armed_cancel: Option<HotkeyId>,
    summon_hotkey: HotkeyConfig,
    /// Summon chord released to another application, not yet re-registered
    forwarding_summon: bool,
    target_keyword: String,
    focus_click_delay: Duration,
    restore_click_delay: Duration,
    forward_rearm_delay: Duration,
    services: OverlayServices,
}

impl OverlayController {
    pub fn new(database: ItemDatabase, config: &Config, services: OverlayServices) -> Self {
        Self {
            database,
            settings: config.match_settings(),
            state: OverlayState::Hidden,
            display: ResultDisplay::Ready,
            last_query: String::new(),
            cancel_hotkey: config.cancel_hotkey(),
            armed_cancel: None,
            summon_hotkey: config.hotkey.clone(),
            forwarding_summon: false,
            target_keyword: config.target_window_keyword.clone(),
            focus_click_delay: config.focus_click_delay(),
            restore_click_delay: config.restore_click_delay(),
            forward_rearm_delay: config.forward_rearm_delay(),
            services,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn display(&self) -> &ResultDisplay {
        &self.display
    }

    pub fn database(&self) -> &ItemDatabase {
        &self.database
    }

    pub fn is_cancel_armed(&self) -> bool {
        self.armed_cancel.is_some()
    }

    pub fn is_forwarding_summon(&self) -> bool {
        self.forwarding_summon
    }

    /// Apply one message from the UI queue.
    pub fn handle(&mut self, msg: UiMessage, surface: &mut dyn OverlaySurface) {
        if self.state == OverlayState::Exited {
            logging::log_debug("OVERLAY", &format!("Ignoring {:?} after exit", msg));
            return;
        }
        match msg {
            UiMessage::Show => self.show(surface),
            UiMessage::Cancel => self.cancel(surface),
            UiMessage::FocusInput => {
                if self.state.is_visible() {
                    surface.focus_input();
                }
            }
            UiMessage::ForwardSummon => self.forward_summon(),
            UiMessage::RestoreSummon => self.restore_summon(),
            UiMessage::Exit => self.exit(surface),
        }
    }

    /// Hidden (or visible) -> VisibleWaiting.
    pub fn show(&mut self, surface: &mut dyn OverlaySurface) {
        if self.state == OverlayState::Exited {
            return;
        }
        logging::log_ui_event("overlay", "show", None);

        surface.clear_input();
        surface.show();
        self.last_query.clear();
        self.display = ResultDisplay::Waiting;
        self.state = OverlayState::VisibleWaiting;
        self.arm_cancel();

        // The OS does not always hand keyboard focus to a window raised from
        // the background, so click into the input before focusing it.
        let target = surface.input_center();
        let input = Arc::clone(&self.services.input);
        let queue = self.services.queue.clone();
        let delay = self.focus_click_delay;
        self.services.spawner.spawn(
            "focus-click",
            Box::new(move || {
                platform::pause(delay);
                if let Some(point) = target {
                    input.click_at(point).warn_on_err();
                }
                queue.post(UiMessage::FocusInput);
            }),
        );
    }

    /// Recompute the result for a new query.
    ///
    /// Returns `true` when the caption changed and the view should redraw.
    pub fn update_query(&mut self, query: &str) -> bool {
        if !self.state.is_visible() || query == self.last_query {
            return false;
        }
        self.last_query = query.to_string();
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        let outcome = best_match(&self.last_query, &self.database, &self.settings);
        self.display = ResultDisplay::from_outcome(&outcome);
        self.state = self.display.visible_state();
        logging::log_debug(
            "OVERLAY",
            &format!("'{}' -> {}", self.last_query, self.display.text()),
        );
    }

    /// Enter or Done: hide, then hand focus back to the game.
    pub fn confirm(&mut self, surface: &mut dyn OverlaySurface) {
        if !self.state.is_visible() {
            return;
        }
        logging::log_ui_event("overlay", "confirm", Some(&self.display.text()));
        self.hide(surface);

        let focus = Arc::clone(&self.services.focus);
        let input = Arc::clone(&self.services.input);
        let keyword = self.target_keyword.clone();
        let delay = self.restore_click_delay;
        self.services.spawner.spawn(
            "restore-focus",
            Box::new(move || {
                match focus.find_window_by_title_substring(&keyword) {
                    Ok(Some(found)) => {
                        logging::log("FOCUS", &format!("Restoring '{}'", found.title));
                        focus.bring_to_front(&found.window).log_err();
                    }
                    Ok(None) => {
                        logging::log("FOCUS", &format!("No window matching '{}'", keyword));
                    }
                    Err(e) => {
                        logging::log_error("FOCUS", &e.to_string(), Some("finding game window"));
                    }
                }
                platform::pause(delay);
                // Click even without a window: the game may own the center
                // of the screen under another title.
                if let Some(size) = input.screen_size() {
                    input.click_at(size.center()).warn_on_err();
                }
            }),
        );
    }

    /// Escape or close control: hide without touching the game.
    pub fn cancel(&mut self, surface: &mut dyn OverlaySurface) {
        if !self.state.is_visible() {
            return;
        }
        logging::log_ui_event("overlay", "cancel", None);
        self.hide(surface);
    }

    fn hide(&mut self, surface: &mut dyn OverlaySurface) {
        surface.hide();
        self.state = OverlayState::Hidden;
        self.disarm_cancel();
    }

    /// Tray Exit: unhook everything, close the queue, quit.
    pub fn exit(&mut self, surface: &mut dyn OverlaySurface) {
        if self.state == OverlayState::Exited {
            return;
        }
        logging::log("APP", "Exit requested");
        self.services.hotkeys.unregister_all();
        self.armed_cancel = None;
        self.forwarding_summon = false;
        self.state = OverlayState::Exited;
        self.services.queue.close();
        surface.hide();
        surface.quit();
    }

    /// The summon chord is registered system-wide, so the OS swallowed a
    /// press meant for whatever window is in front. Release the chord, type
    /// it again for that window, then take it back.
    pub fn forward_summon(&mut self) {
        if self.forwarding_summon {
            return;
        }
        let Some(id) = hotkey_id(&self.summon_hotkey).log_err() else {
            return;
        };
        if self.services.hotkeys.unregister(id).log_err().is_none() {
            return;
        }
        self.forwarding_summon = true;
        logging::log_debug(
            "HOTKEY",
            &format!("Forwarding {} to the foreground window", self.summon_hotkey.display()),
        );

        let input = Arc::clone(&self.services.input);
        let queue = self.services.queue.clone();
        let chord = self.summon_hotkey.clone();
        let delay = self.forward_rearm_delay;
        self.services.spawner.spawn(
            "forward-summon",
            Box::new(move || {
                input.send_chord(&chord).warn_on_err();
                // Injected keys are delivered asynchronously
                platform::pause(delay);
                queue.post(UiMessage::RestoreSummon);
            }),
        );
    }

    fn restore_summon(&mut self) {
        if !self.forwarding_summon {
            return;
        }
        self.forwarding_summon = false;
        self.services
            .hotkeys
            .register_hotkey(&self.summon_hotkey)
            .log_err();
    }

    /// Swap in a new database, re-running the current query if visible.
    pub fn reload_database(&mut self, database: ItemDatabase) {
        logging::log(
            "ITEMS",
            &format!("Reloaded price table ({} items)", database.len()),
        );
        self.database = database;
        if self.state.is_visible() && !self.last_query.is_empty() {
            self.recompute();
        }
    }

    fn arm_cancel(&mut self) {
        if self.armed_cancel.is_some() {
            return;
        }
        self.armed_cancel = self
            .services
            .hotkeys
            .register_hotkey(&self.cancel_hotkey)
            .log_err();
    }

    fn disarm_cancel(&mut self) {
        if let Some(id) = self.armed_cancel.take() {
            self.services.hotkeys.unregister(id).log_err();
        }
    }
}
