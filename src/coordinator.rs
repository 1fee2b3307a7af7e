//! Hotkey/window-focus coordinator
//!
//! Runs the global hotkey listener thread. The summon chord only shows the
//! overlay while the game window has focus; the cancel chord (armed by the
//! overlay while visible) dismisses it. Both become [`UiMessage`]s.

use std::sync::Arc;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};

use crate::logging;
use crate::overlay::{UiMessage, UiSender};
use crate::platform::{HotkeyId, WindowFocusService};

/// Shortest cleaned keyword that is allowed to gate the summon hotkey.
const MIN_KEYWORD_LEN: usize = 3;

/// Keep ASCII letters and digits only, upper-cased.
///
/// "ARC Raiders - v1.2" becomes "ARCRAIDERSV12".
pub fn clean_title(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Summon gate: the cleaned title starts with the cleaned keyword.
///
/// A keyword that cleans down to fewer than 3 characters never matches,
/// so an empty or punctuation-only keyword cannot open the overlay
/// over arbitrary windows.
pub fn title_starts_with_keyword(title: &str, keyword: &str) -> bool {
    let keyword = clean_title(keyword);
    keyword.len() >= MIN_KEYWORD_LEN && clean_title(title).starts_with(&keyword)
}

/// Restore lookup: the cleaned title contains the cleaned keyword.
pub fn title_contains_keyword(title: &str, keyword: &str) -> bool {
    let keyword = clean_title(keyword);
    !keyword.is_empty() && clean_title(title).contains(&keyword)
}

/// Whether the listener loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerFlow {
    Continue,
    Stop,
}

pub struct HotkeyCoordinator {
    focus: Arc<dyn WindowFocusService>,
    keyword: String,
    queue: UiSender,
    summon_id: HotkeyId,
    cancel_id: HotkeyId,
}

impl HotkeyCoordinator {
    pub fn new(
        focus: Arc<dyn WindowFocusService>,
        keyword: impl Into<String>,
        queue: UiSender,
        summon_id: HotkeyId,
        cancel_id: HotkeyId,
    ) -> Self {
        Self {
            focus,
            keyword: keyword.into(),
            queue,
            summon_id,
            cancel_id,
        }
    }

    /// Summon chord pressed: show the overlay if the game is in front,
    /// otherwise hand the chord back to the window that is.
    ///
    /// Returns `false` only when the UI queue is closed.
    pub fn on_hotkey(&self) -> bool {
        let title = self.focus.foreground_window_title().unwrap_or_default();
        if !title_starts_with_keyword(&title, &self.keyword) {
            logging::log_debug(
                "HOTKEY",
                &format!("Summon not for us, foreground window is '{}'", title),
            );
            return self.queue.post(UiMessage::ForwardSummon);
        }
        logging::log("HOTKEY", &format!("Summon over '{}'", title));
        self.queue.post(UiMessage::Show)
    }

    /// Route one pressed hotkey id.
    pub fn handle_event(&self, id: HotkeyId) -> ListenerFlow {
        let delivered = if id == self.summon_id {
            self.on_hotkey()
        } else if id == self.cancel_id {
            logging::log("HOTKEY", "Cancel pressed");
            self.queue.post(UiMessage::Cancel)
        } else {
            logging::log_debug("HOTKEY", &format!("Unknown hotkey id {}", id));
            true
        };

        if delivered {
            ListenerFlow::Continue
        } else {
            ListenerFlow::Stop
        }
    }

    /// Spawn the listener thread. It exits once the UI queue closes.
    pub fn start(self) {
        let spawned = std::thread::Builder::new()
            .name("hotkey-listener".to_string())
            .spawn(move || {
                logging::log(
                    "HOTKEY",
                    &format!(
                        "Hotkey listener started (summon={}, cancel={})",
                        self.summon_id, self.cancel_id
                    ),
                );
                let receiver = GlobalHotKeyEvent::receiver();
                while let Ok(event) = receiver.recv() {
                    // Only respond to key PRESS, not release
                    if event.state != HotKeyState::Pressed {
                        continue;
                    }
                    if self.handle_event(event.id) == ListenerFlow::Stop {
                        break;
                    }
                }
                logging::log("HOTKEY", "Hotkey listener stopped");
            });

        if let Err(e) = spawned {
            logging::log_error(
                "HOTKEY",
                &e.to_string(),
                Some("starting hotkey listener"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::overlay::ui_queue;
    use crate::platform::{WindowInfo, WindowRef};
    use parking_lot::Mutex;

    struct FixedForeground(Mutex<Option<String>>);

    impl FixedForeground {
        fn new(title: Option<&str>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(title.map(str::to_string))))
        }
    }

    impl WindowFocusService for FixedForeground {
        fn foreground_window_title(&self) -> Option<String> {
            self.0.lock().clone()
        }

        fn find_window_by_title_substring(&self, _keyword: &str) -> Result<Option<WindowInfo>> {
            Ok(None)
        }

        fn bring_to_front(&self, _window: &WindowRef) -> Result<()> {
            Ok(())
        }
    }

    const SUMMON: HotkeyId = 10;
    const CANCEL: HotkeyId = 20;

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("ARC Raiders - v1.2"), "ARCRAIDERSV12");
        assert_eq!(clean_title("  arc_raiders!! "), "ARCRAIDERS");
        assert_eq!(clean_title("Café"), "CAF");
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn test_title_starts_with_keyword() {
        assert!(title_starts_with_keyword("ARC Raiders", "ARC Raiders"));
        assert!(title_starts_with_keyword("arc-raiders (DX12)", "ARC Raiders"));
        assert!(!title_starts_with_keyword("Notepad - ARC Raiders", "ARC Raiders"));
        assert!(!title_starts_with_keyword("", "ARC Raiders"));
    }

    #[test]
    fn test_short_keyword_never_matches() {
        assert!(!title_starts_with_keyword("AB Game", "AB"));
        assert!(!title_starts_with_keyword("anything", "--"));
        assert!(title_starts_with_keyword("ABC Game", "abc"));
    }

    #[test]
    fn test_title_contains_keyword() {
        assert!(title_contains_keyword("Steam - ARC Raiders", "ARC Raiders"));
        assert!(!title_contains_keyword("Steam", "ARC Raiders"));
        assert!(!title_contains_keyword("Steam", ""));
    }

    #[test]
    fn test_summon_over_game_posts_show() {
        let (tx, rx) = ui_queue();
        let coordinator = HotkeyCoordinator::new(
            FixedForeground::new(Some("ARC Raiders")),
            "ARC Raiders",
            tx,
            SUMMON,
            CANCEL,
        );
        assert_eq!(coordinator.handle_event(SUMMON), ListenerFlow::Continue);
        assert_eq!(rx.try_recv().unwrap(), UiMessage::Show);
    }

    #[test]
    fn test_summon_over_other_window_is_forwarded() {
        let (tx, rx) = ui_queue();
        let focus = FixedForeground::new(Some("Untitled - Notepad"));
        let coordinator = HotkeyCoordinator::new(focus.clone(), "ARC Raiders", tx, SUMMON, CANCEL);
        assert_eq!(coordinator.handle_event(SUMMON), ListenerFlow::Continue);
        assert_eq!(rx.try_recv().unwrap(), UiMessage::ForwardSummon);
        assert!(rx.try_recv().is_err());

        *focus.0.lock() = None;
        assert_eq!(coordinator.handle_event(SUMMON), ListenerFlow::Continue);
        assert_eq!(rx.try_recv().unwrap(), UiMessage::ForwardSummon);
    }

    #[test]
    fn test_cancel_posts_cancel_and_unknown_is_ignored() {
        let (tx, rx) = ui_queue();
        let coordinator =
            HotkeyCoordinator::new(FixedForeground::new(None), "ARC Raiders", tx, SUMMON, CANCEL);
        assert_eq!(coordinator.handle_event(CANCEL), ListenerFlow::Continue);
        assert_eq!(coordinator.handle_event(99), ListenerFlow::Continue);
        assert_eq!(rx.try_recv().unwrap(), UiMessage::Cancel);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_queue_stops_listener() {
        let (tx, _rx) = ui_queue();
        tx.close();
        let coordinator = HotkeyCoordinator::new(
            FixedForeground::new(Some("ARC Raiders")),
            "ARC Raiders",
            tx,
            SUMMON,
            CANCEL,
        );
        assert_eq!(coordinator.handle_event(SUMMON), ListenerFlow::Stop);
        assert_eq!(coordinator.handle_event(CANCEL), ListenerFlow::Stop);
    }
}
