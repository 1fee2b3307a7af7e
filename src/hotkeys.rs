use global_hotkey::{
    hotkey::{Code, HotKey, Modifiers},
    Error as HotkeyError, GlobalHotKeyManager,
};
use std::collections::HashMap;

use crate::config::HotkeyConfig;
use crate::error::{MarketError, Result};
use crate::logging;
use crate::platform::{GlobalHotkeyService, HotkeyId};

// =============================================================================
// Chord parsing
// =============================================================================

/// Map a DOM `code` name from config onto a `global_hotkey` key code.
pub fn parse_code(key: &str) -> Option<Code> {
    let code = match key {
        "Semicolon" => Code::Semicolon,
        "Quote" => Code::Quote,
        "Comma" => Code::Comma,
        "Period" => Code::Period,
        "Slash" => Code::Slash,
        "Backslash" => Code::Backslash,
        "BracketLeft" => Code::BracketLeft,
        "BracketRight" => Code::BracketRight,
        "Minus" => Code::Minus,
        "Equal" => Code::Equal,
        "Backquote" => Code::Backquote,
        "Space" => Code::Space,
        "Enter" => Code::Enter,
        "Escape" => Code::Escape,
        "Tab" => Code::Tab,
        "Backspace" => Code::Backspace,
        "Delete" => Code::Delete,
        "Insert" => Code::Insert,
        "Home" => Code::Home,
        "End" => Code::End,
        "PageUp" => Code::PageUp,
        "PageDown" => Code::PageDown,
        "ArrowUp" => Code::ArrowUp,
        "ArrowDown" => Code::ArrowDown,
        "ArrowLeft" => Code::ArrowLeft,
        "ArrowRight" => Code::ArrowRight,
        "Digit0" => Code::Digit0,
        "Digit1" => Code::Digit1,
        "Digit2" => Code::Digit2,
        "Digit3" => Code::Digit3,
        "Digit4" => Code::Digit4,
        "Digit5" => Code::Digit5,
        "Digit6" => Code::Digit6,
        "Digit7" => Code::Digit7,
        "Digit8" => Code::Digit8,
        "Digit9" => Code::Digit9,
        "KeyA" => Code::KeyA,
        "KeyB" => Code::KeyB,
        "KeyC" => Code::KeyC,
        "KeyD" => Code::KeyD,
        "KeyE" => Code::KeyE,
        "KeyF" => Code::KeyF,
        "KeyG" => Code::KeyG,
        "KeyH" => Code::KeyH,
        "KeyI" => Code::KeyI,
        "KeyJ" => Code::KeyJ,
        "KeyK" => Code::KeyK,
        "KeyL" => Code::KeyL,
        "KeyM" => Code::KeyM,
        "KeyN" => Code::KeyN,
        "KeyO" => Code::KeyO,
        "KeyP" => Code::KeyP,
        "KeyQ" => Code::KeyQ,
        "KeyR" => Code::KeyR,
        "KeyS" => Code::KeyS,
        "KeyT" => Code::KeyT,
        "KeyU" => Code::KeyU,
        "KeyV" => Code::KeyV,
        "KeyW" => Code::KeyW,
        "KeyX" => Code::KeyX,
        "KeyY" => Code::KeyY,
        "KeyZ" => Code::KeyZ,
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,
        _ => return None,
    };
    Some(code)
}

/// Modifier names are case-insensitive; "cmd"/"command" alias "meta".
pub fn parse_modifiers(names: &[String]) -> Result<Modifiers> {
    let mut modifiers = Modifiers::empty();
    for name in names {
        match name.to_lowercase().as_str() {
            "meta" | "cmd" | "command" | "win" | "super" => modifiers |= Modifiers::META,
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" | "option" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            other => {
                return Err(MarketError::Config(format!("Unknown modifier: {}", other)));
            }
        }
    }
    Ok(modifiers)
}

pub fn to_hotkey(chord: &HotkeyConfig) -> Result<HotKey> {
    let code = parse_code(&chord.key).ok_or_else(|| {
        MarketError::Config(format!(
            "Unknown key code: '{}'. Valid keys: KeyA-KeyZ, Digit0-Digit9, F1-F12, \
             Escape, Space, Enter, Tab, arrows and punctuation",
            chord.key
        ))
    })?;
    let modifiers = parse_modifiers(&chord.modifiers)?;
    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, code))
}

/// Id the listener will see for this chord.
pub fn hotkey_id(chord: &HotkeyConfig) -> Result<HotkeyId> {
    to_hotkey(chord).map(|hotkey| hotkey.id())
}

/// Format a hotkey registration error with helpful context
fn format_hotkey_error(e: &HotkeyError, shortcut_display: &str) -> String {
    match e {
        HotkeyError::AlreadyRegistered(hk) => {
            format!(
                "Hotkey '{}' is already registered by another application (ID: {}). \
                 Try a different shortcut or close the conflicting app.",
                shortcut_display,
                hk.id()
            )
        }
        HotkeyError::FailedToRegister(msg) => {
            format!(
                "System rejected hotkey '{}': {}. This shortcut may be reserved by the OS.",
                shortcut_display, msg
            )
        }
        HotkeyError::OsError(os_err) => {
            format!(
                "OS error registering '{}': {}. Check system hotkey settings.",
                shortcut_display, os_err
            )
        }
        other => format!(
            "Failed to register hotkey '{}': {}",
            shortcut_display, other
        ),
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Registered chords, keyed by id.
/// NOTE: Must be created on the main thread.
pub struct GlobalHotkeys {
    manager: GlobalHotKeyManager,
    registered: HashMap<HotkeyId, HotKey>,
}

impl GlobalHotkeys {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new().map_err(|e| {
            MarketError::HotkeyRegistration(format!("Failed to create hotkey manager: {}", e))
        })?;
        Ok(Self {
            manager,
            registered: HashMap::new(),
        })
    }

    pub fn is_registered(&self, id: HotkeyId) -> bool {
        self.registered.contains_key(&id)
    }
}

impl GlobalHotkeyService for GlobalHotkeys {
    fn register_hotkey(&mut self, chord: &HotkeyConfig) -> Result<HotkeyId> {
        let hotkey = to_hotkey(chord)?;
        let id = hotkey.id();
        if self.registered.contains_key(&id) {
            return Ok(id);
        }

        let display = chord.display();
        self.manager
            .register(hotkey)
            .map_err(|e| MarketError::HotkeyRegistration(format_hotkey_error(&e, &display)))?;
        self.registered.insert(id, hotkey);

        logging::log(
            "HOTKEY",
            &format!("Registered global hotkey {} (id: {})", display, id),
        );
        Ok(id)
    }

    fn unregister(&mut self, id: HotkeyId) -> Result<()> {
        let Some(hotkey) = self.registered.remove(&id) else {
            return Ok(());
        };
        self.manager.unregister(hotkey).map_err(|e| {
            MarketError::HotkeyRegistration(format!(
                "Failed to unregister hotkey (id: {}): {}",
                id, e
            ))
        })?;
        logging::log("HOTKEY", &format!("Unregistered hotkey (id: {})", id));
        Ok(())
    }

    fn unregister_all(&mut self) {
        for (id, hotkey) in self.registered.drain() {
            if let Err(e) = self.manager.unregister(hotkey) {
                // Continue anyway - the process is shutting down
                logging::log(
                    "HOTKEY",
                    &format!("Warning: Failed to unregister hotkey (id: {}): {}", id, e),
                );
            }
        }
        logging::log("HOTKEY", "All hotkeys unregistered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_known_and_unknown() {
        assert_eq!(parse_code("KeyF"), Some(Code::KeyF));
        assert_eq!(parse_code("Escape"), Some(Code::Escape));
        assert_eq!(parse_code("Digit7"), Some(Code::Digit7));
        assert_eq!(parse_code("F12"), Some(Code::F12));
        assert_eq!(parse_code("keyf"), None);
        assert_eq!(parse_code("F13"), None);
    }

    #[test]
    fn test_parse_modifiers() {
        let mods = parse_modifiers(&["Ctrl".to_string(), "shift".to_string()]).unwrap();
        assert_eq!(mods, Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(parse_modifiers(&[]).unwrap(), Modifiers::empty());
        assert!(parse_modifiers(&["hyper".to_string()]).is_err());
    }

    #[test]
    fn test_to_hotkey_matches_manual_construction() {
        let chord = HotkeyConfig::default();
        let expected = HotKey::new(Some(Modifiers::CONTROL), Code::KeyF);
        assert_eq!(hotkey_id(&chord).unwrap(), expected.id());

        let escape = HotkeyConfig::bare("Escape");
        assert_eq!(
            hotkey_id(&escape).unwrap(),
            HotKey::new(None, Code::Escape).id()
        );
        assert_ne!(hotkey_id(&chord).unwrap(), hotkey_id(&escape).unwrap());
    }

    #[test]
    fn test_to_hotkey_rejects_unknown_key() {
        let chord = HotkeyConfig::bare("Hyper");
        let err = to_hotkey(&chord).unwrap_err();
        assert!(matches!(err, MarketError::Config(_)));
        assert!(err.to_string().contains("Hyper"));
    }

    // =========================================================================
    // GlobalHotkeys
    // =========================================================================
    // Registration needs a running event loop and OS permissions, which
    // CI does not always have; these only assert when the manager exists.

    #[test]
    fn test_unregister_unknown_is_noop() {
        if let Ok(mut hotkeys) = GlobalHotkeys::new() {
            assert!(hotkeys.unregister(12345).is_ok());
            hotkeys.unregister_all();
        }
    }

    #[test]
    fn test_register_tracks_and_unregisters() {
        if let Ok(mut hotkeys) = GlobalHotkeys::new() {
            let chord = HotkeyConfig {
                modifiers: vec!["ctrl".to_string(), "alt".to_string(), "shift".to_string()],
                key: "F9".to_string(),
            };
            if let Ok(id) = hotkeys.register_hotkey(&chord) {
                assert!(hotkeys.is_registered(id));
                // Registering again returns the same id
                assert_eq!(hotkeys.register_hotkey(&chord).unwrap(), id);
                hotkeys.unregister(id).unwrap();
                assert!(!hotkeys.is_registered(id));
            }
        }
    }
}
