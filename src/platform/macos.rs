//! macOS adapters
//!
//! macOS has no cross-process window titles without Accessibility
//! permission, so applications stand in for windows: the "title" is the
//! running application's localized name and a [`WindowRef`] holds its pid.

use cocoa::appkit::NSApp;
use cocoa::base::{id, nil, YES};
use core_graphics::display::CGDisplay;
use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTapLocation, CGEventType, CGKeyCode, CGMouseButton,
};
use global_hotkey::hotkey::Modifiers;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use objc::runtime::{Class, Object, BOOL, NO};
use objc::{msg_send, sel, sel_impl};

use super::{
    chord_key, ChordKey, InputSynthesisService, ScreenPoint, ScreenSize, WindowFocusService, WindowInfo, WindowRef,
};
use crate::config::HotkeyConfig;
use crate::coordinator::title_contains_keyword;
use crate::error::{MarketError, Result};
use crate::hotkeys::parse_modifiers;
use crate::logging;

/// NSApplicationActivateIgnoringOtherApps
const ACTIVATE_IGNORING_OTHER_APPS: u64 = 1 << 1;
/// NSFloatingWindowLevel
const FLOATING_WINDOW_LEVEL: i64 = 3;

pub struct WorkspaceFocus;
pub struct CoreGraphicsInput;

unsafe fn get_nsstring(nsstring: *mut Object) -> Option<String> {
    if nsstring.is_null() {
        return None;
    }
    let utf8: *const std::os::raw::c_char = msg_send![nsstring, UTF8String];
    if utf8.is_null() {
        return None;
    }
    std::ffi::CStr::from_ptr(utf8)
        .to_str()
        .ok()
        .map(|s| s.to_string())
}

unsafe fn shared_workspace() -> Option<*mut Object> {
    let workspace_class = Class::get("NSWorkspace")?;
    let workspace: *mut Object = msg_send![workspace_class, sharedWorkspace];
    (!workspace.is_null()).then_some(workspace)
}

impl WindowFocusService for WorkspaceFocus {
    fn foreground_window_title(&self) -> Option<String> {
        unsafe {
            let workspace = shared_workspace()?;
            let app: *mut Object = msg_send![workspace, frontmostApplication];
            if app.is_null() {
                return None;
            }
            get_nsstring(msg_send![app, localizedName])
        }
    }

    fn find_window_by_title_substring(&self, keyword: &str) -> Result<Option<WindowInfo>> {
        let own_pid = std::process::id() as i32;
        unsafe {
            let workspace = shared_workspace().ok_or_else(|| {
                MarketError::Platform("NSWorkspace is unavailable".to_string())
            })?;
            let apps: *mut Object = msg_send![workspace, runningApplications];
            if apps.is_null() {
                return Ok(None);
            }
            let count: usize = msg_send![apps, count];
            for index in 0..count {
                let app: *mut Object = msg_send![apps, objectAtIndex: index];
                let pid: i32 = msg_send![app, processIdentifier];
                if pid == own_pid {
                    continue;
                }
                let Some(name) = get_nsstring(msg_send![app, localizedName]) else {
                    continue;
                };
                if title_contains_keyword(&name, keyword) {
                    return Ok(Some(WindowInfo {
                        window: WindowRef(pid as isize),
                        title: name,
                    }));
                }
            }
        }
        Ok(None)
    }

    fn bring_to_front(&self, window: &WindowRef) -> Result<()> {
        unsafe {
            let class = Class::get("NSRunningApplication").ok_or_else(|| {
                MarketError::Platform("NSRunningApplication is unavailable".to_string())
            })?;
            let pid = window.0 as i32;
            let app: *mut Object =
                msg_send![class, runningApplicationWithProcessIdentifier: pid];
            if app.is_null() {
                return Err(MarketError::Platform(format!("No application with pid {}", pid)));
            }
            let activated: BOOL =
                msg_send![app, activateWithOptions: ACTIVATE_IGNORING_OTHER_APPS];
            if activated == NO {
                return Err(MarketError::Platform(format!(
                    "Application {} refused activation",
                    pid
                )));
            }
        }
        Ok(())
    }
}

/// ANSI keyboard virtual key codes (Carbon `kVK_*`).
fn key_code(key: ChordKey<'_>) -> Option<CGKeyCode> {
    let code = match key {
        ChordKey::Letter(letter) => match letter {
            b'A' => 0,
            b'S' => 1,
            b'D' => 2,
            b'F' => 3,
            b'H' => 4,
            b'G' => 5,
            b'Z' => 6,
            b'X' => 7,
            b'C' => 8,
            b'V' => 9,
            b'B' => 11,
            b'Q' => 12,
            b'W' => 13,
            b'E' => 14,
            b'R' => 15,
            b'Y' => 16,
            b'T' => 17,
            b'O' => 31,
            b'U' => 32,
            b'I' => 34,
            b'P' => 35,
            b'L' => 37,
            b'J' => 38,
            b'K' => 40,
            b'N' => 45,
            b'M' => 46,
            _ => return None,
        },
        ChordKey::Digit(digit) => match digit {
            1 => 18,
            2 => 19,
            3 => 20,
            4 => 21,
            6 => 22,
            5 => 23,
            9 => 25,
            7 => 26,
            8 => 28,
            0 => 29,
            _ => return None,
        },
        ChordKey::Function(n) => match n {
            1 => 122,
            2 => 120,
            3 => 99,
            4 => 118,
            5 => 96,
            6 => 97,
            7 => 98,
            8 => 100,
            9 => 101,
            10 => 109,
            11 => 103,
            12 => 111,
            _ => return None,
        },
        ChordKey::Named(name) => match name {
            "Equal" => 24,
            "Minus" => 27,
            "BracketRight" => 30,
            "BracketLeft" => 33,
            "Enter" => 36,
            "Quote" => 39,
            "Semicolon" => 41,
            "Backslash" => 42,
            "Comma" => 43,
            "Slash" => 44,
            "Period" => 47,
            "Tab" => 48,
            "Space" => 49,
            "Backquote" => 50,
            "Backspace" => 51,
            "Escape" => 53,
            "Insert" => 114,
            "Home" => 115,
            "PageUp" => 116,
            "Delete" => 117,
            "End" => 119,
            "PageDown" => 121,
            "ArrowLeft" => 123,
            "ArrowRight" => 124,
            "ArrowDown" => 125,
            "ArrowUp" => 126,
            _ => return None,
        },
    };
    Some(code)
}

fn event_flags(modifiers: Modifiers) -> CGEventFlags {
    let mut flags = CGEventFlags::empty();
    if modifiers.contains(Modifiers::CONTROL) {
        flags |= CGEventFlags::CGEventFlagControl;
    }
    if modifiers.contains(Modifiers::ALT) {
        flags |= CGEventFlags::CGEventFlagAlternate;
    }
    if modifiers.contains(Modifiers::SHIFT) {
        flags |= CGEventFlags::CGEventFlagShift;
    }
    if modifiers.contains(Modifiers::META) {
        flags |= CGEventFlags::CGEventFlagCommand;
    }
    flags
}

impl InputSynthesisService for CoreGraphicsInput {
    fn click_at(&self, point: ScreenPoint) -> Result<()> {
        let location = CGPoint::new(point.x as f64, point.y as f64);
        for event_type in [CGEventType::LeftMouseDown, CGEventType::LeftMouseUp] {
            let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
                .map_err(|_| MarketError::Platform("CGEventSource unavailable".to_string()))?;
            let event = CGEvent::new_mouse_event(source, event_type, location, CGMouseButton::Left)
                .map_err(|_| MarketError::Platform("Failed to create mouse event".to_string()))?;
            event.post(CGEventTapLocation::HID);
        }
        Ok(())
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        let bounds = CGDisplay::main().bounds();
        let (width, height) = (bounds.size.width as i32, bounds.size.height as i32);
        (width > 0 && height > 0).then_some(ScreenSize { width, height })
    }

    fn send_chord(&self, chord: &HotkeyConfig) -> Result<()> {
        let keycode = key_code(chord_key(&chord.key))
            .ok_or_else(|| MarketError::Platform(format!("No key code for '{}'", chord.key)))?;
        let flags = event_flags(parse_modifiers(&chord.modifiers)?);

        // Modifiers ride on the key events as flags
        for key_down in [true, false] {
            let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
                .map_err(|_| MarketError::Platform("CGEventSource unavailable".to_string()))?;
            let event = CGEvent::new_keyboard_event(source, keycode, key_down)
                .map_err(|_| MarketError::Platform("Failed to create key event".to_string()))?;
            event.set_flags(flags);
            event.post(CGEventTapLocation::HID);
        }
        Ok(())
    }
}

/// Our own NSWindow with this title.
unsafe fn find_own_window(title: &str) -> Option<id> {
    let app: id = NSApp();
    if app == nil {
        return None;
    }
    let windows: id = msg_send![app, windows];
    let count: usize = msg_send![windows, count];
    for index in 0..count {
        let window: id = msg_send![windows, objectAtIndex: index];
        if get_nsstring(msg_send![window, title]).as_deref() == Some(title) {
            return Some(window);
        }
    }
    None
}

pub fn show_own_window(title: &str) {
    unsafe {
        let Some(window) = find_own_window(title) else {
            logging::log("PANEL", "show: overlay window not found");
            return;
        };
        let _: () = msg_send![window, setLevel: FLOATING_WINDOW_LEVEL];
        let _: () = msg_send![window, makeKeyAndOrderFront: nil];
        let app: id = NSApp();
        let _: () = msg_send![app, activateIgnoringOtherApps: YES];
    }
}

pub fn hide_own_window(title: &str) {
    unsafe {
        match find_own_window(title) {
            // orderOut: removes the window from the screen without closing it
            Some(window) => {
                let _: () = msg_send![window, orderOut: nil];
            }
            None => logging::log("PANEL", "hide: overlay window not found"),
        }
    }
}
