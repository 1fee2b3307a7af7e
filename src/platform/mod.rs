//! OS integration behind narrow service traits
//!
//! The overlay controller and hotkey coordinator only see these traits;
//! each target provides an adapter:
//!
//! - `win32` - Win32 window enumeration, `SendInput` clicks
//! - `macos` - NSWorkspace applications, CGEvent clicks
//! - everything else - [`UnsupportedPlatform`], which finds nothing and clicks nothing

use std::sync::Arc;
use std::time::Duration;

use crate::config::HotkeyConfig;
use crate::error::{MarketError, Result};

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod win32;

/// Opaque handle to a top-level window of another application.
///
/// Holds the raw `HWND` on Windows and the process id on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowRef(pub isize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub window: WindowRef,
    pub title: String,
}

/// Point in physical screen pixels, origin top-left of the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2, self.height / 2)
    }
}

/// Foreground window queries and activation.
pub trait WindowFocusService: Send + Sync {
    /// Title of the window that currently has keyboard focus.
    fn foreground_window_title(&self) -> Option<String>;

    /// First visible top-level window of another process whose cleaned title
    /// contains the cleaned `keyword` (see [`crate::coordinator::clean_title`]).
    fn find_window_by_title_substring(&self, keyword: &str) -> Result<Option<WindowInfo>>;

    /// Restore (if minimized) and activate a window.
    fn bring_to_front(&self, window: &WindowRef) -> Result<()>;
}

/// Synthetic mouse input.
pub trait InputSynthesisService: Send + Sync {
    /// Move the pointer to `point` and press/release the left button.
    fn click_at(&self, point: ScreenPoint) -> Result<()>;

    /// Size of the primary display.
    fn screen_size(&self) -> Option<ScreenSize>;

    /// Type `chord` into the foreground application as one key press with
    /// its modifiers held.
    fn send_chord(&self, chord: &HotkeyConfig) -> Result<()>;
}

/// Id of a registered global chord, stable for a given chord.
pub type HotkeyId = u32;

/// System-wide hotkey registration. Lives on the UI thread.
pub trait GlobalHotkeyService {
    fn register_hotkey(&mut self, chord: &HotkeyConfig) -> Result<HotkeyId>;
    /// Unregistering an id that is not registered is a no-op.
    fn unregister(&mut self, id: HotkeyId) -> Result<()>;
    fn unregister_all(&mut self);
}

/// Runs short fire-and-forget jobs off the UI thread.
pub trait Spawner: Send + Sync {
    fn spawn(&self, name: &str, job: Box<dyn FnOnce() + Send + 'static>);
}

/// One OS thread per job.
pub struct ThreadSpawner;

impl Spawner for ThreadSpawner {
    fn spawn(&self, name: &str, job: Box<dyn FnOnce() + Send + 'static>) {
        if let Err(e) = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(job)
        {
            tracing::error!(error = %e, thread = name, "Failed to spawn worker thread");
        }
    }
}

/// A config key name (`KeyF`, `Digit5`, `F3`, `Escape`) sorted into the
/// families the native key tables are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChordKey<'a> {
    /// `b'A'..=b'Z'`
    Letter(u8),
    /// `0..=9`
    Digit(u8),
    /// `1..=12`
    Function(u8),
    Named(&'a str),
}

pub(crate) fn chord_key(key: &str) -> ChordKey<'_> {
    let single = |rest: &str| match rest.as_bytes() {
        [b] => Some(*b),
        _ => None,
    };
    if let Some(letter) = key.strip_prefix("Key").and_then(single) {
        if letter.is_ascii_uppercase() {
            return ChordKey::Letter(letter);
        }
    }
    if let Some(digit) = key.strip_prefix("Digit").and_then(single) {
        if digit.is_ascii_digit() {
            return ChordKey::Digit(digit - b'0');
        }
    }
    if let Some(n) = key.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return ChordKey::Function(n);
        }
    }
    ChordKey::Named(key)
}

/// Sleep helper shared by worker jobs; zero means no sleep.
pub(crate) fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

/// Adapter for targets without window automation support.
pub struct UnsupportedPlatform;

impl WindowFocusService for UnsupportedPlatform {
    fn foreground_window_title(&self) -> Option<String> {
        None
    }

    fn find_window_by_title_substring(&self, _keyword: &str) -> Result<Option<WindowInfo>> {
        Ok(None)
    }

    fn bring_to_front(&self, _window: &WindowRef) -> Result<()> {
        Err(MarketError::Platform(
            "window activation is not supported on this platform".to_string(),
        ))
    }
}

impl InputSynthesisService for UnsupportedPlatform {
    fn click_at(&self, _point: ScreenPoint) -> Result<()> {
        Err(MarketError::Platform(
            "synthetic clicks are not supported on this platform".to_string(),
        ))
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }

    fn send_chord(&self, _chord: &HotkeyConfig) -> Result<()> {
        Err(MarketError::Platform(
            "synthetic key presses are not supported on this platform".to_string(),
        ))
    }
}

/// The adapters for the current target.
#[derive(Clone)]
pub struct PlatformServices {
    pub focus: Arc<dyn WindowFocusService>,
    pub input: Arc<dyn InputSynthesisService>,
}

#[cfg(target_os = "windows")]
pub fn native_services() -> PlatformServices {
    PlatformServices {
        focus: Arc::new(win32::Win32Focus),
        input: Arc::new(win32::Win32Input),
    }
}

#[cfg(target_os = "macos")]
pub fn native_services() -> PlatformServices {
    PlatformServices {
        focus: Arc::new(macos::WorkspaceFocus),
        input: Arc::new(macos::CoreGraphicsInput),
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn native_services() -> PlatformServices {
    PlatformServices {
        focus: Arc::new(UnsupportedPlatform),
        input: Arc::new(UnsupportedPlatform),
    }
}

// ============================================================================
// Overlay window chrome
// ============================================================================
// gpui has no hide/show for an existing window, so these act on our own
// native window, found by its title. Must be called on the UI thread.

/// Show our window above all others and give it focus.
#[cfg(target_os = "windows")]
pub fn show_overlay_window(title: &str) {
    win32::show_own_window(title);
}

/// Take our window off screen without destroying it.
#[cfg(target_os = "windows")]
pub fn hide_overlay_window(title: &str) {
    win32::hide_own_window(title);
}

#[cfg(target_os = "macos")]
pub fn show_overlay_window(title: &str) {
    macos::show_own_window(title);
}

#[cfg(target_os = "macos")]
pub fn hide_overlay_window(title: &str) {
    macos::hide_own_window(title);
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn show_overlay_window(_title: &str) {}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn hide_overlay_window(_title: &str) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;

    #[test]
    fn test_screen_center() {
        let size = ScreenSize {
            width: 1920,
            height: 1080,
        };
        assert_eq!(size.center(), ScreenPoint::new(960, 540));
    }

    #[test]
    fn test_unsupported_platform_finds_nothing() {
        let platform = UnsupportedPlatform;
        assert_eq!(platform.foreground_window_title(), None);
        assert_eq!(
            platform.find_window_by_title_substring("ARC Raiders").unwrap(),
            None
        );
        assert!(platform.bring_to_front(&WindowRef(1)).is_err());
        assert!(platform.click_at(ScreenPoint::new(0, 0)).is_err());
        assert!(platform.send_chord(&HotkeyConfig::default()).is_err());
        assert_eq!(platform.screen_size(), None);
    }

    #[test]
    fn test_chord_key_families() {
        assert_eq!(chord_key("KeyF"), ChordKey::Letter(b'F'));
        assert_eq!(chord_key("Digit7"), ChordKey::Digit(7));
        assert_eq!(chord_key("F1"), ChordKey::Function(1));
        assert_eq!(chord_key("F12"), ChordKey::Function(12));
        assert_eq!(chord_key("F13"), ChordKey::Named("F13"));
        assert_eq!(chord_key("Keyf"), ChordKey::Named("Keyf"));
        assert_eq!(chord_key("KeyFF"), ChordKey::Named("KeyFF"));
        assert_eq!(chord_key("Escape"), ChordKey::Named("Escape"));
    }

    #[test]
    fn test_thread_spawner_runs_job() {
        let (tx, rx) = mpsc::channel();
        let ran = std::sync::Arc::new(AtomicBool::new(false));
        let ran_in_job = ran.clone();
        ThreadSpawner.spawn(
            "test-job",
            Box::new(move || {
                ran_in_job.store(true, Ordering::SeqCst);
                let _ = tx.send(std::thread::current().name().map(str::to_string));
            }),
        );
        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("test-job"));
        assert!(ran.load(Ordering::SeqCst));
    }
}
