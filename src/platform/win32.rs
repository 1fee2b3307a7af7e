//! Win32 adapters: window enumeration, activation, mouse and keyboard input

use std::mem;

use global_hotkey::hotkey::Modifiers;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEINPUT, MOUSE_EVENT_FLAGS,
    VIRTUAL_KEY, VK_BACK, VK_CONTROL, VK_DELETE, VK_DOWN, VK_END, VK_ESCAPE, VK_F1, VK_HOME,
    VK_INSERT, VK_LEFT, VK_LWIN, VK_MENU, VK_NEXT, VK_OEM_1, VK_OEM_2, VK_OEM_3, VK_OEM_4,
    VK_OEM_5, VK_OEM_6, VK_OEM_7, VK_OEM_COMMA, VK_OEM_MINUS, VK_OEM_PERIOD, VK_OEM_PLUS,
    VK_PRIOR, VK_RETURN, VK_RIGHT, VK_SHIFT, VK_SPACE, VK_TAB, VK_UP,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetForegroundWindow, GetSystemMetrics, GetWindowTextW, GetWindowThreadProcessId,
    IsIconic, IsWindowVisible, SetCursorPos, SetForegroundWindow, SetWindowPos, ShowWindow,
    HWND_TOPMOST, SM_CXSCREEN, SM_CYSCREEN, SWP_NOMOVE, SWP_NOSIZE, SWP_SHOWWINDOW, SW_HIDE,
    SW_RESTORE, SW_SHOW,
};

use super::{
    chord_key, ChordKey, InputSynthesisService, ScreenPoint, ScreenSize, WindowFocusService,
    WindowInfo, WindowRef,
};
use crate::config::HotkeyConfig;
use crate::coordinator::title_contains_keyword;
use crate::error::{MarketError, Result};
use crate::hotkeys::parse_modifiers;
use crate::logging;

pub struct Win32Focus;
pub struct Win32Input;

fn hwnd_of(window: &WindowRef) -> HWND {
    HWND(window.0 as *mut _)
}

fn window_title(hwnd: HWND) -> Option<String> {
    let mut buf = [0u16; 512];
    let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
    if len <= 0 {
        return None;
    }
    Some(String::from_utf16_lossy(&buf[..len as usize]))
}

fn owning_process(hwnd: HWND) -> u32 {
    let mut pid: u32 = 0;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    pid
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam.0 as *mut Vec<isize>);
    handles.push(hwnd.0 as isize);
    TRUE
}

/// Snapshot of all top-level window handles, in z-order.
fn top_level_windows() -> Result<Vec<isize>> {
    let mut handles: Vec<isize> = Vec::new();
    unsafe {
        EnumWindows(
            Some(collect_window),
            LPARAM(&mut handles as *mut Vec<isize> as isize),
        )
    }
    .map_err(|e| MarketError::Platform(format!("EnumWindows failed: {}", e)))?;
    Ok(handles)
}

impl WindowFocusService for Win32Focus {
    fn foreground_window_title(&self) -> Option<String> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0.is_null() {
            return None;
        }
        window_title(hwnd)
    }

    fn find_window_by_title_substring(&self, keyword: &str) -> Result<Option<WindowInfo>> {
        let own_pid = unsafe { GetCurrentProcessId() };

        for raw in top_level_windows()? {
            let hwnd = HWND(raw as *mut _);
            if !unsafe { IsWindowVisible(hwnd) }.as_bool() || owning_process(hwnd) == own_pid {
                continue;
            }
            let Some(title) = window_title(hwnd) else {
                continue;
            };
            if title_contains_keyword(&title, keyword) {
                return Ok(Some(WindowInfo {
                    window: WindowRef(raw),
                    title,
                }));
            }
        }
        Ok(None)
    }

    fn bring_to_front(&self, window: &WindowRef) -> Result<()> {
        let hwnd = hwnd_of(window);
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            if !SetForegroundWindow(hwnd).as_bool() {
                return Err(MarketError::Platform(format!(
                    "SetForegroundWindow refused window {:#x}",
                    window.0
                )));
            }
        }
        Ok(())
    }
}

fn send_inputs(inputs: &[INPUT]) -> Result<()> {
    let sent = unsafe { SendInput(inputs, mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(MarketError::Platform(format!(
            "SendInput injected {} of {} events",
            sent,
            inputs.len()
        )));
    }
    Ok(())
}

fn mouse_button(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn key_event(vk: VIRTUAL_KEY, up: bool) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: if up { KEYEVENTF_KEYUP } else { KEYBD_EVENT_FLAGS(0) },
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn virtual_key(key: ChordKey<'_>) -> Option<VIRTUAL_KEY> {
    let vk = match key {
        // Letters and digits share their ASCII code
        ChordKey::Letter(letter) => VIRTUAL_KEY(letter as u16),
        ChordKey::Digit(digit) => VIRTUAL_KEY((b'0' + digit) as u16),
        ChordKey::Function(n) => VIRTUAL_KEY(VK_F1.0 + n as u16 - 1),
        ChordKey::Named(name) => match name {
            "Space" => VK_SPACE,
            "Enter" => VK_RETURN,
            "Escape" => VK_ESCAPE,
            "Tab" => VK_TAB,
            "Backspace" => VK_BACK,
            "Delete" => VK_DELETE,
            "Insert" => VK_INSERT,
            "Home" => VK_HOME,
            "End" => VK_END,
            "PageUp" => VK_PRIOR,
            "PageDown" => VK_NEXT,
            "ArrowUp" => VK_UP,
            "ArrowDown" => VK_DOWN,
            "ArrowLeft" => VK_LEFT,
            "ArrowRight" => VK_RIGHT,
            "Semicolon" => VK_OEM_1,
            "Slash" => VK_OEM_2,
            "Backquote" => VK_OEM_3,
            "BracketLeft" => VK_OEM_4,
            "Backslash" => VK_OEM_5,
            "BracketRight" => VK_OEM_6,
            "Quote" => VK_OEM_7,
            "Comma" => VK_OEM_COMMA,
            "Period" => VK_OEM_PERIOD,
            "Minus" => VK_OEM_MINUS,
            "Equal" => VK_OEM_PLUS,
            _ => return None,
        },
    };
    Some(vk)
}

fn modifier_keys(modifiers: Modifiers) -> Vec<VIRTUAL_KEY> {
    [
        (Modifiers::CONTROL, VK_CONTROL),
        (Modifiers::ALT, VK_MENU),
        (Modifiers::SHIFT, VK_SHIFT),
        (Modifiers::META, VK_LWIN),
    ]
    .into_iter()
    .filter(|(flag, _)| modifiers.contains(*flag))
    .map(|(_, vk)| vk)
    .collect()
}

impl InputSynthesisService for Win32Input {
    fn click_at(&self, point: ScreenPoint) -> Result<()> {
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|e| MarketError::Platform(format!("SetCursorPos failed: {}", e)))?;
        send_inputs(&[
            mouse_button(MOUSEEVENTF_LEFTDOWN),
            mouse_button(MOUSEEVENTF_LEFTUP),
        ])
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        let (width, height) =
            unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        (width > 0 && height > 0).then_some(ScreenSize { width, height })
    }

    fn send_chord(&self, chord: &HotkeyConfig) -> Result<()> {
        let key = virtual_key(chord_key(&chord.key)).ok_or_else(|| {
            MarketError::Platform(format!("No virtual key for '{}'", chord.key))
        })?;
        let modifiers = modifier_keys(parse_modifiers(&chord.modifiers)?);

        let mut inputs: Vec<INPUT> = modifiers.iter().map(|&vk| key_event(vk, false)).collect();
        inputs.push(key_event(key, false));
        inputs.push(key_event(key, true));
        inputs.extend(modifiers.iter().rev().map(|&vk| key_event(vk, true)));
        send_inputs(&inputs)
    }
}

/// Our own top-level window with exactly this title, visible or not.
fn find_own_window(title: &str) -> Option<HWND> {
    let own_pid = unsafe { GetCurrentProcessId() };
    let handles = match top_level_windows() {
        Ok(handles) => handles,
        Err(e) => {
            logging::log("PANEL", &format!("Cannot enumerate windows: {}", e));
            return None;
        }
    };

    handles
        .into_iter()
        .map(|raw| HWND(raw as *mut _))
        .find(|&hwnd| owning_process(hwnd) == own_pid && window_title(hwnd).as_deref() == Some(title))
}

pub fn show_own_window(title: &str) {
    let Some(hwnd) = find_own_window(title) else {
        logging::log("PANEL", "show: overlay window not found");
        return;
    };
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        if let Err(e) = SetWindowPos(
            hwnd,
            HWND_TOPMOST,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_SHOWWINDOW,
        ) {
            logging::log("PANEL", &format!("SetWindowPos(TOPMOST) failed: {}", e));
        }
        let _ = SetForegroundWindow(hwnd);
    }
}

pub fn hide_own_window(title: &str) {
    match find_own_window(title) {
        Some(hwnd) => unsafe {
            let _ = ShowWindow(hwnd, SW_HIDE);
        },
        None => logging::log("PANEL", "hide: overlay window not found"),
    }
}
