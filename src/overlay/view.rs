//! The overlay window
//!
//! A single undecorated popup built with gpui-component. It is created once
//! at startup, hidden, and then shown and hidden natively for the lifetime
//! of the process.

use gpui::{
    div, prelude::*, px, rgb, App, AsyncApp, Bounds, Context, Entity, FontWeight, IntoElement,
    KeyDownEvent, ParentElement, Point, Render, Size, Styled, Subscription, Window, WindowBounds,
    WindowHandle, WindowKind, WindowOptions,
};
use gpui_component::{
    button::Button,
    input::{Input, InputEvent, InputState},
    Root,
};

use super::controller::{OverlayController, OverlaySurface};
use super::messages::{UiMessage, UiReceiver, UiSender};
use crate::logging;
use crate::paths::APP_TITLE;
use crate::platform::{self, ScreenPoint};

/// Heading shown above the search input
pub const OVERLAY_HEADING: &str = "ARC Raiders Sell Prices";

const WINDOW_WIDTH: f32 = 400.0;
const WINDOW_HEIGHT: f32 = 200.0;
const BACKGROUND: u32 = 0x121216;
const HEADING_COLOR: u32 = 0x555555;
// Fixed row heights so the focus click can be aimed without measuring
const PADDING_Y: f32 = 12.0;
const ROW_GAP: f32 = 8.0;
const HEADING_HEIGHT: f32 = 20.0;
/// gpui-component's medium input height
const INPUT_HEIGHT: f32 = 32.0;
/// Vertical distance from the window top to the middle of the input
const INPUT_CENTER_Y: f32 = PADDING_Y + HEADING_HEIGHT + ROW_GAP + INPUT_HEIGHT / 2.0;

#[cfg(any(target_os = "windows", target_os = "macos"))]
type TraySlot = Option<crate::tray::TrayManager>;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
type TraySlot = Option<()>;

pub struct OverlayView {
    controller: OverlayController,
    input_state: Entity<InputState>,
    /// Kept alive here so the icon disappears when the view quits
    tray: TraySlot,
    _subscriptions: Vec<Subscription>,
}

impl OverlayView {
    pub fn new(controller: OverlayController, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| InputState::new(window, cx).placeholder("..."));

        // Subscribe to input changes and Enter key
        let input_sub = cx.subscribe_in(&input_state, window, {
            move |this, _, ev: &InputEvent, window, cx| match ev {
                InputEvent::Change => this.on_input_change(cx),
                InputEvent::PressEnter { .. } => this.confirm(window, cx),
                _ => {}
            }
        });

        Self {
            controller,
            input_state,
            tray: None,
            _subscriptions: vec![input_sub],
        }
    }

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    pub fn attach_tray(&mut self, tray: crate::tray::TrayManager) {
        self.tray = Some(tray);
    }

    fn on_input_change(&mut self, cx: &mut Context<Self>) {
        let query = self.input_state.read(cx).value().to_string();
        if self.controller.update_query(&query) {
            cx.notify();
        }
    }

    fn confirm(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.with_surface(window, cx, |controller, surface| controller.confirm(surface));
    }

    fn cancel(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.with_surface(window, cx, |controller, surface| controller.cancel(surface));
    }

    /// Apply one message drained from the UI queue.
    pub fn dispatch(&mut self, msg: UiMessage, window: &mut Window, cx: &mut Context<Self>) {
        self.with_surface(window, cx, |controller, surface| controller.handle(msg, surface));
    }

    fn with_surface(
        &mut self,
        window: &mut Window,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut OverlayController, &mut dyn OverlaySurface),
    ) {
        let mut surface = GpuiSurface {
            window,
            cx: &mut *cx,
            input: &self.input_state,
            tray: &mut self.tray,
        };
        f(&mut self.controller, &mut surface);
        cx.notify();
    }
}

/// [`OverlaySurface`] over the live gpui window.
struct GpuiSurface<'a, 'w> {
    window: &'a mut Window,
    cx: &'a mut Context<'w, OverlayView>,
    input: &'a Entity<InputState>,
    tray: &'a mut TraySlot,
}

impl OverlaySurface for GpuiSurface<'_, '_> {
    fn show(&mut self) {
        platform::show_overlay_window(APP_TITLE);
        self.cx.activate(true);
        self.window.activate_window();
    }

    fn hide(&mut self) {
        platform::hide_overlay_window(APP_TITLE);
    }

    fn clear_input(&mut self) {
        let window = &mut *self.window;
        self.input
            .update(&mut *self.cx, |state, cx| state.set_value("", window, cx));
    }

    fn focus_input(&mut self) {
        let window = &mut *self.window;
        self.input
            .update(&mut *self.cx, |state, cx| state.focus(window, cx));
    }

    fn input_center(&self) -> Option<ScreenPoint> {
        let bounds = self.window.bounds();
        // SendInput works in physical pixels, CGEvent in points
        let scale = if cfg!(target_os = "windows") {
            self.window.scale_factor()
        } else {
            1.0
        };
        Some(input_center_on_screen(
            bounds.origin.x.into(),
            bounds.origin.y.into(),
            bounds.size.width.into(),
            scale,
        ))
    }

    fn quit(&mut self) {
        if self.tray.take().is_some() {
            logging::log("TRAY", "Tray icon removed");
        }
        self.cx.quit();
    }
}

impl Render for OverlayView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let display = self.controller.display();

        div()
            .flex()
            .flex_col()
            .size_full()
            .gap(px(ROW_GAP))
            .px_4()
            .py(px(PADDING_Y))
            .bg(rgb(BACKGROUND))
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                // Fallback for when the global Escape chord could not be armed
                if event.keystroke.key == "escape" {
                    this.cancel(window, cx);
                }
            }))
            .child(
                div()
                    .h(px(HEADING_HEIGHT))
                    .text_size(px(16.))
                    .text_color(rgb(HEADING_COLOR))
                    .child(OVERLAY_HEADING),
            )
            .child(
                div()
                    .h(px(INPUT_HEIGHT))
                    .child(Input::new(&self.input_state)),
            )
            .child(
                div()
                    .text_size(px(18.))
                    .font_weight(FontWeight::BOLD)
                    .text_color(rgb(display.color()))
                    .child(display.text()),
            )
            .child(
                div().flex().flex_row().justify_end().child(
                    Button::new("done")
                        .label("Done")
                        .on_click(cx.listener(|this, _, window, cx| {
                            this.confirm(window, cx);
                        })),
                ),
            )
    }
}

/// Screen point in the middle of the input for a window at `(x, y)`.
fn input_center_on_screen(x: f32, y: f32, width: f32, scale: f32) -> ScreenPoint {
    ScreenPoint::new(
        ((x + width / 2.0) * scale).round() as i32,
        ((y + INPUT_CENTER_Y) * scale).round() as i32,
    )
}

/// Overlay position: horizontally centered, top edge at a third of the
/// primary display's height.
fn overlay_bounds(cx: &App) -> Bounds<gpui::Pixels> {
    let (origin_x, origin_y, screen_w, screen_h) = match cx.primary_display() {
        Some(display) => {
            let bounds = display.bounds();
            (
                f32::from(bounds.origin.x),
                f32::from(bounds.origin.y),
                f32::from(bounds.size.width),
                f32::from(bounds.size.height),
            )
        }
        None => (0.0, 0.0, 1280.0, 720.0),
    };

    Bounds {
        origin: Point {
            x: px(origin_x + screen_w / 2.0 - WINDOW_WIDTH / 2.0),
            y: px(origin_y + screen_h / 3.0),
        },
        size: Size {
            width: px(WINDOW_WIDTH),
            height: px(WINDOW_HEIGHT),
        },
    }
}

/// Create the overlay window, hidden.
///
/// The close control posts `Cancel` instead of destroying the window.
pub fn open_overlay_window(
    cx: &mut App,
    controller: OverlayController,
    queue: UiSender,
) -> anyhow::Result<(WindowHandle<Root>, Entity<OverlayView>)> {
    let bounds = overlay_bounds(cx);
    logging::log(
        "PANEL",
        &format!(
            "Opening overlay at ({:?}, {:?})",
            bounds.origin.x, bounds.origin.y
        ),
    );

    let window_options = WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        titlebar: None,
        window_background: gpui::WindowBackgroundAppearance::Opaque,
        focus: false,
        show: false,
        is_movable: false,
        kind: WindowKind::PopUp,
        ..Default::default()
    };

    let mut view_slot: Option<Entity<OverlayView>> = None;
    let handle = cx.open_window(window_options, |window, cx| {
        // Untitled popups cannot be found again by the native show/hide
        window.set_window_title(APP_TITLE);
        window.on_window_should_close(cx, move |_window, _cx| {
            queue.post(UiMessage::Cancel);
            false
        });

        let view = cx.new(|cx| OverlayView::new(controller, window, cx));
        view_slot = Some(view.clone());
        cx.new(|cx| Root::new(view, window, cx))
    })?;

    let view = view_slot.ok_or_else(|| anyhow::anyhow!("overlay view was not created"))?;
    Ok((handle, view))
}

/// Drain the UI queue on the UI thread until it closes.
pub fn start_message_pump(
    cx: &mut App,
    handle: WindowHandle<Root>,
    view: Entity<OverlayView>,
    rx: UiReceiver,
) {
    cx.spawn(async move |cx: &mut AsyncApp| {
        logging::log("PANEL", "UI queue listener started");
        while let Ok(msg) = rx.recv().await {
            let view = view.clone();
            let applied = handle.update(cx, |_root, window, cx| {
                view.update(cx, |view, cx| view.dispatch(msg, window, cx));
            });
            if applied.is_err() {
                logging::log("PANEL", "Overlay window is gone, stopping UI queue listener");
                break;
            }
        }
        logging::log("PANEL", "UI queue listener stopped");
    })
    .detach();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_center_lies_inside_input_row() {
        let input_top = PADDING_Y + HEADING_HEIGHT + ROW_GAP;
        assert!(INPUT_CENTER_Y > input_top);
        assert!(INPUT_CENTER_Y < input_top + INPUT_HEIGHT);
        assert!(input_top + INPUT_HEIGHT < WINDOW_HEIGHT);
    }

    #[test]
    fn test_input_center_on_screen_scales_to_physical_pixels() {
        assert_eq!(
            input_center_on_screen(760.0, 360.0, WINDOW_WIDTH, 1.0),
            ScreenPoint::new(960, 360 + INPUT_CENTER_Y as i32)
        );
        assert_eq!(
            input_center_on_screen(100.0, 100.0, WINDOW_WIDTH, 1.5),
            ScreenPoint::new(450, ((100.0 + INPUT_CENTER_Y) * 1.5).round() as i32)
        );
    }
}
