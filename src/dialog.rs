//! Small modal-style question window
//!
//! The overlay window is hidden most of the time, so native sheets attached
//! to it would not be seen. Questions get their own short-lived window.

use std::sync::Arc;

use gpui::{
    div, prelude::*, px, rgb, App, Bounds, Context, FontWeight, IntoElement, ParentElement,
    Point, Render, SharedString, Size, Styled, Window, WindowBounds, WindowKind, WindowOptions,
};
use gpui_component::{button::Button, Root};
use parking_lot::Mutex;

use crate::logging;

const DIALOG_WIDTH: f32 = 440.0;
const DIALOG_HEIGHT: f32 = 170.0;

/// Called once with the index of the chosen button, or `None` when the
/// window was closed without answering.
pub type AnswerCallback = Box<dyn FnOnce(Option<usize>, &mut App)>;

type AnswerSlot = Arc<Mutex<Option<AnswerCallback>>>;

fn take_answer(slot: &AnswerSlot) -> Option<AnswerCallback> {
    slot.lock().take()
}

pub struct DialogView {
    title: SharedString,
    message: SharedString,
    buttons: Vec<SharedString>,
    on_answer: AnswerSlot,
}

impl DialogView {
    fn answer(&mut self, choice: usize, window: &mut Window, cx: &mut Context<Self>) {
        let Some(label) = self.buttons.get(choice) else {
            crate::debug_panic!("dialog answer {} out of range", choice);
            return;
        };
        logging::log_ui_event("dialog", "answer", Some(&label.to_string()));
        let callback = take_answer(&self.on_answer);
        window.remove_window();
        if let Some(callback) = callback {
            callback(Some(choice), cx);
        }
    }
}

impl Render for DialogView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let buttons = self.buttons.iter().enumerate().map(|(index, label)| {
            Button::new(("dialog-button", index))
                .label(label.clone())
                .on_click(cx.listener(move |this, _, window, cx| {
                    this.answer(index, window, cx);
                }))
        });

        div()
            .flex()
            .flex_col()
            .size_full()
            .gap_3()
            .p(px(20.))
            .bg(rgb(0x121216))
            .child(
                div()
                    .text_size(px(16.))
                    .font_weight(FontWeight::BOLD)
                    .text_color(rgb(0xEEEEEE))
                    .child(self.title.clone()),
            )
            .child(
                div()
                    .flex_1()
                    .text_size(px(14.))
                    .text_color(rgb(0xBBBBBB))
                    .child(self.message.clone()),
            )
            .child(div().flex().flex_row().justify_end().gap_2().children(buttons))
    }
}

/// Open a question window centered on the primary display.
pub fn open_dialog(
    cx: &mut App,
    title: &str,
    message: &str,
    buttons: &[&str],
    on_answer: impl FnOnce(Option<usize>, &mut App) + 'static,
) -> anyhow::Result<()> {
    let (screen_x, screen_y, screen_w, screen_h) = match cx.primary_display() {
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
    let bounds = Bounds {
        origin: Point {
            x: px(screen_x + (screen_w - DIALOG_WIDTH) / 2.0),
            y: px(screen_y + (screen_h - DIALOG_HEIGHT) / 2.0),
        },
        size: Size {
            width: px(DIALOG_WIDTH),
            height: px(DIALOG_HEIGHT),
        },
    };

    let window_options = WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        titlebar: Some(gpui::TitlebarOptions {
            title: Some(SharedString::from(title.to_string())),
            ..Default::default()
        }),
        focus: true,
        show: true,
        kind: WindowKind::Normal,
        ..Default::default()
    };

    let slot: AnswerSlot = Arc::new(Mutex::new(Some(Box::new(on_answer))));
    let view_slot = slot.clone();
    let title = SharedString::from(title.to_string());
    let message = SharedString::from(message.to_string());
    let buttons: Vec<SharedString> = buttons
        .iter()
        .map(|b| SharedString::from(b.to_string()))
        .collect();

    cx.open_window(window_options, |window, cx| {
        window.on_window_should_close(cx, move |_window, cx| {
            if let Some(callback) = take_answer(&slot) {
                callback(None, cx);
            }
            true
        });
        let view = cx.new(|_| DialogView {
            title,
            message,
            buttons,
            on_answer: view_slot,
        });
        cx.new(|cx| Root::new(view, window, cx))
    })?;

    cx.activate(true);
    Ok(())
}
