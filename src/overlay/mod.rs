//! Price overlay
//!
//! - `messages` - the cross-thread UI queue
//! - `state` - overlay states and result captions
//! - `controller` - the state machine, display-free
//! - `view` - the gpui window that hosts it

mod controller;
mod messages;
mod state;
mod view;

pub use controller::{OverlayController, OverlayServices, OverlaySurface};
pub use messages::{ui_queue, UiMessage, UiReceiver, UiSender};
pub use state::{OverlayState, ResultDisplay};
pub use view::{open_overlay_window, start_message_pump, OverlayView, OVERLAY_HEADING};

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
