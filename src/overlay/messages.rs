//! Cross-thread requests to the UI thread
//!
//! The hotkey listener, the tray listener and click workers never touch UI
//! state. They post a [`UiMessage`] and the UI thread drains the queue in
//! arrival order.

/// Requests handled by the overlay on the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMessage {
    /// Summon the overlay (hotkey or tray "Show")
    Show,
    /// Dismiss without restoring focus (Escape or window close control)
    Cancel,
    /// The deferred click on the input landed, move keyboard focus there
    FocusInput,
    /// Summon chord pressed outside the game; give it back to that window
    ForwardSummon,
    /// The forwarded chord has been delivered, take the summon chord back
    RestoreSummon,
    /// Tray "Exit": unhook hotkeys and quit
    Exit,
}

/// Sending half of the UI queue. Cheap to clone into worker threads.
#[derive(Clone)]
pub struct UiSender {
    tx: async_channel::Sender<UiMessage>,
}

impl UiSender {
    /// Post a message without blocking.
    ///
    /// Returns `false` once the queue has been closed (after `Exit`), so
    /// listener loops know to stop.
    pub fn post(&self, msg: UiMessage) -> bool {
        match self.tx.try_send(msg) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(message = ?msg, error = %e, "UI queue rejected message");
                false
            }
        }
    }

    /// Close the queue for every sender and the receiver.
    pub fn close(&self) {
        self.tx.close();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub type UiReceiver = async_channel::Receiver<UiMessage>;

/// Create the unbounded UI queue.
pub fn ui_queue() -> (UiSender, UiReceiver) {
    let (tx, rx) = async_channel::unbounded();
    (UiSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_arrive_in_order() {
        let (tx, rx) = ui_queue();
        assert!(tx.post(UiMessage::Show));
        assert!(tx.clone().post(UiMessage::FocusInput));
        assert_eq!(rx.try_recv().unwrap(), UiMessage::Show);
        assert_eq!(rx.try_recv().unwrap(), UiMessage::FocusInput);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_post_after_close_fails() {
        let (tx, rx) = ui_queue();
        let worker = tx.clone();
        tx.close();
        assert!(tx.is_closed());
        assert!(!worker.post(UiMessage::Cancel));
        assert!(rx.try_recv().is_err());
    }
}
