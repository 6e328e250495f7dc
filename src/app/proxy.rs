//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;
use tao::event_loop::EventLoopProxy;

/// Abstracts the sending of user events so command handlers can be tested
/// without a running event loop. Sending is fire-and-forget.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // A closed event loop means the window is gone; nothing left to update.
        if let Err(e) = EventLoopProxy::send_event(self, event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}
