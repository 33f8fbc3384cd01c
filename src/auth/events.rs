// src/auth/events.rs
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::AuthEvent;

const EVENT_CAPACITY: usize = 16;

/// Single producer of [`AuthEvent`]s; each page flow holds its own
/// subscription.
#[derive(Debug, Clone)]
pub struct AuthEventBus {
    sender: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: AuthEvent) {
        // No subscribers just means no page is listening right now
        if self.sender.send(event).is_err() {
            debug!("Auth event published with no listeners");
        }
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Next event, or `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Auth listener fell behind, {} events dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_sees_events() {
        let bus = AuthEventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(AuthEvent::SignedOut);

        assert_eq!(first.next().await, Some(AuthEvent::SignedOut));
        assert_eq!(second.next().await, Some(AuthEvent::SignedOut));
    }

    #[tokio::test]
    async fn test_closed_bus_ends_subscription() {
        let bus = AuthEventBus::new();
        let mut subscription = bus.subscribe();
        drop(bus);
        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn test_publish_without_listeners() {
        AuthEventBus::new().publish(AuthEvent::SignedOut);
    }
}
