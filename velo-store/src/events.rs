use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use velo_core::{CollaboratorResult, Notifier};
use velo_shared::ConfiguratorEvent;

/// Fans configurator events out to in-process subscribers.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ConfiguratorEvent>,
}

impl BroadcastNotifier {
    /// `capacity` below one is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfiguratorEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl Notifier for BroadcastNotifier {
    async fn notify(&self, event: &ConfiguratorEvent) -> CollaboratorResult<()> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => {
                debug!("Delivered event to {} subscribers", receivers);
                Ok(())
            }
            Err(e) => {
                warn!("No subscribers for configurator event");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velo_shared::{RuleKind, RuleUpsertedEvent};

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let notifier = BroadcastNotifier::new(4);
        let mut receiver = notifier.subscribe();

        let event = ConfiguratorEvent::RuleUpserted(RuleUpsertedEvent::new(RuleKind::Pricing, 1, true));
        notifier.notify(&event).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_no_subscribers_is_an_error() {
        let notifier = BroadcastNotifier::new(4);
        let event = ConfiguratorEvent::RuleUpserted(RuleUpsertedEvent::new(RuleKind::Combination, 2, false));

        assert!(notifier.notify(&event).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let notifier = BroadcastNotifier::new(0);
        let mut receiver = notifier.subscribe();

        let first = ConfiguratorEvent::RuleUpserted(RuleUpsertedEvent::new(RuleKind::Pricing, 1, true));
        let second = ConfiguratorEvent::RuleUpserted(RuleUpsertedEvent::new(RuleKind::Pricing, 2, true));
        notifier.notify(&first).await.unwrap();
        assert_eq!(receiver.recv().await.unwrap(), first);

        // A single slot: the older of two unread events is dropped.
        notifier.notify(&first).await.unwrap();
        notifier.notify(&second).await.unwrap();
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(receiver.recv().await.unwrap(), second);
    }
}
