use async_trait::async_trait;
use velo_shared::ConfiguratorEvent;

use crate::CollaboratorResult;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event to observers. Called at most once per event.
    async fn notify(&self, event: &ConfiguratorEvent) -> CollaboratorResult<()>;
}
