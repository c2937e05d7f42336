use super::SchedulerError;
use crate::catalog::{CatalogGateway, Target};
use async_trait::async_trait;

/// Decides which targets form the next observation group.
#[async_trait]
pub trait GroupPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the next non-empty group, or [`SchedulerError::NoObservableTargets`].
    async fn next_group(
        &mut self,
        gateway: &dyn CatalogGateway,
    ) -> Result<Vec<Target>, SchedulerError>;

    /// Whether every returned target is removed from the pool, so that repeated calls
    /// eventually end in [`SchedulerError::NoObservableTargets`].
    fn consumes_targets(&self) -> bool { false }

    /// Forgets all pending targets and history; they are reloaded on the next call.
    fn reset(&mut self);
}
