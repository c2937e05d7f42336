use super::{GroupPolicy, SchedulerError};
use crate::catalog::{CatalogGateway, Target};
use async_trait::async_trait;
use rand::Rng;

/// Picks a uniformly random target each time. Targets are never consumed.
///
/// Meant for commissioning runs and tests, not for science nights.
#[derive(Debug, Default)]
pub struct RandomPolicy {
    pending: Option<Vec<Target>>,
}

impl RandomPolicy {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl GroupPolicy for RandomPolicy {
    fn name(&self) -> &'static str { "random" }

    async fn next_group(
        &mut self,
        gateway: &dyn CatalogGateway,
    ) -> Result<Vec<Target>, SchedulerError> {
        if self.pending.is_none() {
            let targets = gateway.targets().await?;
            self.pending = Some(targets.into_iter().filter(Target::is_schedulable).collect());
        }
        let pending = self.pending.as_deref().unwrap_or_default();
        if pending.is_empty() {
            return Err(SchedulerError::NoObservableTargets);
        }
        let idx = rand::rng().random_range(0..pending.len());
        Ok(vec![pending[idx].clone()])
    }

    fn reset(&mut self) { self.pending = None; }
}
