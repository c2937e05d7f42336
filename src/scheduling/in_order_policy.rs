use super::{GroupPolicy, SchedulerError};
use crate::catalog::{CatalogGateway, Target};
use async_trait::async_trait;
use std::collections::VecDeque;

/// Hands out targets one by one in catalog order.
#[derive(Debug, Default)]
pub struct InOrderPolicy {
    pending: Option<VecDeque<Target>>,
}

impl InOrderPolicy {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl GroupPolicy for InOrderPolicy {
    fn name(&self) -> &'static str { "in_order" }

    async fn next_group(
        &mut self,
        gateway: &dyn CatalogGateway,
    ) -> Result<Vec<Target>, SchedulerError> {
        if self.pending.is_none() {
            let targets = gateway.targets().await?;
            self.pending = Some(targets.into_iter().filter(Target::is_schedulable).collect());
        }
        self.pending
            .as_mut()
            .and_then(VecDeque::pop_front)
            .map(|t| vec![t])
            .ok_or(SchedulerError::NoObservableTargets)
    }

    fn consumes_targets(&self) -> bool { true }

    fn reset(&mut self) { self.pending = None; }
}
