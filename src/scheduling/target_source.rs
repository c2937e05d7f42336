use super::SchedulerError;
use crate::catalog::{Band, CatalogTable, Star};
use async_trait::async_trait;
use std::fmt::{Display, Formatter};

/// One unit of work handed to the run manager.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTarget {
    star: Star,
    band: Band,
    requester: Option<String>,
}

impl ScheduledTarget {
    pub fn new(star: Star, band: Band, requester: Option<String>) -> Self {
        Self { star, band, requester }
    }

    pub fn star(&self) -> &Star { &self.star }
    pub fn band(&self) -> &Band { &self.band }
    pub fn requester(&self) -> Option<&str> { self.requester.as_deref() }
    pub fn catalog_table(&self) -> CatalogTable { self.star.catalog_table() }
    pub fn id(&self) -> i64 { self.star.id() }
}

impl Display for ScheduledTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in band {}", self.star, self.band)?;
        if let Some(req) = &self.requester {
            write!(f, " for {req}")?;
        }
        Ok(())
    }
}

/// The scheduling surface the run manager drives.
///
/// Outcome calls refer to the target most recently returned by `next_target`.
#[async_trait]
pub trait TargetSource: Send {
    async fn next_target(&mut self) -> Result<ScheduledTarget, SchedulerError>;
    async fn target_success(&mut self) -> Result<(), SchedulerError>;
    async fn target_failed(&mut self) -> Result<(), SchedulerError>;
    /// Clears all scheduling state; the catalog is left untouched.
    async fn reset(&mut self) -> Result<(), SchedulerError>;
}
