//! Target scheduling: which star to observe next, and in which band.
//!
//! The [`Scheduler`] owns all scheduling state. It draws groups of targets from a pluggable
//! [`GroupPolicy`], pairs every group with a calibration reference star and tracks the
//! outcome feedback the run manager reports through [`TargetSource`].

mod group_policy;
mod in_order_policy;
mod random_policy;
mod scheduler;
mod scheduler_error;
mod target_source;
mod weighted_policy;

pub use group_policy::GroupPolicy;
pub use in_order_policy::InOrderPolicy;
pub use random_policy::RandomPolicy;
pub use scheduler::{Scheduler, SingleSearch};
pub use scheduler_error::SchedulerError;
pub use target_source::{ScheduledTarget, TargetSource};
pub use weighted_policy::{CostWeights, SkyContext, WeightedPolicy};
