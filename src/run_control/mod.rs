//! The run manager: a cooperative loop that takes targets from the scheduler and drives
//! the devices through the observation pipeline.

mod control;
mod pointing;
mod run_error;
mod run_manager;
mod run_step;
mod step_gate;
#[cfg(test)]
mod tests;

pub use control::{ControlCommand, RunStatus};
pub use pointing::{Tolerance, within_tolerance};
pub use run_error::RunError;
pub use run_manager::{RunConfig, RunManager, RunMode};
pub use run_step::RunStep;
pub use step_gate::StepGate;
