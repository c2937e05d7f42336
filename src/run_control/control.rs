use super::{RunMode, RunStep};
use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Operator requests, delivered to the run manager over an mpsc channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ControlCommand {
    /// Switch to manual single-step mode.
    Pause,
    /// Switch back to automatic mode.
    Resume,
    /// Release the next stage transition in manual mode.
    Step,
    /// Unpark and resume the pipeline at the next update.
    Startup,
    /// Park and idle at the next update.
    Shutdown,
    /// Clear all scheduling state at the next update.
    ResetScheduler,
}

/// Snapshot of the run manager published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatus {
    pub step: RunStep,
    pub mode: RunMode,
    pub auto_mode: bool,
    pub waiting_on: Vec<String>,
    pub target: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self {
            step: RunStep::Scheduler,
            mode: RunMode::Idle,
            auto_mode: true,
            waiting_on: Vec::new(),
            target: None,
            timestamp: Utc::now(),
        }
    }
}
