use crate::devices::{Awaitable, DeviceError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Manual single-step mode as a device: ready in automatic mode or once released.
#[derive(Debug)]
pub struct StepGate {
    auto_mode: AtomicBool,
    released: AtomicBool,
}

impl StepGate {
    pub fn new(auto_mode: bool) -> Self {
        Self { auto_mode: AtomicBool::new(auto_mode), released: AtomicBool::new(false) }
    }

    pub fn is_auto(&self) -> bool { self.auto_mode.load(Ordering::Acquire) }
    pub fn set_auto(&self, auto_mode: bool) { self.auto_mode.store(auto_mode, Ordering::Release); }
    /// Lets exactly one stage transition pass.
    pub fn release(&self) { self.released.store(true, Ordering::Release); }
    /// Re-arms the gate after a transition passed.
    pub fn consume(&self) { self.released.store(false, Ordering::Release); }
}

#[async_trait]
impl Awaitable for StepGate {
    fn name(&self) -> &str { "single_step" }

    async fn ready(&self) -> Result<bool, DeviceError> {
        Ok(self.is_auto() || self.released.load(Ordering::Acquire))
    }
}
