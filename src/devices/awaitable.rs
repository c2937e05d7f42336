use super::DeviceError;
use async_trait::async_trait;

/// Something the run manager can wait on.
#[async_trait]
pub trait Awaitable: Send + Sync {
    /// Unique name, used in logs and in the `waiting_on` status.
    fn name(&self) -> &str;

    /// Whether the most recently issued command has completed.
    ///
    /// Must not block and must be idempotent.
    async fn ready(&self) -> Result<bool, DeviceError>;
}
