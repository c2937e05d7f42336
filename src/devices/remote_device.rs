use super::{DeviceError, DeviceFault};
use crate::http_handler::{
    HTTPError,
    http_client::HTTPClient,
    http_request::{device_common::ReadyRequest, request_common::NoBodyHTTPRequestType},
};
use std::time::Duration;

/// Connection to one device service, shared by the per-role remote implementations.
#[derive(Debug)]
pub struct RemoteDevice {
    name: String,
    client: HTTPClient,
}

impl RemoteDevice {
    /// Creates the connection handle. No request is sent until the first command.
    ///
    /// # Arguments
    /// * `name` – Device name used in logs and status.
    /// * `base_url` – Root URL of the device service.
    /// * `timeout` – Per request timeout.
    pub fn new(name: &str, base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { name: String::from(name), client: HTTPClient::new(base_url, timeout)? })
    }

    pub fn name(&self) -> &str { &self.name }
    pub(crate) fn client(&self) -> &HTTPClient { &self.client }

    /// Tags a transport error with this device.
    pub(crate) fn fault(&self, e: HTTPError) -> DeviceError {
        DeviceError::new(&self.name, DeviceFault::Transport(e))
    }

    /// Tags a contract violation with this device.
    pub(crate) fn protocol_fault(&self, msg: &str) -> DeviceError {
        DeviceError::new(&self.name, DeviceFault::Protocol(String::from(msg)))
    }

    pub(crate) async fn ready(&self) -> Result<bool, DeviceError> {
        ReadyRequest {}
            .send_request(&self.client)
            .await
            .map(|flag| flag.is_set())
            .map_err(|e| self.fault(e))
    }
}

/// Implements [`super::Awaitable`] for a newtype around [`RemoteDevice`].
macro_rules! remote_awaitable {
    ($remote:ty) => {
        #[async_trait::async_trait]
        impl $crate::devices::Awaitable for $remote {
            fn name(&self) -> &str { self.0.name() }

            async fn ready(&self) -> Result<bool, $crate::devices::DeviceError> {
                self.0.ready().await
            }
        }
    };
}

pub(super) use remote_awaitable;
