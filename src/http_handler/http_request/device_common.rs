//! Operations every device service shares.

use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::device_common::{Ack, FlagResponse};

/// Request type for the /ready endpoint.
#[derive(Debug)]
pub(crate) struct ReadyRequest {}

impl NoBodyHTTPRequestType for ReadyRequest {}

impl HTTPRequestType for ReadyRequest {
    type Response = FlagResponse;
    fn endpoint(&self) -> &'static str { "/ready" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}

/// Request type for the /to_acquisition endpoint of slider and focuser.
#[derive(Debug)]
pub(crate) struct ToAcquisitionRequest {}

impl NoBodyHTTPRequestType for ToAcquisitionRequest {}

impl HTTPRequestType for ToAcquisitionRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/to_acquisition" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}

/// Request type for the /to_science endpoint of slider and focuser.
#[derive(Debug)]
pub(crate) struct ToScienceRequest {}

impl NoBodyHTTPRequestType for ToScienceRequest {}

impl HTTPRequestType for ToScienceRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/to_science" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
