use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::device_common::Ack;

/// Request type for the /focus endpoint, starting an autofocus run.
#[derive(Debug)]
pub(crate) struct FocusRequest {}

impl NoBodyHTTPRequestType for FocusRequest {}

impl HTTPRequestType for FocusRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/focus" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
