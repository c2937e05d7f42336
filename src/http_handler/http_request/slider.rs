use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::slider::SliderPositionResponse;

/// Request type for the /get_pos endpoint of the filter slider.
#[derive(Debug)]
pub(crate) struct SliderPositionRequest {}

impl NoBodyHTTPRequestType for SliderPositionRequest {}

impl HTTPRequestType for SliderPositionRequest {
    type Response = SliderPositionResponse;
    fn endpoint(&self) -> &'static str { "/get_pos" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
