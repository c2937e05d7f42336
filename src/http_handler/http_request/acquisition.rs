use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType, NoBodyHTTPRequestType,
};
use crate::http_handler::http_response::{acquisition::ImagePathResponse, device_common::Ack};

/// Request type for the /take_temp_light endpoint.
///
/// The resulting frame is temporary and overwritten by the next exposure.
#[derive(serde::Serialize, Debug)]
pub(crate) struct TakeTempLightRequest {
    /// Exposure time in seconds.
    pub(crate) seconds: f64,
}

impl JSONBodyHTTPRequestType for TakeTempLightRequest {
    type Body = TakeTempLightRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for TakeTempLightRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/take_temp_light" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}

/// Request type for the /get_img_path endpoint.
#[derive(Debug)]
pub(crate) struct ImagePathRequest {}

impl NoBodyHTTPRequestType for ImagePathRequest {}

impl HTTPRequestType for ImagePathRequest {
    type Response = ImagePathResponse;
    fn endpoint(&self) -> &'static str { "/get_img_path" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
