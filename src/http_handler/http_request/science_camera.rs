use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType, NoBodyHTTPRequestType,
};
use crate::http_handler::http_response::{
    device_common::{Ack, FlagResponse, ScalarResponse},
    science_camera::{FilenameResponse, RoiResponse, WellFillResponse},
};

/// Declares a body-less query on the science camera service.
macro_rules! camera_query {
    ($name:ident, $endpoint:literal, $response:ty) => {
        #[derive(Debug)]
        pub(crate) struct $name {}

        impl NoBodyHTTPRequestType for $name {}

        impl HTTPRequestType for $name {
            type Response = $response;
            fn endpoint(&self) -> &'static str { $endpoint }
            fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
        }
    };
}

camera_query!(TargetInCameraRequest, "/target_in_camera", FlagResponse);
camera_query!(FilenameRequest, "/get_filename", FilenameResponse);
camera_query!(ItimeRequest, "/get_itime", ScalarResponse);
camera_query!(EmGainRequest, "/get_emgain", ScalarResponse);
camera_query!(RoiRequest, "/get_roi", RoiResponse);
camera_query!(WellFillRequest, "/get_avg_well_fill", WellFillResponse);

/// Request type for the /start_acquisition endpoint, writing the next FITS cube.
#[derive(Debug)]
pub(crate) struct StartAcquisitionRequest {}

impl NoBodyHTTPRequestType for StartAcquisitionRequest {}

impl HTTPRequestType for StartAcquisitionRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/start_acquisition" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}

/// Request type for the /set_itime endpoint.
#[derive(serde::Serialize, Debug)]
pub(crate) struct SetItimeRequest {
    /// Integration time in seconds.
    pub(crate) seconds: f64,
}

impl JSONBodyHTTPRequestType for SetItimeRequest {
    type Body = SetItimeRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for SetItimeRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/set_itime" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
