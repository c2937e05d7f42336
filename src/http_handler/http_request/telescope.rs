use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType, NoBodyHTTPRequestType,
};
use crate::http_handler::http_response::{device_common::Ack, telescope::PointingResponse};

/// Request type for the /slew_abs endpoint.
#[derive(serde::Serialize, Debug)]
pub(crate) struct SlewAbsRequest {
    /// Target right ascension in degrees.
    pub(crate) ra_deg: f64,
    /// Target declination in degrees.
    pub(crate) dec_deg: f64,
}

impl JSONBodyHTTPRequestType for SlewAbsRequest {
    type Body = SlewAbsRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for SlewAbsRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/slew_abs" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}

/// Request type for the /slew_rel endpoint.
#[derive(serde::Serialize, Debug)]
pub(crate) struct SlewRelRequest {
    /// Offset in right ascension in degrees.
    pub(crate) ra_deg: f64,
    /// Offset in declination in degrees.
    pub(crate) dec_deg: f64,
}

impl JSONBodyHTTPRequestType for SlewRelRequest {
    type Body = SlewRelRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for SlewRelRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/slew_rel" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}

/// Request type for the /get_pos endpoint of the mount.
#[derive(Debug)]
pub(crate) struct TelescopePositionRequest {}

impl NoBodyHTTPRequestType for TelescopePositionRequest {}

impl HTTPRequestType for TelescopePositionRequest {
    type Response = PointingResponse;
    fn endpoint(&self) -> &'static str { "/get_pos" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}

#[derive(Debug)]
pub(crate) struct ParkRequest {}

impl NoBodyHTTPRequestType for ParkRequest {}

impl HTTPRequestType for ParkRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/park" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}

#[derive(Debug)]
pub(crate) struct UnparkRequest {}

impl NoBodyHTTPRequestType for UnparkRequest {}

impl HTTPRequestType for UnparkRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/unpark" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
