use super::request_common::{
    HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType, NoBodyHTTPRequestType,
};
use crate::http_handler::http_response::{
    device_common::Ack,
    plate_solver::{PlateSolutionResponse, TransformResponse},
};

/// Request type for the /solve endpoint.
#[derive(serde::Serialize, Debug)]
pub(crate) struct SolveRequest {
    /// Path of the image on the plate solver host.
    pub(crate) path: String,
}

impl JSONBodyHTTPRequestType for SolveRequest {
    type Body = SolveRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for SolveRequest {
    type Response = Ack;
    fn endpoint(&self) -> &'static str { "/solve" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}

/// Request type for the /plate_solution endpoint.
#[derive(Debug)]
pub(crate) struct PlateSolutionRequest {}

impl NoBodyHTTPRequestType for PlateSolutionRequest {}

impl HTTPRequestType for PlateSolutionRequest {
    type Response = PlateSolutionResponse;
    fn endpoint(&self) -> &'static str { "/plate_solution" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}

/// Request type for the /transform_plate_to_j2000 endpoint.
///
/// Maps a pixel offset from the image center through the latest solution.
#[derive(serde::Serialize, Debug)]
pub(crate) struct TransformRequest {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl JSONBodyHTTPRequestType for TransformRequest {
    type Body = TransformRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for TransformRequest {
    type Response = TransformResponse;
    fn endpoint(&self) -> &'static str { "/transform_plate_to_j2000" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
