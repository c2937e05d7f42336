use super::{response_common::SerdeJSONBodyHTTPResponseType, telescope::PointingResponse};
use crate::devices::PlateSolution;

#[derive(serde::Deserialize, Debug, Clone, Copy)]
pub(crate) struct SolvedPlate {
    ra_deg: f64,
    dec_deg: f64,
    angle_deg: f64,
    xscale: f64,
    yscale: f64,
}

/// Latest plate solution. The service answers `false` or `null` when no stars matched.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
#[serde(untagged)]
pub(crate) enum PlateSolutionResponse {
    Solved(SolvedPlate),
    Unsolved(Option<bool>),
}

impl SerdeJSONBodyHTTPResponseType for PlateSolutionResponse {}

impl PlateSolutionResponse {
    pub(crate) fn solution(self) -> Option<PlateSolution> {
        match self {
            PlateSolutionResponse::Solved(s) => Some(PlateSolution {
                ra_deg: s.ra_deg,
                dec_deg: s.dec_deg,
                angle_deg: s.angle_deg,
                xscale: s.xscale,
                yscale: s.yscale,
            }),
            PlateSolutionResponse::Unsolved(_) => None,
        }
    }
}

/// Sky position of a pixel offset, `null` without a valid solution.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
#[serde(transparent)]
pub(crate) struct TransformResponse(Option<PointingResponse>);

impl SerdeJSONBodyHTTPResponseType for TransformResponse {}

impl TransformResponse {
    pub(crate) fn position(self) -> Option<PointingResponse> { self.0 }
}
