use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::catalog::EquatorialCoord;

/// An equatorial position as reported by the mount or the plate solver.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
pub(crate) struct PointingResponse {
    ra_deg: f64,
    dec_deg: f64,
}

impl SerdeJSONBodyHTTPResponseType for PointingResponse {}

impl From<PointingResponse> for EquatorialCoord {
    fn from(value: PointingResponse) -> Self { EquatorialCoord::new(value.ra_deg, value.dec_deg) }
}
