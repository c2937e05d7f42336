use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::devices::SliderPosition;

/// Slider position encoded as `0` (moving), `1` (acquisition) or `2` (science).
#[derive(serde::Deserialize, Debug, Clone, Copy)]
#[serde(transparent)]
pub(crate) struct SliderPositionResponse(u8);

impl SerdeJSONBodyHTTPResponseType for SliderPositionResponse {}

impl SliderPositionResponse {
    /// Decodes the wire value, `None` for unknown codes.
    pub(crate) fn position(self) -> Option<SliderPosition> {
        match self.0 {
            0 => Some(SliderPosition::Moving),
            1 => Some(SliderPosition::Acquisition),
            2 => Some(SliderPosition::Science),
            _ => None,
        }
    }
}
