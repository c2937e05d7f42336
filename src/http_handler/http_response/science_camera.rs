use super::response_common::SerdeJSONBodyHTTPResponseType;

#[derive(serde::Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct FilenameResponse(String);

impl SerdeJSONBodyHTTPResponseType for FilenameResponse {}

impl FilenameResponse {
    pub(crate) fn into_filename(self) -> String { self.0 }
}

/// Region of interest as `[width, height]`.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
pub(crate) struct RoiResponse(u32, u32);

impl SerdeJSONBodyHTTPResponseType for RoiResponse {}

impl RoiResponse {
    pub(crate) fn width(self) -> u32 { self.0 }
    pub(crate) fn height(self) -> u32 { self.1 }
}

/// Average well fill of the last frames as `[fraction, adu]`.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
pub(crate) struct WellFillResponse(f64, f64);

impl SerdeJSONBodyHTTPResponseType for WellFillResponse {}

impl WellFillResponse {
    pub(crate) fn fraction(self) -> f64 { self.0 }
    pub(crate) fn adu(self) -> f64 { self.1 }
}
