use super::response_common::SerdeJSONBodyHTTPResponseType;

/// Path of the latest temporary frame, `null` if retrieval failed.
#[derive(serde::Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct ImagePathResponse(Option<String>);

impl SerdeJSONBodyHTTPResponseType for ImagePathResponse {}

impl ImagePathResponse {
    pub(crate) fn into_path(self) -> Option<String> { self.0 }
}
