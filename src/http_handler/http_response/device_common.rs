use super::response_common::{HTTPResponseType, ResponseError, SerdeJSONBodyHTTPResponseType};

/// Acknowledgement of an asynchronous command. The body is ignored.
#[derive(Debug)]
pub(crate) struct Ack {}

impl HTTPResponseType for Ack {
    type ParsedResponseType = ();

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        Self::unwrap_return_code(response).await?;
        Ok(())
    }
}

/// A bare JSON boolean, e.g. `ready` or `target_in_camera`.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
#[serde(transparent)]
pub(crate) struct FlagResponse(bool);

impl SerdeJSONBodyHTTPResponseType for FlagResponse {}

impl FlagResponse {
    pub(crate) fn is_set(self) -> bool { self.0 }
}

/// A bare JSON number, e.g. integration time or gain.
#[derive(serde::Deserialize, Debug, Clone, Copy)]
#[serde(transparent)]
pub(crate) struct ScalarResponse(f64);

impl SerdeJSONBodyHTTPResponseType for ScalarResponse {}

impl ScalarResponse {
    pub(crate) fn value(self) -> f64 { self.0 }
}
