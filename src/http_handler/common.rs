use super::http_request::request_common::RequestError;
use super::http_response::response_common::ResponseError;
use std::fmt::{Display, Formatter};

/// Transport level failure of a single remote call.
#[derive(Debug)]
pub enum HTTPError {
    HTTPRequestError(RequestError),
    HTTPResponseError(ResponseError),
}

impl Display for HTTPError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HTTPError::HTTPRequestError(e) => write!(f, "request failed: {e}"),
            HTTPError::HTTPResponseError(e) => write!(f, "response rejected: {e}"),
        }
    }
}

impl std::error::Error for HTTPError {}

impl From<RequestError> for HTTPError {
    fn from(value: RequestError) -> Self { HTTPError::HTTPRequestError(value) }
}

impl From<ResponseError> for HTTPError {
    fn from(value: ResponseError) -> Self { HTTPError::HTTPResponseError(value) }
}
