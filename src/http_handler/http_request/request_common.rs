use crate::http_handler::{
    common::HTTPError, http_client::HTTPClient, http_response::response_common::HTTPResponseType,
};
use strum_macros::Display;

/// HTTP verbs used by the device services.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HTTPRequestMethod {
    /// Queries without side effects.
    Get,
    /// Operations that submit a payload for processing (plate solves).
    Post,
    /// Asynchronous device commands.
    Put,
}

/// Failure while sending a request, before any response was received.
#[derive(Debug, Display)]
pub enum RequestError {
    Timeout,
    NoConnection,
    Malformed,
    Unknown,
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            RequestError::Timeout
        } else if value.is_connect() {
            RequestError::NoConnection
        } else if value.is_request() || value.is_builder() {
            RequestError::Malformed
        } else {
            RequestError::Unknown
        }
    }
}

/// Common description of one remote operation.
pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// Endpoint path relative to the service base URL.
    fn endpoint(&self) -> &str;
    /// The corresponding HTTP request method.
    fn request_method(&self) -> HTTPRequestMethod;
    /// Additional headers, none by default.
    fn header_params(&self) -> reqwest::header::HeaderMap { reqwest::header::HeaderMap::default() }

    /// Builds the method, URL and headers of the request.
    fn get_request_base(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = format!("{}{}", client.url(), self.endpoint());
        let builder = match self.request_method() {
            HTTPRequestMethod::Get => client.client().get(url),
            HTTPRequestMethod::Post => client.client().post(url),
            HTTPRequestMethod::Put => client.client().put(url),
        };
        builder.headers(self.header_params())
    }
}

/// Requests without a body.
pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    /// Sends the request and parses the response.
    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, HTTPError> {
        let response =
            self.get_request_base(client).send().await.map_err(RequestError::from)?;
        Ok(Self::Response::read_response(response).await?)
    }
}

/// Requests carrying a JSON body.
pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body;

    /// Sends the request with its JSON body and parses the response.
    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, HTTPError> {
        let response = self
            .get_request_base(client)
            .json(self.body())
            .send()
            .await
            .map_err(RequestError::from)?;
        Ok(Self::Response::read_response(response).await?)
    }
}
