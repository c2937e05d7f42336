use std::time::Duration;

/// A simple wrapper around `reqwest::Client` used to talk to one device service
/// with a preconfigured base URL and default settings.
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL of the device service, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient` for the given device service.
    ///
    /// # Arguments
    /// * `base_url` – The root URL of the service (e.g., `"http://localhost:7274"`).
    /// * `timeout` – Per request timeout.
    ///
    /// # Returns
    /// A configured `HTTPClient` or the builder error if the TLS/HTTP backend could not be set up.
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Result<HTTPClient, reqwest::Error> {
        Ok(HTTPClient {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: String::from(base_url.trim_end_matches('/')),
        })
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub(crate) fn url(&self) -> &str { self.base_url.as_str() }
}
