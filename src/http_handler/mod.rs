//! RPC transport towards the device services.
//!
//! Every device service is reachable under its own base URL. Each remote operation is
//! a statically declared request type in [`http_request`] paired with a response type
//! in [`http_response`].

pub(crate) mod common;
pub(crate) mod http_client;
pub(crate) mod http_request;
pub(crate) mod http_response;

pub(crate) use common::HTTPError;
