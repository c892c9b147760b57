//! Outbound calls to the inference service.
//!
//! Every call goes through one shared [`GatewayClient`]. The result of a call
//! is either the upstream's answer, relayed untouched as an
//! [`UpstreamResponse`], or a [`GatewayError`] describing why the upstream was
//! never reached. A 4xx/5xx from upstream is an `Ok` here.

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod response;

use thiserror::Error;

pub use client::GatewayClient;
pub use endpoints::{Operation, UpstreamEndpoints};
pub use envelope::{ChatMessage, InferenceEnvelope, MessageKind};
pub use response::UpstreamResponse;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("refusing to forward an empty payload")]
    EmptyPayload,
    #[error("inference service unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),
    #[error("invalid upstream url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value for upstream header {0}")]
    InvalidHeader(&'static str),
    #[error("failed to build HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),
}
