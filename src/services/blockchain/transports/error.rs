//! Transport error types.
//!
//! Errors raised while moving JSON-RPC envelopes to and from a node. They say
//! nothing about whether the node accepted the call; JSON-RPC level failures are
//! reported by the clients as `BlockChainError::RpcError`.

use reqwest::StatusCode;
use std::collections::HashMap;
use thiserror::Error as ThisError;

use crate::utils::error::{ErrorContext, TraceableError};

type BoxedSource = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Errors that can occur while talking to a provider endpoint
#[derive(ThisError, Debug)]
pub enum TransportError {
	/// Non-success HTTP status from the endpoint
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: StatusCode,
		url: String,
		body: String,
		context: ErrorContext,
	},

	/// Connection could not be established or was lost
	#[error("Network error: {0}")]
	Network(ErrorContext),

	/// Request body could not be serialized
	#[error("Request serialization error: {0}")]
	RequestSerialization(ErrorContext),

	/// Response was not a valid JSON-RPC envelope
	#[error("Response parse error: {0}")]
	ResponseParse(ErrorContext),

	/// No response within the configured timeout
	#[error("Timeout error: {0}")]
	Timeout(ErrorContext),
}

impl TransportError {
	pub fn http(
		status_code: StatusCode,
		url: String,
		body: String,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let message = format!("HTTP error: status {} for URL {}", status_code, url);
		Self::Http {
			status_code,
			url,
			body,
			context: ErrorContext::new_with_log(message, source, metadata),
		}
	}

	pub fn network(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_serialization(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestSerialization(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn response_parse(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn timeout(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Timeout(ErrorContext::new_with_log(msg, source, metadata))
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::Http { context, .. } => context,
			Self::Network(ctx)
			| Self::RequestSerialization(ctx)
			| Self::ResponseParse(ctx)
			| Self::Timeout(ctx) => ctx,
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
