//! Blockchain error types and handling.
//!
//! Covers every failure a caller of the connection interface can observe:
//! connection failures (naming the URI), JSON-RPC errors, unsupported client
//! capabilities, chain id lookups that exhausted every source, and sync timeouts.

use std::{collections::HashMap, time::Duration};
use thiserror::Error as ThisError;

use crate::{
	services::blockchain::{ClientKind, TransportError},
	utils::error::{ErrorContext, TraceableError},
};

type BoxedSource = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// The provider for a URI could not be created, reached, or queried
	#[error("Connection error for {uri}: {context}")]
	ConnectionError { uri: String, context: ErrorContext },

	/// The node answered with a JSON-RPC error object
	#[error("RPC error calling {method} (code {code}): {message}")]
	RpcError {
		method: String,
		code: i64,
		message: String,
		context: ErrorContext,
	},

	/// Malformed request or unexpected response shape
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// The client variant does not implement the operation
	#[error("{operation} is not supported by the {client} client")]
	UnsupportedOperation {
		client: ClientKind,
		operation: String,
		context: ErrorContext,
	},

	/// None of the chain id sources returned a usable value
	#[error("Chain id unavailable: {0}")]
	ChainIdUnavailable(ErrorContext),

	/// The node is reachable but did not finish synchronizing in time
	#[error("Node at {uri} not synchronized after {timeout:?}")]
	SyncTimeout {
		uri: String,
		timeout: Duration,
		context: ErrorContext,
	},

	/// An operation was invoked in a connection state that does not allow it
	#[error("Invalid state: {0}")]
	InvalidState(ErrorContext),

	/// Transport failure while talking to the node
	#[error("Transport error: {0}")]
	TransportError(#[from] TransportError),
}

impl BlockChainError {
	pub fn connection_error(
		uri: impl Into<String>,
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError {
			uri: uri.into(),
			context: ErrorContext::new_with_log(msg, source, metadata),
		}
	}

	pub fn rpc_error(method: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
		Self::build_rpc_error(method.into(), code, message.into(), |msg, metadata| {
			ErrorContext::new_with_log(msg, None, metadata)
		})
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Same as [`Self::rpc_error`] but emits no log record
	///
	/// For failures the caller recovers from, such as a chain id source that
	/// falls through to the next one.
	pub(crate) fn unlogged_rpc_error(method: &str, code: i64, message: &str) -> Self {
		Self::build_rpc_error(method.to_string(), code, message.to_string(), |msg, metadata| {
			ErrorContext::new(msg, None, metadata)
		})
	}

	/// Same as [`Self::request_error`] but emits no log record
	pub(crate) fn unlogged_request_error(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new(msg, None, metadata))
	}

	fn build_rpc_error(
		method: String,
		code: i64,
		message: String,
		context: fn(String, Option<HashMap<String, String>>) -> ErrorContext,
	) -> Self {
		let context = context(
			format!("{} failed: {}", method, message),
			Some(HashMap::from([("method".to_string(), method.clone())])),
		);
		Self::RpcError {
			method,
			code,
			message,
			context,
		}
	}

	pub fn unsupported_operation(client: ClientKind, operation: impl Into<String>) -> Self {
		let operation = operation.into();
		let context = ErrorContext::new_with_log(
			format!("{} is not supported by the {} client", operation, client),
			None,
			None,
		);
		Self::UnsupportedOperation {
			client,
			operation,
			context,
		}
	}

	pub fn chain_id_unavailable(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ChainIdUnavailable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn sync_timeout(uri: impl Into<String>, timeout: Duration) -> Self {
		let uri = uri.into();
		let context = ErrorContext::new_with_log(
			format!("node not synchronized after {:?}", timeout),
			None,
			Some(HashMap::from([("uri".to_string(), uri.clone())])),
		);
		Self::SyncTimeout {
			uri,
			timeout,
			context,
		}
	}

	pub fn invalid_state(
		msg: impl Into<String>,
		source: BoxedSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InvalidState(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Whether the error reports a capability the client variant lacks
	pub fn is_unsupported(&self) -> bool {
		matches!(self, Self::UnsupportedOperation { .. })
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError { context, .. }
			| Self::RpcError { context, .. }
			| Self::UnsupportedOperation { context, .. }
			| Self::SyncTimeout { context, .. } => context.trace_id.clone(),
			Self::RequestError(ctx) | Self::ChainIdUnavailable(ctx) | Self::InvalidState(ctx) => {
				ctx.trace_id.clone()
			}
			Self::TransportError(err) => err.trace_id(),
		}
	}
}
