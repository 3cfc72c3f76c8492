//! Error context shared by every error type in the crate.
//!
//! Each error variant carries an [`ErrorContext`] holding the message, an optional
//! boxed source, free-form metadata and a trace id so that a single failure can be
//! followed from the transport up to the connection interface.

use chrono::Utc;
use std::{collections::HashMap, error::Error, fmt};
use uuid::Uuid;

/// Context attached to an error at the point it was raised
#[derive(Debug)]
pub struct ErrorContext {
	/// Human readable description of the failure
	pub message: String,
	/// Underlying cause, if any
	pub source: Option<Box<dyn Error + Send + Sync + 'static>>,
	/// Unique id for correlating log records with the returned error
	pub trace_id: String,
	/// RFC 3339 creation time
	pub timestamp: String,
	/// Extra key/value pairs (uri, method, client, ...)
	pub metadata: Option<HashMap<String, String>>,
}

impl ErrorContext {
	/// Creates a new context without emitting a log record
	pub fn new(
		message: impl Into<String>,
		source: Option<Box<dyn Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = source
			.as_deref()
			.and_then(find_trace_id)
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			trace_id,
			timestamp: Utc::now().to_rfc3339(),
			metadata,
		}
	}

	/// Creates a new context and records it at error level
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<Box<dyn Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		tracing::error!(trace_id = %context.trace_id, "{}", context.format_with_metadata());
		context
	}

	/// Adds a single metadata entry
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// Formats the message followed by sorted metadata, e.g. `boom [method=eth_chainId]`
	pub fn format_with_metadata(&self) -> String {
		match &self.metadata {
			Some(metadata) if !metadata.is_empty() => {
				let mut entries: Vec<_> = metadata.iter().collect();
				entries.sort();
				let rendered = entries
					.iter()
					.map(|(k, v)| format!("{}={}", k, v))
					.collect::<Vec<_>>()
					.join(", ");
				format!("{} [{}]", self.message, rendered)
			}
			_ => self.message.clone(),
		}
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_with_metadata())
	}
}

impl Error for ErrorContext {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		self.source
			.as_ref()
			.map(|e| e.as_ref() as &(dyn Error + 'static))
	}
}

/// Errors that expose the trace id of their context
pub trait TraceableError: Error + Send + Sync {
	fn trace_id(&self) -> String;
}

// Reuse the trace id of a wrapped error so the whole chain shares one id.
fn find_trace_id(error: &(dyn Error + Send + Sync + 'static)) -> Option<String> {
	use crate::{
		models::ConfigError,
		services::blockchain::{BlockChainError, TransportError},
	};

	if let Some(e) = error.downcast_ref::<TransportError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = error.downcast_ref::<BlockChainError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = error.downcast_ref::<ConfigError>() {
		return Some(e.trace_id());
	}
	None
}
