//! Provider transports.
//!
//! A transport moves JSON-RPC envelopes to a node and back. The connection core
//! only depends on [`BlockchainTransport`]; concrete providers are selected by
//! URI scheme through a [`ProviderFactory`]:
//! - HTTP(S) via `reqwest`
//! - WebSocket via `tokio-tungstenite`
//! - IPC sockets via `tokio::net::UnixStream` (unix only)

mod error;
mod http;
#[cfg(unix)]
mod ipc;
mod ws;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

pub use error::TransportError;
pub use http::HttpTransportClient;
#[cfg(unix)]
pub use ipc::IpcTransportClient;
pub use ws::WsTransportClient;

use crate::models::{ConnectionConfig, ProviderUri, TransportKind, DEFAULT_REQUEST_TIMEOUT_MS};

/// Method used by the default connectivity probe
pub const CONNECTIVITY_PROBE_METHOD: &str = "net_version";

/// Whether a message read from a stream answers the request `request_id`
///
/// Subscription notifications carry no `id` and are skipped. A `null` id is
/// only accepted on an error reply, which nodes send for unparseable requests.
pub(crate) fn answers_request(message: &Value, request_id: u64) -> bool {
	match message.get("id") {
		Some(Value::Null) => message.get("error").is_some(),
		Some(id) => id.as_u64() == Some(request_id),
		None => false,
	}
}

/// Base trait for all provider transports
#[async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the URL or socket path the transport talks to
	async fn get_current_url(&self) -> String;

	/// Send a raw request and return the full JSON-RPC response envelope
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Builds the JSON-RPC 2.0 request body
	async fn customize_request<P>(&self, id: u64, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params.map(|p| p.into()).unwrap_or_else(|| json!([]))
		})
	}

	/// Connectivity probe: the endpoint answers a cheap request
	async fn is_connected(&self) -> bool {
		self.send_raw_request(CONNECTIVITY_PROBE_METHOD, None::<Value>)
			.await
			.is_ok()
	}
}

/// Creates a live transport for a classified URI
#[async_trait]
pub trait ProviderFactory: Send + Sync {
	type Transport: BlockchainTransport + 'static;

	async fn create(&self, uri: &ProviderUri) -> Result<Self::Transport, TransportError>;
}

/// Any of the built-in transports
#[derive(Debug, Clone)]
pub enum AnyTransport {
	Http(HttpTransportClient),
	WebSocket(WsTransportClient),
	#[cfg(unix)]
	Ipc(IpcTransportClient),
}

#[async_trait]
impl BlockchainTransport for AnyTransport {
	async fn get_current_url(&self) -> String {
		match self {
			Self::Http(t) => t.get_current_url().await,
			Self::WebSocket(t) => t.get_current_url().await,
			#[cfg(unix)]
			Self::Ipc(t) => t.get_current_url().await,
		}
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		match self {
			Self::Http(t) => t.send_raw_request(method, params).await,
			Self::WebSocket(t) => t.send_raw_request(method, params).await,
			#[cfg(unix)]
			Self::Ipc(t) => t.send_raw_request(method, params).await,
		}
	}
}

/// Factory selecting the built-in transport from the URI scheme
#[derive(Debug, Clone)]
pub struct DefaultProviderFactory {
	request_timeout: Duration,
	max_retries: u32,
}

impl DefaultProviderFactory {
	pub fn new(request_timeout: Duration, max_retries: u32) -> Self {
		Self {
			request_timeout,
			max_retries,
		}
	}

	pub fn from_config(config: &ConnectionConfig) -> Self {
		Self::new(config.request_timeout(), config.max_retries)
	}
}

impl Default for DefaultProviderFactory {
	fn default() -> Self {
		Self::new(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS), 0)
	}
}

#[async_trait]
impl ProviderFactory for DefaultProviderFactory {
	type Transport = AnyTransport;

	async fn create(&self, uri: &ProviderUri) -> Result<Self::Transport, TransportError> {
		match uri.kind() {
			TransportKind::Http => Ok(AnyTransport::Http(HttpTransportClient::new(
				uri.endpoint(),
				self.request_timeout,
				self.max_retries,
			)?)),
			TransportKind::WebSocket => Ok(AnyTransport::WebSocket(
				WsTransportClient::connect(uri.endpoint(), self.request_timeout).await?,
			)),
			#[cfg(unix)]
			TransportKind::Ipc => Ok(AnyTransport::Ipc(
				IpcTransportClient::connect(uri.endpoint(), self.request_timeout).await?,
			)),
			#[cfg(not(unix))]
			TransportKind::Ipc => Err(TransportError::network(
				"IPC providers are only available on unix platforms",
				None,
				None,
			)),
		}
	}
}
