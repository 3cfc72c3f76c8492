//! Request/response middleware attached to a connection's provider.
//!
//! [`RpcProvider`] is the provider handle node clients hold. It shares its
//! [`MiddlewareStack`] with the connection interface, so layers attached after a
//! client has been resolved still apply to that client's requests. Layers are
//! keyed by name and attaching the same layer twice is a no-op.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{fmt, sync::Arc};
use tokio::sync::RwLock;

use crate::services::blockchain::transports::{BlockchainTransport, TransportError};

/// A request/response hook
pub trait RpcMiddleware: Send + Sync + fmt::Debug {
	/// Unique name; the stack holds at most one layer per name
	fn name(&self) -> &'static str;

	fn on_request(&self, _method: &str, params: Option<Value>) -> Option<Value> {
		params
	}

	fn on_response(&self, _method: &str, response: Value) -> Result<Value, TransportError> {
		Ok(response)
	}
}

/// Ordered set of middleware layers
#[derive(Debug, Default, Clone)]
pub struct MiddlewareStack {
	layers: Vec<Arc<dyn RpcMiddleware>>,
}

impl MiddlewareStack {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a layer unless one with the same name is present
	///
	/// Returns whether the layer was added.
	pub fn attach(&mut self, layer: Arc<dyn RpcMiddleware>) -> bool {
		if self.contains(layer.name()) {
			return false;
		}
		self.layers.push(layer);
		true
	}

	pub fn contains(&self, name: &str) -> bool {
		self.layers.iter().any(|layer| layer.name() == name)
	}

	pub fn names(&self) -> Vec<&'static str> {
		self.layers.iter().map(|layer| layer.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	fn layers(&self) -> Vec<Arc<dyn RpcMiddleware>> {
		self.layers.clone()
	}
}

/// Provider handle: a transport plus the connection's middleware stack
pub struct RpcProvider<T> {
	transport: Arc<T>,
	middleware: Arc<RwLock<MiddlewareStack>>,
}

impl<T> RpcProvider<T> {
	pub fn new(transport: T) -> Self {
		Self {
			transport: Arc::new(transport),
			middleware: Arc::new(RwLock::new(MiddlewareStack::new())),
		}
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Attaches a layer to the shared stack, returning whether it was added
	pub async fn attach(&self, layer: Arc<dyn RpcMiddleware>) -> bool {
		self.middleware.write().await.attach(layer)
	}

	pub async fn middleware_names(&self) -> Vec<&'static str> {
		self.middleware.read().await.names()
	}
}

impl<T> Clone for RpcProvider<T> {
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			middleware: Arc::clone(&self.middleware),
		}
	}
}

impl<T> fmt::Debug for RpcProvider<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RpcProvider").finish_non_exhaustive()
	}
}

#[async_trait]
impl<T: BlockchainTransport + 'static> BlockchainTransport for RpcProvider<T> {
	async fn get_current_url(&self) -> String {
		self.transport.get_current_url().await
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let layers = self.middleware.read().await.layers();

		let mut params: Option<Value> = params.map(Into::into);
		for layer in &layers {
			params = layer.on_request(method, params);
		}

		let mut response = self.transport.send_raw_request(method, params).await?;
		for layer in layers.iter().rev() {
			response = layer.on_response(method, response)?;
		}
		Ok(response)
	}

	async fn is_connected(&self) -> bool {
		self.transport.is_connected().await
	}
}

/// Records each request and whether the node answered with an error
#[derive(Debug, Default)]
pub struct RequestLoggingMiddleware;

impl RpcMiddleware for RequestLoggingMiddleware {
	fn name(&self) -> &'static str {
		"request_logging"
	}

	fn on_request(&self, method: &str, params: Option<Value>) -> Option<Value> {
		tracing::debug!(method, "sending request");
		params
	}

	fn on_response(&self, method: &str, response: Value) -> Result<Value, TransportError> {
		if response.get("error").is_some() {
			tracing::debug!(method, "node returned an error");
		} else {
			tracing::trace!(method, "received response");
		}
		Ok(response)
	}
}

/// Block fields rewritten for proof-of-authority chains
///
/// Clique chains store the signer seal in `extraData`, which overflows the 32 bytes
/// standard block decoders accept. The seal is moved to `proofOfAuthorityData`.
#[derive(Debug, Default)]
pub struct PoaCompatibilityMiddleware;

const BLOCK_METHODS: [&str; 2] = ["eth_getBlockByNumber", "eth_getBlockByHash"];

impl RpcMiddleware for PoaCompatibilityMiddleware {
	fn name(&self) -> &'static str {
		"poa_compatibility"
	}

	fn on_response(&self, method: &str, mut response: Value) -> Result<Value, TransportError> {
		if !BLOCK_METHODS.contains(&method) {
			return Ok(response);
		}

		if let Some(block) = response.get_mut("result").and_then(Value::as_object_mut) {
			if let Some(extra_data) = block.remove("extraData") {
				block.insert("proofOfAuthorityData".to_string(), extra_data);
			}
		}
		Ok(response)
	}
}
