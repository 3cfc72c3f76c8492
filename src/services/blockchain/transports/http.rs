//! HTTP transport implementation for node interactions.
//!
//! Sends JSON-RPC envelopes with `reqwest`. The client is wrapped in
//! `reqwest-middleware`; a transient-error retry layer is installed only when the
//! caller asks for retries, the default being none.

use async_trait::async_trait;
use reqwest::ClientBuilder as ReqwestClientBuilder;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use serde::Serialize;
use serde_json::Value;
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};
use url::Url;

use crate::services::blockchain::transports::{BlockchainTransport, TransportError};

/// JSON-RPC client for a single HTTP(S) endpoint
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	client: ClientWithMiddleware,
	url: String,
	request_id_counter: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Builds a client for `url`
	///
	/// # Arguments
	/// * `url` - Endpoint URL
	/// * `timeout` - Per-request timeout
	/// * `max_retries` - Transient-error retries; 0 disables the retry layer
	///
	/// # Errors
	/// Fails when the URL is malformed or the HTTP client cannot be built.
	pub fn new(url: &str, timeout: Duration, max_retries: u32) -> Result<Self, TransportError> {
		let parsed = Url::parse(url).map_err(|e| {
			TransportError::network(
				"Invalid HTTP endpoint",
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), url.to_string())])),
			)
		})?;

		let http_client = ReqwestClientBuilder::new()
			.timeout(timeout)
			.build()
			.map_err(|e| {
				TransportError::network("Failed to create HTTP client", Some(Box::new(e)), None)
			})?;

		let mut builder = ClientBuilder::new(http_client);
		if max_retries > 0 {
			let retry_policy = ExponentialBackoff::builder()
				.base(2)
				.retry_bounds(Duration::from_millis(100), Duration::from_secs(4))
				.jitter(Jitter::None)
				.build_with_max_retries(max_retries);
			builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
		}

		Ok(Self {
			client: builder.build(),
			url: parsed.to_string(),
			request_id_counter: Arc::new(AtomicU64::new(1)),
		})
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.clone()
	}

	/// Posts a JSON-RPC request and returns the decoded envelope
	///
	/// # Errors
	/// - `Network` when the request cannot be sent
	/// - `Timeout` when the endpoint does not answer in time
	/// - `Http` for non-success status codes
	/// - `ResponseParse` when the body is not JSON
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_id = self.request_id_counter.fetch_add(1, Ordering::SeqCst);
		let request_body = self.customize_request(request_id, method, params).await;
		let metadata = || {
			Some(HashMap::from([
				("url".to_string(), self.url.clone()),
				("method".to_string(), method.to_string()),
			]))
		};

		let body = serde_json::to_string(&request_body).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				metadata(),
			)
		})?;

		let response = self
			.client
			.post(self.url.as_str())
			.header("Content-Type", "application/json")
			.body(body)
			.send()
			.await
			.map_err(|e| {
				let timed_out = matches!(&e, reqwest_middleware::Error::Reqwest(inner) if inner.is_timeout());
				if timed_out {
					TransportError::timeout("Request timed out", Some(e.into()), metadata())
				} else {
					TransportError::network("Failed to send request", Some(e.into()), metadata())
				}
			})?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			tracing::warn!(%status, url = %self.url, method, "request failed");
			return Err(TransportError::http(
				status,
				self.url.clone(),
				error_body,
				None,
				metadata(),
			));
		}

		response.json().await.map_err(|e| {
			TransportError::response_parse(
				"Failed to parse JSON response",
				Some(Box::new(e)),
				metadata(),
			)
		})
	}
}
