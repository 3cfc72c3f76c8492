//! Websocket transport implementation for node interactions.
//!
//! Holds one websocket stream per connection. Requests are serialized through a
//! mutex; while waiting the reader answers pings and skips subscription
//! notifications and responses addressed to other request ids.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
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
use tokio::{net::TcpStream, sync::Mutex, time::timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::services::blockchain::transports::{answers_request, BlockchainTransport, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// JSON-RPC client over a websocket connection
#[derive(Clone, Debug)]
pub struct WsTransportClient {
	stream: Arc<Mutex<WsStream>>,
	url: String,
	message_timeout: Duration,
	request_id_counter: Arc<AtomicU64>,
}

impl WsTransportClient {
	/// Opens the websocket connection
	///
	/// # Arguments
	/// * `url` - `ws://` or `wss://` endpoint
	/// * `message_timeout` - Bound on connecting and on waiting for each response
	pub async fn connect(url: &str, message_timeout: Duration) -> Result<Self, TransportError> {
		let metadata = || Some(HashMap::from([("url".to_string(), url.to_string())]));

		let (stream, _) = timeout(message_timeout, connect_async(url))
			.await
			.map_err(|e| {
				TransportError::timeout("Websocket connect timed out", Some(e.into()), metadata())
			})?
			.map_err(|e| {
				TransportError::network("Websocket connect failed", Some(e.into()), metadata())
			})?;

		tracing::debug!(url, "websocket connected");

		Ok(Self {
			stream: Arc::new(Mutex::new(stream)),
			url: url.to_string(),
			message_timeout,
			request_id_counter: Arc::new(AtomicU64::new(1)),
		})
	}

	async fn read_response(
		&self,
		stream: &mut WsStream,
		request_id: u64,
	) -> Result<Value, TransportError> {
		loop {
			let message = timeout(self.message_timeout, stream.next())
				.await
				.map_err(|e| {
					TransportError::timeout("Response timeout", Some(e.into()), self.metadata())
				})?
				.ok_or_else(|| TransportError::network("Connection closed", None, self.metadata()))?
				.map_err(|e| {
					TransportError::network("Websocket error", Some(e.into()), self.metadata())
				})?;

			match message {
				Message::Text(text) => {
					let response: Value = serde_json::from_str(&text).map_err(|e| {
						TransportError::response_parse(
							"Failed to parse response",
							Some(e.into()),
							self.metadata(),
						)
					})?;

					if answers_request(&response, request_id) {
						return Ok(response);
					}
				}
				Message::Ping(data) => {
					stream.send(Message::Pong(data)).await.map_err(|e| {
						TransportError::network("Failed to send pong", Some(e.into()), self.metadata())
					})?;
				}
				Message::Pong(_) | Message::Frame(_) => continue,
				Message::Binary(_) => {
					return Err(TransportError::response_parse(
						"Unexpected binary message",
						None,
						self.metadata(),
					))
				}
				Message::Close(_) => {
					return Err(TransportError::network(
						"Connection closed by node",
						None,
						self.metadata(),
					))
				}
			}
		}
	}

	fn metadata(&self) -> Option<HashMap<String, String>> {
		Some(HashMap::from([("url".to_string(), self.url.clone())]))
	}
}

#[async_trait]
impl BlockchainTransport for WsTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.clone()
	}

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

		let mut stream = self.stream.lock().await;
		stream
			.send(Message::Text(request_body.to_string().into()))
			.await
			.map_err(|e| {
				TransportError::network("Failed to send request", Some(e.into()), self.metadata())
			})?;

		self.read_response(&mut stream, request_id).await
	}
}
