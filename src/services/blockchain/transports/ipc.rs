//! IPC socket transport for local nodes.
//!
//! Nodes write bare JSON values back to back on the socket without a delimiter,
//! so the reader accumulates bytes until a complete value can be decoded.

use async_trait::async_trait;
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
use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::UnixStream,
	sync::Mutex,
	time::timeout,
};

use crate::services::blockchain::transports::{answers_request, BlockchainTransport, TransportError};

const READ_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug)]
struct IpcConnection {
	stream: UnixStream,
	// Bytes read past the end of the previous response
	pending: Vec<u8>,
}

/// JSON-RPC client over a unix domain socket
#[derive(Clone, Debug)]
pub struct IpcTransportClient {
	connection: Arc<Mutex<IpcConnection>>,
	path: String,
	message_timeout: Duration,
	request_id_counter: Arc<AtomicU64>,
}

impl IpcTransportClient {
	pub async fn connect(path: &str, message_timeout: Duration) -> Result<Self, TransportError> {
		let metadata = Some(HashMap::from([("path".to_string(), path.to_string())]));

		let stream = timeout(message_timeout, UnixStream::connect(path))
			.await
			.map_err(|e| {
				TransportError::timeout("IPC connect timed out", Some(e.into()), metadata.clone())
			})?
			.map_err(|e| {
				TransportError::network("IPC connect failed", Some(e.into()), metadata.clone())
			})?;

		Ok(Self {
			connection: Arc::new(Mutex::new(IpcConnection {
				stream,
				pending: Vec::new(),
			})),
			path: path.to_string(),
			message_timeout,
			request_id_counter: Arc::new(AtomicU64::new(1)),
		})
	}

	fn metadata(&self) -> Option<HashMap<String, String>> {
		Some(HashMap::from([("path".to_string(), self.path.clone())]))
	}

	async fn read_value(&self, connection: &mut IpcConnection) -> Result<Value, TransportError> {
		loop {
			if let Some(value) = take_value(&mut connection.pending)
				.map_err(|e| {
					TransportError::response_parse(
						"Failed to parse response",
						Some(e.into()),
						self.metadata(),
					)
				})? {
				return Ok(value);
			}

			let mut chunk = vec![0u8; READ_CHUNK_SIZE];
			let read = timeout(self.message_timeout, connection.stream.read(&mut chunk))
				.await
				.map_err(|e| {
					TransportError::timeout("Response timeout", Some(e.into()), self.metadata())
				})?
				.map_err(|e| {
					TransportError::network("IPC read failed", Some(e.into()), self.metadata())
				})?;

			if read == 0 {
				return Err(TransportError::network(
					"IPC socket closed",
					None,
					self.metadata(),
				));
			}
			connection.pending.extend_from_slice(&chunk[..read]);
		}
	}
}

/// Decodes the first complete JSON value in `buffer`, leaving the remainder
///
/// Returns `Ok(None)` while the value is still incomplete.
fn take_value(buffer: &mut Vec<u8>) -> Result<Option<Value>, serde_json::Error> {
	if buffer.iter().all(|b| b.is_ascii_whitespace()) {
		buffer.clear();
		return Ok(None);
	}

	let mut values = serde_json::Deserializer::from_slice(buffer).into_iter::<Value>();
	match values.next() {
		Some(Ok(value)) => {
			let consumed = values.byte_offset();
			buffer.drain(..consumed);
			Ok(Some(value))
		}
		Some(Err(e)) if e.is_eof() => Ok(None),
		Some(Err(e)) => Err(e),
		None => Ok(None),
	}
}

#[async_trait]
impl BlockchainTransport for IpcTransportClient {
	async fn get_current_url(&self) -> String {
		self.path.clone()
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
		let payload = serde_json::to_vec(&request_body).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				self.metadata(),
			)
		})?;

		let mut connection = self.connection.lock().await;
		connection.stream.write_all(&payload).await.map_err(|e| {
			TransportError::network("IPC write failed", Some(e.into()), self.metadata())
		})?;

		loop {
			let response = self.read_value(&mut connection).await?;
			if answers_request(&response, request_id) {
				return Ok(response);
			}
		}
	}
}
