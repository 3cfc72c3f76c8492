use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::config::{
	DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SYNC_POLL_INTERVAL_MS, DEFAULT_SYNC_TIMEOUT_MS,
};

/// Settings for a single connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
	/// Target node, e.g. `http://localhost:8545`, `file:///path/geth.ipc`, `infura://<id>`
	pub provider_uri: String,
	/// Block until the node reports itself synchronized
	#[serde(default)]
	pub sync_now: bool,
	/// Upper bound on the synchronization wait
	#[serde(default = "default_sync_timeout_ms")]
	pub sync_timeout_ms: u64,
	/// Delay between sync status polls
	#[serde(default = "default_sync_poll_interval_ms")]
	pub sync_poll_interval_ms: u64,
	/// Per-request transport timeout
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	/// Transient-error retries for HTTP providers; zero disables retrying
	#[serde(default)]
	pub max_retries: u32,
}

impl ConnectionConfig {
	pub fn new(provider_uri: impl Into<String>) -> Self {
		Self {
			provider_uri: provider_uri.into(),
			sync_now: false,
			sync_timeout_ms: DEFAULT_SYNC_TIMEOUT_MS,
			sync_poll_interval_ms: DEFAULT_SYNC_POLL_INTERVAL_MS,
			request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
			max_retries: 0,
		}
	}

	pub fn with_sync(mut self, timeout: Duration, poll_interval: Duration) -> Self {
		self.sync_now = true;
		self.sync_timeout_ms = timeout.as_millis() as u64;
		self.sync_poll_interval_ms = poll_interval.as_millis() as u64;
		self
	}

	pub fn sync_timeout(&self) -> Duration {
		Duration::from_millis(self.sync_timeout_ms)
	}

	pub fn sync_poll_interval(&self) -> Duration {
		Duration::from_millis(self.sync_poll_interval_ms)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

fn default_sync_timeout_ms() -> u64 {
	DEFAULT_SYNC_TIMEOUT_MS
}

fn default_sync_poll_interval_ms() -> u64 {
	DEFAULT_SYNC_POLL_INTERVAL_MS
}

fn default_request_timeout_ms() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_MS
}
