//! Chain id lookup over an ordered list of sources.
//!
//! `eth_chainId` was added to nodes after `net_version`, so clients try the
//! dedicated call first and fall back to the legacy network version. Every
//! lookup queries the node; nothing is cached.

use serde_json::Value;
use std::{collections::HashMap, fmt};

use crate::services::blockchain::{
	clients::rpc::{self, Reporting},
	BlockChainError, BlockchainTransport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainIdSource {
	/// `eth_chainId`, a hex quantity
	EthChainId,
	/// `net_version`, a decimal string
	NetVersion,
}

/// `eth_chainId` first, then `net_version`
pub const DUAL_SOURCE: &[ChainIdSource] = &[ChainIdSource::EthChainId, ChainIdSource::NetVersion];

/// `net_version` only
pub const LEGACY_ONLY: &[ChainIdSource] = &[ChainIdSource::NetVersion];

impl ChainIdSource {
	pub fn method(&self) -> &'static str {
		match self {
			Self::EthChainId => "eth_chainId",
			Self::NetVersion => "net_version",
		}
	}

	fn decode(&self, result: &Value, reporting: Reporting) -> Result<u64, BlockChainError> {
		match self {
			Self::EthChainId => rpc::parse_quantity_with(self.method(), result, reporting),
			Self::NetVersion => result
				.as_str()
				.and_then(|s| s.trim().parse::<u64>().ok())
				.or_else(|| result.as_u64())
				.ok_or_else(|| {
					reporting.request_error(
						self.method(),
						format!("Invalid network version: {}", result),
					)
				}),
		}
	}

	/// Queries this source once
	pub async fn fetch<T: BlockchainTransport>(&self, transport: &T) -> Result<u64, BlockChainError> {
		self.attempt(transport, Reporting::Logged).await
	}

	async fn attempt<T: BlockchainTransport>(
		&self,
		transport: &T,
		reporting: Reporting,
	) -> Result<u64, BlockChainError> {
		let result = rpc::call_with(transport, self.method(), None, reporting).await?;
		self.decode(&result, reporting)
	}
}

impl fmt::Display for ChainIdSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.method())
	}
}

/// Returns the first chain id any source yields, trying `sources` in order
///
/// # Errors
/// `ChainIdUnavailable` carrying the last failure when every source fails.
pub async fn resolve_chain_id<T: BlockchainTransport>(
	transport: &T,
	sources: &[ChainIdSource],
) -> Result<u64, BlockChainError> {
	let mut last_error = None;

	for source in sources {
		// Attempts stay out of the log; only exhausting every source is reported.
		match source.attempt(transport, Reporting::Unlogged).await {
			Ok(chain_id) => return Ok(chain_id),
			Err(e) => {
				tracing::debug!(source = %source, error = %e, "chain id source failed");
				last_error = Some(e);
			}
		}
	}

	let tried = sources
		.iter()
		.map(|s| s.method())
		.collect::<Vec<_>>()
		.join(",");
	Err(BlockChainError::chain_id_unavailable(
		"No chain id source returned a value",
		last_error.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
		Some(HashMap::from([("sources".to_string(), tried)])),
	))
}
