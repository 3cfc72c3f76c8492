//! Infura hosted gateway client.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::fmt;

use crate::{
	models::{public_chain_name, ClientIdentity, UNKNOWN_CHAIN_NAME},
	services::blockchain::{
		clients::{resolve_chain_id, rpc, ClientKind, NodeClient, SyncStatus, DUAL_SOURCE},
		BlockChainError, BlockchainTransport, RpcProvider,
	},
};

/// Client for a hosted gateway
///
/// The version string is the proxied node's, so the identity usually reads as
/// Geth. A gateway is never local and keeps its nodes synchronized itself.
pub struct InfuraClient<T> {
	identity: ClientIdentity,
	provider: RpcProvider<T>,
}

impl<T> InfuraClient<T> {
	pub fn new(identity: ClientIdentity, provider: RpcProvider<T>) -> Self {
		Self { identity, provider }
	}

	pub fn provider(&self) -> &RpcProvider<T> {
		&self.provider
	}
}

impl<T> Clone for InfuraClient<T> {
	fn clone(&self) -> Self {
		Self::new(self.identity.clone(), self.provider.clone())
	}
}

impl<T> fmt::Debug for InfuraClient<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InfuraClient")
			.field("identity", &self.identity)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl<T: BlockchainTransport + 'static> NodeClient for InfuraClient<T> {
	fn kind(&self) -> ClientKind {
		ClientKind::Infura
	}

	fn identity(&self) -> &ClientIdentity {
		&self.identity
	}

	async fn chain_id(&self) -> Result<u64, BlockChainError> {
		resolve_chain_id(&self.provider, DUAL_SOURCE).await
	}

	async fn is_local(&self) -> Result<bool, BlockChainError> {
		Ok(false)
	}

	async fn chain_name(&self) -> Result<String, BlockChainError> {
		let chain_id = self.chain_id().await?;
		Ok(public_chain_name(chain_id)
			.unwrap_or(UNKNOWN_CHAIN_NAME)
			.to_string())
	}

	async fn unlock_account(
		&self,
		address: &Address,
		password: &str,
		duration: Option<u64>,
	) -> Result<bool, BlockChainError> {
		rpc::unlock_account(&self.provider, address, password, duration).await
	}

	async fn lock_account(&self, address: &Address) -> Result<bool, BlockChainError> {
		rpc::lock_account(&self.provider, address).await
	}

	async fn accounts(&self) -> Result<Vec<Address>, BlockChainError> {
		rpc::accounts(&self.provider).await
	}

	async fn block_number(&self) -> Result<u64, BlockChainError> {
		rpc::block_number(&self.provider).await
	}

	async fn peer_count(&self) -> Result<u64, BlockChainError> {
		rpc::peer_count(&self.provider).await
	}

	async fn is_connected(&self) -> bool {
		self.provider.is_connected().await
	}

	async fn sync_status(&self) -> Result<SyncStatus, BlockChainError> {
		Ok(SyncStatus::Synced)
	}
}
