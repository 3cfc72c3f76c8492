//! Ganache / EthereumJS TestRPC client.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::fmt;

use crate::{
	models::{ClientIdentity, LOCAL_CHAIN_NAME},
	services::blockchain::{
		clients::{resolve_chain_id, rpc, ClientKind, NodeClient, SyncStatus, LEGACY_ONLY},
		BlockChainError, BlockchainTransport, RpcProvider,
	},
};

/// Client for local test nodes
///
/// A test node is local whatever chain id it reports. Its accounts are unlocked
/// from the start, so unlock and lock succeed without reaching the node.
pub struct GanacheClient<T> {
	identity: ClientIdentity,
	provider: RpcProvider<T>,
}

impl<T> GanacheClient<T> {
	pub fn new(identity: ClientIdentity, provider: RpcProvider<T>) -> Self {
		Self { identity, provider }
	}

	pub fn provider(&self) -> &RpcProvider<T> {
		&self.provider
	}
}

impl<T> Clone for GanacheClient<T> {
	fn clone(&self) -> Self {
		Self::new(self.identity.clone(), self.provider.clone())
	}
}

impl<T> fmt::Debug for GanacheClient<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GanacheClient")
			.field("identity", &self.identity)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl<T: BlockchainTransport + 'static> NodeClient for GanacheClient<T> {
	fn kind(&self) -> ClientKind {
		ClientKind::Ganache
	}

	fn identity(&self) -> &ClientIdentity {
		&self.identity
	}

	async fn chain_id(&self) -> Result<u64, BlockChainError> {
		resolve_chain_id(&self.provider, LEGACY_ONLY).await
	}

	async fn is_local(&self) -> Result<bool, BlockChainError> {
		Ok(true)
	}

	async fn chain_name(&self) -> Result<String, BlockChainError> {
		Ok(LOCAL_CHAIN_NAME.to_string())
	}

	async fn unlock_account(
		&self,
		address: &Address,
		_password: &str,
		_duration: Option<u64>,
	) -> Result<bool, BlockChainError> {
		tracing::debug!(%address, "test node account is always unlocked");
		Ok(true)
	}

	async fn lock_account(&self, _address: &Address) -> Result<bool, BlockChainError> {
		Ok(true)
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
