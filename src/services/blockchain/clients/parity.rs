//! Parity / OpenEthereum node client.

use alloy::primitives::Address;
use async_trait::async_trait;
use std::fmt;

use crate::{
	models::{is_public_chain, public_chain_name, ClientIdentity, UNKNOWN_CHAIN_NAME},
	services::blockchain::{
		clients::{resolve_chain_id, rpc, ClientKind, NodeClient, SyncStatus, DUAL_SOURCE},
		BlockChainError, BlockchainTransport, RpcProvider,
	},
};

/// Client for Parity-Ethereum and OpenEthereum nodes
///
/// Account unlocking goes through Parity's own `personal` semantics, which this
/// client does not implement; both unlock and lock report unsupported.
pub struct ParityClient<T> {
	identity: ClientIdentity,
	provider: RpcProvider<T>,
}

impl<T> ParityClient<T> {
	pub fn new(identity: ClientIdentity, provider: RpcProvider<T>) -> Self {
		Self { identity, provider }
	}

	pub fn provider(&self) -> &RpcProvider<T> {
		&self.provider
	}
}

impl<T> Clone for ParityClient<T> {
	fn clone(&self) -> Self {
		Self::new(self.identity.clone(), self.provider.clone())
	}
}

impl<T> fmt::Debug for ParityClient<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParityClient")
			.field("identity", &self.identity)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl<T: BlockchainTransport + 'static> NodeClient for ParityClient<T> {
	fn kind(&self) -> ClientKind {
		ClientKind::Parity
	}

	fn identity(&self) -> &ClientIdentity {
		&self.identity
	}

	async fn chain_id(&self) -> Result<u64, BlockChainError> {
		resolve_chain_id(&self.provider, DUAL_SOURCE).await
	}

	async fn is_local(&self) -> Result<bool, BlockChainError> {
		Ok(!is_public_chain(self.chain_id().await?))
	}

	async fn chain_name(&self) -> Result<String, BlockChainError> {
		let chain_id = self.chain_id().await?;
		Ok(public_chain_name(chain_id)
			.unwrap_or(UNKNOWN_CHAIN_NAME)
			.to_string())
	}

	async fn unlock_account(
		&self,
		_address: &Address,
		_password: &str,
		_duration: Option<u64>,
	) -> Result<bool, BlockChainError> {
		Err(BlockChainError::unsupported_operation(
			self.kind(),
			"unlock_account",
		))
	}

	async fn lock_account(&self, _address: &Address) -> Result<bool, BlockChainError> {
		Err(BlockChainError::unsupported_operation(self.kind(), "lock_account"))
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
		rpc::sync_status(&self.provider).await
	}
}
