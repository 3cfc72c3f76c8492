//! Node client implementations.
//!
//! One adapter per node technology, all implementing [`NodeClient`]:
//! - Geth
//! - Parity / OpenEthereum
//! - Ganache / EthereumJS TestRPC
//! - Infura hosted gateway
//! - Generic fallback for unrecognized technologies
//!
//! [`BlockchainClient`] is the closed set of variants produced by the registry.

mod chain_id;
mod ganache;
mod generic;
mod geth;
mod infura;
mod parity;
pub(crate) mod rpc;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

pub use chain_id::{resolve_chain_id, ChainIdSource, DUAL_SOURCE, LEGACY_ONLY};
pub use ganache::GanacheClient;
pub use generic::GenericClient;
pub use geth::GethClient;
pub use infura::InfuraClient;
pub use parity::ParityClient;

use crate::{
	models::ClientIdentity,
	services::blockchain::{BlockChainError, BlockchainTransport, RpcProvider},
};

/// Node technology families with dedicated adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClientKind {
	Geth,
	Parity,
	Ganache,
	Infura,
	Generic,
}

impl ClientKind {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Geth => "Geth",
			Self::Parity => "Parity",
			Self::Ganache => "Ganache",
			Self::Infura => "Infura",
			Self::Generic => "Generic",
		}
	}
}

impl fmt::Display for ClientKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Synchronization state reported by `eth_syncing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStatus {
	Synced,
	Syncing {
		starting_block: u64,
		current_block: u64,
		highest_block: u64,
	},
}

impl SyncStatus {
	pub fn is_synced(&self) -> bool {
		matches!(self, Self::Synced)
	}
}

/// Uniform interface over every node technology
///
/// Capabilities a variant lacks return [`BlockChainError::UnsupportedOperation`].
#[async_trait]
pub trait NodeClient: Send + Sync {
	fn kind(&self) -> ClientKind;

	/// Identity parsed from the node's version string
	fn identity(&self) -> &ClientIdentity;

	fn node_technology(&self) -> &str {
		self.identity().node_technology()
	}

	fn node_version(&self) -> Option<&str> {
		self.identity().node_version()
	}

	fn platform(&self) -> Option<&str> {
		self.identity().platform()
	}

	fn backend(&self) -> Option<&str> {
		self.identity().backend()
	}

	/// Chain id of the connected network
	async fn chain_id(&self) -> Result<u64, BlockChainError>;

	/// Whether the node belongs to a local or private network
	async fn is_local(&self) -> Result<bool, BlockChainError>;

	/// Human readable network name
	async fn chain_name(&self) -> Result<String, BlockChainError>;

	/// Unlocks `address` on the node
	///
	/// # Arguments
	/// * `address` - Account to unlock
	/// * `password` - Account passphrase
	/// * `duration` - Unlock duration in seconds; `None` leaves it to the node
	async fn unlock_account(
		&self,
		address: &Address,
		password: &str,
		duration: Option<u64>,
	) -> Result<bool, BlockChainError>;

	async fn lock_account(&self, address: &Address) -> Result<bool, BlockChainError>;

	async fn accounts(&self) -> Result<Vec<Address>, BlockChainError>;

	async fn block_number(&self) -> Result<u64, BlockChainError>;

	async fn peer_count(&self) -> Result<u64, BlockChainError>;

	async fn is_connected(&self) -> bool;

	async fn sync_status(&self) -> Result<SyncStatus, BlockChainError>;
}

/// The closed set of node client variants
pub enum BlockchainClient<T> {
	Geth(GethClient<T>),
	Parity(ParityClient<T>),
	Ganache(GanacheClient<T>),
	Infura(InfuraClient<T>),
	Generic(GenericClient<T>),
}

impl<T> BlockchainClient<T> {
	/// Builds the variant for `kind`
	pub fn new(kind: ClientKind, identity: ClientIdentity, provider: RpcProvider<T>) -> Self {
		match kind {
			ClientKind::Geth => Self::Geth(GethClient::new(identity, provider)),
			ClientKind::Parity => Self::Parity(ParityClient::new(identity, provider)),
			ClientKind::Ganache => Self::Ganache(GanacheClient::new(identity, provider)),
			ClientKind::Infura => Self::Infura(InfuraClient::new(identity, provider)),
			ClientKind::Generic => Self::Generic(GenericClient::new(identity, provider)),
		}
	}
}

impl<T> Clone for BlockchainClient<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Geth(client) => Self::Geth(client.clone()),
			Self::Parity(client) => Self::Parity(client.clone()),
			Self::Ganache(client) => Self::Ganache(client.clone()),
			Self::Infura(client) => Self::Infura(client.clone()),
			Self::Generic(client) => Self::Generic(client.clone()),
		}
	}
}

impl<T> fmt::Debug for BlockchainClient<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Geth(client) => f.debug_tuple("Geth").field(client).finish(),
			Self::Parity(client) => f.debug_tuple("Parity").field(client).finish(),
			Self::Ganache(client) => f.debug_tuple("Ganache").field(client).finish(),
			Self::Infura(client) => f.debug_tuple("Infura").field(client).finish(),
			Self::Generic(client) => f.debug_tuple("Generic").field(client).finish(),
		}
	}
}

macro_rules! delegate {
	($self:ident, $client:ident => $call:expr) => {
		match $self {
			Self::Geth($client) => $call,
			Self::Parity($client) => $call,
			Self::Ganache($client) => $call,
			Self::Infura($client) => $call,
			Self::Generic($client) => $call,
		}
	};
}

#[async_trait]
impl<T: BlockchainTransport + 'static> NodeClient for BlockchainClient<T> {
	fn kind(&self) -> ClientKind {
		delegate!(self, client => client.kind())
	}

	fn identity(&self) -> &ClientIdentity {
		delegate!(self, client => client.identity())
	}

	async fn chain_id(&self) -> Result<u64, BlockChainError> {
		delegate!(self, client => client.chain_id().await)
	}

	async fn is_local(&self) -> Result<bool, BlockChainError> {
		delegate!(self, client => client.is_local().await)
	}

	async fn chain_name(&self) -> Result<String, BlockChainError> {
		delegate!(self, client => client.chain_name().await)
	}

	async fn unlock_account(
		&self,
		address: &Address,
		password: &str,
		duration: Option<u64>,
	) -> Result<bool, BlockChainError> {
		delegate!(self, client => client.unlock_account(address, password, duration).await)
	}

	async fn lock_account(&self, address: &Address) -> Result<bool, BlockChainError> {
		delegate!(self, client => client.lock_account(address).await)
	}

	async fn accounts(&self) -> Result<Vec<Address>, BlockChainError> {
		delegate!(self, client => client.accounts().await)
	}

	async fn block_number(&self) -> Result<u64, BlockChainError> {
		delegate!(self, client => client.block_number().await)
	}

	async fn peer_count(&self) -> Result<u64, BlockChainError> {
		delegate!(self, client => client.peer_count().await)
	}

	async fn is_connected(&self) -> bool {
		delegate!(self, client => client.is_connected().await)
	}

	async fn sync_status(&self) -> Result<SyncStatus, BlockChainError> {
		delegate!(self, client => client.sync_status().await)
	}
}
