//! Maps node technology names to client variants.

use std::collections::HashMap;

use crate::{
	models::ClientIdentity,
	services::blockchain::{
		clients::{BlockchainClient, ClientKind, InfuraClient},
		RpcProvider,
	},
};

/// Technology names recognized out of the box
pub const DEFAULT_CLIENTS: &[(&str, ClientKind)] = &[
	("Geth", ClientKind::Geth),
	("Parity-Ethereum", ClientKind::Parity),
	("OpenEthereum", ClientKind::Parity),
	("EthereumJS TestRPC", ClientKind::Ganache),
];

/// Registry of technology name to client variant
///
/// Lookups compare the technology by exact string; anything unregistered,
/// including [`crate::models::UNKNOWN_TECHNOLOGY`], resolves to
/// [`ClientKind::Generic`].
#[derive(Debug, Clone)]
pub struct ClientRegistry {
	clients: HashMap<String, ClientKind>,
}

impl ClientRegistry {
	/// Registry with no technologies; everything resolves to Generic
	pub fn empty() -> Self {
		Self {
			clients: HashMap::new(),
		}
	}

	/// Registers `technology`, returning the kind it previously mapped to
	pub fn register(&mut self, technology: impl Into<String>, kind: ClientKind) -> Option<ClientKind> {
		self.clients.insert(technology.into(), kind)
	}

	pub fn lookup(&self, technology: &str) -> ClientKind {
		self.clients
			.get(technology)
			.copied()
			.unwrap_or(ClientKind::Generic)
	}

	/// Builds the client matching the identity's technology
	pub fn resolve<T>(&self, identity: ClientIdentity, provider: RpcProvider<T>) -> BlockchainClient<T> {
		let kind = self.lookup(identity.node_technology());
		tracing::debug!(
			technology = identity.node_technology(),
			client = %kind,
			"resolved node client"
		);
		BlockchainClient::new(kind, identity, provider)
	}

	/// Builds a gateway client; the technology string is not consulted
	pub fn resolve_gateway<T>(&self, identity: ClientIdentity, provider: RpcProvider<T>) -> InfuraClient<T> {
		InfuraClient::new(identity, provider)
	}
}

impl Default for ClientRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		for (technology, kind) in DEFAULT_CLIENTS {
			registry.register(*technology, *kind);
		}
		registry
	}
}
