//! Connection lifecycle for a single provider URI.
//!
//! A [`BlockchainInterface`] walks through
//! `Disconnected -> ProviderAttached -> ClientResolved -> MiddlewareAttached -> Connected`.
//! Every step runs in order on the caller's task. A failing step leaves the
//! interface in `Failed`, which is terminal; this layer never retries.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
	models::{is_poa_chain, ClientIdentity, ConnectionConfig, ProviderUri},
	services::blockchain::{
		clients::{rpc, BlockchainClient, NodeClient},
		middleware::{PoaCompatibilityMiddleware, RequestLoggingMiddleware},
		registry::ClientRegistry,
		BlockChainError, BlockchainTransport, DefaultProviderFactory, ProviderFactory, RpcProvider,
	},
};

/// Method returning the node's version identifier
pub const CLIENT_VERSION_METHOD: &str = "web3_clientVersion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
	Disconnected,
	ProviderAttached,
	ClientResolved,
	MiddlewareAttached,
	Connected,
	Failed,
}

impl fmt::Display for ConnectionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Disconnected => "disconnected",
			Self::ProviderAttached => "provider attached",
			Self::ClientResolved => "client resolved",
			Self::MiddlewareAttached => "middleware attached",
			Self::Connected => "connected",
			Self::Failed => "failed",
		};
		f.write_str(name)
	}
}

/// One logical connection attempt to a node
pub struct BlockchainInterface<F: ProviderFactory = DefaultProviderFactory> {
	config: ConnectionConfig,
	factory: F,
	registry: ClientRegistry,
	state: ConnectionState,
	provider_uri: Option<ProviderUri>,
	provider: Option<RpcProvider<F::Transport>>,
	client: Option<BlockchainClient<F::Transport>>,
}

impl BlockchainInterface<DefaultProviderFactory> {
	/// Interface using the built-in HTTP, WebSocket and IPC providers
	pub fn new(config: ConnectionConfig) -> Self {
		let factory = DefaultProviderFactory::from_config(&config);
		Self::with_factory(config, factory)
	}
}

impl<F: ProviderFactory> BlockchainInterface<F> {
	pub fn with_factory(config: ConnectionConfig, factory: F) -> Self {
		Self {
			config,
			factory,
			registry: ClientRegistry::default(),
			state: ConnectionState::Disconnected,
			provider_uri: None,
			provider: None,
			client: None,
		}
	}

	/// Replaces the client registry used during resolution
	pub fn with_registry(mut self, registry: ClientRegistry) -> Self {
		self.registry = registry;
		self
	}

	pub fn state(&self) -> ConnectionState {
		self.state
	}

	pub fn config(&self) -> &ConnectionConfig {
		&self.config
	}

	/// Classified provider URI, available once a provider was attached
	pub fn provider_uri(&self) -> Option<&ProviderUri> {
		self.provider_uri.as_ref()
	}

	pub fn provider(&self) -> Option<&RpcProvider<F::Transport>> {
		self.provider.as_ref()
	}

	/// The resolved node client
	///
	/// # Errors
	/// `InvalidState` unless the interface is connected.
	pub fn client(&self) -> Result<&BlockchainClient<F::Transport>, BlockChainError> {
		match (&self.state, &self.client) {
			(ConnectionState::Connected, Some(client)) => Ok(client),
			_ => Err(self.invalid_state("client is only available once connected")),
		}
	}

	/// Whether the interface is connected and the node still answers
	pub async fn is_connected(&self) -> bool {
		match (&self.state, &self.provider) {
			(ConnectionState::Connected, Some(provider)) => provider.is_connected().await,
			_ => false,
		}
	}

	/// Runs the full connection sequence
	///
	/// Connecting an already connected interface returns the existing client.
	///
	/// # Errors
	/// - `ConnectionError` naming the URI when the provider cannot be created or
	///   does not answer, and when any later step fails to read from the node
	/// - `SyncTimeout` when `sync_now` is set and the node does not finish
	///   synchronizing within the configured timeout
	/// - `InvalidState` when the interface has already failed
	pub async fn connect(&mut self) -> Result<&BlockchainClient<F::Transport>, BlockChainError> {
		match self.state {
			ConnectionState::Connected => return self.client(),
			ConnectionState::Disconnected => {}
			_ => return Err(self.invalid_state("connect requires a disconnected interface")),
		}

		if let Err(e) = self.establish().await {
			self.fail();
			return Err(e);
		}
		self.client()
	}

	async fn establish(&mut self) -> Result<(), BlockChainError> {
		self.attach_provider().await?;
		self.resolve_client().await?;
		self.attach_middleware().await?;
		if self.config.sync_now {
			self.wait_for_sync().await?;
		}
		self.transition(ConnectionState::Connected);

		if let Some(client) = &self.client {
			tracing::info!(
				uri = %self.config.provider_uri,
				client = %client.kind(),
				technology = client.node_technology(),
				version = client.node_version().unwrap_or("unknown"),
				"connected to node"
			);
		}
		Ok(())
	}

	async fn attach_provider(&mut self) -> Result<(), BlockChainError> {
		let raw = self.config.provider_uri.clone();
		let uri = ProviderUri::parse(&raw).map_err(|e| {
			BlockChainError::connection_error(&raw, "Invalid provider URI", Some(Box::new(e)), None)
		})?;

		let transport = self.factory.create(&uri).await.map_err(|e| {
			BlockChainError::connection_error(
				&raw,
				"Failed to create provider",
				Some(Box::new(e)),
				Some(HashMap::from([("transport".to_string(), uri.kind().to_string())])),
			)
		})?;

		if !transport.is_connected().await {
			return Err(BlockChainError::connection_error(
				&raw,
				"Provider did not answer the connectivity probe",
				None,
				None,
			));
		}

		self.provider = Some(RpcProvider::new(transport));
		self.provider_uri = Some(uri);
		self.transition(ConnectionState::ProviderAttached);
		Ok(())
	}

	async fn resolve_client(&mut self) -> Result<(), BlockChainError> {
		let (provider, uri) = match (&self.provider, &self.provider_uri) {
			(Some(provider), Some(uri)) => (provider.clone(), uri.clone()),
			_ => return Err(self.invalid_state("no provider attached")),
		};

		let version = rpc::call(&provider, CLIENT_VERSION_METHOD, None)
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					uri.as_str(),
					"Failed to read the node version",
					Some(Box::new(e)),
					None,
				)
			})?;
		let identity = ClientIdentity::parse(version.as_str().unwrap_or_default());

		let client = if uri.is_gateway() {
			BlockchainClient::Infura(self.registry.resolve_gateway(identity, provider))
		} else {
			self.registry.resolve(identity, provider)
		};

		self.client = Some(client);
		self.transition(ConnectionState::ClientResolved);
		Ok(())
	}

	/// Attaches the protocol middleware to the provider
	///
	/// Request logging is always attached; the proof-of-authority block rewrite is
	/// attached on PoA chains. Calling this again adds nothing that is already
	/// present. Failures here do not move a connected interface to `Failed`.
	///
	/// # Errors
	/// - `InvalidState` before a client was resolved or after a failure
	/// - `ConnectionError` naming the URI when the chain id cannot be read
	pub async fn attach_middleware(&mut self) -> Result<(), BlockChainError> {
		let (provider, client) = match (&self.state, &self.provider, &self.client) {
			(ConnectionState::Failed, _, _) => {
				return Err(self.invalid_state("interface has failed"))
			}
			(_, Some(provider), Some(client)) => (provider, client),
			_ => return Err(self.invalid_state("no client resolved")),
		};

		provider
			.attach(Arc::new(RequestLoggingMiddleware))
			.await;

		let chain_id = client.chain_id().await.map_err(|e| {
			BlockChainError::connection_error(
				&self.config.provider_uri,
				"Failed to read the chain id",
				Some(Box::new(e)),
				None,
			)
		})?;
		if is_poa_chain(chain_id) && provider.attach(Arc::new(PoaCompatibilityMiddleware)).await {
			tracing::debug!(chain_id, "attached proof-of-authority middleware");
		}

		if self.state == ConnectionState::ClientResolved {
			self.transition(ConnectionState::MiddlewareAttached);
		}
		Ok(())
	}

	async fn wait_for_sync(&self) -> Result<(), BlockChainError> {
		let client = match &self.client {
			Some(client) => client,
			None => return Err(self.invalid_state("no client resolved")),
		};
		let uri = self.config.provider_uri.as_str();
		let timeout = self.config.sync_timeout();
		let poll_interval = self.config.sync_poll_interval();

		let wait = async {
			loop {
				let status = client.sync_status().await.map_err(|e| {
					BlockChainError::connection_error(
						uri,
						"Failed to read the sync status",
						Some(Box::new(e)),
						None,
					)
				})?;
				match status {
					status if status.is_synced() => return Ok::<(), BlockChainError>(()),
					status => {
						tracing::info!(?status, "waiting for node to synchronize");
						tokio::time::sleep(poll_interval).await;
					}
				}
			}
		};

		tokio::time::timeout(timeout, wait)
			.await
			.map_err(|_| BlockChainError::sync_timeout(uri, timeout))?
	}

	fn transition(&mut self, next: ConnectionState) {
		tracing::debug!(from = %self.state, to = %next, "connection state changed");
		self.state = next;
	}

	fn fail(&mut self) {
		self.provider = None;
		self.client = None;
		self.transition(ConnectionState::Failed);
	}

	fn invalid_state(&self, message: &str) -> BlockChainError {
		BlockChainError::invalid_state(
			message,
			None,
			Some(HashMap::from([("state".to_string(), self.state.to_string())])),
		)
	}
}

impl<F: ProviderFactory> fmt::Debug for BlockchainInterface<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BlockchainInterface")
			.field("provider_uri", &self.config.provider_uri)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
