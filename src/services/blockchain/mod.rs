//! Node client detection and dispatch.
//!
//! Provides the connection interface and everything it is built from:
//!
//! - Provider transports and the factory selecting them by URI
//! - Request/response middleware shared by a connection's clients
//! - Node client variants behind the uniform [`NodeClient`] trait
//! - The registry mapping technology names to variants
//! - Error types for blockchain operations

mod clients;
mod error;
mod interface;
mod middleware;
mod registry;
mod transports;

pub use clients::{
	resolve_chain_id, BlockchainClient, ChainIdSource, ClientKind, GanacheClient, GenericClient,
	GethClient, InfuraClient, NodeClient, ParityClient, SyncStatus, DUAL_SOURCE, LEGACY_ONLY,
};
pub use error::BlockChainError;
pub use interface::{BlockchainInterface, ConnectionState, CLIENT_VERSION_METHOD};
pub use middleware::{
	MiddlewareStack, PoaCompatibilityMiddleware, RequestLoggingMiddleware, RpcMiddleware,
	RpcProvider,
};
pub use registry::{ClientRegistry, DEFAULT_CLIENTS};
#[cfg(unix)]
pub use transports::IpcTransportClient;
pub use transports::{
	AnyTransport, BlockchainTransport, DefaultProviderFactory, HttpTransportClient,
	ProviderFactory, TransportError, WsTransportClient, CONNECTIVITY_PROBE_METHOD,
};
