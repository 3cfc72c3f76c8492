//! Domain models and data structures for node client detection.
//!
//! - `core`: client identity, chain registries, provider URIs and connection settings
//! - `config`: configuration loading and validation

mod config;
mod core;

pub use config::{
	ConfigError, ConfigLoader, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SYNC_POLL_INTERVAL_MS,
	DEFAULT_SYNC_TIMEOUT_MS,
};

pub use core::{
	is_poa_chain, is_public_chain, public_chain_name, ClientIdentity, ConnectionConfig,
	ProviderUri, TransportKind, INFURA_DEFAULT_NETWORK, INFURA_SCHEME, LOCAL_CHAIN_NAME,
	POA_CHAINS, PUBLIC_CHAINS, UNKNOWN_CHAIN_NAME, UNKNOWN_TECHNOLOGY,
};
