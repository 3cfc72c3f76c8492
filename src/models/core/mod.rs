mod chain;
mod connection;
mod identity;
mod provider_uri;

pub use chain::{
	is_poa_chain, is_public_chain, public_chain_name, LOCAL_CHAIN_NAME, POA_CHAINS, PUBLIC_CHAINS,
	UNKNOWN_CHAIN_NAME,
};
pub use connection::ConnectionConfig;
pub use identity::{ClientIdentity, UNKNOWN_TECHNOLOGY};
pub use provider_uri::{
	ProviderUri, TransportKind, INFURA_DEFAULT_NETWORK, INFURA_SCHEME,
};
