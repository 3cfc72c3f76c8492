//! Well known chain ids.
//!
//! [`PUBLIC_CHAINS`] is the registry consulted by locality checks. It is a constant
//! table and is never mutated, so any number of connections may read it at once.

/// Public Ethereum-family networks by chain id
pub const PUBLIC_CHAINS: &[(u64, &str)] = &[
	(0, "Olympic"),
	(1, "Mainnet"),
	(2, "Morden"),
	(3, "Ropsten"),
	(4, "Rinkeby"),
	(5, "Goerli"),
	(6, "Kotti"),
	(8, "Ubiq"),
	(42, "Kovan"),
	(60, "GoChain"),
	(77, "Sokol"),
	(99, "Core"),
	(100, "xDai"),
	(401697, "Tobalaba"),
	(7762959, "Musicoin"),
	(61717561, "Aquachain"),
];

/// Proof-of-authority networks whose blocks carry oversized `extraData`
pub const POA_CHAINS: &[u64] = &[4, 5, 42];

/// Chain name reported for chains outside the public registry
pub const UNKNOWN_CHAIN_NAME: &str = "Unknown";

/// Chain name reported by local development nodes
pub const LOCAL_CHAIN_NAME: &str = "Local";

pub fn is_public_chain(chain_id: u64) -> bool {
	public_chain_name(chain_id).is_some()
}

pub fn public_chain_name(chain_id: u64) -> Option<&'static str> {
	PUBLIC_CHAINS
		.iter()
		.find(|(id, _)| *id == chain_id)
		.map(|(_, name)| *name)
}

pub fn is_poa_chain(chain_id: u64) -> bool {
	POA_CHAINS.contains(&chain_id)
}
