use eth_client_dispatch::models::{
	is_public_chain, public_chain_name, ProviderUri, TransportKind, PUBLIC_CHAINS,
};
use proptest::{prelude::*, test_runner::Config};

use crate::properties::strategies::project_id_strategy;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_public_membership_matches_names(chain_id in any::<u64>()) {
		prop_assert_eq!(is_public_chain(chain_id), public_chain_name(chain_id).is_some());
	}

	#[test]
	fn test_listed_chains_are_public(index in 0..PUBLIC_CHAINS.len()) {
		let (chain_id, name) = PUBLIC_CHAINS[index];
		prop_assert!(is_public_chain(chain_id));
		prop_assert_eq!(public_chain_name(chain_id), Some(name));
	}

	#[test]
	fn test_infura_scheme_maps_to_gateway(
		project_id in project_id_strategy(),
		network in prop::sample::select(vec!["mainnet", "goerli", "sepolia"]),
	) {
		let uri = ProviderUri::parse(&format!("infura://{}/{}", network, project_id)).unwrap();
		prop_assert!(uri.is_gateway());
		prop_assert_eq!(uri.kind(), TransportKind::Http);
		let expected = format!("https://{}.infura.io/v3/{}", network, project_id);
		prop_assert_eq!(uri.endpoint(), expected.as_str());
	}
}
