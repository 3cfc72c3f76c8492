use alloy::primitives::Address;
use serde_json::json;

use eth_client_dispatch::{
	models::{ClientIdentity, PUBLIC_CHAINS},
	services::blockchain::{
		BlockChainError, BlockchainClient, ClientKind, NodeClient, RpcProvider, SyncStatus,
	},
};

use crate::integration::mocks::{mock_node, MockTransport, Reply};

fn client(kind: ClientKind, version: &str, transport: MockTransport) -> BlockchainClient<MockTransport> {
	BlockchainClient::new(kind, ClientIdentity::parse(version), RpcProvider::new(transport))
}

#[tokio::test]
async fn test_geth_on_goerli_is_not_local() {
	let transport = mock_node(&[("eth_chainId", Reply::Result(json!("0x5")))]);
	let geth = client(
		ClientKind::Geth,
		"Geth/v1.4.11-stable-fed692f6/darwin/go1.7",
		transport,
	);

	assert_eq!(geth.node_technology(), "Geth");
	assert_eq!(geth.node_version(), Some("v1.4.11-stable-fed692f6"));
	assert_eq!(geth.platform(), Some("darwin"));
	assert_eq!(geth.backend(), Some("go1.7"));
	assert_eq!(geth.chain_id().await.unwrap(), 5);
	assert!(!geth.is_local().await.unwrap());
}

#[tokio::test]
async fn test_parity_identity_and_unsupported_unlock() {
	let transport = mock_node(&[("eth_chainId", Reply::Result(json!("0x1")))]);
	let parity = client(
		ClientKind::Parity,
		"Parity-Ethereum/v2.5.1-beta-e0141f8-20190510/x86_64-linux-gnu/rustc1.34.1",
		transport,
	);

	assert_eq!(parity.node_technology(), "Parity-Ethereum");
	assert_eq!(parity.node_version(), Some("v2.5.1-beta-e0141f8-20190510"));
	assert_eq!(parity.platform(), Some("x86_64-linux-gnu"));
	assert_eq!(parity.backend(), Some("rustc1.34.1"));
	assert_eq!(parity.chain_name().await.unwrap(), "Mainnet");

	let error = parity
		.unlock_account(&Address::ZERO, "password", None)
		.await
		.unwrap_err();
	match error {
		BlockChainError::UnsupportedOperation {
			client, operation, ..
		} => {
			assert_eq!(client, ClientKind::Parity);
			assert_eq!(operation, "unlock_account");
		}
		other => panic!("unexpected error: {}", other),
	}
}

#[tokio::test]
async fn test_ganache_is_local_for_every_public_chain_id() {
	for (chain_id, _) in PUBLIC_CHAINS {
		let transport = mock_node(&[("net_version", Reply::Result(json!(chain_id.to_string())))]);
		let ganache = client(
			ClientKind::Ganache,
			"EthereumJS TestRPC/v2.1.5/ethereum-js",
			transport,
		);

		assert_eq!(ganache.chain_id().await.unwrap(), *chain_id);
		assert!(ganache.is_local().await.unwrap());
	}
}

#[tokio::test]
async fn test_ganache_identity_has_no_platform() {
	let ganache = client(
		ClientKind::Ganache,
		"EthereumJS TestRPC/v2.1.5/ethereum-js",
		mock_node(&[]),
	);

	assert_eq!(ganache.node_technology(), "EthereumJS TestRPC");
	assert_eq!(ganache.node_version(), Some("v2.1.5"));
	assert_eq!(ganache.platform(), None);
	assert_eq!(ganache.backend(), Some("ethereum-js"));
	assert!(ganache
		.unlock_account(&Address::ZERO, "anything", Some(30))
		.await
		.unwrap());
}

#[tokio::test]
async fn test_locality_matches_public_registry() {
	let cases = [(1u64, false), (42, false), (1337, true), (5777, true)];

	for kind in [ClientKind::Geth, ClientKind::Parity, ClientKind::Generic] {
		for (chain_id, expected_local) in cases {
			let transport = mock_node(&[(
				"eth_chainId",
				Reply::Result(json!(format!("0x{:x}", chain_id))),
			)]);
			let node = client(kind, "Some/v1", transport);
			assert_eq!(
				node.is_local().await.unwrap(),
				expected_local,
				"{} on chain {}",
				kind,
				chain_id
			);
		}
	}
}

#[tokio::test]
async fn test_chain_id_prefers_new_style_source() {
	let transport = mock_node(&[
		("eth_chainId", Reply::Result(json!("0x2a"))),
		("net_version", Reply::Result(json!("3"))),
	]);
	let geth = client(ClientKind::Geth, "Geth/v1.9.0", transport);

	assert_eq!(geth.chain_id().await.unwrap(), 42);
}

#[tokio::test]
async fn test_chain_id_falls_back_to_legacy_source() {
	let transport = mock_node(&[
		("eth_chainId", Reply::RpcError(-32601, "method not found")),
		("net_version", Reply::Result(json!("3"))),
	]);
	let geth = client(ClientKind::Geth, "Geth/v1.4.11", transport);

	assert_eq!(geth.chain_id().await.unwrap(), 3);
	assert!(!geth.is_local().await.unwrap());
}

#[tokio::test]
async fn test_chain_id_unavailable_when_no_source_answers() {
	let transport = mock_node(&[
		("eth_chainId", Reply::Unreachable),
		("net_version", Reply::Result(json!("not a number"))),
	]);
	let generic = client(ClientKind::Generic, "Unknown", transport);

	assert!(matches!(
		generic.chain_id().await,
		Err(BlockChainError::ChainIdUnavailable(_))
	));
	assert!(generic.is_local().await.is_err());
}

#[tokio::test]
async fn test_geth_accounts_and_node_status() {
	let transport = mock_node(&[
		(
			"eth_accounts",
			Reply::Result(json!([
				"0x00000000000000000000000000000000000000aa",
				"0x00000000000000000000000000000000000000bb"
			])),
		),
		("eth_blockNumber", Reply::Result(json!("0x10d4f"))),
		("net_peerCount", Reply::Result(json!("0x19"))),
		(
			"eth_syncing",
			Reply::Result(json!({
				"startingBlock": "0x384",
				"currentBlock": "0x386",
				"highestBlock": "0x454"
			})),
		),
		("personal_lockAccount", Reply::Result(json!(true))),
	]);
	let geth = client(ClientKind::Geth, "Geth/v1.9.0", transport);

	assert_eq!(
		geth.accounts().await.unwrap(),
		vec![Address::with_last_byte(0xaa), Address::with_last_byte(0xbb)]
	);
	assert_eq!(geth.block_number().await.unwrap(), 68943);
	assert_eq!(geth.peer_count().await.unwrap(), 25);
	assert_eq!(
		geth.sync_status().await.unwrap(),
		SyncStatus::Syncing {
			starting_block: 900,
			current_block: 902,
			highest_block: 1108
		}
	);
	assert!(geth
		.lock_account(&Address::with_last_byte(0xaa))
		.await
		.unwrap());
}

#[tokio::test]
async fn test_is_connected_uses_probe() {
	let up = client(
		ClientKind::Geth,
		"Geth/v1.9.0",
		mock_node(&[("net_version", Reply::Result(json!("1")))]),
	);
	assert!(up.is_connected().await);

	let down = client(
		ClientKind::Geth,
		"Geth/v1.9.0",
		mock_node(&[("net_version", Reply::Unreachable)]),
	);
	assert!(!down.is_connected().await);
}
