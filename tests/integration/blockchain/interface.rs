use alloy::primitives::Address;
use mockall::predicate;
use serde_json::json;
use std::time::Duration;

use eth_client_dispatch::{
	models::{ConnectionConfig, TransportKind},
	services::blockchain::{
		BlockChainError, BlockchainInterface, ClientKind, ClientRegistry, ConnectionState,
		NodeClient, TransportError,
	},
};

use crate::integration::mocks::{factory_for, mock_node, MockProviderFactory, Reply};

const INFURA_URI: &str = "infura://1234567890987654321abcdef";

#[tokio::test]
async fn test_connect_to_geth_node() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("5"))),
		("eth_chainId", Reply::Result(json!("0x5"))),
		(
			"web3_clientVersion",
			Reply::Result(json!("Geth/v1.4.11-stable-fed692f6/darwin/go1.7")),
		),
	]);
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("ws://localhost:8546"),
		factory_for(transport),
	);

	let client = interface.connect().await.unwrap();
	assert_eq!(client.kind(), ClientKind::Geth);
	assert_eq!(client.node_version(), Some("v1.4.11-stable-fed692f6"));
	assert!(!client.is_local().await.unwrap());

	assert_eq!(interface.state(), ConnectionState::Connected);
	assert_eq!(
		interface.provider_uri().unwrap().kind(),
		TransportKind::WebSocket
	);
}

#[tokio::test]
async fn test_connect_through_hosted_gateway() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("5"))),
		("eth_chainId", Reply::Result(json!("0x5"))),
		(
			"web3_clientVersion",
			Reply::Result(json!("Geth/v1.8.23-omnibus-2ad89aaa/linux-amd64/go1.11.1")),
		),
		("personal_unlockAccount", Reply::Result(json!(true))),
	]);
	let mut factory = MockProviderFactory::new();
	factory
		.expect_create()
		.withf(|uri| uri.is_gateway() && uri.endpoint() == "https://mainnet.infura.io/v3/1234567890987654321abcdef")
		.times(1)
		.return_once(move |_| Ok(transport));

	let mut interface = BlockchainInterface::with_factory(ConnectionConfig::new(INFURA_URI), factory);
	let client = interface.connect().await.unwrap();

	assert_eq!(client.kind(), ClientKind::Infura);
	assert_eq!(client.node_technology(), "Geth");
	assert_eq!(client.node_version(), Some("v1.8.23-omnibus-2ad89aaa"));
	assert!(!client.is_local().await.unwrap());
	assert_eq!(client.chain_id().await.unwrap(), 5);
	assert!(client
		.unlock_account(&Address::ZERO, "password", None)
		.await
		.unwrap());
}

#[tokio::test]
async fn test_gateway_is_never_local_on_private_chain() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("1337"))),
		("eth_chainId", Reply::Result(json!("0x539"))),
		("web3_clientVersion", Reply::Result(json!("Geth/v1.9.0"))),
	]);
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("https://goerli.infura.io/v3/abc"),
		factory_for(transport),
	);

	let client = interface.connect().await.unwrap();
	assert_eq!(client.kind(), ClientKind::Infura);
	assert!(!client.is_local().await.unwrap());
}

#[tokio::test]
async fn test_connect_to_ganache() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("5777"))),
		(
			"web3_clientVersion",
			Reply::Result(json!("EthereumJS TestRPC/v2.1.5/ethereum-js")),
		),
	]);
	let config = ConnectionConfig::new("http://127.0.0.1:7545")
		.with_sync(Duration::from_millis(200), Duration::from_millis(10));
	let mut interface = BlockchainInterface::with_factory(config, factory_for(transport));

	let client = interface.connect().await.unwrap();
	assert_eq!(client.kind(), ClientKind::Ganache);
	assert_eq!(client.platform(), None);
	assert_eq!(client.backend(), Some("ethereum-js"));
	assert!(client.is_local().await.unwrap());
	assert_eq!(client.chain_name().await.unwrap(), "Local");
}

#[tokio::test]
async fn test_unrecognized_client_uses_generic() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("1"))),
		("eth_chainId", Reply::Result(json!("0x1"))),
		(
			"web3_clientVersion",
			Reply::Result(json!("Nethermind/v1.10.0/linux-x64/dotnet5.0.0")),
		),
	]);
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:8545"),
		factory_for(transport),
	);

	let client = interface.connect().await.unwrap();
	assert_eq!(client.kind(), ClientKind::Generic);
	assert!(client
		.unlock_account(&Address::ZERO, "", None)
		.await
		.unwrap_err()
		.is_unsupported());
}

#[tokio::test]
async fn test_custom_registry() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("1"))),
		("eth_chainId", Reply::Result(json!("0x1"))),
		("web3_clientVersion", Reply::Result(json!("Erigon/v2.48.1"))),
	]);
	let mut registry = ClientRegistry::default();
	registry.register("Erigon", ClientKind::Geth);

	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:8545"),
		factory_for(transport),
	)
	.with_registry(registry);

	assert_eq!(interface.connect().await.unwrap().kind(), ClientKind::Geth);
}

#[tokio::test]
async fn test_provider_creation_failure_names_uri() {
	let mut factory = MockProviderFactory::new();
	factory
		.expect_create()
		.times(1)
		.returning(|_| Err(TransportError::network("connection refused", None, None)));

	let mut interface =
		BlockchainInterface::with_factory(ConnectionConfig::new("ws://10.0.0.1:8546"), factory);

	let error = interface.connect().await.unwrap_err();
	match &error {
		BlockChainError::ConnectionError { uri, .. } => assert_eq!(uri, "ws://10.0.0.1:8546"),
		other => panic!("unexpected error: {}", other),
	}
	assert!(error.to_string().contains("ws://10.0.0.1:8546"));
	assert_eq!(interface.state(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_malformed_uri_never_reaches_factory() {
	let mut factory = MockProviderFactory::new();
	factory.expect_create().never();

	let mut interface = BlockchainInterface::with_factory(ConnectionConfig::new(""), factory);

	assert!(matches!(
		interface.connect().await,
		Err(BlockChainError::ConnectionError { .. })
	));
	assert_eq!(interface.state(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_unreachable_endpoint_fails_probe() {
	let transport = mock_node(&[("net_version", Reply::Unreachable)]);
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:1"),
		factory_for(transport),
	);

	assert!(matches!(
		interface.connect().await,
		Err(BlockChainError::ConnectionError { .. })
	));
	assert!(!interface.is_connected().await);
}

#[tokio::test]
async fn test_version_rpc_error_is_connection_failure() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("1"))),
		("web3_clientVersion", Reply::RpcError(-32601, "method not found")),
	]);
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:8545"),
		factory_for(transport),
	);

	let error = interface.connect().await.unwrap_err();
	assert!(matches!(error, BlockChainError::ConnectionError { .. }));
	assert_eq!(interface.state(), ConnectionState::Failed);
	assert!(interface.client().is_err());
}

#[tokio::test]
async fn test_sync_wait_polls_until_synced() {
	let mut transport = mock_node(&[
		("net_version", Reply::Result(json!("1337"))),
		("eth_chainId", Reply::Result(json!("0x539"))),
		("web3_clientVersion", Reply::Result(json!("Geth/v1.9.0"))),
	]);
	let mut polls = 0;
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_syncing"), predicate::always())
		.times(3)
		.returning(move |_, _| {
			polls += 1;
			let result = if polls < 3 {
				json!({"startingBlock": "0x0", "currentBlock": "0x1", "highestBlock": "0x2"})
			} else {
				json!(false)
			};
			Ok(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
		});

	let config = ConnectionConfig::new("http://localhost:8545")
		.with_sync(Duration::from_secs(2), Duration::from_millis(10));
	let mut interface = BlockchainInterface::with_factory(config, factory_for(transport));

	interface.connect().await.unwrap();
	assert_eq!(interface.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_sync_timeout_leaves_interface_failed() {
	let transport = mock_node(&[
		("net_version", Reply::Result(json!("1337"))),
		("eth_chainId", Reply::Result(json!("0x539"))),
		("web3_clientVersion", Reply::Result(json!("Geth/v1.9.0"))),
		(
			"eth_syncing",
			Reply::Result(json!({"startingBlock": "0x0", "currentBlock": "0x1", "highestBlock": "0xffff"})),
		),
	]);
	let config = ConnectionConfig::new("http://localhost:8545")
		.with_sync(Duration::from_millis(60), Duration::from_millis(10));
	let mut interface = BlockchainInterface::with_factory(config, factory_for(transport));

	let error = interface.connect().await.unwrap_err();
	match error {
		BlockChainError::SyncTimeout { uri, timeout, .. } => {
			assert_eq!(uri, "http://localhost:8545");
			assert_eq!(timeout, Duration::from_millis(60));
		}
		other => panic!("unexpected error: {}", other),
	}
	assert_eq!(interface.state(), ConnectionState::Failed);
	assert!(interface.client().is_err());
	assert!(interface.provider().is_none());
}
