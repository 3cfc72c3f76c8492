use serde_json::{json, Value};

use eth_client_dispatch::{
	models::ConnectionConfig,
	services::blockchain::{BlockchainInterface, BlockchainTransport},
};

use crate::integration::mocks::{factory_for, mock_node, Reply};

fn node_on_chain(chain_id_hex: &'static str) -> crate::integration::mocks::MockTransport {
	mock_node(&[
		("net_version", Reply::Result(json!("1"))),
		("eth_chainId", Reply::Result(json!(chain_id_hex))),
		("web3_clientVersion", Reply::Result(json!("Geth/v1.9.0"))),
		(
			"eth_getBlockByNumber",
			Reply::Result(json!({"number": "0x1", "extraData": "0xd883010906846765746888"})),
		),
	])
}

#[tokio::test]
async fn test_poa_chain_rewrites_block_extra_data() {
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:8545"),
		factory_for(node_on_chain("0x4")),
	);
	interface.connect().await.unwrap();

	let provider = interface.provider().unwrap();
	assert_eq!(
		provider.middleware_names().await,
		vec!["request_logging", "poa_compatibility"]
	);

	let response = provider
		.send_raw_request("eth_getBlockByNumber", Some(json!(["latest", false])))
		.await
		.unwrap();
	let block = &response["result"];
	assert_eq!(block["proofOfAuthorityData"], "0xd883010906846765746888");
	assert_eq!(block.get("extraData"), None::<&Value>);
}

#[tokio::test]
async fn test_non_poa_chain_keeps_extra_data() {
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:8545"),
		factory_for(node_on_chain("0x1")),
	);
	interface.connect().await.unwrap();

	let provider = interface.provider().unwrap();
	assert_eq!(provider.middleware_names().await, vec!["request_logging"]);

	let response = provider
		.send_raw_request("eth_getBlockByNumber", Some(json!(["latest", false])))
		.await
		.unwrap();
	assert_eq!(response["result"]["extraData"], "0xd883010906846765746888");
}

#[tokio::test]
async fn test_repeated_attachment_adds_nothing() {
	let mut interface = BlockchainInterface::with_factory(
		ConnectionConfig::new("http://localhost:8545"),
		factory_for(node_on_chain("0x5")),
	);
	interface.connect().await.unwrap();

	for _ in 0..3 {
		interface.attach_middleware().await.unwrap();
	}
	let names = interface.provider().unwrap().middleware_names().await;
	assert_eq!(names, vec!["request_logging", "poa_compatibility"]);
}
