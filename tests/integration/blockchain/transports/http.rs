use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::time::Duration;

use eth_client_dispatch::{
	models::ConnectionConfig,
	services::blockchain::{
		BlockchainInterface, BlockchainTransport, ClientKind, HttpTransportClient, NodeClient,
		TransportError,
	},
};

fn rpc_body(result: Value) -> String {
	json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string()
}

#[tokio::test]
async fn test_posts_json_rpc_envelope() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::PartialJson(json!({
			"jsonrpc": "2.0",
			"method": "eth_blockNumber",
			"params": []
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(rpc_body(json!("0x10")))
		.create_async()
		.await;

	let client = HttpTransportClient::new(&server.url(), Duration::from_secs(5), 0).unwrap();
	let response = client
		.send_raw_request("eth_blockNumber", None::<Value>)
		.await
		.unwrap();

	assert_eq!(response["result"], "0x10");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(503)
		.with_body("upstream unavailable")
		.create_async()
		.await;

	let client = HttpTransportClient::new(&server.url(), Duration::from_secs(5), 0).unwrap();
	let error = client
		.send_raw_request("net_version", None::<Value>)
		.await
		.unwrap_err();

	match error {
		TransportError::Http {
			status_code, body, ..
		} => {
			assert_eq!(status_code.as_u16(), 503);
			assert_eq!(body, "upstream unavailable");
		}
		other => panic!("unexpected error: {}", other),
	}
	mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(200)
		.with_body("<html>not json</html>")
		.create_async()
		.await;

	let client = HttpTransportClient::new(&server.url(), Duration::from_secs(5), 0).unwrap();
	let result = client.send_raw_request("net_version", None::<Value>).await;

	assert!(matches!(result, Err(TransportError::ResponseParse(_))));
}

#[tokio::test]
async fn test_retries_are_opt_in() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(500)
		.expect(1)
		.create_async()
		.await;

	let client = HttpTransportClient::new(&server.url(), Duration::from_secs(5), 0).unwrap();
	assert!(client.send_raw_request("net_version", None::<Value>).await.is_err());
	mock.assert_async().await;
}

#[tokio::test]
async fn test_connect_over_http_end_to_end() {
	let mut server = Server::new_async().await;
	let responses = [
		("net_version", json!("5")),
		("eth_chainId", json!("0x5")),
		(
			"web3_clientVersion",
			json!("Geth/v1.4.11-stable-fed692f6/darwin/go1.7"),
		),
	];
	for (method, result) in responses {
		server
			.mock("POST", "/")
			.match_body(Matcher::PartialJson(json!({"method": method})))
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(rpc_body(result))
			.create_async()
			.await;
	}

	let mut interface = BlockchainInterface::new(ConnectionConfig::new(server.url()));
	let client = interface.connect().await.unwrap();

	assert_eq!(client.kind(), ClientKind::Geth);
	assert_eq!(client.backend(), Some("go1.7"));
	assert_eq!(client.chain_id().await.unwrap(), 5);
	assert!(!client.is_local().await.unwrap());
}
