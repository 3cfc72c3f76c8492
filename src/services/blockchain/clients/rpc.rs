//! JSON-RPC helpers shared by the node client variants.

use alloy::primitives::Address;
use serde_json::{json, Value};
use std::{collections::HashMap, str::FromStr};

use crate::services::blockchain::{clients::SyncStatus, BlockChainError, BlockchainTransport};

fn method_metadata(method: &str) -> Option<HashMap<String, String>> {
	Some(HashMap::from([("method".to_string(), method.to_string())]))
}

/// Whether failures found in a response are recorded when raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reporting {
	Logged,
	/// The caller recovers from the failure and reports only the outcome
	Unlogged,
}

impl Reporting {
	fn rpc_error(self, method: &str, code: i64, message: &str) -> BlockChainError {
		match self {
			Self::Logged => BlockChainError::rpc_error(method, code, message),
			Self::Unlogged => BlockChainError::unlogged_rpc_error(method, code, message),
		}
	}

	pub(crate) fn request_error(self, method: &str, msg: String) -> BlockChainError {
		match self {
			Self::Logged => BlockChainError::request_error(msg, None, method_metadata(method)),
			Self::Unlogged => BlockChainError::unlogged_request_error(msg, method_metadata(method)),
		}
	}
}

/// Sends a request and extracts the `result` member of the response
///
/// # Errors
/// - `RpcError` when the node answers with an `error` object
/// - `RequestError` when the response carries no `result`
/// - `TransportError` when the request does not reach the node
pub(crate) async fn call<T: BlockchainTransport>(
	transport: &T,
	method: &str,
	params: Option<Value>,
) -> Result<Value, BlockChainError> {
	call_with(transport, method, params, Reporting::Logged).await
}

pub(crate) async fn call_with<T: BlockchainTransport>(
	transport: &T,
	method: &str,
	params: Option<Value>,
	reporting: Reporting,
) -> Result<Value, BlockChainError> {
	let mut response = transport.send_raw_request(method, params).await?;

	if let Some(error) = response.get("error") {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown error");
		return Err(reporting.rpc_error(method, code, message));
	}

	response
		.get_mut("result")
		.map(Value::take)
		.ok_or_else(|| reporting.request_error(method, "Missing 'result' field".to_string()))
}

/// Decodes a `0x`-prefixed hex quantity
pub(crate) fn parse_quantity(method: &str, value: &Value) -> Result<u64, BlockChainError> {
	parse_quantity_with(method, value, Reporting::Logged)
}

pub(crate) fn parse_quantity_with(
	method: &str,
	value: &Value,
	reporting: Reporting,
) -> Result<u64, BlockChainError> {
	let invalid = || reporting.request_error(method, format!("Invalid quantity: {}", value));

	let digits = value
		.as_str()
		.and_then(|s| s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")))
		.ok_or_else(invalid)?;
	u64::from_str_radix(digits, 16).map_err(|_| invalid())
}

fn parse_bool(method: &str, value: &Value) -> Result<bool, BlockChainError> {
	value.as_bool().ok_or_else(|| {
		BlockChainError::request_error(
			format!("Expected a boolean result, got {}", value),
			None,
			method_metadata(method),
		)
	})
}

pub(crate) async fn accounts<T: BlockchainTransport>(
	transport: &T,
) -> Result<Vec<Address>, BlockChainError> {
	const METHOD: &str = "eth_accounts";
	let result = call(transport, METHOD, None).await?;

	let entries = result.as_array().ok_or_else(|| {
		BlockChainError::request_error("Expected an array of accounts", None, method_metadata(METHOD))
	})?;

	entries
		.iter()
		.map(|entry| {
			entry
				.as_str()
				.and_then(|s| Address::from_str(s).ok())
				.ok_or_else(|| {
					BlockChainError::request_error(
						format!("Invalid account address: {}", entry),
						None,
						method_metadata(METHOD),
					)
				})
		})
		.collect()
}

pub(crate) async fn block_number<T: BlockchainTransport>(
	transport: &T,
) -> Result<u64, BlockChainError> {
	let result = call(transport, "eth_blockNumber", None).await?;
	parse_quantity("eth_blockNumber", &result)
}

pub(crate) async fn peer_count<T: BlockchainTransport>(
	transport: &T,
) -> Result<u64, BlockChainError> {
	let result = call(transport, "net_peerCount", None).await?;
	parse_quantity("net_peerCount", &result)
}

pub(crate) async fn sync_status<T: BlockchainTransport>(
	transport: &T,
) -> Result<SyncStatus, BlockChainError> {
	const METHOD: &str = "eth_syncing";
	let result = call(transport, METHOD, None).await?;

	match &result {
		Value::Bool(false) => Ok(SyncStatus::Synced),
		Value::Object(progress) => {
			let field = |name: &str| {
				progress
					.get(name)
					.map(|v| parse_quantity(METHOD, v))
					.unwrap_or(Ok(0))
			};
			Ok(SyncStatus::Syncing {
				starting_block: field("startingBlock")?,
				current_block: field("currentBlock")?,
				highest_block: field("highestBlock")?,
			})
		}
		other => Err(BlockChainError::request_error(
			format!("Unexpected sync status: {}", other),
			None,
			method_metadata(METHOD),
		)),
	}
}

pub(crate) async fn unlock_account<T: BlockchainTransport>(
	transport: &T,
	address: &Address,
	password: &str,
	duration: Option<u64>,
) -> Result<bool, BlockChainError> {
	const METHOD: &str = "personal_unlockAccount";
	let params = json!([address.to_string(), password, duration]);
	let result = call(transport, METHOD, Some(params)).await?;
	parse_bool(METHOD, &result)
}

pub(crate) async fn lock_account<T: BlockchainTransport>(
	transport: &T,
	address: &Address,
) -> Result<bool, BlockChainError> {
	const METHOD: &str = "personal_lockAccount";
	let result = call(transport, METHOD, Some(json!([address.to_string()]))).await?;
	parse_bool(METHOD, &result)
}
