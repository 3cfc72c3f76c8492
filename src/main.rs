//! Node probe entry point.
//!
//! Connects to a single Ethereum node, detects its client technology and prints a
//! JSON summary of what was found.
//!
//! # Flow
//! 1. Loads `.env` and the connection settings (CLI flags, a config file, or
//!    `PROVIDER_URI`)
//! 2. Runs the connection sequence, optionally waiting for the node to sync
//! 3. Prints client kind, identity fields, chain id, chain name and locality

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, Command};
use dotenvy::dotenv;
use serde::Serialize;
use std::{env::var, path::Path};
use tracing::{error, info};

use eth_client_dispatch::{
	models::{ConfigLoader, ConnectionConfig},
	services::blockchain::{BlockchainInterface, ClientKind, NodeClient},
	utils::logging::{setup_logging_with_writer, DEFAULT_LOG_LEVEL},
};

/// Environment variable consulted when no URI or config file is given
const PROVIDER_URI_ENV: &str = "PROVIDER_URI";

#[derive(Debug, Serialize)]
struct NodeSummary {
	client: ClientKind,
	node_technology: String,
	node_version: Option<String>,
	platform: Option<String>,
	backend: Option<String>,
	chain_id: u64,
	chain_name: String,
	is_local: bool,
}

fn build_cli() -> Command {
	Command::new("node-probe")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Detects the client technology behind an Ethereum provider URI.")
		.arg(
			Arg::new("provider-uri")
				.long("provider-uri")
				.help("Provider URI (http, ws, ipc, or infura://<project id>)")
				.value_name("URI"),
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to a JSON connection configuration")
				.value_name("FILE")
				.conflicts_with("provider-uri"),
		)
		.arg(
			Arg::new("sync")
				.long("sync")
				.help("Wait for the node to finish synchronizing")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("sync-timeout")
				.long("sync-timeout")
				.help("Seconds to wait for synchronization (default: 300)")
				.value_name("SECS")
				.value_parser(clap::value_parser!(u64)),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Log level used when RUST_LOG is unset (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
}

fn load_config(matches: &clap::ArgMatches) -> Result<ConnectionConfig> {
	let mut config = if let Some(path) = matches.get_one::<String>("config") {
		ConnectionConfig::load_from_path(Path::new(path))
			.with_context(|| format!("failed to load connection config {}", path))?
	} else if let Some(uri) = matches.get_one::<String>("provider-uri") {
		ConnectionConfig::new(uri.as_str())
	} else {
		let uri = var(PROVIDER_URI_ENV).map_err(|_| {
			anyhow!(
				"no provider given: pass --provider-uri, --config, or set {}",
				PROVIDER_URI_ENV
			)
		})?;
		ConnectionConfig::new(uri)
	};

	if matches.get_flag("sync") {
		config.sync_now = true;
	}
	if let Some(secs) = matches.get_one::<u64>("sync-timeout") {
		config.sync_timeout_ms = secs.saturating_mul(1000);
		config.sync_poll_interval_ms = config.sync_poll_interval_ms.min(config.sync_timeout_ms);
	}

	config.validate()?;
	Ok(config)
}

async fn probe(config: ConnectionConfig) -> Result<NodeSummary> {
	let mut interface = BlockchainInterface::new(config);
	let client = interface.connect().await?;

	Ok(NodeSummary {
		client: client.kind(),
		node_technology: client.node_technology().to_string(),
		node_version: client.node_version().map(str::to_string),
		platform: client.platform().map(str::to_string),
		backend: client.backend().map(str::to_string),
		chain_id: client.chain_id().await?,
		chain_name: client.chain_name().await?,
		is_local: client.is_local().await?,
	})
}

#[tokio::main]
async fn main() -> Result<()> {
	let matches = build_cli().get_matches();

	dotenv().ok();

	let level = matches
		.get_one::<String>("log-level")
		.map(String::as_str)
		.unwrap_or(DEFAULT_LOG_LEVEL);
	setup_logging_with_writer(std::io::stderr, level)
		.map_err(|e| anyhow!("failed to set up logging: {}", e))?;

	let config = load_config(&matches)?;
	info!(uri = %config.provider_uri, "probing node");

	match probe(config).await {
		Ok(summary) => {
			println!("{}", serde_json::to_string_pretty(&summary)?);
			Ok(())
		}
		Err(e) => {
			error!("probe failed: {:#}", e);
			Err(e)
		}
	}
}
