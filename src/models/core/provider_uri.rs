//! Connection URI classification.
//!
//! The scheme of the provider URI selects the transport class and decides whether
//! the endpoint is a hosted gateway. Gateway detection lives here rather than in the
//! version string because a gateway reports the version of the node it proxies to.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, path::Path, str::FromStr};
use url::Url;

use crate::models::ConfigError;

/// Scheme used for hosted gateway URIs of the form `infura://[network/]project_id`
pub const INFURA_SCHEME: &str = "infura";

/// Network used for `infura://project_id` URIs
pub const INFURA_DEFAULT_NETWORK: &str = "mainnet";

const INFURA_DOMAIN: &str = "infura.io";

/// Transport class selected by the URI scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportKind {
	Http,
	WebSocket,
	Ipc,
}

impl fmt::Display for TransportKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Http => write!(f, "http"),
			Self::WebSocket => write!(f, "websocket"),
			Self::Ipc => write!(f, "ipc"),
		}
	}
}

/// A classified provider URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUri {
	/// URI as supplied by the caller
	raw: String,
	/// Address the transport connects to (URL or socket path)
	endpoint: String,
	kind: TransportKind,
	gateway: bool,
}

impl ProviderUri {
	/// Classifies a raw provider URI
	///
	/// # Errors
	/// Returns a validation error naming the URI when it is empty, malformed, uses an
	/// unsupported scheme, or is a gateway URI without a project id.
	pub fn parse(raw: &str) -> Result<Self, ConfigError> {
		let trimmed = raw.trim();
		if trimmed.is_empty() {
			return Err(invalid_uri(raw, "provider URI is empty", None));
		}

		// Bare socket paths such as `/tmp/geth.ipc`
		if !trimmed.contains("://") {
			if trimmed.ends_with(".ipc") || Path::new(trimmed).is_absolute() {
				return Ok(Self {
					raw: raw.to_string(),
					endpoint: trimmed.to_string(),
					kind: TransportKind::Ipc,
					gateway: false,
				});
			}
			return Err(invalid_uri(raw, "provider URI has no scheme", None));
		}

		let url = Url::parse(trimmed)
			.map_err(|e| invalid_uri(raw, "malformed provider URI", Some(Box::new(e))))?;

		match url.scheme() {
			"http" | "https" => Ok(Self::network(raw, &url, TransportKind::Http)),
			"ws" | "wss" => Ok(Self::network(raw, &url, TransportKind::WebSocket)),
			"file" | "ipc" => Self::ipc(raw, &url),
			INFURA_SCHEME => Self::infura(raw, &url),
			other => Err(invalid_uri(
				raw,
				format!("unsupported provider scheme '{}'", other),
				None,
			)),
		}
	}

	fn network(raw: &str, url: &Url, kind: TransportKind) -> Self {
		let gateway = url
			.host_str()
			.map(|host| host == INFURA_DOMAIN || host.ends_with(&format!(".{}", INFURA_DOMAIN)))
			.unwrap_or(false);

		Self {
			raw: raw.to_string(),
			endpoint: url.to_string(),
			kind,
			gateway,
		}
	}

	fn ipc(raw: &str, url: &Url) -> Result<Self, ConfigError> {
		// `ipc://relative.ipc` puts the name in the host position
		let path = match (url.host_str(), url.path()) {
			(Some(host), path) if !host.is_empty() => format!("{}{}", host, path),
			(_, path) => path.to_string(),
		};
		if path.is_empty() || path == "/" {
			return Err(invalid_uri(raw, "IPC URI has no socket path", None));
		}

		Ok(Self {
			raw: raw.to_string(),
			endpoint: path,
			kind: TransportKind::Ipc,
			gateway: false,
		})
	}

	fn infura(raw: &str, url: &Url) -> Result<Self, ConfigError> {
		let host = url.host_str().unwrap_or_default();
		let path = url.path().trim_matches('/');

		let (network, project_id) = if path.is_empty() {
			(INFURA_DEFAULT_NETWORK, host)
		} else {
			(host, path)
		};

		if network.is_empty() || project_id.is_empty() || project_id.contains('/') {
			return Err(invalid_uri(raw, "gateway URI requires a project id", None));
		}

		Ok(Self {
			raw: raw.to_string(),
			endpoint: format!("https://{}.{}/v3/{}", network, INFURA_DOMAIN, project_id),
			kind: TransportKind::Http,
			gateway: true,
		})
	}

	/// URI exactly as supplied
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Address handed to the transport
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn kind(&self) -> TransportKind {
		self.kind
	}

	/// Whether the URI points at a hosted gateway
	pub fn is_gateway(&self) -> bool {
		self.gateway
	}
}

impl FromStr for ProviderUri {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for ProviderUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.raw)
	}
}

fn invalid_uri(
	raw: &str,
	message: impl Into<String>,
	source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
) -> ConfigError {
	ConfigError::validation_error(
		message,
		source,
		Some(HashMap::from([("uri".to_string(), raw.to_string())])),
	)
}
