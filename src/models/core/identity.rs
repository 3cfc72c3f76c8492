//! Node identity parsed from the `web3_clientVersion` string.
//!
//! Version strings follow the loose shape `Technology/vVersion-buildhash/platform/backend`
//! with any trailing segment possibly absent. Parsing never fails: missing pieces
//! resolve to `None` and an empty identifier resolves to [`UNKNOWN_TECHNOLOGY`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Technology name used when the version string carries none
pub const UNKNOWN_TECHNOLOGY: &str = "Unknown";

/// Structured fields of a node's client version string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
	node_technology: String,
	node_version: Option<String>,
	platform: Option<String>,
	backend: Option<String>,
}

impl ClientIdentity {
	/// Parses a raw client version string
	///
	/// Segment assignment:
	/// * 1 segment: technology
	/// * 2 segments: technology, version
	/// * 3 segments: technology, version, backend (no platform reported)
	/// * 4 or more: technology, version, platform, backend; the rest is ignored
	///
	/// Segments are kept verbatim, including build metadata.
	pub fn parse(raw: &str) -> Self {
		let raw = raw.trim();
		let segments: Vec<&str> = raw.split('/').collect();

		let technology = segments.first().copied().unwrap_or_default();
		if technology.is_empty() {
			return Self::unknown();
		}

		let owned = |index: usize| segments.get(index).map(|s| s.to_string());
		let (platform, backend) = match segments.len() {
			0..=2 => (None, None),
			3 => (None, owned(2)),
			_ => (owned(2), owned(3)),
		};

		Self {
			node_technology: technology.to_string(),
			node_version: owned(1),
			platform,
			backend,
		}
	}

	/// Identity with every field unknown
	pub fn unknown() -> Self {
		Self {
			node_technology: UNKNOWN_TECHNOLOGY.to_string(),
			node_version: None,
			platform: None,
			backend: None,
		}
	}

	pub fn node_technology(&self) -> &str {
		&self.node_technology
	}

	pub fn node_version(&self) -> Option<&str> {
		self.node_version.as_deref()
	}

	pub fn platform(&self) -> Option<&str> {
		self.platform.as_deref()
	}

	pub fn backend(&self) -> Option<&str> {
		self.backend.as_deref()
	}

	pub fn is_unknown(&self) -> bool {
		self.node_technology == UNKNOWN_TECHNOLOGY
	}
}

impl Default for ClientIdentity {
	fn default() -> Self {
		Self::unknown()
	}
}

impl From<&str> for ClientIdentity {
	fn from(raw: &str) -> Self {
		Self::parse(raw)
	}
}

impl fmt::Display for ClientIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.node_technology)?;
		for segment in [&self.node_version, &self.platform, &self.backend]
			.into_iter()
			.flatten()
		{
			write!(f, "/{}", segment)?;
		}
		Ok(())
	}
}
