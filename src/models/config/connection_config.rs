use std::{collections::HashMap, path::Path};

use crate::models::{ConfigLoader, ConnectionConfig, ProviderUri};

use super::error::ConfigError;

pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 300_000;
pub const DEFAULT_SYNC_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

const DEFAULT_CONNECTIONS_DIR: &str = "config/connections";

impl ConfigLoader for ConnectionConfig {
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let connections_dir = path.unwrap_or(Path::new(DEFAULT_CONNECTIONS_DIR));
		let mut pairs = Vec::new();

		if !connections_dir.exists() {
			return Err(ConfigError::file_error(
				"connections directory not found",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					connections_dir.display().to_string(),
				)])),
			));
		}

		for entry in std::fs::read_dir(connections_dir)? {
			let entry = entry?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			match Self::load_from_path(&path) {
				Ok(config) => pairs.push((name, config)),
				Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping connection config"),
			}
		}

		Ok(T::from_iter(pairs))
	}

	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path)?;
		let config: ConnectionConfig = serde_json::from_reader(file)?;

		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		// The URI must classify into a known transport
		ProviderUri::parse(&self.provider_uri)?;

		if self.request_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"request_timeout_ms must be greater than 0",
				None,
				None,
			));
		}

		if self.sync_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"sync_timeout_ms must be greater than 0",
				None,
				None,
			));
		}

		if self.sync_poll_interval_ms == 0 || self.sync_poll_interval_ms > self.sync_timeout_ms {
			return Err(ConfigError::validation_error(
				"sync_poll_interval_ms must be between 1 and sync_timeout_ms",
				None,
				None,
			));
		}

		Ok(())
	}
}
