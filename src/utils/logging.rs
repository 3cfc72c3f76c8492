//! Logging setup for the node probe and library consumers.
//!
//! Diagnostics are emitted through `tracing`. The binary installs a
//! `tracing_subscriber` registry filtered by `RUST_LOG` (defaulting to the level
//! given by the caller) with a compact formatter.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs the global subscriber writing to stdout
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	setup_logging_with_writer(std::io::stdout, DEFAULT_LOG_LEVEL)
}

/// Installs the global subscriber with a custom writer and fallback level
///
/// # Arguments
/// * `writer` - Destination for formatted records
/// * `default_level` - Filter directive used when `RUST_LOG` is not set or invalid
///
/// # Errors
/// Fails if a global subscriber has already been installed.
pub fn setup_logging_with_writer<W>(
	writer: W,
	default_level: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(false)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
