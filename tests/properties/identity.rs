use eth_client_dispatch::models::{ClientIdentity, UNKNOWN_TECHNOLOGY};
use proptest::{prelude::*, test_runner::Config};

use crate::properties::strategies::{
	four_segment_strategy, segment_strategy, technology_strategy,
};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_four_segments_recovered_verbatim(
		(technology, version, platform, backend, extra) in four_segment_strategy()
	) {
		let mut raw = format!("{}/{}/{}/{}", technology, version, platform, backend);
		for segment in &extra {
			raw.push('/');
			raw.push_str(segment);
		}

		let identity = ClientIdentity::parse(&raw);
		prop_assert_eq!(identity.node_technology(), technology.as_str());
		prop_assert_eq!(identity.node_version(), Some(version.as_str()));
		prop_assert_eq!(identity.platform(), Some(platform.as_str()));
		prop_assert_eq!(identity.backend(), Some(backend.as_str()));
	}

	#[test]
	fn test_three_segments_have_no_platform(
		technology in technology_strategy(),
		version in segment_strategy(),
		backend in segment_strategy(),
	) {
		let identity = ClientIdentity::parse(&format!("{}/{}/{}", technology, version, backend));
		prop_assert_eq!(identity.node_version(), Some(version.as_str()));
		prop_assert_eq!(identity.platform(), None);
		prop_assert_eq!(identity.backend(), Some(backend.as_str()));
	}

	#[test]
	fn test_parse_never_yields_empty_technology(raw in any::<String>()) {
		let identity = ClientIdentity::parse(&raw);
		prop_assert!(!identity.node_technology().is_empty());
		if raw.trim().split('/').next().unwrap_or_default().is_empty() {
			prop_assert!(identity.is_unknown());
			prop_assert_eq!(identity.node_version(), None);
			prop_assert_eq!(identity.backend(), None);
		}
	}

	#[test]
	fn test_blank_input_is_unknown(raw in "[ \t\r\n]{0,8}") {
		let identity = ClientIdentity::parse(&raw);
		prop_assert_eq!(identity.node_technology(), UNKNOWN_TECHNOLOGY);
		prop_assert_eq!(identity.platform(), None);
	}
}
