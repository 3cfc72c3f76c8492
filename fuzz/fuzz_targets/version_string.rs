#![no_main]

use eth_client_dispatch::models::ClientIdentity;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	if let Ok(raw) = std::str::from_utf8(data) {
		let identity = ClientIdentity::parse(raw);
		assert!(!identity.node_technology().is_empty());
		if identity.platform().is_some() {
			assert!(identity.backend().is_some());
		}
	}
});
