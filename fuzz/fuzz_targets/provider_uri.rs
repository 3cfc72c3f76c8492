#![no_main]

use eth_client_dispatch::models::{ProviderUri, TransportKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	if let Ok(raw) = std::str::from_utf8(data) {
		if let Ok(uri) = ProviderUri::parse(raw) {
			assert!(!uri.endpoint().is_empty());
			if uri.is_gateway() {
				assert_ne!(uri.kind(), TransportKind::Ipc);
			}
		}
	}
});
