use proptest::prelude::*;

const MAX_EXTRA_SEGMENTS: usize = 4;

/// Technology names, possibly with inner spaces like `EthereumJS TestRPC`
pub fn technology_strategy() -> impl Strategy<Value = String> {
	"[A-Za-z]([A-Za-z0-9 -]{0,14}[A-Za-z0-9])?".prop_map(|s| s.to_string())
}

/// Version, platform or backend segments, including build metadata
pub fn segment_strategy() -> impl Strategy<Value = String> {
	"[A-Za-z0-9][A-Za-z0-9._+-]{0,20}".prop_map(|s| s.to_string())
}

pub fn four_segment_strategy() -> impl Strategy<Value = (String, String, String, String, Vec<String>)> {
	(
		technology_strategy(),
		segment_strategy(),
		segment_strategy(),
		segment_strategy(),
		prop::collection::vec(segment_strategy(), 0..MAX_EXTRA_SEGMENTS),
	)
}

pub fn project_id_strategy() -> impl Strategy<Value = String> {
	"[a-f0-9]{8,32}".prop_map(|s| s.to_string())
}
