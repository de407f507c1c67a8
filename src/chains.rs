//! Chain identifier normalization.
//!
//! The feed keys records by a raw `origin_key` (e.g. "optimism"); the
//! dashboard shows canonical display names (e.g. "OP Mainnet"). The mapping
//! is a fixed table; ids outside the table pass through unchanged, and the
//! store flags them so new chains showing up in the feed get noticed.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::models::MetricSample;

/// Raw origin key to canonical display name.
///
/// Display names never collide with raw keys, which is what makes
/// [`normalize`] idempotent.
static DISPLAY_NAMES: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    m.insert("optimism", "OP Mainnet");
    m.insert("arbitrum", "Arbitrum");
    m.insert("zksync_era", "zkSync Era");
    m.insert("base", "Base");
    m.insert("zora", "Zora");
    m.insert("starknet", "Starknet");
    m.insert("linea", "Linea");
    m
});

/// Canonical display name for an origin key; unmapped keys come back as-is.
pub fn display_name(origin_key: &str) -> &str {
    DISPLAY_NAMES
        .get(origin_key)
        .copied()
        .unwrap_or(origin_key)
}

/// Whether the id is covered by the fixed table (either side of it).
pub fn is_known(id: &str) -> bool {
    DISPLAY_NAMES.contains_key(id) || DISPLAY_NAMES.values().any(|name| *name == id)
}

/// Rewrite a sample's chain id to its canonical display name.
///
/// Total and idempotent: unmapped ids pass through, and a display name is
/// never itself a key in the table.
pub fn normalize(mut sample: MetricSample) -> MetricSample {
    sample.chain = display_name(&sample.chain).to_string();
    sample
}
