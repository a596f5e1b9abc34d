// Unmatched-row reporting: deduplicates linkage failures for manual review.

use std::collections::HashSet;

use crate::matching::normalize::{normalize, AliasTable};
use crate::rankings::RankedPlayer;

/// Deduplicate unmatched rows by normalized name key, first occurrence
/// wins, and return them for display.
///
/// Dedup is by name only, not (name, section): the same unknown identity
/// appearing in several ranking sections is reported once. Does not mutate
/// the input and never retries linkage.
pub fn report(unmatched: &[RankedPlayer], aliases: &AliasTable) -> Vec<RankedPlayer> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in unmatched {
        let key = aliases.apply(normalize(&row.display_name));
        if seen.insert(key) {
            out.push(row.clone());
        }
    }
    out
}
