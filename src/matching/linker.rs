// Record linkage: joins the ranked-player table against the canonical
// player directory by normalized name key.
//
// Two passes: strict on (key, position, team), then relaxed on
// (key, position) for players whose team changed between the ranking
// source and the directory snapshot. Pure transformation; never fails on
// empty or malformed input tables.

use std::collections::{HashMap, HashSet};

use crate::matching::normalize::{normalize, AliasTable, NormalizedKey};
use crate::player::{CanonicalPlayer, Position};
use crate::rankings::RankedPlayer;

/// A ranked player joined against the directory.
#[derive(Debug, Clone)]
pub struct LinkedPlayer {
    pub ranked: RankedPlayer,
    /// Directory id this row resolved to. Unset when linkage failed.
    pub canonical_id: Option<String>,
    /// Whether the canonical id appears in the drafted-ID set. Set after
    /// linkage by [`mark_drafted`].
    pub drafted: bool,
}

/// Result of a linkage run.
///
/// `linked` is the display set: matched rows, order-preserving within each
/// source list, deduplicated by canonical id. `unmatched` holds every row
/// that failed both passes. `dropped` holds rows removed from the display
/// set by deduplication, retained for the debug view.
#[derive(Debug, Clone, Default)]
pub struct LinkOutcome {
    pub linked: Vec<LinkedPlayer>,
    pub unmatched: Vec<RankedPlayer>,
    pub dropped: Vec<LinkedPlayer>,
}

/// Strict-pass lookup key: (name key, position, team). Team defaults to
/// the empty string when absent on the ranked side.
type StrictKey = (NormalizedKey, Option<Position>, String);

/// Relaxed-pass lookup key: (name key, position).
type RelaxedKey = (NormalizedKey, Option<Position>);

/// Join `ranked` against `canonical` using the normalized name key plus
/// position/team tiebreakers.
///
/// Ambiguity policy: when several canonical players share a lookup key in
/// either pass, the one with the smallest id wins. This is an explicit
/// tie-break so linkage cannot vary with directory iteration order.
pub fn link(
    ranked: &[RankedPlayer],
    canonical: &[CanonicalPlayer],
    aliases: &AliasTable,
) -> LinkOutcome {
    let mut strict: HashMap<StrictKey, &CanonicalPlayer> = HashMap::new();
    let mut relaxed: HashMap<RelaxedKey, &CanonicalPlayer> = HashMap::new();

    for player in canonical {
        let key = aliases.apply(normalize(&player.display_name));
        if key.is_empty() {
            continue;
        }
        // A directory entry missing position or team is ineligible for the
        // strict pass; it can still match on the relaxed pass.
        if let (Some(pos), Some(team)) = (player.position, player.team.as_deref()) {
            insert_preferring_smaller_id(
                &mut strict,
                (key.clone(), Some(pos), team.to_uppercase()),
                player,
            );
        }
        insert_preferring_smaller_id(&mut relaxed, (key, player.position), player);
    }

    let mut matched: Vec<LinkedPlayer> = Vec::with_capacity(ranked.len());
    let mut unmatched: Vec<RankedPlayer> = Vec::new();

    for row in ranked {
        let key = aliases.apply(normalize(&row.display_name));
        let team = row
            .team
            .as_deref()
            .map(|t| t.to_uppercase())
            .unwrap_or_default();

        let hit = strict
            .get(&(key.clone(), row.position, team))
            .or_else(|| relaxed.get(&(key, row.position)));

        match hit {
            Some(player) => matched.push(LinkedPlayer {
                ranked: row.clone(),
                canonical_id: Some(player.id.clone()),
                drafted: false,
            }),
            None => unmatched.push(row.clone()),
        }
    }

    let (linked, dropped) = dedup_by_canonical_id(matched);

    LinkOutcome {
        linked,
        unmatched,
        dropped,
    }
}

/// Set the `drafted` flag on every linked row whose canonical id appears
/// in the drafted-ID set. Returns the number of rows marked.
pub fn mark_drafted(linked: &mut [LinkedPlayer], drafted_ids: &HashSet<String>) -> usize {
    let mut marked = 0;
    for row in linked.iter_mut() {
        row.drafted = row
            .canonical_id
            .as_deref()
            .is_some_and(|id| drafted_ids.contains(id));
        if row.drafted {
            marked += 1;
        }
    }
    marked
}

fn insert_preferring_smaller_id<'a, K: std::hash::Hash + Eq>(
    index: &mut HashMap<K, &'a CanonicalPlayer>,
    key: K,
    player: &'a CanonicalPlayer,
) {
    index
        .entry(key)
        .and_modify(|existing| {
            if player.id < existing.id {
                *existing = player;
            }
        })
        .or_insert(player);
}

/// Keep one row per (source list, canonical id): the lowest rank wins,
/// ties broken by input order. Rows removed from the display set are
/// returned separately in their original order.
fn dedup_by_canonical_id(matched: Vec<LinkedPlayer>) -> (Vec<LinkedPlayer>, Vec<LinkedPlayer>) {
    // (source_list, canonical_id) -> index into `matched` of the best row.
    let mut best: HashMap<(String, String), usize> = HashMap::new();

    for (idx, row) in matched.iter().enumerate() {
        let Some(id) = row.canonical_id.clone() else {
            continue;
        };
        let slot = (row.ranked.source_list.clone(), id);
        match best.get(&slot) {
            Some(&winner) if rank_of(&matched[winner]) <= rank_of(row) => {
                // Existing winner has a lower (or equal, earlier) rank.
            }
            _ => {
                best.insert(slot, idx);
            }
        }
    }

    let mut linked = Vec::with_capacity(best.len());
    let mut dropped = Vec::new();
    for (idx, row) in matched.into_iter().enumerate() {
        let keep = row
            .canonical_id
            .as_ref()
            .map(|id| best.get(&(row.ranked.source_list.clone(), id.clone())) == Some(&idx))
            .unwrap_or(true);
        if keep {
            linked.push(row);
        } else {
            dropped.push(row);
        }
    }
    (linked, dropped)
}

/// Rank used for dedup comparisons; missing ranks sort last.
fn rank_of(row: &LinkedPlayer) -> u32 {
    row.ranked.rank.unwrap_or(u32::MAX)
}
