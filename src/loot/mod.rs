//! Loot domain — tier tables, progression unlocking, and sampling policies.
//!
//! The [`TierCatalog`] is a read-only mapping from an integer tier to a
//! hand-curated, ordered list of item IDs, plus the policy mapping elapsed
//! weeks to the highest unlocked tier. It is built once during data loading
//! from a RON [`TierTable`] and never mutated afterwards.
//!
//! This module also owns the two fill-count policies and the
//! selection-with-replacement sampler shared by every drop-spawning path.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::*;

// ─── Fill-count policies ──────────────────────────────────────────────────────

/// Smallest number of item picks a crate ever receives.
pub const MIN_FILL: u32 = 2;
/// Largest number of item picks a crate ever receives.
pub const MAX_FILL: u32 = 5;

/// Fill count for the unconditional fresh-drop path: week-scaled,
/// deterministic, clamped to [MIN_FILL, MAX_FILL].
///
/// Week 0 and 1 both give 2 picks; from week 4 on the cap of 5 applies.
/// This policy is intentionally distinct from [`tiered_fill_count`] — the
/// fresh starter crate grows with progression while tiered drops stay in a
/// fixed random window.
pub fn fresh_fill_count(week: u32) -> u32 {
    (week + 1).clamp(MIN_FILL, MAX_FILL)
}

/// Fill count for the tiered automatic/manual path: uniform in
/// [MIN_FILL, MAX_FILL], independent of progression.
pub fn tiered_fill_count(rng: &mut impl Rng) -> u32 {
    rng.gen_range(MIN_FILL..=MAX_FILL)
}

// ─── Sampling ─────────────────────────────────────────────────────────────────

/// Picks `count` elements from `source` WITH replacement.
///
/// Every pick is an independent uniform draw, so the result may contain the
/// same element several times — in particular whenever `count` exceeds
/// `source.len()`. This is not distinct-sampling; crate fills rely on the
/// repeat semantics when a tier's item list is shorter than the fill count.
/// An empty `source` yields an empty result regardless of `count`.
pub fn pick_with_replacement<'a, T>(
    rng: &mut impl Rng,
    source: &'a [T],
    count: u32,
) -> Vec<&'a T> {
    if source.is_empty() {
        return Vec::new();
    }
    (0..count).filter_map(|_| source.choose(rng)).collect()
}

// ─── Tier table (configuration) ───────────────────────────────────────────────

/// One row of the unlock policy: weeks up to and including `max_week`
/// unlock at most `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierUnlock {
    pub max_week: u32,
    pub tier: u8,
}

/// Deserialized form of the tier configuration. Rows in `unlocks` must be
/// sorted by `max_week` ascending with non-decreasing tiers; weeks past the
/// last row unlock the catalog's highest tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTable {
    pub unlocks: Vec<TierUnlock>,
    pub tiers: BTreeMap<u8, Vec<ItemId>>,
}

// ─── Tier catalog ─────────────────────────────────────────────────────────────

/// Read-only tier → loot mapping plus the week → tier unlock policy.
#[derive(Resource, Debug, Clone, Default)]
pub struct TierCatalog {
    tiers: BTreeMap<u8, Vec<ItemId>>,
    unlocks: Vec<TierUnlock>,
}

impl TierCatalog {
    /// Builds the catalog from a parsed table. A non-monotonic unlock list
    /// is accepted but logged — the lookup still walks rows in order, so a
    /// malformed table degrades to its first matching row.
    pub fn from_table(table: TierTable) -> Self {
        let monotonic = table
            .unlocks
            .windows(2)
            .all(|w| w[0].max_week < w[1].max_week && w[0].tier <= w[1].tier);
        if !monotonic {
            warn!("[Loot] Tier unlock table is not monotonic; check the tier config");
        }
        for unlock in &table.unlocks {
            if !table.tiers.contains_key(&unlock.tier) {
                warn!(
                    "[Loot] Unlock row references unknown tier {} — no loot will resolve for it",
                    unlock.tier
                );
            }
        }
        Self {
            tiers: table.tiers,
            unlocks: table.unlocks,
        }
    }

    /// Parses a RON tier table and builds the catalog.
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<TierTable>(source).map(Self::from_table)
    }

    /// Membership test against the static tier set.
    pub fn is_valid_tier(&self, tier: u8) -> bool {
        self.tiers.contains_key(&tier)
    }

    /// All known tiers, ascending.
    pub fn tier_ids(&self) -> Vec<u8> {
        self.tiers.keys().copied().collect()
    }

    /// The best tier in the catalog (0 if the catalog is empty).
    pub fn highest_tier(&self) -> u8 {
        self.tiers.keys().next_back().copied().unwrap_or(0)
    }

    /// The item list for a known tier. An unknown tier yields an empty
    /// slice with a warning — never a hard error.
    pub fn loot_for(&self, tier: u8) -> &[ItemId] {
        match self.tiers.get(&tier) {
            Some(items) => items,
            None => {
                warn!("[Loot] Unknown tier {} requested — returning empty loot", tier);
                &[]
            }
        }
    }

    /// Highest tier unlocked at the given progression week.
    /// Pure and monotonic non-decreasing in `week`.
    pub fn unlocked_tier_for(&self, week: u32) -> u8 {
        for unlock in &self.unlocks {
            if week <= unlock.max_week {
                return unlock.tier;
            }
        }
        self.highest_tier()
    }

    /// Loot reachable this week — the item list of the currently unlocked
    /// tier. Used by flavor/announcement features.
    pub fn loot_for_week(&self, week: u32) -> &[ItemId] {
        self.loot_for(self.unlocked_tier_for(week))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_catalog() -> TierCatalog {
        TierCatalog::from_table(TierTable {
            unlocks: vec![
                TierUnlock { max_week: 1, tier: 1 },
                TierUnlock { max_week: 3, tier: 2 },
            ],
            tiers: BTreeMap::from([
                (1, vec!["rations".to_string(), "bandage".to_string()]),
                (2, vec!["medkit".to_string()]),
                (3, vec!["rifle".to_string()]),
            ]),
        })
    }

    #[test]
    fn test_unlocked_tier_reference_policy() {
        let catalog = reference_catalog();
        assert_eq!(catalog.unlocked_tier_for(0), 1);
        assert_eq!(catalog.unlocked_tier_for(1), 1);
        assert_eq!(catalog.unlocked_tier_for(2), 2);
        assert_eq!(catalog.unlocked_tier_for(3), 2);
        assert_eq!(catalog.unlocked_tier_for(4), 3);
        assert_eq!(catalog.unlocked_tier_for(100), 3);
    }

    #[test]
    fn test_unlocked_tier_monotonic_and_in_range() {
        let catalog = reference_catalog();
        let mut previous = 0u8;
        for week in 0..50 {
            let tier = catalog.unlocked_tier_for(week);
            assert!((1..=3).contains(&tier), "tier {} out of range", tier);
            assert!(tier >= previous, "unlock policy regressed at week {}", week);
            previous = tier;
        }
    }

    #[test]
    fn test_is_valid_tier() {
        let catalog = reference_catalog();
        assert!(catalog.is_valid_tier(1));
        assert!(catalog.is_valid_tier(3));
        assert!(!catalog.is_valid_tier(0));
        assert!(!catalog.is_valid_tier(5));
    }

    #[test]
    fn test_loot_for_unknown_tier_is_empty() {
        let catalog = reference_catalog();
        assert!(catalog.loot_for(5).is_empty());
        assert!(!catalog.loot_for(1).is_empty());
    }

    #[test]
    fn test_loot_for_week_follows_unlocks() {
        let catalog = reference_catalog();
        assert_eq!(catalog.loot_for_week(0), catalog.loot_for(1));
        assert_eq!(catalog.loot_for_week(2), catalog.loot_for(2));
        assert_eq!(catalog.loot_for_week(9), catalog.loot_for(3));
    }

    #[test]
    fn test_empty_catalog_unlocks_tier_zero() {
        let catalog = TierCatalog::default();
        assert_eq!(catalog.unlocked_tier_for(0), 0);
        assert!(catalog.tier_ids().is_empty());
    }

    #[test]
    fn test_fresh_fill_count_clamps() {
        assert_eq!(fresh_fill_count(0), 2);
        assert_eq!(fresh_fill_count(1), 2);
        assert_eq!(fresh_fill_count(2), 3);
        assert_eq!(fresh_fill_count(3), 4);
        assert_eq!(fresh_fill_count(4), 5);
        assert_eq!(fresh_fill_count(40), 5);
    }

    #[test]
    fn test_tiered_fill_count_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let count = tiered_fill_count(&mut rng);
            assert!((MIN_FILL..=MAX_FILL).contains(&count));
        }
    }

    #[test]
    fn test_pick_with_replacement_length_and_duplicates() {
        let mut rng = StdRng::seed_from_u64(42);
        let source = vec!["only_item"];
        // One-element source, five picks: duplicates are required.
        let picks = pick_with_replacement(&mut rng, &source, 5);
        assert_eq!(picks.len(), 5);
        assert!(picks.iter().all(|&&item| item == "only_item"));
    }

    #[test]
    fn test_pick_with_replacement_empty_source() {
        let mut rng = StdRng::seed_from_u64(42);
        let source: Vec<String> = Vec::new();
        assert!(pick_with_replacement(&mut rng, &source, 4).is_empty());
    }

    #[test]
    fn test_pick_with_replacement_zero_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let source = vec![1, 2, 3];
        assert!(pick_with_replacement(&mut rng, &source, 0).is_empty());
    }

    #[test]
    fn test_pick_with_replacement_draws_from_source() {
        let mut rng = StdRng::seed_from_u64(9);
        let source = vec![10, 20, 30];
        for &&pick in &pick_with_replacement(&mut rng, &source, 50) {
            assert!(source.contains(&pick));
        }
    }
}
