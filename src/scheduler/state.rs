//! The drop-scheduling state machine.
//!
//! Pure logic over the capability traits in [`super::env`]: no bevy system
//! parameters, no event readers, no global state. The plugin layer in
//! `scheduler/mod.rs` feeds time signals in; tests drive these methods
//! directly with fakes and a seeded RNG.
//!
//! Invariants held here:
//! - at most one active drop reference at any time
//! - at most one automatic drop per progression week
//! - the scheduled day-of-week is re-rolled exactly once per week signal
//! - per-item failures degrade a fill, they never abort a spawn

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::env::{DropDenied, DropSite, DropSiteProvider, ItemSource, Notifier};
use crate::loot::{fresh_fill_count, pick_with_replacement, tiered_fill_count, TierCatalog};
use crate::shared::DAYS_PER_WEEK;

/// The one drop currently placed in the world, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrop {
    pub site_id: u32,
    pub tier: u8,
    pub manual: bool,
}

/// Outcome record of a successful spawn, handed back so the plugin layer
/// can emit a `DropSpawnedEvent`. Never persisted.
#[derive(Debug, Clone)]
pub struct SpawnedDrop {
    pub site: DropSite,
    pub tier: u8,
    pub manual: bool,
}

/// Scheduling state for supply drops. Owned exclusively by the scheduler
/// plugin; no other module mutates it.
#[derive(Resource, Debug, Default)]
pub struct DropScheduler {
    /// One-time setup guard. `initialize` is a no-op once this is set.
    pub initialized: bool,
    /// `Some` while a crate is placed and not yet invalidated by sleep.
    pub active_drop: Option<ActiveDrop>,
    /// Week of the most recent successful automatic drop. `None` until the
    /// first one fires.
    pub last_auto_drop_week: Option<u32>,
    /// Day-of-week (0..=6) on which this week's automatic drop may fire.
    /// `None` until the first week signal rolls it.
    pub scheduled_day_of_week: Option<u8>,
}

impl DropScheduler {
    /// One-time setup: spawns the fresh starter crate. The starter uses
    /// the week-scaled fill policy and the currently unlocked tier — this
    /// is the unconditional fresh-drop call site, distinct from the tiered
    /// scheduled path. Idempotent; repeat calls do nothing.
    pub fn initialize(
        &mut self,
        week: u32,
        catalog: &TierCatalog,
        items: &impl ItemSource,
        sites: &mut impl DropSiteProvider,
        notifier: &mut impl Notifier,
        rng: &mut impl Rng,
    ) -> Option<SpawnedDrop> {
        if self.initialized {
            return None;
        }
        self.initialized = true;

        let tier = catalog.unlocked_tier_for(week);
        let count = fresh_fill_count(week);
        match self.spawn_drop(tier, count, false, catalog, items, sites, notifier, rng) {
            Ok(spawned) => {
                info!(
                    "[Scheduler] Starter drop placed at {} (tier {}, {} picks)",
                    spawned.site.name, spawned.tier, count
                );
                Some(spawned)
            }
            Err(reason) => {
                info!("[Scheduler] Starter drop skipped: {:?}", reason);
                None
            }
        }
    }

    /// Week signal: re-roll the scheduled drop day uniformly from {0..6}.
    /// Nothing else changes.
    pub fn on_week_pass(&mut self, rng: &mut impl Rng) {
        let day = rng.gen_range(0..DAYS_PER_WEEK as u8);
        self.scheduled_day_of_week = Some(day);
        info!("[Scheduler] New week — automatic drop scheduled for day {}", day);
    }

    /// Day signal: fire this week's automatic drop if today is the
    /// scheduled day and this week has not fired yet. The tier is rolled
    /// uniformly over the catalog's tier set; the fill count comes from
    /// the fixed tiered window.
    pub fn on_day_pass(
        &mut self,
        elapsed_days: u32,
        catalog: &TierCatalog,
        items: &impl ItemSource,
        sites: &mut impl DropSiteProvider,
        notifier: &mut impl Notifier,
        rng: &mut impl Rng,
    ) -> Option<SpawnedDrop> {
        let week = elapsed_days / DAYS_PER_WEEK;
        let today = (elapsed_days % DAYS_PER_WEEK) as u8;

        if self.last_auto_drop_week == Some(week) {
            return None;
        }
        let scheduled = self.scheduled_day_of_week?;
        if today != scheduled {
            return None;
        }

        let Some(&tier) = catalog.tier_ids().choose(rng) else {
            warn!("[Scheduler] Tier catalog is empty — cannot roll an automatic drop");
            return None;
        };
        let count = tiered_fill_count(rng);

        match self.spawn_drop(tier, count, false, catalog, items, sites, notifier, rng) {
            Ok(spawned) => {
                self.last_auto_drop_week = Some(week);
                info!(
                    "[Scheduler] Automatic drop fired for week {} at {} (tier {})",
                    week, spawned.site.name, spawned.tier
                );
                Some(spawned)
            }
            Err(reason) => {
                // Week is NOT marked as fired; a later day may still succeed.
                info!("[Scheduler] Automatic drop failed: {:?}", reason);
                None
            }
        }
    }

    /// Sleep signal: unconditionally clear the active-drop reference and
    /// free its site. No-op when idle.
    pub fn on_sleep_start(&mut self, sites: &mut impl DropSiteProvider) {
        if let Some(drop) = self.active_drop.take() {
            sites.release_site(drop.site_id);
            info!("[Scheduler] Sleep — active drop at site {} cleared", drop.site_id);
        }
    }

    /// Player-triggered drop request. Rejected for unknown tiers (the
    /// catalog's loot list is never consulted) and for tiers above the
    /// current week's unlock. No notifier call is made on any failure;
    /// the plugin layer owns player-facing denial text.
    #[allow(clippy::too_many_arguments)]
    pub fn request_manual_drop(
        &mut self,
        tier: u8,
        week: u32,
        catalog: &TierCatalog,
        items: &impl ItemSource,
        sites: &mut impl DropSiteProvider,
        notifier: &mut impl Notifier,
        rng: &mut impl Rng,
    ) -> Result<SpawnedDrop, DropDenied> {
        if !catalog.is_valid_tier(tier) {
            warn!("[Scheduler] Manual request for unknown tier {}", tier);
            return Err(DropDenied::UnknownTier);
        }
        if tier > catalog.unlocked_tier_for(week) {
            info!(
                "[Scheduler] Manual request for tier {} denied — not unlocked at week {}",
                tier, week
            );
            return Err(DropDenied::NotUnlocked);
        }

        let count = tiered_fill_count(rng);
        self.spawn_drop(tier, count, true, catalog, items, sites, notifier, rng)
    }

    /// Attempts to place one crate: claim a site, fill it with `count`
    /// picks from the tier's loot list (with replacement), announce it.
    ///
    /// Failing to claim a site aborts with no state change and no partial
    /// effects. Once a site is claimed, per-item failures (unresolvable
    /// id, instantiation failure, storage refusal) are logged and skipped;
    /// the spawn still succeeds, possibly with an empty crate.
    #[allow(clippy::too_many_arguments)]
    fn spawn_drop(
        &mut self,
        tier: u8,
        count: u32,
        manual: bool,
        catalog: &TierCatalog,
        items: &impl ItemSource,
        sites: &mut impl DropSiteProvider,
        notifier: &mut impl Notifier,
        rng: &mut impl Rng,
    ) -> Result<SpawnedDrop, DropDenied> {
        if !catalog.is_valid_tier(tier) {
            warn!("[Scheduler] Refusing to spawn unknown tier {}", tier);
            return Err(DropDenied::UnknownTier);
        }

        if sites.free_sites().is_empty() {
            info!("[Scheduler] No free drop sites — spawn aborted");
            return Err(DropDenied::NoFreeSites);
        }
        let Some(site) = sites.claim_site() else {
            // Provider declined despite reporting free sites.
            info!("[Scheduler] Site provider declined the claim — spawn aborted");
            return Err(DropDenied::NoFreeSites);
        };

        let loot = catalog.loot_for(tier);
        if loot.is_empty() {
            warn!("[Scheduler] Tier {} has no resolvable loot — crate will be empty", tier);
        }

        for item_id in pick_with_replacement(rng, loot, count) {
            let Some(def) = items.resolve(item_id) else {
                warn!("[Scheduler] Item '{}' missing from registry — skipped", item_id);
                continue;
            };
            let quantity = if def.stack_size > 1 {
                rng.gen_range(1..=def.stack_size)
            } else {
                1
            };
            let Some(stack) = items.create(&def, quantity) else {
                warn!("[Scheduler] Could not instantiate '{}' ×{} — skipped", def.id, quantity);
                continue;
            };
            if let Err(err) = sites.store(site.id, stack) {
                warn!(
                    "[Scheduler] Crate at {} refused '{}': {:?} — skipped",
                    site.name, def.id, err
                );
            }
        }

        if let Some(previous) = self.active_drop.replace(ActiveDrop {
            site_id: site.id,
            tier,
            manual,
        }) {
            info!(
                "[Scheduler] Previous drop at site {} superseded",
                previous.site_id
            );
        }

        notifier.send_message(&format!(
            "Supply crate down at {}! Tier {} goods inside.",
            site.name, tier
        ));

        Ok(SpawnedDrop { site, tier, manual })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
