//! World domain — drop zones and their crate storage.
//!
//! A [`DropZone`] is a fixed world position that can host one supply
//! crate at a time. The resource implements the scheduler's
//! [`DropSiteProvider`] capability: the scheduler asks for "some free
//! site" and this module owns which one it gets (random among free).

use bevy::prelude::*;
use rand::seq::SliceRandom;

use crate::scheduler::env::{DropSite, DropSiteProvider, StoreError};
use crate::shared::*;

/// Max item stacks a single crate holds. Deliveries beyond this are
/// refused per stack (the scheduler logs and skips them).
pub const CRATE_CAPACITY: usize = 12;

#[derive(Debug, Clone)]
pub struct DropZone {
    pub id: u32,
    pub name: String,
    pub position: Vec2,
    pub occupied: bool,
    /// Contents of the crate currently at this zone. One delivered stack
    /// per slot; emptied when the zone is released.
    pub storage: Vec<ItemStack>,
}

impl DropZone {
    fn new(id: u32, name: &str, x: f32, y: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            position: Vec2::new(x, y),
            occupied: false,
            storage: Vec::new(),
        }
    }

    fn as_site(&self) -> DropSite {
        DropSite {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DropZones {
    pub zones: Vec<DropZone>,
}

impl DropZones {
    /// Seeds the hand-placed zone set. Called once during data loading.
    pub fn seed_default(&mut self) {
        self.zones = vec![
            DropZone::new(0, "the old watchtower", -220.0, 140.0),
            DropZone::new(1, "the river crossing", 60.0, -90.0),
            DropZone::new(2, "the quarry ledge", 310.0, 45.0),
            DropZone::new(3, "the orchard clearing", -40.0, 260.0),
            DropZone::new(4, "the ruined barn", 180.0, -210.0),
            DropZone::new(5, "the radio mast", -300.0, -60.0),
        ];
        info!("[Zones] Seeded {} drop zones", self.zones.len());
    }

    pub fn get(&self, id: u32) -> Option<&DropZone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut DropZone> {
        self.zones.iter_mut().find(|zone| zone.id == id)
    }
}

impl DropSiteProvider for DropZones {
    fn free_sites(&self) -> Vec<DropSite> {
        self.zones
            .iter()
            .filter(|zone| !zone.occupied)
            .map(DropZone::as_site)
            .collect()
    }

    fn claim_site(&mut self) -> Option<DropSite> {
        let free_ids: Vec<u32> = self
            .zones
            .iter()
            .filter(|zone| !zone.occupied)
            .map(|zone| zone.id)
            .collect();
        let &chosen = free_ids.choose(&mut rand::thread_rng())?;

        let zone = self.get_mut(chosen)?;
        zone.occupied = true;
        zone.storage.clear();
        Some(zone.as_site())
    }

    fn store(&mut self, site_id: u32, stack: ItemStack) -> Result<(), StoreError> {
        let Some(zone) = self.get_mut(site_id) else {
            return Err(StoreError::UnknownSite);
        };
        if zone.storage.len() >= CRATE_CAPACITY {
            return Err(StoreError::Full);
        }
        zone.storage.push(stack);
        Ok(())
    }

    fn release_site(&mut self, site_id: u32) {
        if let Some(zone) = self.get_mut(site_id) {
            zone.occupied = false;
            zone.storage.clear();
        }
    }
}

// ─── Plugin ───────────────────────────────────────────────────────────────────

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (log_crate_landings, recover_crates_on_sleep)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// World-side record of each landing, with the zone's position for
/// minimap/debugging consumers.
fn log_crate_landings(
    mut spawned_events: EventReader<DropSpawnedEvent>,
    zones: Res<DropZones>,
) {
    for event in spawned_events.read() {
        let position = zones
            .get(event.zone_id)
            .map(|zone| zone.position)
            .unwrap_or_default();
        info!(
            "[Zones] Tier {} crate ({}) landed at {} {:?}",
            event.tier,
            if event.manual { "requested" } else { "scheduled" },
            event.zone_name,
            position
        );
    }
}

/// Overnight pickup: every occupied zone is cleared when the player
/// sleeps, so superseded crates cannot permanently exhaust the world.
/// The scheduler clears its own active-drop reference separately.
fn recover_crates_on_sleep(
    mut sleep_events: EventReader<SleepStartEvent>,
    mut zones: ResMut<DropZones>,
) {
    if sleep_events.read().next().is_none() {
        return;
    }

    let mut recovered = 0;
    for zone in zones.zones.iter_mut() {
        if zone.occupied {
            zone.occupied = false;
            zone.storage.clear();
            recovered += 1;
        }
    }
    if recovered > 0 {
        info!("[Zones] Overnight pickup recovered {} crate(s)", recovered);
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
