//! Data layer — populates all registries at mod startup.
//!
//! Runs in OnEnter(GameState::Loading): fills the item registry, builds
//! the tier catalog from the embedded RON table, seeds the drop zones,
//! then transitions into Playing. No other domain seeds these resources.

mod items;
pub mod tiers;

use bevy::prelude::*;

use crate::loot::TierCatalog;
use crate::scheduler::env::ItemSource;
use crate::shared::*;
use crate::world::DropZones;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// Playing. Item definitions land first so the tier table can be checked
/// against them.
fn load_all_data(
    mut item_registry: ResMut<ItemRegistry>,
    mut catalog: ResMut<TierCatalog>,
    mut zones: ResMut<DropZones>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Populating registries…");

    items::populate_items(&mut item_registry);
    info!("  Items loaded: {}", item_registry.items.len());

    match TierCatalog::from_ron(tiers::TIER_TABLE_RON) {
        Ok(parsed) => {
            *catalog = parsed;
            info!("  Tiers loaded: {:?}", catalog.tier_ids());
        }
        Err(err) => {
            // Unusable table degrades to an empty catalog: every request
            // will be refused as an unknown tier, but nothing crashes.
            warn!("[Data] Tier table failed to parse: {} — catalog left empty", err);
        }
    }

    // Every tier item should resolve to a definition; a miss here means a
    // typo in the tier table and shows up later as a degraded crate fill.
    for tier in catalog.tier_ids() {
        for item_id in catalog.loot_for(tier) {
            if item_registry.get(item_id).is_none() {
                warn!("[Data] Tier {} lists unknown item '{}'", tier, item_id);
            }
        }
    }

    zones.seed_default();

    info!("[Data] All registries populated. Entering Playing.");
    next_state.set(GameState::Playing);
}

// ─── ItemSource capability ────────────────────────────────────────────────────

/// The item registry is the mod's `ItemSource`: lookups may miss and
/// instantiation may fail per item; callers log and skip.
impl ItemSource for ItemRegistry {
    fn resolve(&self, id: &str) -> Option<ItemDef> {
        self.get(id).cloned()
    }

    fn create(&self, def: &ItemDef, quantity: u8) -> Option<ItemStack> {
        if quantity == 0 || quantity > def.stack_size {
            return None;
        }
        Some(ItemStack {
            item_id: def.id.clone(),
            quantity,
        })
    }
}
