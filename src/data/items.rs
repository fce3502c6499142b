//! Hand-curated item definitions for everything the courier can drop.

use crate::shared::*;

pub fn populate_items(registry: &mut ItemRegistry) {
    let defs = [
        // Tier 1 — basics
        ("rations", "Field Rations", ItemCategory::Ration, 10),
        ("water_jug", "Water Jug", ItemCategory::Ration, 6),
        ("bandage", "Bandage Roll", ItemCategory::Medical, 8),
        ("flare", "Signal Flare", ItemCategory::Tool, 4),
        ("scrap_metal", "Scrap Metal", ItemCategory::Material, 20),
        ("rope", "Coil of Rope", ItemCategory::Material, 5),
        // Tier 2 — mid supplies
        ("medkit", "Medkit", ItemCategory::Medical, 3),
        ("pistol_ammo", "Pistol Ammo Box", ItemCategory::Ammo, 12),
        ("canned_stew", "Canned Stew", ItemCategory::Ration, 8),
        ("toolkit", "Repair Toolkit", ItemCategory::Tool, 1),
        ("battery_pack", "Battery Pack", ItemCategory::Material, 6),
        // Tier 3 — prizes
        ("rifle", "Scout Rifle", ItemCategory::Rare, 1),
        ("rifle_ammo", "Rifle Ammo Box", ItemCategory::Ammo, 10),
        ("armor_vest", "Armor Vest", ItemCategory::Rare, 1),
        ("field_radio", "Field Radio", ItemCategory::Rare, 1),
        ("gold_ingot", "Gold Ingot", ItemCategory::Rare, 4),
    ];

    for (id, name, category, stack_size) in defs {
        registry.insert(ItemDef {
            id: id.to_string(),
            name: name.to_string(),
            category,
            stack_size,
        });
    }
}
