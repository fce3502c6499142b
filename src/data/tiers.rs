//! Tier tables and unlock thresholds.
//!
//! Kept as an embedded RON document so the thresholds and item lists are a
//! data configuration point rather than code. Weeks past the last unlock
//! row fall through to the catalog's highest tier.

/// Reference policy: weeks 0-1 unlock tier 1, weeks 2-3 tier 2,
/// everything later tier 3.
pub const TIER_TABLE_RON: &str = r#"(
    unlocks: [
        (max_week: 1, tier: 1),
        (max_week: 3, tier: 2),
    ],
    tiers: {
        1: ["rations", "water_jug", "bandage", "flare", "scrap_metal", "rope"],
        2: ["medkit", "pistol_ammo", "canned_stew", "toolkit", "battery_pack"],
        3: ["rifle", "rifle_ammo", "armor_vest", "field_radio", "gold_ingot"],
    },
)"#;
