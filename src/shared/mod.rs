//! Shared resources, events, and states for Cratefall.
//!
//! This is the type contract. Every domain module imports from here.
//! No domain imports from any other domain directly, with one deliberate
//! exception: the scheduler publishes its capability traits in
//! `scheduler::env`, and the world/npc/data adapters implement them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// GAME CLOCK
// ═══════════════════════════════════════════════════════════════════════

/// Days per in-game week. Day-of-week values are 0..=6.
pub const DAYS_PER_WEEK: u32 = 7;

/// Hour at which a day starts after rollover (6:00 AM).
pub const DAY_START_HOUR: u8 = 6;

/// Hour at which the day is forced to end (26 = 2:00 AM next day).
pub const DAY_END_HOUR: u8 = 26;

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    /// Total in-game days elapsed since the mod started. Day 0 is the
    /// first day; week N covers days 7N..7N+6.
    pub elapsed_days: u32,
    pub hour: u8,        // 6-26 (26 = 2:00 AM next day)
    pub minute: u8,      // 0-59
    pub time_scale: f32, // game-minutes per real-second
    pub time_paused: bool,
    pub elapsed_real_seconds: f32, // accumulator for sub-minute ticks
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            elapsed_days: 0,
            hour: DAY_START_HOUR,
            minute: 0,
            time_scale: 10.0,
            time_paused: false,
            elapsed_real_seconds: 0.0,
        }
    }
}

impl GameClock {
    /// Current progression week: `elapsed_days / 7`.
    pub fn week(&self) -> u32 {
        self.elapsed_days / DAYS_PER_WEEK
    }

    /// Day within the current week, 0..=6.
    pub fn day_of_week(&self) -> u8 {
        (self.elapsed_days % DAYS_PER_WEEK) as u8
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type the mod can drop.
/// String IDs for data-driven flexibility.
pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Ration,
    Medical,
    Ammo,
    Tool,
    Material,
    Rare,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    /// Max quantity per stack. 1 for tools and uniques.
    pub stack_size: u8,
}

/// An instantiated pile of one item, ready to be placed in crate storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: ItemId,
    pub quantity: u8,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemId, ItemDef>,
}

impl ItemRegistry {
    pub fn insert(&mut self, def: ItemDef) {
        self.items.insert(def.id.clone(), def);
    }

    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// An in-game day ended and the clock advanced. `elapsed_days` is the NEW
/// total after the rollover.
#[derive(Event, Debug, Clone)]
pub struct DayPassedEvent {
    pub elapsed_days: u32,
}

/// A new week began (the day rollover landed on a multiple of 7).
/// Sent in the same frame as, and before, the matching DayPassedEvent.
#[derive(Event, Debug, Clone)]
pub struct WeekPassedEvent {
    pub week: u32,
}

/// The player started sleeping. Ends the day early and invalidates the
/// scheduler's active drop.
#[derive(Event, Debug, Clone)]
pub struct SleepStartEvent;

/// Player asked the courier for a drop of the given tier.
#[derive(Event, Debug, Clone)]
pub struct ManualDropRequestEvent {
    pub tier: u8,
}

/// A drop was placed in the world. Ephemeral outcome record for flavor
/// and test consumers; never persisted.
#[derive(Event, Debug, Clone)]
pub struct DropSpawnedEvent {
    pub zone_id: u32,
    pub zone_name: String,
    pub tier: u8,
    pub manual: bool,
}

/// A line of text to be delivered to the player as a courier transmission.
#[derive(Event, Debug, Clone)]
pub struct NpcMessageEvent {
    pub text: String,
}
