//! Capability interfaces the drop scheduler consumes from its environment.
//!
//! The scheduler core never touches world entities, registries, or event
//! writers directly — it sees the world through these three narrow traits.
//! The `world`, `data`, and `npc` modules each implement exactly one of
//! them, and tests substitute lightweight fakes.

use bevy::prelude::*;

use crate::shared::{ItemDef, ItemStack};

/// A world position that can host one supply crate.
#[derive(Debug, Clone, PartialEq)]
pub struct DropSite {
    pub id: u32,
    pub name: String,
    pub position: Vec2,
}

/// Why a stack could not be placed into a crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    UnknownSite,
    Full,
}

/// Why a drop request was refused. The player-facing surface collapses
/// this to a boolean; the reason feeds logs and denial messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDenied {
    UnknownTier,
    NotUnlocked,
    NoFreeSites,
}

/// Supplies drop locations and their crate storage.
///
/// Site selection policy belongs to the provider, not the scheduler: the
/// scheduler only asks for "some free site" and works with what it gets.
pub trait DropSiteProvider {
    /// Sites currently able to host a crate, in no particular order.
    fn free_sites(&self) -> Vec<DropSite>;

    /// Claims one free site of the provider's choosing. Returns `None`
    /// when the world has no room; nothing is claimed in that case.
    fn claim_site(&mut self) -> Option<DropSite>;

    /// Places one item stack into the claimed site's crate.
    /// Fails per stack; a failure never invalidates the claim.
    fn store(&mut self, site_id: u32, stack: ItemStack) -> Result<(), StoreError>;

    /// Frees a previously claimed site and discards its crate contents.
    fn release_site(&mut self, site_id: u32);
}

/// Resolves item IDs to definitions and instantiates stacks.
/// Both steps may fail per item; callers log and skip.
pub trait ItemSource {
    fn resolve(&self, id: &str) -> Option<ItemDef>;
    fn create(&self, def: &ItemDef, quantity: u8) -> Option<ItemStack>;
}

/// Delivers a user-visible message. Implemented once by the courier
/// adapter; the scheduler never knows who is speaking.
pub trait Notifier {
    fn send_message(&mut self, text: &str);
}
