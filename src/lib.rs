//! Cratefall library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual mod entry point. This
//! library crate exposes the same modules so that `tests/` integration
//! tests can import types, systems, and resources headlessly.

pub mod shared;
pub mod clock;
pub mod loot;
pub mod scheduler;
pub mod world;
pub mod npc;
pub mod data;
