//! Courier NPC domain — the player-facing message channel.
//!
//! Every user-visible line the mod produces flows through one
//! [`CourierChannel`], the single implementation of the scheduler's
//! `Notifier` capability. The relay system stamps the courier's callsign,
//! logs the transmission, and keeps a short history for UI consumers.
//!
//! The courier also sends a weekly flavor line previewing this week's
//! reachable loot.

use bevy::prelude::*;
use rand::seq::SliceRandom;

use crate::loot::TierCatalog;
use crate::scheduler::env::Notifier;
use crate::shared::*;

/// Radio callsign the courier signs transmissions with.
pub const COURIER_CALLSIGN: &str = "Magpie";

/// Transmissions kept in the history before old ones are dropped.
const MESSAGE_LOG_CAP: usize = 32;

// ─── Message log ──────────────────────────────────────────────────────────────

/// Recent courier transmissions, newest last.
#[derive(Resource, Debug, Default)]
pub struct MessageLog {
    pub messages: Vec<String>,
}

impl MessageLog {
    pub fn push(&mut self, text: String) {
        self.messages.push(text);
        if self.messages.len() > MESSAGE_LOG_CAP {
            self.messages.remove(0);
        }
    }

    pub fn last(&self) -> Option<&String> {
        self.messages.last()
    }
}

// ─── Notifier adapter ─────────────────────────────────────────────────────────

/// The one `Notifier` implementation: forwards text onto the
/// `NpcMessageEvent` wire for the relay system to deliver.
pub struct CourierChannel<'a, 'w> {
    writer: &'a mut EventWriter<'w, NpcMessageEvent>,
}

impl<'a, 'w> CourierChannel<'a, 'w> {
    pub fn new(writer: &'a mut EventWriter<'w, NpcMessageEvent>) -> Self {
        Self { writer }
    }

    pub fn send_line(&mut self, text: String) {
        self.writer.send(NpcMessageEvent { text });
    }
}

impl Notifier for CourierChannel<'_, '_> {
    fn send_message(&mut self, text: &str) {
        self.send_line(text.to_string());
    }
}

// ─── Plugin ───────────────────────────────────────────────────────────────────

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MessageLog>().add_systems(
            Update,
            (announce_weekly_manifest, relay_courier_messages)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Delivers queued transmissions: log line plus message history.
fn relay_courier_messages(
    mut events: EventReader<NpcMessageEvent>,
    mut log: ResMut<MessageLog>,
) {
    for event in events.read() {
        info!("[Courier] {}: {}", COURIER_CALLSIGN, event.text);
        log.push(event.text.clone());
    }
}

/// Weekly flavor: previews a few items from this week's reachable loot.
/// Purely cosmetic — the scheduler does not depend on this system.
fn announce_weekly_manifest(
    mut week_events: EventReader<WeekPassedEvent>,
    catalog: Res<TierCatalog>,
    registry: Res<ItemRegistry>,
    mut messages: EventWriter<NpcMessageEvent>,
) {
    for event in week_events.read() {
        let loot = catalog.loot_for_week(event.week);
        let mut rng = rand::thread_rng();
        let names: Vec<&str> = loot
            .choose_multiple(&mut rng, 3)
            .filter_map(|id| registry.get(id))
            .map(|def| def.name.as_str())
            .collect();

        if names.is_empty() {
            continue;
        }

        messages.send(NpcMessageEvent {
            text: format!(
                "Word from up top — this week's manifests list {}.",
                names.join(", ")
            ),
        });
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_log_caps_history() {
        let mut log = MessageLog::default();
        for i in 0..40 {
            log.push(format!("line {}", i));
        }
        assert_eq!(log.messages.len(), MESSAGE_LOG_CAP);
        assert_eq!(log.last().unwrap(), "line 39");
        assert_eq!(log.messages[0], "line 8");
    }
}
