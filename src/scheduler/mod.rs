//! Scheduler domain — wires time signals and player requests into the
//! drop-scheduling state machine.
//!
//! The state machine itself lives in [`state`] and is pure over the
//! capability traits in [`env`]; the systems here are thin adapters that
//! assemble those capabilities from bevy resources and event writers.

pub mod env;
pub mod state;

use bevy::prelude::*;

use crate::loot::TierCatalog;
use crate::npc::CourierChannel;
use crate::shared::*;
use crate::world::DropZones;
use env::DropDenied;
use state::{DropScheduler, SpawnedDrop};

pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DropScheduler>()
            .add_systems(OnEnter(GameState::Playing), initialize_scheduler)
            .add_systems(
                Update,
                (apply_time_signals, handle_manual_requests)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─── Systems ──────────────────────────────────────────────────────────────────

/// One-time setup on entering Playing: places the fresh starter crate.
/// Guarded inside the scheduler, so re-entering the state is harmless.
fn initialize_scheduler(
    mut scheduler: ResMut<DropScheduler>,
    clock: Res<GameClock>,
    catalog: Res<TierCatalog>,
    registry: Res<ItemRegistry>,
    mut zones: ResMut<DropZones>,
    mut messages: EventWriter<NpcMessageEvent>,
    mut spawned_events: EventWriter<DropSpawnedEvent>,
) {
    let mut rng = rand::thread_rng();
    let mut courier = CourierChannel::new(&mut messages);

    if let Some(spawned) = scheduler.initialize(
        clock.week(),
        &catalog,
        &*registry,
        &mut *zones,
        &mut courier,
        &mut rng,
    ) {
        spawned_events.send(spawn_event(&spawned));
    }
}

/// Drains the frame's time signals in a fixed order: sleep first (the
/// active drop is invalidated before anything else happens "overnight"),
/// then week signals (the new scheduled day must exist before the same
/// frame's day signal is judged against it), then day signals.
fn apply_time_signals(
    mut scheduler: ResMut<DropScheduler>,
    catalog: Res<TierCatalog>,
    registry: Res<ItemRegistry>,
    mut zones: ResMut<DropZones>,
    mut sleep_events: EventReader<SleepStartEvent>,
    mut week_events: EventReader<WeekPassedEvent>,
    mut day_events: EventReader<DayPassedEvent>,
    mut messages: EventWriter<NpcMessageEvent>,
    mut spawned_events: EventWriter<DropSpawnedEvent>,
) {
    let mut rng = rand::thread_rng();

    for _ in sleep_events.read() {
        scheduler.on_sleep_start(&mut *zones);
    }

    for event in week_events.read() {
        debug!("[Scheduler] Week {} begins", event.week);
        scheduler.on_week_pass(&mut rng);
    }

    for event in day_events.read() {
        let mut courier = CourierChannel::new(&mut messages);
        if let Some(spawned) = scheduler.on_day_pass(
            event.elapsed_days,
            &catalog,
            &*registry,
            &mut *zones,
            &mut courier,
            &mut rng,
        ) {
            spawned_events.send(spawn_event(&spawned));
        }
    }
}

/// Player-facing manual drop requests. The scheduler core stays silent on
/// failure; this layer turns every denial into a friendly courier line so
/// an explicit player action never ends in a silent no-op.
fn handle_manual_requests(
    mut scheduler: ResMut<DropScheduler>,
    clock: Res<GameClock>,
    catalog: Res<TierCatalog>,
    registry: Res<ItemRegistry>,
    mut zones: ResMut<DropZones>,
    mut requests: EventReader<ManualDropRequestEvent>,
    mut messages: EventWriter<NpcMessageEvent>,
    mut spawned_events: EventWriter<DropSpawnedEvent>,
) {
    let mut rng = rand::thread_rng();

    for request in requests.read() {
        let mut courier = CourierChannel::new(&mut messages);
        match scheduler.request_manual_drop(
            request.tier,
            clock.week(),
            &catalog,
            &*registry,
            &mut *zones,
            &mut courier,
            &mut rng,
        ) {
            Ok(spawned) => {
                spawned_events.send(spawn_event(&spawned));
            }
            Err(reason) => {
                courier.send_line(denial_line(request.tier, reason));
            }
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn spawn_event(spawned: &SpawnedDrop) -> DropSpawnedEvent {
    DropSpawnedEvent {
        zone_id: spawned.site.id,
        zone_name: spawned.site.name.clone(),
        tier: spawned.tier,
        manual: spawned.manual,
    }
}

/// Courier text for a refused manual request.
fn denial_line(tier: u8, reason: DropDenied) -> String {
    match reason {
        DropDenied::UnknownTier => {
            format!("Tier {}? Never heard of it. Check your requisition form.", tier)
        }
        DropDenied::NotUnlocked => {
            format!("No can do — tier {} shipments aren't cleared for you yet.", tier)
        }
        DropDenied::NoFreeSites => {
            "Every drop zone is occupied. Clear some crates first.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_lines_name_the_problem() {
        assert!(denial_line(5, DropDenied::UnknownTier).contains("Tier 5"));
        assert!(denial_line(2, DropDenied::NotUnlocked).contains("tier 2"));
        assert!(denial_line(1, DropDenied::NoFreeSites).contains("drop zone"));
    }
}
