//! Headless integration tests for Cratefall.
//!
//! These tests exercise the mod's ECS wiring without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register the same
//! resources and events as `main.rs`, and verify the full event round
//! trips: player request → scheduler → world storage → courier message.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use cratefall::clock::ClockPlugin;
use cratefall::data::DataPlugin;
use cratefall::loot::TierCatalog;
use cratefall::npc::{MessageLog, NpcPlugin};
use cratefall::scheduler::state::DropScheduler;
use cratefall::scheduler::SchedulerPlugin;
use cratefall::shared::*;
use cratefall::world::{DropZones, WorldPlugin};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds the full mod app minus rendering: mirrors `main.rs` except for
/// the schedule runner and log plugin.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.init_state::<GameState>();

    app.init_resource::<GameClock>()
        .init_resource::<ItemRegistry>()
        .init_resource::<TierCatalog>()
        .init_resource::<DropZones>()
        .init_resource::<DropScheduler>();

    app.add_event::<DayPassedEvent>()
        .add_event::<WeekPassedEvent>()
        .add_event::<SleepStartEvent>()
        .add_event::<ManualDropRequestEvent>()
        .add_event::<DropSpawnedEvent>()
        .add_event::<NpcMessageEvent>();

    app.add_plugins(DataPlugin)
        .add_plugins(ClockPlugin)
        .add_plugins(SchedulerPlugin)
        .add_plugins(WorldPlugin)
        .add_plugins(NpcPlugin);

    app
}

/// Boots the app into Playing and lets queued startup messages drain into
/// the courier log. First update runs Loading, second applies the state
/// transition, the rest flush the event relay.
fn boot(app: &mut App) {
    for _ in 0..4 {
        app.update();
    }
}

fn message_count(app: &App) -> usize {
    app.world().resource::<MessageLog>().messages.len()
}

fn last_message(app: &App) -> String {
    app.world()
        .resource::<MessageLog>()
        .last()
        .cloned()
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_reaches_playing_with_populated_registries() {
    let mut app = build_test_app();
    boot(&mut app);

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(state.get(), &GameState::Playing);

    assert!(!app.world().resource::<ItemRegistry>().items.is_empty());
    assert_eq!(
        app.world().resource::<TierCatalog>().tier_ids(),
        vec![1, 2, 3]
    );
    assert!(!app.world().resource::<DropZones>().zones.is_empty());
}

#[test]
fn test_boot_places_starter_drop_and_announces_it() {
    let mut app = build_test_app();
    boot(&mut app);

    let scheduler = app.world().resource::<DropScheduler>();
    assert!(scheduler.initialized);
    let active = scheduler.active_drop.as_ref().expect("starter drop placed");
    assert_eq!(active.tier, 1, "week 0 unlocks tier 1");

    let zones = app.world().resource::<DropZones>();
    let zone = zones.get(active.site_id).expect("zone exists");
    assert!(zone.occupied);
    // Week 0: fresh fill policy delivers exactly 2 picks, all resolvable.
    assert_eq!(zone.storage.len(), 2);

    assert!(
        last_message(&app).contains("Tier 1"),
        "starter announcement names the tier: {}",
        last_message(&app)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Manual requests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_manual_request_tier1_week0_spawns_and_notifies() {
    let mut app = build_test_app();
    boot(&mut app);
    let baseline = message_count(&app);

    app.world_mut()
        .send_event(ManualDropRequestEvent { tier: 1 });
    app.update();
    app.update();

    let scheduler = app.world().resource::<DropScheduler>();
    let active = scheduler.active_drop.as_ref().expect("drop active");
    assert!(active.manual, "latest drop came from the manual request");
    assert_eq!(active.tier, 1);

    assert_eq!(message_count(&app), baseline + 1, "exactly one new message");
    assert!(last_message(&app).contains("Tier 1"));
}

#[test]
fn test_manual_request_locked_tier_is_denied_with_feedback() {
    let mut app = build_test_app();
    boot(&mut app);

    // Week 1 still only unlocks tier 1.
    app.world_mut().resource_mut::<GameClock>().elapsed_days = 7;
    let active_before = app
        .world()
        .resource::<DropScheduler>()
        .active_drop
        .clone();
    let baseline = message_count(&app);

    app.world_mut()
        .send_event(ManualDropRequestEvent { tier: 2 });
    app.update();
    app.update();

    let scheduler = app.world().resource::<DropScheduler>();
    assert_eq!(scheduler.active_drop, active_before, "no state mutation");
    assert_eq!(message_count(&app), baseline + 1);
    assert!(
        last_message(&app).contains("aren't cleared"),
        "denial line delivered: {}",
        last_message(&app)
    );
}

#[test]
fn test_manual_request_unknown_tier_is_denied() {
    let mut app = build_test_app();
    boot(&mut app);
    let baseline = message_count(&app);

    app.world_mut()
        .send_event(ManualDropRequestEvent { tier: 5 });
    app.update();
    app.update();

    assert_eq!(message_count(&app), baseline + 1);
    assert!(last_message(&app).contains("Never heard of it"));
}

#[test]
fn test_manual_request_with_no_free_zones_fails_cleanly() {
    let mut app = build_test_app();
    boot(&mut app);

    // Unlock tier 2 and exhaust the world.
    app.world_mut().resource_mut::<GameClock>().elapsed_days = 14;
    for zone in app.world_mut().resource_mut::<DropZones>().zones.iter_mut() {
        zone.occupied = true;
    }
    let active_before = app
        .world()
        .resource::<DropScheduler>()
        .active_drop
        .clone();

    app.world_mut()
        .send_event(ManualDropRequestEvent { tier: 2 });
    app.update();
    app.update();

    let scheduler = app.world().resource::<DropScheduler>();
    assert_eq!(scheduler.active_drop, active_before, "no state mutation");
    assert!(last_message(&app).contains("occupied"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Sleep and time passage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sleep_clears_active_drop_and_frees_zones() {
    let mut app = build_test_app();
    boot(&mut app);
    assert!(app
        .world()
        .resource::<DropScheduler>()
        .active_drop
        .is_some());

    app.world_mut().send_event(SleepStartEvent);
    app.update();
    app.update();

    let scheduler = app.world().resource::<DropScheduler>();
    assert!(scheduler.active_drop.is_none(), "sleep invalidates the drop");

    let zones = app.world().resource::<DropZones>();
    assert!(
        zones.zones.iter().all(|zone| !zone.occupied),
        "overnight pickup recovered every crate"
    );

    // The sleep also ended the day.
    assert_eq!(app.world().resource::<GameClock>().elapsed_days, 1);
}

#[test]
fn test_seven_sleeps_start_a_week_and_roll_a_schedule() {
    let mut app = build_test_app();
    boot(&mut app);

    for _ in 0..7 {
        app.world_mut().send_event(SleepStartEvent);
        app.update();
        app.update();
    }

    let clock = app.world().resource::<GameClock>();
    assert_eq!(clock.elapsed_days, 7);
    assert_eq!(clock.week(), 1);

    let scheduler = app.world().resource::<DropScheduler>();
    let day = scheduler
        .scheduled_day_of_week
        .expect("week signal rolled a drop day");
    assert!(day <= 6);

    // The courier previewed the new week's manifest.
    let log = app.world().resource::<MessageLog>();
    assert!(
        log.messages.iter().any(|m| m.contains("manifests")),
        "weekly manifest flavor line sent"
    );
}

#[test]
fn test_at_most_one_automatic_drop_per_week() {
    let mut app = build_test_app();
    boot(&mut app);

    // Two full weeks of sleeping through days.
    for _ in 0..14 {
        app.world_mut().send_event(SleepStartEvent);
        app.update();
        app.update();
    }

    let scheduler = app.world().resource::<DropScheduler>();
    // Whatever days the schedule rolled, the per-week latch can only have
    // advanced to one of the weeks that actually passed.
    if let Some(week) = scheduler.last_auto_drop_week {
        assert!(week <= 2);
    }
    assert_eq!(app.world().resource::<GameClock>().week(), 2);
}
