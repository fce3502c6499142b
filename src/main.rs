mod shared;
mod clock;
mod loot;
mod scheduler;
mod world;
mod npc;
mod data;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use loot::TierCatalog;
use scheduler::state::DropScheduler;
use shared::*;
use world::DropZones;

fn main() {
    App::new()
        // Headless: the host game owns rendering; the mod only needs the
        // schedule runner, states, and logging.
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(50))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<GameClock>()
        .init_resource::<ItemRegistry>()
        .init_resource::<TierCatalog>()
        .init_resource::<DropZones>()
        .init_resource::<DropScheduler>()
        // Events
        .add_event::<DayPassedEvent>()
        .add_event::<WeekPassedEvent>()
        .add_event::<SleepStartEvent>()
        .add_event::<ManualDropRequestEvent>()
        .add_event::<DropSpawnedEvent>()
        .add_event::<NpcMessageEvent>()
        // Domain plugins
        .add_plugins(data::DataPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(scheduler::SchedulerPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(npc::NpcPlugin)
        .run();
}
