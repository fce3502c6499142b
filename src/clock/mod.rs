//! Clock domain — the mod's heartbeat.
//!
//! Advances in-game time from real delta-seconds, rolls the day at 2 AM,
//! and emits the three time signals the scheduler lives on:
//! `WeekPassedEvent` (on day rollovers landing on a multiple of 7, sent
//! before the matching day signal), `DayPassedEvent`, and the relayed
//! `SleepStartEvent` (which also ends the day early, like going to bed).

use bevy::prelude::*;

use crate::shared::*;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), resume_time)
            .add_systems(OnExit(GameState::Playing), pause_time)
            .add_systems(
                Update,
                tick_clock
                    .run_if(in_state(GameState::Playing))
                    .run_if(time_not_paused),
            )
            .add_systems(
                Update,
                process_sleep
                    .run_if(in_state(GameState::Playing))
                    .after(tick_clock),
            );
    }
}

// ─── Run conditions / state hooks ─────────────────────────────────────────────

fn time_not_paused(clock: Res<GameClock>) -> bool {
    !clock.time_paused
}

fn resume_time(mut clock: ResMut<GameClock>) {
    clock.time_paused = false;
    info!(
        "[Clock] Time resumed — {}:{:02}, day {} (week {})",
        clock.hour,
        clock.minute,
        clock.elapsed_days,
        clock.week()
    );
}

fn pause_time(mut clock: ResMut<GameClock>) {
    clock.time_paused = true;
    info!("[Clock] Time paused");
}

// ─── Day rollover ─────────────────────────────────────────────────────────────

/// Outcome of a day rollover: the new day total, and the new week number
/// when the rollover crossed a week boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRollover {
    pub elapsed_days: u32,
    pub week_started: Option<u32>,
}

/// Advances the clock to the morning of the next day.
pub fn advance_day(clock: &mut GameClock) -> DayRollover {
    clock.elapsed_days += 1;
    clock.hour = DAY_START_HOUR;
    clock.minute = 0;
    clock.elapsed_real_seconds = 0.0;

    let week_started = if clock.elapsed_days % DAYS_PER_WEEK == 0 {
        Some(clock.week())
    } else {
        None
    };

    DayRollover {
        elapsed_days: clock.elapsed_days,
        week_started,
    }
}

fn emit_rollover(
    rollover: DayRollover,
    week_writer: &mut EventWriter<WeekPassedEvent>,
    day_writer: &mut EventWriter<DayPassedEvent>,
) {
    // Week signal first: the scheduler must roll the new week's drop day
    // before it judges the day signal of the same rollover.
    if let Some(week) = rollover.week_started {
        info!("[Clock] Week {} begins", week);
        week_writer.send(WeekPassedEvent { week });
    }
    info!("[Clock] Day {} begins", rollover.elapsed_days);
    day_writer.send(DayPassedEvent {
        elapsed_days: rollover.elapsed_days,
    });
}

// ─── Systems ──────────────────────────────────────────────────────────────────

/// Accumulates real delta-seconds and converts them to in-game minutes at
/// `time_scale` game-minutes per real second. Forces the day to end when
/// the hour reaches 26 (2:00 AM).
fn tick_clock(
    time: Res<Time>,
    mut clock: ResMut<GameClock>,
    mut week_writer: EventWriter<WeekPassedEvent>,
    mut day_writer: EventWriter<DayPassedEvent>,
) {
    clock.elapsed_real_seconds += time.delta_secs();

    let secs_per_game_minute = if clock.time_scale > 0.0 {
        1.0 / clock.time_scale
    } else {
        1.0 / 10.0
    };

    while clock.elapsed_real_seconds >= secs_per_game_minute {
        clock.elapsed_real_seconds -= secs_per_game_minute;
        clock.minute += 1;

        if clock.minute >= 60 {
            clock.minute = 0;
            clock.hour += 1;

            if clock.hour >= DAY_END_HOUR {
                let rollover = advance_day(&mut *clock);
                emit_rollover(rollover, &mut week_writer, &mut day_writer);
            }
        }
    }
}

/// A sleep signal ends the day early: the clock jumps to next morning and
/// the usual week/day signals fire. The scheduler observes the same
/// `SleepStartEvent` independently to invalidate its active drop.
fn process_sleep(
    mut sleep_events: EventReader<SleepStartEvent>,
    mut clock: ResMut<GameClock>,
    mut week_writer: EventWriter<WeekPassedEvent>,
    mut day_writer: EventWriter<DayPassedEvent>,
) {
    for _ in sleep_events.read() {
        info!(
            "[Clock] Sleep at {}:{:02} — ending day {}",
            clock.hour, clock.minute, clock.elapsed_days
        );
        let rollover = advance_day(&mut *clock);
        emit_rollover(rollover, &mut week_writer, &mut day_writer);
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
