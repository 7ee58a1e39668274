use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for one game turn.
/// Run manually each turn via `app.world_mut().run_schedule(TurnTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnTick;

/// Ordered phases within each turn.
///
/// Phases run in declaration order:
/// Advance < Production < Architects < Relations < Late.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Per-turn caches are dropped before anyone reads them.
    Advance,
    Production,
    /// Every faction plans and follows its plan.
    Architects,
    /// Queued attack and defeat notices are processed.
    Relations,
    /// Late bookkeeping; the clock advances here.
    Late,
}

/// Build a configured `TurnTick` schedule with phase ordering.
pub fn configure_turn_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(TurnTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            TurnPhase::Advance,
            TurnPhase::Production,
            TurnPhase::Architects,
            TurnPhase::Relations,
            TurnPhase::Late,
        )
            .chain(),
    );
    schedule.add_systems(advance_clock.in_set(TurnPhase::Late));
    schedule
}
