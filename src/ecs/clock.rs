use std::time::Duration;

use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::config::ClockConfig;

/// Turn clock resource: turn counter, pause flag and playback speed.
///
/// The `advance_clock` system moves the counter forward at the end of each
/// tick (in `TurnPhase::Late`), so systems see the current turn before it
/// advances. Speed is in turns per second and only matters to drivers that
/// pace ticks in real time.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TurnClock {
    pub turn: u64,
    pub paused: bool,
    speed: f64,
    min_speed: f64,
    max_speed: f64,
    delta_speed: f64,
}

impl TurnClock {
    pub fn new(config: &ClockConfig) -> Self {
        let half_range = (config.max_speed - config.min_speed) / 2.0;
        let steps = (half_range / config.delta_speed).round();
        let speed = (config.min_speed + steps * config.delta_speed)
            .clamp(config.min_speed, config.max_speed);
        Self {
            turn: 0,
            paused: config.start_paused,
            speed,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            delta_speed: config.delta_speed,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(self.min_speed, self.max_speed);
    }

    pub fn speed_up(&mut self) {
        self.set_speed(self.speed + self.delta_speed);
    }

    pub fn slow_down(&mut self) {
        self.set_speed(self.speed - self.delta_speed);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Real time between two ticks at the current speed.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.speed)
    }

    pub fn advance(&mut self) {
        self.turn += 1;
    }
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

/// Bevy system that advances the turn counter.
/// Registered in `TurnPhase::Late` so all other systems see the current
/// turn before it advances.
pub fn advance_clock(mut clock: ResMut<TurnClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_speed_is_the_midpoint() {
        let clock = TurnClock::default();
        assert_eq!(clock.turn, 0);
        assert!(!clock.paused);
        assert_eq!(clock.speed(), 3.0);
    }

    #[test]
    fn midpoint_snaps_to_a_delta_step() {
        let clock = TurnClock::new(&ClockConfig {
            min_speed: 1.0,
            max_speed: 4.0,
            delta_speed: 1.0,
            start_paused: true,
        });
        assert_eq!(clock.speed(), 3.0);
        assert!(clock.paused);
    }

    #[test]
    fn speed_is_clamped() {
        let mut clock = TurnClock::default();
        for _ in 0..10 {
            clock.speed_up();
        }
        assert_eq!(clock.speed(), 5.0);
        for _ in 0..10 {
            clock.slow_down();
        }
        assert_eq!(clock.speed(), 1.0);
    }

    #[test]
    fn tick_interval_is_inverse_speed() {
        let mut clock = TurnClock::default();
        clock.set_speed(4.0);
        assert_eq!(clock.tick_interval(), Duration::from_millis(250));
    }

    #[test]
    fn pause_toggles() {
        let mut clock = TurnClock::default();
        clock.toggle_pause();
        assert!(clock.paused);
        clock.toggle_pause();
        assert!(!clock.paused);
    }
}
