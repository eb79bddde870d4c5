//! Per-snake life cycle: alive, counting down to respawn, or out of the match

use serde::{Deserialize, Serialize};

use super::schedule::TimerHandle;

const SECOND_MS: f64 = 1000.0;

/// Where a snake is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    /// Moving and colliding
    Alive,
    /// Dead, reappears when the countdown reaches zero
    Respawning { seconds_left: u32 },
    /// Lives exhausted while the other snake plays on
    Out,
}

impl LifeState {
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeState::Alive)
    }

    pub fn is_respawning(&self) -> bool {
        matches!(self, LifeState::Respawning { .. })
    }

    /// Seconds left before respawn (0 when not respawning)
    pub fn countdown(&self) -> u32 {
        match self {
            LifeState::Respawning { seconds_left } => *seconds_left,
            _ => 0,
        }
    }
}

/// What a death leads to, after the life has been taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// Lives remain: count down and come back
    Respawn,
    /// No lives left but the other snake still has some
    Out,
    /// Nobody has lives left
    GameOver,
}

/// Decide the outcome of a death.
///
/// `lives_left` is the dying snake's count after the decrement. `other_lives`
/// is the other snake's count in a two-player game, `None` when playing alone.
pub fn resolve_death(lives_left: u32, other_lives: Option<u32>) -> DeathOutcome {
    if lives_left > 0 {
        return DeathOutcome::Respawn;
    }
    match other_lives {
        Some(lives) if lives > 0 => DeathOutcome::Out,
        _ => DeathOutcome::GameOver,
    }
}

/// Wall-clock countdown that fires once per elapsed second
#[derive(Debug, Clone, PartialEq)]
pub struct RespawnCountdown {
    handle: TimerHandle,
    carry_ms: f64,
}

impl RespawnCountdown {
    pub fn new(handle: TimerHandle) -> Self {
        Self {
            handle,
            carry_ms: 0.0,
        }
    }

    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    /// Feed elapsed time; returns how many whole seconds completed
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        self.carry_ms += delta_ms.max(0.0);
        let mut fired = 0;
        while self.carry_ms >= SECOND_MS {
            self.carry_ms -= SECOND_MS;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::schedule::HandleSource;

    #[test]
    fn test_single_player_death_outcomes() {
        assert_eq!(resolve_death(2, None), DeathOutcome::Respawn);
        assert_eq!(resolve_death(0, None), DeathOutcome::GameOver);
    }

    #[test]
    fn test_multiplayer_death_outcomes() {
        assert_eq!(resolve_death(1, Some(0)), DeathOutcome::Respawn);
        assert_eq!(resolve_death(0, Some(1)), DeathOutcome::Out);
        assert_eq!(resolve_death(0, Some(0)), DeathOutcome::GameOver);
    }

    #[test]
    fn test_life_state_queries() {
        assert!(LifeState::Alive.is_alive());
        assert_eq!(LifeState::Alive.countdown(), 0);
        let respawning = LifeState::Respawning { seconds_left: 2 };
        assert!(respawning.is_respawning());
        assert_eq!(respawning.countdown(), 2);
        assert!(!LifeState::Out.is_alive());
        assert_eq!(LifeState::Out.countdown(), 0);
    }

    #[test]
    fn test_countdown_fires_per_second() {
        let mut countdown = RespawnCountdown::new(HandleSource::default().next_timer());
        assert_eq!(countdown.advance(400.0), 0);
        assert_eq!(countdown.advance(400.0), 0);
        assert_eq!(countdown.advance(400.0), 1);
        assert_eq!(countdown.advance(2_000.0), 2);
        assert_eq!(countdown.advance(-50.0), 0);
    }
}
