//! Simulation engine
//!
//! Owns the snakes, the fruit and everything that decides who is alive. The
//! host feeds it display frames through [`Engine::frame`] and direction
//! intents through [`Engine::set_direction`]; the engine answers through a
//! [`GameListener`]. The per-tick algorithm itself lives in `tick.rs`.

use std::fmt;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, FruitManager};
use super::grid::{Direction, Position, distance, random_cell};
use super::lifecycle::{DeathOutcome, LifeState, RespawnCountdown, resolve_death};
use super::schedule::{FrameLoop, HandleSource, LoopHandle};
use super::snake::{Palette, Snake, SnakeRules};
use super::snapshot::{GameSnapshot, SnakeView};
use crate::consts::*;
use crate::diagnostics::Diagnostics;
use crate::error::ConfigError;
use crate::settings::{Settings, SettingsOutcome, SettingsPatch};

/// Which of the (up to two) players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn is_second(self) -> bool {
        self == Player::Two
    }

    pub fn palette(self) -> Palette {
        match self {
            Player::One => Palette::GREEN,
            Player::Two => Palette::PURPLE,
        }
    }

    /// Starting head cell on a fresh board
    pub fn spawn_position(self, grid_size: i32) -> Position {
        let centre = grid_size / 2;
        match self {
            Player::One => IVec2::new(centre, centre),
            Player::Two => IVec2::new(centre, centre + SECOND_SNAKE_OFFSET.min(grid_size / 4)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "snake 1"),
            Player::Two => write!(f, "snake 2"),
        }
    }
}

/// Engine-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built but not started
    Ready,
    Running,
    Paused,
    GameOver,
    /// Torn down by [`Engine::shutdown`]; only [`Engine::restart`] leaves it
    Stopped,
}

/// Callbacks fired synchronously at the point of change, before that tick's
/// snapshot is delivered. Every method defaults to doing nothing.
pub trait GameListener {
    /// `score2` is `Some` only in a two-player game
    fn on_score_change(&mut self, _score: u32, _score2: Option<u32>) {}
    /// `lives2` is `Some` only in a two-player game
    fn on_lives_change(&mut self, _lives: u32, _lives2: Option<u32>) {}
    fn on_game_over(&mut self) {}
    /// A fresh snake replaced the dead one
    fn on_snake_respawn(&mut self, _snake: &Snake, _player: Player) {}
    /// One-shot: `segments` are frozen at the moment of death for animation
    fn on_snake_dying(&mut self, _segments: &[Position], _player: Player) {}
    /// The snake ate this tick and grew by one segment
    fn on_snake_growing(&mut self, _player: Player) {}
    /// One snapshot per tick
    fn on_render(&mut self, _snapshot: &GameSnapshot) {}
}

/// Listener that ignores everything
impl GameListener for () {}

/// Everything the engine tracks for one player
#[derive(Debug, Clone)]
pub(crate) struct PlayerSlot {
    pub(crate) player: Player,
    pub(crate) snake: Snake,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) life: LifeState,
    pub(crate) countdown: Option<RespawnCountdown>,
}

pub struct Engine {
    /// Settings in force on the board
    pub(crate) settings: Settings,
    /// Settings waiting for a restart
    pub(crate) pending: Option<Settings>,
    /// Player one first
    pub(crate) players: Vec<PlayerSlot>,
    pub(crate) fruits: FruitManager,
    /// Tick interval (ms)
    pub(crate) speed_ms: u32,
    pub(crate) phase: GamePhase,
    pub(crate) tick_count: u64,
    pub(crate) rng: Pcg32,
    pub(crate) frame_loop: FrameLoop,
    loop_handle: Option<LoopHandle>,
    timers: HandleSource,
    pub(crate) listener: Box<dyn GameListener>,
    pub(crate) diagnostics: Option<Diagnostics>,
}

impl Engine {
    /// Build an engine for `settings`. The game starts with [`Engine::restart`].
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        log::info!(
            "Engine created: grid {} multiplayer {} lives {} seed {}",
            settings.grid_size,
            settings.multiplayer,
            settings.lives,
            seed
        );

        let players = Self::build_players(&settings);
        Ok(Self {
            fruits: FruitManager::new(settings.grid_size),
            settings,
            pending: None,
            players,
            speed_ms: INITIAL_SPEED_MS,
            phase: GamePhase::Ready,
            tick_count: 0,
            rng: Pcg32::seed_from_u64(seed),
            frame_loop: FrameLoop::new(),
            loop_handle: None,
            timers: HandleSource::default(),
            listener: Box::new(()),
            diagnostics: None,
        })
    }

    pub fn with_listener(mut self, listener: impl GameListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    fn build_players(settings: &Settings) -> Vec<PlayerSlot> {
        let rules = Self::rules_for(settings);
        let players: &[Player] = if settings.multiplayer {
            &[Player::One, Player::Two]
        } else {
            &[Player::One]
        };

        players
            .iter()
            .map(|&player| PlayerSlot {
                player,
                snake: Snake::new(
                    rules,
                    Some(player.spawn_position(settings.grid_size)),
                    player.palette(),
                ),
                score: 0,
                lives: settings.lives,
                life: LifeState::Alive,
                countdown: None,
            })
            .collect()
    }

    fn rules_for(settings: &Settings) -> SnakeRules {
        SnakeRules {
            grid_size: settings.grid_size,
            no_boundaries: settings.no_boundaries,
            allow_coiling: settings.allow_coiling,
        }
    }

    // === Queries ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings recorded for the next restart, if any
    pub fn pending_settings(&self) -> Option<&Settings> {
        self.pending.as_ref()
    }

    pub fn restart_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_loop_active(&self) -> bool {
        self.frame_loop.is_active()
    }

    pub fn is_multiplayer(&self) -> bool {
        self.players.len() > 1
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub(crate) fn slot(&self, player: Player) -> Option<&PlayerSlot> {
        self.players.get(player.index())
    }

    pub(crate) fn slot_mut(&mut self, player: Player) -> Option<&mut PlayerSlot> {
        self.players.get_mut(player.index())
    }

    pub fn snake(&self, player: Player) -> Option<&Snake> {
        self.slot(player).map(|s| &s.snake)
    }

    pub fn score(&self, player: Player) -> Option<u32> {
        self.slot(player).map(|s| s.score)
    }

    pub fn lives(&self, player: Player) -> Option<u32> {
        self.slot(player).map(|s| s.lives)
    }

    pub fn life(&self, player: Player) -> Option<LifeState> {
        self.slot(player).map(|s| s.life)
    }

    pub fn fruits(&self) -> &[Fruit] {
        self.fruits.fruits()
    }

    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        self.diagnostics.as_ref()
    }

    pub fn diagnostics_mut(&mut self) -> Option<&mut Diagnostics> {
        self.diagnostics.as_mut()
    }

    /// Log a trace event and keep it in the diagnostics collector
    pub(crate) fn note(&mut self, args: fmt::Arguments<'_>) {
        log::debug!("{args}");
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            let at_ms = self.frame_loop.last_frame_ms().unwrap_or(0.0);
            diagnostics.record_event(at_ms, args.to_string());
        }
    }

    // === Input ===

    /// Buffer a turn for `player`'s snake. Returns false when the turn was
    /// dropped (reversal, unknown player or finished game).
    pub fn set_direction(&mut self, player: Player, direction: Direction) -> bool {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Stopped) {
            return false;
        }
        match self.slot_mut(player) {
            Some(slot) => slot.snake.set_direction(direction),
            None => {
                log::warn!("Direction for {player} ignored in single player mode");
                false
            }
        }
    }

    // === Lifecycle ===

    /// Start a fresh game, applying any pending settings
    pub fn restart(&mut self) {
        self.stop_loop();
        self.cancel_countdowns();

        if let Some(pending) = self.pending.take() {
            log::info!("Applying deferred settings");
            self.settings = pending;
        }

        self.players = Self::build_players(&self.settings);
        self.fruits = FruitManager::new(self.settings.grid_size);
        self.speed_ms = INITIAL_SPEED_MS;
        self.tick_count = 0;
        self.phase = GamePhase::Running;

        let occupied = self.alive_segments();
        for _ in 0..FRUIT_TARGET_COUNT {
            self.fruits.add_fruit(&occupied, &mut self.rng);
        }

        self.notify_score();
        self.notify_lives();
        self.start_loop();

        log::info!(
            "Game started: {} player(s), {} fruit, speed {}ms",
            self.players.len(),
            self.fruits.len(),
            self.speed_ms
        );
    }

    /// Schedule the tick loop. Returns the new handle, or `None` if the loop
    /// is already running or the game is not in a runnable phase.
    pub fn start_loop(&mut self) -> Option<LoopHandle> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let handle = self.frame_loop.start()?;
        self.loop_handle = Some(handle);
        self.note(format_args!("Game loop started"));
        Some(handle)
    }

    pub fn stop_loop(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            if self.frame_loop.cancel(handle) {
                self.note(format_args!("Game loop stopped"));
            }
        }
    }

    fn cancel_countdowns(&mut self) {
        for slot in &mut self.players {
            slot.countdown = None;
        }
    }

    /// Pause or resume. Returns false when nothing changed.
    ///
    /// Pausing cancels the tick loop and every countdown timer. Resuming
    /// starts a fresh loop (empty accumulator) and re-arms countdowns for
    /// snakes still waiting to respawn.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        match (self.phase, paused) {
            (GamePhase::Running, true) => {
                self.phase = GamePhase::Paused;
                self.stop_loop();
                self.cancel_countdowns();
                self.note(format_args!("Game paused"));
                true
            }
            (GamePhase::Paused, false) => {
                self.phase = GamePhase::Running;
                self.start_loop();
                for i in 0..self.players.len() {
                    if self.players[i].life.is_respawning() {
                        let handle = self.timers.next_timer();
                        self.players[i].countdown = Some(RespawnCountdown::new(handle));
                    }
                }
                self.note(format_args!("Game resumed"));
                true
            }
            (phase @ (GamePhase::Ready | GamePhase::GameOver | GamePhase::Stopped), _) => {
                log::warn!("Pause request ignored in {phase:?}");
                self.note(format_args!("Invalid pause request in {phase:?}"));
                false
            }
            _ => false,
        }
    }

    /// Cancel the loop and all timers (teardown). Nothing ticks, resumes or
    /// respawns afterwards until [`Engine::restart`].
    pub fn shutdown(&mut self) {
        self.stop_loop();
        self.cancel_countdowns();
        self.phase = GamePhase::Stopped;
        log::info!("Engine shut down after {} ticks", self.tick_count);
    }

    pub(crate) fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.stop_loop();
        self.cancel_countdowns();
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {} ticks (scores {:?})",
            self.tick_count,
            self.players.iter().map(|s| s.score).collect::<Vec<_>>()
        );
        self.listener.on_game_over();
    }

    // === Frames and timers ===

    /// Drive the engine from a display callback at host time `now_ms`.
    ///
    /// Feeds the clamped elapsed time to respawn countdowns, then runs as many
    /// whole ticks as the accumulator holds. Returns the number of ticks run.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let delta = self.frame_loop.begin_frame(now_ms);
        self.advance_countdowns(delta);

        let mut steps = 0;
        while self.frame_loop.consume_step(self.speed_ms as f64) {
            self.step();
            steps += 1;
            if !self.frame_loop.is_active() {
                break;
            }
        }
        steps
    }

    fn advance_countdowns(&mut self, delta_ms: f64) {
        for i in 0..self.players.len() {
            let player = self.players[i].player;
            let fired = match self.players[i].countdown.as_mut() {
                Some(countdown) => countdown.advance(delta_ms),
                None => continue,
            };
            for _ in 0..fired {
                if self.countdown_second(player) {
                    break;
                }
            }
        }
    }

    /// One second of `player`'s countdown elapsed. Returns true once the
    /// countdown is over.
    fn countdown_second(&mut self, player: Player) -> bool {
        let Some(slot) = self.slot_mut(player) else {
            return true;
        };
        let LifeState::Respawning { seconds_left } = slot.life else {
            slot.countdown = None;
            return true;
        };

        let seconds_left = seconds_left.saturating_sub(1);
        slot.life = LifeState::Respawning { seconds_left };
        self.note(format_args!("Respawn countdown ({player}): {seconds_left}"));

        if seconds_left == 0 {
            if let Some(slot) = self.slot_mut(player) {
                slot.countdown = None;
            }
            self.respawn_snake(player);
            return true;
        }
        false
    }

    // === Death and respawn ===

    /// Take a life from `player` and decide what follows.
    /// Ignored unless the snake is currently alive.
    pub(crate) fn handle_snake_death(&mut self, player: Player) {
        let Some(slot) = self.players.get(player.index()) else {
            log::warn!("Death reported for missing {player}");
            return;
        };
        if !slot.life.is_alive() {
            let life = slot.life;
            self.note(format_args!("Death of {player} ignored: already {life:?}"));
            return;
        }

        let segments = slot.snake.to_vec();
        self.listener.on_snake_dying(&segments, player);

        let lives_left = {
            let slot = &mut self.players[player.index()];
            slot.lives = slot.lives.saturating_sub(1);
            slot.lives
        };
        self.notify_lives();
        self.note(format_args!("{player} lost a life, {lives_left} left"));

        let other_lives = self.slot(player.other()).map(|s| s.lives);
        match resolve_death(lives_left, other_lives) {
            DeathOutcome::Respawn => {
                let handle = self.timers.next_timer();
                let slot = &mut self.players[player.index()];
                slot.life = LifeState::Respawning {
                    seconds_left: RESPAWN_SECONDS,
                };
                slot.countdown = Some(RespawnCountdown::new(handle));
                self.note(format_args!("Respawn countdown started for {player}"));
            }
            DeathOutcome::Out => {
                self.players[player.index()].life = LifeState::Out;
                log::info!("{player} is out of lives");
            }
            DeathOutcome::GameOver => {
                self.players[player.index()].life = LifeState::Out;
                self.end_game();
            }
        }
    }

    /// Replace `player`'s snake with a fresh one on a safe cell.
    ///
    /// Normally called when the countdown runs out. Returns false (and does
    /// nothing) for a player that does not exist, is out of lives, or when
    /// the game is over.
    pub fn respawn_snake(&mut self, player: Player) -> bool {
        if self.slot(player).is_none() {
            log::warn!("Attempted to respawn {player} in single player mode");
            self.note(format_args!("Invalid respawn request for {player}"));
            return false;
        }
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Stopped) {
            log::warn!("Attempted to respawn {player} in {:?}", self.phase);
            self.note(format_args!("Invalid respawn request for {player}"));
            return false;
        }
        if self.players[player.index()].life == LifeState::Out {
            log::warn!("Attempted to respawn {player} with no lives left");
            self.note(format_args!("Invalid respawn request for {player}"));
            return false;
        }

        let avoid: Vec<Position> = self
            .slot(player.other())
            .filter(|other| other.life.is_alive())
            .map(|other| other.snake.to_vec())
            .unwrap_or_default();
        let head = self.find_safe_respawn_position(&avoid);

        let rules = Self::rules_for(&self.settings);
        let slot = &mut self.players[player.index()];
        slot.snake = Snake::new(rules, Some(head), player.palette());
        slot.life = LifeState::Alive;
        slot.countdown = None;
        self.listener.on_snake_respawn(&slot.snake, player);
        log::info!("{player} respawned at ({}, {})", head.x, head.y);

        if self.phase == GamePhase::Running && !self.frame_loop.is_active() {
            self.start_loop();
        }
        true
    }

    /// Pick a head cell at least `SAFE_RESPAWN_DISTANCE` from every cell in
    /// `avoid`, away from the edges. Falls back to an unchecked cell (still
    /// away from the edges) after `SAFE_RESPAWN_ATTEMPTS` misses.
    pub(crate) fn find_safe_respawn_position(&mut self, avoid: &[Position]) -> Position {
        for attempt in 0..SAFE_RESPAWN_ATTEMPTS {
            let candidate = self.respawn_candidate();
            let safe = avoid
                .iter()
                .all(|&segment| distance(segment, candidate) >= SAFE_RESPAWN_DISTANCE);
            if safe {
                self.note(format_args!(
                    "Safe respawn cell ({}, {}) after {} attempts",
                    candidate.x, candidate.y, attempt
                ));
                return candidate;
            }
        }

        log::warn!("No safe respawn cell after {SAFE_RESPAWN_ATTEMPTS} attempts");
        self.respawn_candidate()
    }

    /// Random head cell whose fresh body (trailing left) stays on the board
    fn respawn_candidate(&mut self) -> Position {
        let span = self.settings.grid_size - 2 * RESPAWN_EDGE_MARGIN;
        random_cell(&mut self.rng, span) + IVec2::splat(RESPAWN_EDGE_MARGIN)
    }

    // === Settings ===

    /// Apply a settings change.
    ///
    /// Boundaries, coiling and theme change immediately on every snake. Grid
    /// size, player count and lives are recorded and wait for
    /// [`Engine::restart`]. Invalid values are rejected before anything
    /// changes.
    pub fn apply_settings(&mut self, patch: &SettingsPatch) -> Result<SettingsOutcome, ConfigError> {
        let mut target = self.pending.clone().unwrap_or_else(|| self.settings.clone());
        target.merge(patch);
        target.validate()?;

        let mut outcome = SettingsOutcome::default();

        if target.theme != self.settings.theme {
            self.settings.theme = target.theme;
            outcome.applied_live = true;
        }
        if target.no_boundaries != self.settings.no_boundaries {
            self.settings.no_boundaries = target.no_boundaries;
            for slot in &mut self.players {
                slot.snake.set_no_boundaries(target.no_boundaries);
            }
            outcome.applied_live = true;
        }
        if target.allow_coiling != self.settings.allow_coiling {
            self.settings.allow_coiling = target.allow_coiling;
            for slot in &mut self.players {
                slot.snake.set_allow_coiling(target.allow_coiling);
            }
            outcome.applied_live = true;
        }

        if self.settings.requires_restart(&target) {
            log::warn!("Settings require a game restart to take full effect");
            self.pending = Some(target);
            outcome.restart_required = true;
        } else {
            self.pending = None;
        }

        self.note(format_args!("Settings applied: {outcome:?}"));
        if outcome.applied_live {
            self.emit_snapshot();
        }
        Ok(outcome)
    }

    // === Output ===

    /// Union of the segments of every live snake
    pub(crate) fn alive_segments(&self) -> Vec<Position> {
        self.players
            .iter()
            .filter(|slot| slot.life.is_alive())
            .flat_map(|slot| slot.snake.segments())
            .collect()
    }

    pub(crate) fn notify_score(&mut self) {
        let score = self.players[0].score;
        let score2 = self.players.get(1).map(|s| s.score);
        self.listener.on_score_change(score, score2);
    }

    pub(crate) fn notify_lives(&mut self) {
        let lives = self.players[0].lives;
        let lives2 = self.players.get(1).map(|s| s.lives);
        self.listener.on_lives_change(lives, lives2);
    }

    /// Build a fresh snapshot of the current state
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tick: self.tick_count,
            grid_size: self.settings.grid_size,
            snakes: self
                .players
                .iter()
                .map(|slot| SnakeView {
                    player: slot.player,
                    segments: slot.snake.to_vec(),
                    direction: slot.snake.direction(),
                    next_direction: slot.snake.next_direction(),
                    palette: slot.snake.palette(),
                    score: slot.score,
                    lives: slot.lives,
                    life: slot.life,
                    respawn_countdown: slot.life.countdown(),
                })
                .collect(),
            fruits: self.fruits.fruits().to_vec(),
            speed_ms: self.speed_ms,
            multiplayer: self.is_multiplayer(),
            no_boundaries: self.settings.no_boundaries,
            allow_coiling: self.settings.allow_coiling,
            dark_theme: self.settings.theme.is_dark(),
            phase: self.phase,
            paused: self.is_paused(),
            loop_active: self.frame_loop.is_active(),
            restart_pending: self.pending.is_some(),
        }
    }

    pub(crate) fn emit_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.listener.on_render(&snapshot);
    }
}
