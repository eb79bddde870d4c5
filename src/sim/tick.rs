//! Fixed timestep simulation tick
//!
//! One tick moves every live snake, resolves walls, self-collision, fruit and
//! snake-on-snake contact, then lets the fruit wander and hands the renderer a
//! snapshot.

use std::time::Instant;

use super::engine::{Engine, GamePhase, Player};
use super::grid::Position;
use crate::consts::*;

impl Engine {
    /// Advance the simulation by one tick.
    ///
    /// Does nothing unless the game is running. [`Engine::frame`] normally
    /// drives this; hosts with their own scheduler may call it directly.
    pub fn step(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let started = Instant::now();
        self.tick_count += 1;

        self.simulate();

        let elapsed = started.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if elapsed_ms > SLOW_STEP_MS {
            log::warn!("Slow tick {}: {elapsed_ms:.2}ms", self.tick_count);
        }
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.record_step(elapsed);
        }

        self.emit_snapshot();
    }

    fn simulate(&mut self) {
        let players: Vec<Player> = self.players.iter().map(|slot| slot.player).collect();

        // Move and check walls/self, in player order
        let mut moved = Vec::with_capacity(players.len());
        for &player in &players {
            let survived = self.move_snake(player);
            if self.phase == GamePhase::GameOver {
                return;
            }
            moved.push(survived);
        }

        // Eat or drop the tail
        for (&player, &survived) in players.iter().zip(&moved) {
            if survived {
                self.feed_or_shrink(player);
            }
        }

        if moved.len() == 2 && moved[0] && moved[1] {
            self.check_snake_collisions();
            if self.phase == GamePhase::GameOver {
                return;
            }
        }

        self.wander_fruit();
    }

    /// Advance one snake and check it against the walls and itself.
    /// Returns true if the snake moved and survived.
    fn move_snake(&mut self, player: Player) -> bool {
        let slot = &mut self.players[player.index()];
        if !slot.life.is_alive() {
            return false;
        }

        let head = slot.snake.advance();
        let cause = if slot.snake.collides_with_wall() {
            "the wall"
        } else if slot.snake.collides_with_self() {
            "itself"
        } else {
            return true;
        };

        self.note(format_args!("{player} hit {cause} at ({}, {})", head.x, head.y));
        self.handle_snake_death(player);
        false
    }

    fn feed_or_shrink(&mut self, player: Player) {
        let i = player.index();
        let head = self.players[i].snake.head();
        let Some(index) = self.fruits.check_fruit_eaten(head) else {
            self.players[i].snake.remove_tail();
            return;
        };

        self.fruits.remove_fruit(index);
        self.players[i].score += SCORE_PER_FRUIT;
        self.speed_ms = self
            .speed_ms
            .saturating_sub(SPEED_DECREMENT_MS)
            .max(MIN_SPEED_MS);
        self.notify_score();

        let occupied = self.alive_segments();
        let placement = self.fruits.add_fruit(&occupied, &mut self.rng);
        let score = self.players[i].score;
        let speed = self.speed_ms;
        self.note(format_args!(
            "{player} ate fruit: score {score}, speed {speed}ms, refill {placement:?}"
        ));
        self.listener.on_snake_growing(player);
    }

    /// Head-into-other checks for two live snakes. Both are evaluated before
    /// either death is applied, so a head-on collision kills both.
    fn check_snake_collisions(&mut self) {
        let first = &self.players[0].snake;
        let second = &self.players[1].snake;
        let first_hit = first.collides_with_snake(second);
        let second_hit = second.collides_with_snake(first);

        if first_hit {
            self.note(format_args!("{} ran into {}", Player::One, Player::Two));
            self.handle_snake_death(Player::One);
        }
        if second_hit && self.phase != GamePhase::GameOver {
            self.note(format_args!("{} ran into {}", Player::Two, Player::One));
            self.handle_snake_death(Player::Two);
        }
    }

    fn wander_fruit(&mut self) {
        let obstacles: Vec<Position> = self
            .players
            .iter()
            .filter(|slot| slot.life.is_alive())
            .flat_map(|slot| slot.snake.body())
            .collect();
        self.fruits.move_fruits(&obstacles, &mut self.rng);
    }
}
