//! Snake Duel entry point
//!
//! Headless demo: runs a game with both snakes on autopilot, feeding the
//! engine simulated 60 Hz display frames, and logs what happens.
//!
//! Usage: `snake-duel [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use snake_duel::ConfigError;
    use snake_duel::Settings;
    use snake_duel::diagnostics::Diagnostics;
    use snake_duel::sim::{
        Direction, Engine, GameListener, GameSnapshot, Player, Position, Snake, distance,
        in_bounds, wrap,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEMO_SECONDS: f64 = 120.0;

    /// Logs gameplay events as they happen
    struct LogListener;

    impl GameListener for LogListener {
        fn on_score_change(&mut self, score: u32, score2: Option<u32>) {
            match score2 {
                Some(score2) => log::info!("Score: {score} - {score2}"),
                None => log::info!("Score: {score}"),
            }
        }

        fn on_lives_change(&mut self, lives: u32, lives2: Option<u32>) {
            match lives2 {
                Some(lives2) => log::info!("Lives: {lives} - {lives2}"),
                None => log::info!("Lives: {lives}"),
            }
        }

        fn on_game_over(&mut self) {
            log::info!("GAME OVER");
        }

        fn on_snake_respawn(&mut self, snake: &Snake, player: Player) {
            let head = snake.head();
            log::info!("{player} is back at ({}, {})", head.x, head.y);
        }

        fn on_snake_dying(&mut self, segments: &[Position], player: Player) {
            log::info!("{player} died at length {}", segments.len());
        }

        fn on_render(&mut self, snapshot: &GameSnapshot) {
            if snapshot.tick % 100 == 0 {
                log::debug!("Tick {} speed {}ms", snapshot.tick, snapshot.speed_ms);
            }
        }
    }

    /// Greedy steering: the safe move that gets closest to the nearest fruit
    fn autopilot(snapshot: &GameSnapshot, player: Player) -> Option<Direction> {
        let view = snapshot.snake(player)?;
        if !view.life.is_alive() {
            return None;
        }
        let head = view.head()?;

        let blocked: Vec<Position> = snapshot
            .snakes
            .iter()
            .filter(|s| s.life.is_alive())
            .flat_map(|s| s.segments.iter().copied())
            .collect();
        let target = snapshot
            .fruits
            .iter()
            .map(|f| f.position)
            .min_by(|a, b| distance(head, *a).total_cmp(&distance(head, *b)));

        Direction::ALL
            .into_iter()
            .filter(|dir| !dir.is_opposite(view.direction))
            .filter_map(|dir| {
                let mut next = head + dir.delta();
                if snapshot.no_boundaries {
                    next = wrap(next, snapshot.grid_size);
                }
                if !in_bounds(next, snapshot.grid_size) || blocked.contains(&next) {
                    return None;
                }
                let cost = target.map_or(0.0, |t| distance(next, t));
                Some((dir, cost))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(dir, _)| dir)
    }

    pub fn run() -> Result<(), ConfigError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(&path)?,
            None => Settings {
                lives: 3,
                ..Settings::multiplayer()
            },
        };
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0)
            });

        let mut engine = Engine::new(settings, seed)?
            .with_listener(LogListener)
            .with_diagnostics(Diagnostics::new());
        engine.restart();

        let mut now = 0.0;
        while !engine.is_game_over() && now < DEMO_SECONDS * 1000.0 {
            let snapshot = engine.snapshot();
            for player in [Player::One, Player::Two] {
                if let Some(dir) = autopilot(&snapshot, player) {
                    engine.set_direction(player, dir);
                }
            }
            engine.frame(now);
            now += FRAME_MS;
        }
        engine.shutdown();

        let snapshot = engine.snapshot();
        log::info!(
            "Finished after {} ticks ({:.1}s simulated), phase {:?}",
            snapshot.tick,
            now / 1000.0,
            snapshot.phase
        );
        if let Some(timing) = engine.diagnostics().map(|d| d.step_timing()) {
            log::info!(
                "Tick time avg {:?} min {:?} max {:?} over {} samples",
                timing.avg,
                timing.min,
                timing.max,
                timing.samples
            );
        }
        log::info!("Final state: {}", snapshot.to_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Snake Duel (headless demo) starting...");

    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding host on wasm
}
