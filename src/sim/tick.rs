//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one step. Within a playing tick the
//! order is fixed: player, bullets, enemies, props, particles, spawn scheduling,
//! collisions, then the terminal-state check.

use glam::Vec2;

use super::collision;
use super::particles::EffectKind;
use super::state::{GameEvent, GamePhase, GameState};

/// Engine glow is emitted once every this many ticks
const ENGINE_GLOW_EVERY: u64 = 4;

/// Input for a single tick: held keys plus one-shot commands
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Leave the menu
    pub start: bool,
    /// Start over from game over
    pub restart: bool,
    /// Leave the level-complete screen
    pub advance: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep (`dt` in seconds)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Menu => {
            if input.start || input.autopilot {
                state.start_new_game();
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                state.start_new_game();
            }
        }
        GamePhase::LevelComplete => {
            if input.advance || input.autopilot {
                state.advance_level();
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
            }
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            return;
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;
    let dt_ms = dt * 1000.0;
    state.level_elapsed_ms += dt_ms;

    // Player
    if state
        .player
        .update(input, dt, &state.config, &mut state.bullets)
    {
        state.events.push(GameEvent::PlayerFired);
    }
    if state.time_ticks % ENGINE_GLOW_EVERY == 0 {
        let exhaust = state.player.pos + Vec2::new(0.0, state.player.size.y / 2.0);
        state
            .particles
            .emit(EffectKind::EngineGlow, exhaust, &mut state.rng);
    }

    // Entity managers
    state
        .bullets
        .update(dt, state.enemies.as_slice(), &state.config);

    state.shots.clear();
    state.enemies.update(dt, &state.config, &mut state.shots);
    for shot in state.shots.drain(..) {
        state
            .bullets
            .spawn_enemy_fan(shot.muzzle, shot.count, &state.config);
        state.events.push(GameEvent::EnemyFired);
    }

    state.props.update(dt, &state.config);
    state.particles.tick(dt_ms);

    schedule_spawns(state, dt_ms);

    collision::resolve(state);

    check_terminal(state);
}

/// Spawn one enemy each time the accumulated time crosses the level's interval
fn schedule_spawns(state: &mut GameState, dt_ms: f32) {
    let level = state.level();
    if state.enemies_spawned >= level.enemy_count {
        return;
    }
    let interval = level.spawn_interval_ms() as f32;
    let speed_multiplier = level.speed_multiplier;
    let force_boss = level.boss && state.enemies_spawned == 0;

    state.spawn_timer_ms += dt_ms;
    if state.spawn_timer_ms < interval {
        return;
    }
    state.spawn_timer_ms = 0.0;

    let level_number = state.level_number();
    state.enemies.spawn(
        level_number,
        speed_multiplier,
        force_boss,
        &state.config,
        &mut state.rng,
    );
    state.enemies_spawned += 1;
}

/// Death is checked before level completion, so dying on the last kill still loses
fn check_terminal(state: &mut GameState) {
    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { victory: false });
        log::info!(
            "Game over on level {} with score {}",
            state.level_number(),
            state.score
        );
        return;
    }

    if state.enemies_spawned >= state.level().enemy_count && state.enemies.active_count() == 0 {
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelComplete {
            level: state.level_number(),
        });
        log::info!(
            "Level {} complete, score {}",
            state.level_number(),
            state.score
        );
    }
}

/// Steer under the nearest enemy (or toward a falling prop), hold fire, hug the bottom
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    input.fire = true;
    input.down = true;
    input.up = false;

    let prop_target = state
        .props
        .active()
        .filter(|p| p.pos.y > state.config.canvas_height / 2.0)
        .map(|p| p.pos.x)
        .min_by(|a, b| {
            (a - player.pos.x)
                .abs()
                .partial_cmp(&(b - player.pos.x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let enemy_target = state
        .enemies
        .active()
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.x);

    if let Some(target_x) = prop_target.or(enemy_target) {
        let dx = target_x - player.pos.x;
        let deadzone = player.size.x / 4.0;
        input.left = dx < -deadzone;
        input.right = dx > deadzone;
    } else {
        input.left = false;
        input.right = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, LevelConfig};
    use crate::consts::SIM_DT;
    use crate::sim::enemy::{Enemy, EnemyKind};

    fn playing(levels: Vec<LevelConfig>) -> GameState {
        let file = ConfigFile {
            levels,
            ..ConfigFile::default()
        };
        let mut state = GameState::new(file, 4242).unwrap();
        state.start_new_game();
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_menu_to_playing_on_start() {
        let mut state = GameState::with_default_config(1);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = playing(vec![LevelConfig::new(5, 10, 1.0, false)]);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        for _ in 0..30 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_lethal_enemy_bullet_ends_game() {
        let mut state = playing(vec![LevelConfig::new(5, 10, 1.0, false)]);
        state.player.health = 1;
        let config = state.config.clone();
        state.bullets.spawn_enemy(state.player.pos, &config);

        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.victory);
        assert!(state.events.contains(&GameEvent::PlayerDestroyed));
    }

    #[test]
    fn test_level_complete_when_all_spawned_and_cleared() {
        let mut state = playing(vec![
            LevelConfig::new(3, 10, 1.0, false),
            LevelConfig::new(3, 10, 1.0, false),
        ]);
        state.enemies_spawned = 3;
        assert_eq!(state.player.health, state.player.max_health);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.events.contains(&GameEvent::LevelComplete { level: 1 }));

        let advance = TickInput {
            advance: true,
            ..Default::default()
        };
        tick(&mut state, &advance, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_number(), 2);
    }

    #[test]
    fn test_not_complete_while_enemies_remain() {
        let mut state = playing(vec![LevelConfig::new(1, 10, 1.0, false)]);
        state.enemies_spawned = 1;
        state
            .enemies
            .push(Enemy::new(EnemyKind::Scout, Vec2::new(50.0, 50.0), 0.0, 1000));
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_death_beats_level_complete() {
        let mut state = playing(vec![LevelConfig::new(1, 10, 1.0, false)]);
        state.enemies_spawned = 1;
        state.player.health = 1;
        // The last enemy rams the player: level is empty and the player is dead
        state
            .enemies
            .push(Enemy::new(EnemyKind::Scout, state.player.pos, 0.0, 1000));

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.enemies.active_count(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_spawns_follow_interval() {
        // 1000 ms between spawns
        let mut state = playing(vec![LevelConfig::new(3, 3, 0.1, false)]);
        assert_eq!(state.level().spawn_interval_ms(), 1000);
        state.player.health = 1000;

        for _ in 0..58 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.enemies_spawned, 0);
        for _ in 0..4 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.enemies_spawned, 1);

        for _ in 0..600 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.enemies_spawned, 3);
    }

    #[test]
    fn test_boss_level_opens_with_boss() {
        let mut state = playing(vec![LevelConfig {
            spawn_interval_ms: Some(10),
            ..LevelConfig::new(4, 10, 1.0, true)
        }]);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.enemies_spawned, 1);
        assert_eq!(state.enemies.as_slice()[0].kind, EnemyKind::Boss);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.enemies_spawned, 2);
        assert_ne!(state.enemies.as_slice()[1].kind, EnemyKind::Boss);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = playing(vec![LevelConfig::new(5, 10, 1.0, false)]);
        state.score = 500;
        state.phase = GamePhase::GameOver;

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(ConfigFile::default().levels);
        let mut b = playing(ConfigFile::default().levels);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies_spawned, b.enemies_spawned);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.as_slice().len(), b.enemies.as_slice().len());
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = playing(ConfigFile::default().levels);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(60 * 30) {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.score > 0);
    }
}
