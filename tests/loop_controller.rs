//! End-to-end runs of the loop controller against the public API

use astro_blaster::audio::{NullAudio, RecordingAudio, SoundEffect};
use astro_blaster::config::ConfigFile;
use astro_blaster::consts::SIM_DT;
use astro_blaster::sim::{GamePhase, GameState};
use astro_blaster::{ConfigError, Game, LevelConfig, Renderer, Settings};

#[derive(Default)]
struct PhaseLog {
    phases: Vec<GamePhase>,
}

impl Renderer for PhaseLog {
    fn render(&mut self, state: &GameState) {
        if self.phases.last() != Some(&state.phase) {
            self.phases.push(state.phase);
        }
    }
}

fn short_campaign() -> ConfigFile {
    ConfigFile {
        levels: vec![
            LevelConfig {
                spawn_interval_ms: Some(100),
                ..LevelConfig::new(2, 5, 1.0, false)
            },
            LevelConfig {
                spawn_interval_ms: Some(100),
                ..LevelConfig::new(1, 5, 1.0, true)
            },
        ],
        ..ConfigFile::default()
    }
}

#[test]
fn menu_waits_for_start() {
    let mut game = Game::new(ConfigFile::default(), Settings::default(), NullAudio, 3).unwrap();
    let mut log = PhaseLog::default();
    let mut now = 0.0;
    for _ in 0..120 {
        game.frame(now, &mut log);
        now += 16.7;
    }
    assert_eq!(log.phases, vec![GamePhase::Menu]);
    assert_eq!(game.state.time_ticks, 0);
}

#[test]
fn level_clears_then_advances() {
    let mut game = Game::new(short_campaign(), Settings::default(), NullAudio, 11).unwrap();
    game.input.start = true;
    game.advance(SIM_DT);
    assert_eq!(game.phase(), GamePhase::Playing);

    // Wait for both enemies, then remove them as if shot
    while game.state.enemies_spawned < 2 {
        game.advance(SIM_DT);
    }
    for enemy in game.state.enemies.iter_mut() {
        enemy.active = false;
    }
    game.advance(SIM_DT);
    assert_eq!(game.phase(), GamePhase::LevelComplete);

    // The level-complete screen holds until advanced
    game.advance(1.0 / 6.0);
    assert_eq!(game.phase(), GamePhase::LevelComplete);

    game.input.advance = true;
    game.advance(SIM_DT);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.state.level_number(), 2);
}

#[test]
fn boss_level_opens_with_boss_and_final_clear_is_victory() {
    let mut game = Game::new(short_campaign(), Settings::default(), NullAudio, 5).unwrap();
    game.input.start = true;
    game.advance(SIM_DT);
    game.state.load_level(1);

    while game.state.enemies_spawned < 1 {
        game.advance(SIM_DT);
    }
    let boss = &game.state.enemies.as_slice()[0];
    assert_eq!(boss.kind, astro_blaster::sim::EnemyKind::Boss);

    for enemy in game.state.enemies.iter_mut() {
        enemy.active = false;
    }
    game.advance(SIM_DT);
    assert_eq!(game.phase(), GamePhase::LevelComplete);

    game.input.advance = true;
    game.advance(SIM_DT);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(game.state.victory);
}

#[test]
fn autopilot_session_makes_noise_and_progress() {
    let mut game = Game::new(
        ConfigFile::default(),
        Settings::default(),
        RecordingAudio::default(),
        2024,
    )
    .unwrap();
    game.input.autopilot = true;

    let mut now = 0.0;
    for _ in 0..(60 * 20) {
        game.frame(now, &mut ());
        now += 1000.0 / 60.0;
    }

    assert_ne!(game.phase(), GamePhase::Menu);
    assert!(game.state.time_ticks > 0);
    let shots = game
        .audio
        .effects
        .iter()
        .filter(|(e, _)| *e == SoundEffect::PlayerShot)
        .count();
    assert!(shots > 10);
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut game = Game::new(ConfigFile::default(), Settings::default(), NullAudio, seed)
            .unwrap();
        game.input.autopilot = true;
        for _ in 0..900 {
            game.advance(SIM_DT);
        }
        (
            game.state.score,
            game.state.enemies_spawned,
            game.state.player.pos,
            game.state.player.health,
        )
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn bad_config_is_rejected() {
    let json = r#"{
        "levels": [ { "enemy_count": 0, "level_time_secs": 10, "speed_multiplier": 1.0 } ]
    }"#;
    assert!(matches!(
        ConfigFile::from_json(json),
        Err(ConfigError::InvalidLevel { index: 0, .. })
    ));

    let empty = ConfigFile {
        levels: Vec::new(),
        ..ConfigFile::default()
    };
    assert!(matches!(
        Game::new(empty, Settings::default(), NullAudio, 1),
        Err(ConfigError::NoLevels)
    ));
}
