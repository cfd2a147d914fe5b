//! Pairwise collision checks and their gameplay consequences
//!
//! Runs once per tick after every entity has moved. The four passes run in a
//! fixed order and each one only considers entities still active at that
//! moment, so anything consumed by an earlier pass cannot be hit again.
//! There is no continuous detection: fast pairs may tunnel within one tick.

use super::bullet::BulletOwner;
use super::geom::overlaps;
use super::particles::EffectKind;
use super::state::{GameEvent, GameState};

/// Resolve every collision for this tick
pub fn resolve(state: &mut GameState) {
    player_bullets_vs_enemies(state);
    enemy_bullets_vs_player(state);
    enemies_vs_player(state);
    player_vs_props(state);
}

/// Each player bullet hits at most one enemy: the first active one it overlaps
/// in spawn order. Lethal hits credit score and roll a prop drop.
fn player_bullets_vs_enemies(state: &mut GameState) {
    let GameState {
        config,
        bullets,
        enemies,
        props,
        particles,
        score,
        events,
        rng,
        ..
    } = state;

    for bullet in bullets.iter_mut() {
        if !bullet.active || bullet.owner != BulletOwner::Player {
            continue;
        }
        let bullet_rect = bullet.rect();

        for enemy in enemies.iter_mut() {
            if !enemy.active || !overlaps(&bullet_rect, &enemy.rect()) {
                continue;
            }

            bullet.active = false;
            if enemy.take_damage(bullet.damage) {
                *score += enemy.score;
                events.push(GameEvent::EnemyDestroyed {
                    kind: enemy.kind,
                    credited: enemy.score,
                });
                particles.emit(EffectKind::Explosion, enemy.pos, rng);
                props.roll_drop(enemy.pos, config.prop_drop_chance, rng);
            } else {
                particles.emit(EffectKind::HitSpark, bullet.pos, rng);
            }
            break;
        }
    }
}

/// Enemy bullets that touch the player are spent and deal their damage
fn enemy_bullets_vs_player(state: &mut GameState) {
    let GameState {
        player,
        bullets,
        particles,
        events,
        rng,
        ..
    } = state;

    for bullet in bullets.iter_mut() {
        if !player.active {
            return;
        }
        if !bullet.active || bullet.owner != BulletOwner::Enemy {
            continue;
        }
        if !overlaps(&bullet.rect(), &player.rect()) {
            continue;
        }

        bullet.active = false;
        events.push(GameEvent::PlayerHit);
        particles.emit(EffectKind::HitSpark, bullet.pos, rng);
        if player.take_damage(bullet.damage) {
            events.push(GameEvent::PlayerDestroyed);
            particles.emit(EffectKind::Explosion, player.pos, rng);
        }
    }
}

/// Ramming destroys the enemy (no score) and costs the player exactly one point
fn enemies_vs_player(state: &mut GameState) {
    let GameState {
        config,
        player,
        enemies,
        props,
        particles,
        events,
        rng,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        if !player.active {
            return;
        }
        if !enemy.active || !overlaps(&enemy.rect(), &player.rect()) {
            continue;
        }

        enemy.active = false;
        enemy.health = 0;
        events.push(GameEvent::EnemyDestroyed {
            kind: enemy.kind,
            credited: 0,
        });
        particles.emit(EffectKind::Explosion, enemy.pos, rng);
        props.roll_drop(enemy.pos, config.prop_drop_chance, rng);

        events.push(GameEvent::PlayerHit);
        if player.take_damage(1) {
            events.push(GameEvent::PlayerDestroyed);
            particles.emit(EffectKind::Explosion, player.pos, rng);
        }
    }
}

/// Touching a prop consumes it and applies its effect immediately
fn player_vs_props(state: &mut GameState) {
    let GameState {
        config,
        player,
        props,
        particles,
        score,
        events,
        rng,
        ..
    } = state;

    for prop in props.iter_mut() {
        if !player.active {
            return;
        }
        if !prop.active || !overlaps(&prop.rect(), &player.rect()) {
            continue;
        }

        prop.active = false;
        *score += player.apply_prop(prop.kind, config.score_prop_value);
        events.push(GameEvent::PropCollected(prop.kind));
        particles.emit(EffectKind::PickupBurst, prop.pos, rng);
        log::debug!(
            "Collected {:?}: weapon {:?} L{}, shield {}",
            prop.kind,
            player.weapon,
            player.weapon_level,
            player.shield
        );
    }
}
