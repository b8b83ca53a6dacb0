//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one tick. Nothing here reads the
//! wall clock; the caller decides the cadence.

use glam::Vec2;

use super::collision::{Impact, apply_removals, resolve_bullet_hits};
use super::entity::EnemyKind;
use super::physics::{Movement, integrate_bullets, integrate_enemies, integrate_particles, move_player};
use super::spawner::Burst;
use super::state::GameState;
use crate::consts::*;

/// Sampled input for a single tick (latest state only, never queued)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement keys currently held
    pub movement: Movement,
}

/// Gameplay events produced by a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnemyKilled {
        enemy_id: u32,
        kind: EnemyKind,
        points: u64,
    },
    LifeLost {
        enemy_id: u32,
        remaining: u32,
    },
    GameOver {
        score: u64,
        wave: u32,
    },
    WaveStarted {
        wave: u32,
        enemies: usize,
    },
}

/// Advance the game state by one fixed tick.
///
/// Does nothing unless the game is playing. Order:
/// player input, bullets, enemies (escapes), collisions, particles, waves.
/// Losing the last life stops the tick right after the escape step.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.phase.is_simulating() {
        return events;
    }

    state.time_ticks += 1;
    let viewport = state.viewport;

    move_player(&mut state.player, input.movement, viewport);

    integrate_bullets(&mut state.bullets, viewport);

    // Escapes are charged before collisions run, so an enemy that escapes
    // this tick can never be hit this tick.
    for escape in integrate_enemies(&mut state.enemies, viewport) {
        let burst_at = Vec2::new(escape.x, viewport.height - ESCAPE_BURST_OFFSET_Y);
        state.emit(Burst::Escape, burst_at, escape.color);
        let ended = state.lose_life();
        events.push(GameEvent::LifeLost {
            enemy_id: escape.enemy_id,
            remaining: state.lives,
        });
        if ended {
            events.push(GameEvent::GameOver {
                score: state.score,
                wave: state.wave,
            });
        }
    }

    // The run ended during escapes: nothing after this point may mutate it,
    // so the GameOver score is final.
    if !state.phase.is_simulating() {
        return events;
    }

    let outcome = resolve_bullet_hits(&state.bullets, &mut state.enemies);
    for impact in &outcome.impacts {
        match *impact {
            Impact::Hit { at, color } => state.emit(Burst::Hit, at, color),
            Impact::Kill {
                enemy_id,
                at,
                color,
                kind,
            } => {
                state.emit(Burst::Kill, at, color);
                let points = state.award_kill(kind);
                events.push(GameEvent::EnemyKilled {
                    enemy_id,
                    kind,
                    points,
                });
            }
        }
    }
    apply_removals(&mut state.bullets, &mut state.enemies, &outcome);

    integrate_particles(&mut state.particles);

    advance_wave(state, &mut events);

    events
}

/// Spawn the next wave once the field has been empty long enough
fn advance_wave(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.enemies.is_empty() {
        state.wave_timer = 0;
        return;
    }

    state.wave_timer += 1;
    if state.wave_timer > WAVE_SETTLE_TICKS {
        state.wave += 1;
        state.wave_timer = 0;
        let enemies = state.spawn_wave();
        events.push(GameEvent::WaveStarted {
            wave: state.wave,
            enemies,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Bullet, Enemy};
    use crate::sim::phase::GamePhase;
    use crate::sim::state::Viewport;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Viewport::default());
        state.start();
        state
    }

    /// Replace the field with a single enemy parked at `pos`
    fn lone_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.enemies.clear();
        state.enemies.push(Enemy::new(id, kind, pos, Vec2::ZERO));
        id
    }

    /// Bullet that reaches `pos` after one integration step
    fn bullet_arriving_at(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: pos - Vec2::new(0.0, -BULLET_SPEED),
            vel: Vec2::new(0.0, -BULLET_SPEED),
        });
    }

    #[test]
    fn test_tick_noop_before_start() {
        let mut state = GameState::new(1, Viewport::default());
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state(12345);
        tick(&mut state, &TickInput::default());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);

        let enemies: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        let particles = state.particles.len();
        let status = state.status();
        for _ in 0..30 {
            let input = TickInput {
                movement: Movement {
                    left: true,
                    ..Default::default()
                },
            };
            assert!(tick(&mut state, &input).is_empty());
        }
        assert_eq!(state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(), enemies);
        assert_eq!(state.particles.len(), particles);
        assert_eq!(state.status(), status);

        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_kill_awards_wave_scaled_score() {
        let mut state = playing_state(1);
        state.wave = 2;
        let target = Vec2::new(300.0, 200.0);
        let id = lone_enemy(&mut state, EnemyKind::Drone, target);
        bullet_arriving_at(&mut state, target);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 20);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!(events.contains(&GameEvent::EnemyKilled {
            enemy_id: id,
            kind: EnemyKind::Drone,
            points: 20,
        }));
        // 5 hit + 15 kill particles, integrated once
        assert_eq!(state.particles.len(), 20);
        assert_eq!(state.lives, START_LIVES);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })));
    }

    #[test]
    fn test_tank_kill_in_wave_three() {
        let mut state = playing_state(2);
        state.wave = 3;
        let target = Vec2::new(300.0, 200.0);
        lone_enemy(&mut state, EnemyKind::Tank, target);

        for shot in 0..4 {
            bullet_arriving_at(&mut state, target);
            tick(&mut state, &TickInput::default());
            if shot < 3 {
                assert_eq!(state.enemies[0].hp, 3 - shot);
                assert!(state.enemies[0].hit);
                assert_eq!(state.score, 0);
            }
        }
        assert_eq!(state.score, 90);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_escape_costs_life_not_score() {
        let mut state = playing_state(3);
        let bottom = Vec2::new(300.0, state.viewport.height + ENEMY_ESCAPE_MARGIN + 0.5);
        let id = lone_enemy(&mut state, EnemyKind::Speeder, bottom);
        state.enemies[0].vel = Vec2::new(0.0, 1.0);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(
            events[0],
            GameEvent::LifeLost {
                enemy_id: id,
                remaining: 2
            }
        );
        assert_eq!(state.particles.len(), 12);
    }

    #[test]
    fn test_last_escape_ends_game_once() {
        let mut state = playing_state(4);
        state.lives = 1;
        let h = state.viewport.height;
        state.enemies.clear();
        for x in [100.0, 200.0, 300.0] {
            let id = state.next_entity_id();
            state.enemies.push(Enemy::new(
                id,
                EnemyKind::Drone,
                Vec2::new(x, h + 60.5),
                Vec2::new(0.0, 1.0),
            ));
        }

        let events = tick(&mut state, &TickInput::default());
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        // no new wave rolls in after the run ended
        assert!(state.enemies.is_empty());
        assert_eq!(state.wave, 1);

        let frozen = state.particles.len();
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert_eq!(state.particles.len(), frozen);
    }

    #[test]
    fn test_last_escape_stops_same_tick_kills() {
        let mut state = playing_state(8);
        state.lives = 1;
        let h = state.viewport.height;
        lone_enemy(&mut state, EnemyKind::Drone, Vec2::new(100.0, h + 60.5));
        state.enemies[0].vel = Vec2::new(0.0, 1.0);

        let target = Vec2::new(400.0, 200.0);
        let survivor = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(survivor, EnemyKind::Drone, target, Vec2::ZERO));
        bullet_arriving_at(&mut state, target);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::LifeLost { remaining: 0, .. }));
        assert_eq!(
            events[1],
            GameEvent::GameOver {
                score: state.score,
                wave: 1
            }
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, survivor);
        assert_eq!(state.enemies[0].hp, 1);
        assert!(!state.enemies[0].hit);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_escaping_enemy_is_never_flagged_hit() {
        let mut state = playing_state(10);
        let h = state.viewport.height;
        // Overlaps the bullet before moving, is past the escape line after
        let start = Vec2::new(300.0, h - 5.0);
        let id = lone_enemy(&mut state, EnemyKind::Drone, start);
        state.enemies[0].vel = Vec2::new(0.0, ENEMY_ESCAPE_MARGIN + 10.0);
        bullet_arriving_at(&mut state, start);

        // A survivor flagged last tick gets its flash cleared
        let flashed = state.next_entity_id();
        let mut other = Enemy::new(flashed, EnemyKind::Tank, Vec2::new(100.0, 100.0), Vec2::ZERO);
        other.hit = true;
        state.enemies.push(other);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(
            events,
            vec![GameEvent::LifeLost {
                enemy_id: id,
                remaining: START_LIVES - 1
            }]
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, flashed);
        assert!(!state.enemies[0].hit);
        // only the escape burst, no hit sparks
        assert_eq!(state.particles.len(), Burst::Escape.count());
    }

    #[test]
    fn test_wave_advances_after_settle_delay() {
        let mut state = playing_state(5);
        state.enemies.clear();

        for _ in 0..WAVE_SETTLE_TICKS {
            let events = tick(&mut state, &TickInput::default());
            assert!(events.is_empty());
            assert_eq!(state.wave, 1);
        }
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.wave, 2);
        assert_eq!(state.enemies.len(), 8);
        assert_eq!(
            events,
            vec![GameEvent::WaveStarted {
                wave: 2,
                enemies: 8
            }]
        );
        assert_eq!(state.wave_timer, 0);
    }

    #[test]
    fn test_wave_waits_while_enemies_alive() {
        let mut state = playing_state(6);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.wave, 1);
        assert_eq!(state.wave_timer, 0);
    }

    #[test]
    fn test_player_moves_during_tick() {
        let mut state = playing_state(7);
        let start = state.player.pos;
        let input = TickInput {
            movement: Movement {
                right: true,
                down: true,
                ..Default::default()
            },
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, start + Vec2::new(PLAYER_STEP, PLAYER_STEP));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing_state(99999);
        let mut state2 = playing_state(99999);

        let inputs = [
            TickInput::default(),
            TickInput {
                movement: Movement {
                    left: true,
                    ..Default::default()
                },
            },
            TickInput {
                movement: Movement {
                    up: true,
                    right: true,
                    ..Default::default()
                },
            },
        ];

        for i in 0..600 {
            if i % 15 == 0 {
                state1.fire(Vec2::new(400.0, 0.0));
                state2.fire(Vec2::new(400.0, 0.0));
            }
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.status(), state2.status());
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
