//! Per-frame simulation step
//!
//! Order matters: timers, horizontal intent, jump, gravity, platform sweep,
//! commit, crouch resize, fall check, coins, then camera and animation. Jump
//! is evaluated before collision so a request on the landing frame spends the
//! previous frame's budget.

use glam::Vec2;

use super::collision::{Rect, SweepResult, sweep_platforms, touching_coins};
use super::state::{GameEvent, Simulation};
use crate::consts::{FALLBACK_SPAWN_HEIGHT_FRACTION, FALLBACK_SPAWN_X, RUN_SPEED_THRESHOLD};
use crate::clamp_span;
use crate::input::TickInput;

impl Simulation {
    /// Advance by `dt` seconds (already clamped by the caller).
    /// Returns false if `dt` was rejected.
    pub fn advance(&mut self, input: &TickInput, dt: f32) -> bool {
        advance(self, input, dt)
    }
}

/// Advance the simulation by one frame
pub fn advance(sim: &mut Simulation, input: &TickInput, dt: f32) -> bool {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Rejected frame with dt = {dt}");
        return false;
    }

    sim.events.clear();
    sim.frame += 1;

    if sim.phase.is_gated() {
        sim.hero.vel = Vec2::ZERO;
        finish_frame(sim, dt);
        return true;
    }

    let was_grounded = sim.hero.grounded;

    tick_timers(sim, dt);
    if apply_intent(sim, input) {
        sim.emit(GameEvent::Jumped);
    }

    let sweep = integrate(sim, dt);
    if sweep.bonked {
        sim.emit(GameEvent::Bonked);
    }
    if sim.hero.grounded && !was_grounded {
        sim.emit(GameEvent::Landed);
    }

    settle_height(sim);
    check_fall(sim);
    if !sim.phase.is_game_over() {
        collect_coins(sim);
    }

    finish_frame(sim, dt);
    true
}

/// Count grace windows down, never below zero
fn tick_timers(sim: &mut Simulation, dt: f32) {
    let hero = &mut sim.hero;
    hero.control_lock = (hero.control_lock - dt).max(0.0);
    hero.invulnerability = (hero.invulnerability - dt).max(0.0);
    if hero.invulnerability > 0.0 {
        hero.blink_timer += dt;
    } else {
        hero.blink_timer = 0.0;
    }
}

/// Horizontal velocity, facing, crouch and jump. Returns true on a jump.
fn apply_intent(sim: &mut Simulation, input: &TickInput) -> bool {
    let tuning = &sim.tuning;
    let hero = &mut sim.hero;

    if hero.control_lock > 0.0 {
        hero.vel.x = 0.0;
        hero.crouching = false;
        return false;
    }

    hero.crouching = input.crouch && hero.grounded;
    let speed = if hero.crouching {
        tuning.crouch_speed
    } else {
        tuning.speed
    };
    let direction = input.direction();
    hero.vel.x = direction * speed;
    if direction != 0.0 {
        hero.facing = direction;
    }

    if input.jump && hero.jump_count < tuning.max_jumps {
        hero.vel.y = tuning.jump_velocity;
        hero.grounded = false;
        hero.crouching = false;
        hero.ground_y = None;
        hero.jump_count += 1;
        return true;
    }
    false
}

/// Gravity, platform sweep and commit
fn integrate(sim: &mut Simulation, dt: f32) -> SweepResult {
    let hero = &mut sim.hero;
    hero.vel.y += sim.tuning.gravity * dt;

    let next = hero.pos + hero.vel * dt;
    let sweep = sweep_platforms(
        hero.pos,
        next,
        hero.vel.y,
        Vec2::new(hero.width, hero.height),
        &sim.platforms,
    );

    hero.vel.y = sweep.vy;
    hero.pos = sweep.next;
    match sweep.landed_on {
        Some(index) => {
            hero.grounded = true;
            hero.jump_count = 0;
            hero.ground_y = sim.platforms.get(index).map(|p| p.y);
            hero.last_safe_platform = Some(index);
            hero.last_safe_x = hero.pos.x;
        }
        None => {
            hero.grounded = false;
            hero.crouching = false;
            hero.ground_y = None;
        }
    }
    hero.clamp_x(sim.world.width);

    sweep
}

/// Grow or shrink between stand and crouch height, feet planted
fn settle_height(sim: &mut Simulation) {
    let target = if sim.hero.crouching {
        sim.tuning.crouch_height
    } else {
        sim.tuning.stand_height
    };
    if sim.hero.height != target {
        sim.hero.resize_keeping_feet(target, &sim.tuning);
        sim.hero.clamp_x(sim.world.width);
    }
}

fn check_fall(sim: &mut Simulation) {
    if sim.hero.is_invulnerable() || sim.phase.is_game_over() {
        return;
    }
    if sim.hero.bottom() > sim.fall_threshold() {
        lose_life(sim);
    }
}

fn lose_life(sim: &mut Simulation) {
    sim.progress.lives = sim.progress.lives.saturating_sub(1);
    let lives_left = sim.progress.lives;
    log::info!("Life lost, {lives_left} left");
    sim.emit(GameEvent::LifeLost { lives_left });

    if lives_left == 0 {
        let hero = &mut sim.hero;
        hero.vel = Vec2::ZERO;
        hero.control_lock = f32::INFINITY;
        hero.crouching = false;
        sim.phase.enter_game_over();
        sim.emit(GameEvent::GameOver);
    } else {
        respawn(sim);
    }
}

/// Put the hero back where it last landed, with a grace window
fn respawn(sim: &mut Simulation) {
    let tuning = &sim.tuning;
    let anchor = sim.respawn_point().copied();
    let hero = &mut sim.hero;

    hero.height = tuning.stand_height;
    hero.width = tuning.width_for_height(hero.height);
    match anchor {
        Some(platform) => {
            let x = clamp_span(hero.last_safe_x, platform.x, platform.right() - hero.width);
            hero.pos = Vec2::new(x, platform.y - hero.height);
            hero.ground_y = Some(platform.y);
        }
        None => {
            hero.pos = Vec2::new(
                FALLBACK_SPAWN_X,
                sim.world.height * FALLBACK_SPAWN_HEIGHT_FRACTION,
            );
            hero.ground_y = None;
        }
    }
    hero.clamp_x(sim.world.width);

    hero.vel = Vec2::ZERO;
    hero.grounded = true;
    hero.crouching = false;
    hero.jump_count = 0;
    hero.control_lock = tuning.respawn_control_lock;
    hero.invulnerability = tuning.respawn_invulnerability;
    hero.blink_timer = 0.0;

    log::debug!(
        "Respawned at ({:.1}, {:.1}){}",
        hero.pos.x,
        hero.pos.y,
        if anchor.is_some() { "" } else { " (fallback)" }
    );
    sim.emit(GameEvent::Respawned);
}

fn collect_coins(sim: &mut Simulation) {
    let body = Rect::from(&sim.hero);
    let hits: Vec<usize> = touching_coins(&body, &sim.coins).collect();
    for index in hits {
        sim.coins[index].collected = true;
        sim.progress.coins_collected += 1;
        sim.emit(GameEvent::CoinCollected { index });
    }
}

/// Camera, run cycle and coin spin. Runs on gated frames too.
fn finish_frame(sim: &mut Simulation, dt: f32) {
    sim.camera.follow(sim.hero.center(), sim.world);

    for coin in &mut sim.coins {
        coin.animate(dt);
    }

    let tuning = &sim.tuning;
    let hero = &mut sim.hero;
    let should_run = hero.vel.x.abs() > RUN_SPEED_THRESHOLD && hero.grounded && !hero.crouching;
    if should_run {
        hero.anim_timer += dt;
        if hero.anim_timer >= tuning.anim_frame_duration {
            hero.anim_frame = (hero.anim_frame + 1) % tuning.anim_frame_count;
            hero.anim_timer = 0.0;
        }
    } else {
        hero.anim_frame = 0;
        hero.anim_timer = 0.0;
    }

    if should_run != hero.running {
        hero.running = should_run;
        sim.emit(GameEvent::RunningChanged {
            running: should_run,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::{LayoutPolicy, Level};
    use crate::sim::phase::GamePhase;
    use crate::sim::state::{Coin, Platform, PlatformKind, Viewport, World};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 0.016;

    fn floor() -> Platform {
        Platform::new(0.0, 400.0, 2000.0, 24.0, PlatformKind::Ground)
    }

    /// 2000-wide world, 800x450 view, one floor at y=400, hero at x=120
    fn flat_sim_with(platforms: Vec<Platform>, coins: Vec<Coin>) -> Simulation {
        let level = Level {
            world: World {
                width: 2000.0,
                height: 450.0,
            },
            platforms,
            coins,
            spawn: 0,
        };
        let mut sim = Simulation::with_level(Tuning::default(), Viewport::new(800.0, 450.0), level);
        assert!(sim.start());
        sim
    }

    fn flat_sim() -> Simulation {
        flat_sim_with(vec![floor()], Vec::new())
    }

    /// Put the hero in the air above the floor
    fn airborne(sim: &mut Simulation, jump_count: u8) {
        sim.hero.pos.y = 100.0;
        sim.hero.vel = Vec2::ZERO;
        sim.hero.grounded = false;
        sim.hero.ground_y = None;
        sim.hero.jump_count = jump_count;
    }

    /// Drop the hero below the fall line
    fn push_off_world(sim: &mut Simulation) {
        sim.hero.pos.y = sim.fall_threshold() + 10.0;
        sim.hero.grounded = false;
    }

    #[test]
    fn test_run_right_for_sixty_frames() {
        let mut sim = flat_sim();
        assert_eq!(sim.hero.pos.x, 120.0);
        for _ in 0..60 {
            sim.advance(&TickInput::right(), DT);
        }
        let expected = 120.0 + 220.0 * DT * 60.0;
        assert!((sim.hero.pos.x - expected).abs() < 0.01, "x = {}", sim.hero.pos.x);
        assert!(sim.hero.pos.x <= 2000.0 - sim.hero.width);
        assert!(sim.hero.grounded);
        assert_eq!(sim.hero.facing, 1.0);
    }

    #[test]
    fn test_standing_hero_stays_planted() {
        let mut sim = flat_sim();
        for _ in 0..120 {
            sim.advance(&TickInput::default(), DT);
            assert!(sim.hero.grounded);
            assert!((sim.hero.bottom() - 400.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_double_jump_then_refusal() {
        let mut sim = flat_sim();
        airborne(&mut sim, 1);

        sim.advance(&TickInput::jump(), DT);
        assert_eq!(sim.hero.jump_count, 2);
        let expected = sim.tuning.jump_velocity + sim.tuning.gravity * DT;
        assert!((sim.hero.vel.y - expected).abs() < 1e-3);
        assert!(sim.events().contains(&GameEvent::Jumped));

        let vy_before = sim.hero.vel.y;
        sim.advance(&TickInput::jump(), DT);
        assert_eq!(sim.hero.jump_count, 2);
        // Only gravity acted
        assert!((sim.hero.vel.y - (vy_before + sim.tuning.gravity * DT)).abs() < 1e-3);
        assert!(!sim.events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_landing_resets_jump_budget() {
        let mut sim = flat_sim();
        sim.advance(&TickInput::jump(), DT);
        sim.advance(&TickInput::jump(), DT);
        assert_eq!(sim.hero.jump_count, 2);
        assert!(!sim.hero.grounded);

        let mut landed = false;
        for _ in 0..300 {
            sim.advance(&TickInput::default(), DT);
            if sim.events().contains(&GameEvent::Landed) {
                landed = true;
                assert!(sim.hero.grounded);
                assert_eq!(sim.hero.jump_count, 0);
                assert_eq!(sim.hero.ground_y, Some(400.0));
                break;
            }
        }
        assert!(landed, "hero never came back down");
    }

    #[test]
    fn test_jump_on_landing_frame_uses_previous_budget() {
        let mut sim = flat_sim();
        airborne(&mut sim, 2);
        // Just above the floor and falling fast enough to land this frame
        sim.hero.pos.y = 400.0 - sim.hero.height - 1.0;
        sim.hero.vel.y = 200.0;

        sim.advance(&TickInput::jump(), DT);
        assert!(!sim.events().contains(&GameEvent::Jumped));
        assert!(sim.hero.grounded);
        assert_eq!(sim.hero.jump_count, 0);
    }

    #[test]
    fn test_fast_fall_lands_at_max_frame_dt() {
        let mut sim = flat_sim();
        airborne(&mut sim, 0);
        sim.hero.pos.y = -600.0;
        let dt = crate::consts::MAX_FRAME_DT;
        for _ in 0..200 {
            sim.advance(&TickInput::default(), dt);
            if sim.hero.grounded {
                break;
            }
        }
        assert!(sim.hero.grounded);
        assert!((sim.hero.bottom() - 400.0).abs() < 1e-3);
        assert_eq!(sim.progress.lives, 3);
    }

    #[test]
    fn test_ceiling_bonk() {
        // Low ledge with its underside 10px above the hero's head
        let head_y = 400.0 - 118.0;
        let ledge = Platform::new(0.0, head_y - 10.0 - 24.0, 600.0, 24.0, PlatformKind::Ledge {
            skip_coins: true,
        });
        let mut sim = flat_sim_with(vec![floor(), ledge], Vec::new());
        sim.advance(&TickInput::jump(), DT);
        let mut bonked = false;
        for _ in 0..5 {
            if sim.events().contains(&GameEvent::Bonked) {
                bonked = true;
                break;
            }
            sim.advance(&TickInput::default(), DT);
        }
        assert!(bonked);
        assert!(sim.hero.vel.y >= 0.0);
        assert!(sim.hero.pos.y >= head_y - 10.0 - 1e-3);
    }

    #[test]
    fn test_crouch_lowers_height_and_speed() {
        let mut sim = flat_sim();
        let input = TickInput {
            crouch: true,
            right: true,
            ..Default::default()
        };
        sim.advance(&input, DT);
        assert!(sim.hero.crouching);
        assert_eq!(sim.hero.height, sim.tuning.crouch_height);
        assert!((sim.hero.bottom() - 400.0).abs() < 1e-3);
        assert_eq!(sim.hero.vel.x, sim.tuning.crouch_speed);
        assert!(!sim.hero.running);

        sim.advance(&TickInput::default(), DT);
        assert!(!sim.hero.crouching);
        assert_eq!(sim.hero.height, sim.tuning.stand_height);
        assert!((sim.hero.bottom() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_crouch_in_air_is_ignored() {
        let mut sim = flat_sim();
        airborne(&mut sim, 1);
        let input = TickInput {
            crouch: true,
            ..Default::default()
        };
        sim.advance(&input, DT);
        assert!(!sim.hero.crouching);
        assert_eq!(sim.hero.height, sim.tuning.stand_height);
    }

    #[test]
    fn test_crouched_walk_off_stands_up_without_snapping() {
        // Short ledge over a pit; the floor is far below
        let ledge = Platform::new(0.0, 300.0, 200.0, 24.0, PlatformKind::Ledge {
            skip_coins: true,
        });
        let mut sim = flat_sim_with(vec![ledge, floor()], Vec::new());
        let input = TickInput {
            crouch: true,
            right: true,
            ..Default::default()
        };

        let mut left_ledge = false;
        for _ in 0..120 {
            let bottom = sim.hero.bottom();
            let was_grounded = sim.hero.grounded;
            sim.advance(&input, DT);
            if was_grounded && !sim.hero.grounded {
                left_ledge = true;
                assert_eq!(sim.hero.height, sim.tuning.stand_height);
                assert!(!sim.hero.crouching);
                // Feet carry on from where they were, only gravity moved them
                assert!(sim.hero.bottom() >= bottom);
                assert!(sim.hero.bottom() - bottom < 1.0);
                assert!(sim.hero.bottom() > 300.0);
                break;
            }
            assert!(sim.hero.crouching);
            assert_eq!(sim.hero.height, sim.tuning.crouch_height);
        }
        assert!(left_ledge, "hero never walked off the ledge");

        sim.advance(&TickInput::default(), DT);
        assert!(!sim.hero.grounded);
        assert!(sim.hero.bottom() > 300.0);
    }

    #[test]
    fn test_respawn_returns_to_landing_spot() {
        let coin = Coin::above(&floor(), 22.0, 6.0);
        let mut sim = flat_sim_with(vec![floor()], vec![coin]);
        sim.advance(&TickInput::default(), DT);
        assert_eq!(sim.hero.last_safe_x, 120.0);

        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);
        assert!(sim.events().contains(&GameEvent::Respawned));
        assert_eq!(sim.hero.pos.x, 120.0);
        // Coin in the middle of the floor stays where it is
        assert!(!sim.coins[0].collected);
        assert_eq!(sim.progress.coins_collected, 0);
    }

    #[test]
    fn test_respawn_clamps_landing_spot_onto_platform() {
        let ledge = Platform::new(300.0, 400.0, 200.0, 24.0, PlatformKind::Ledge {
            skip_coins: true,
        });
        let mut sim = flat_sim_with(vec![ledge], Vec::new());
        // Landed hanging off the right edge
        sim.hero.last_safe_x = 480.0;
        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);
        assert_eq!(sim.hero.pos.x, 500.0 - sim.hero.width);
    }

    #[test]
    fn test_zero_frame_count_tuning_is_replaced() {
        let broken = Tuning {
            anim_frame_count: 0,
            ..Default::default()
        };
        let level = Level {
            world: World {
                width: 2000.0,
                height: 450.0,
            },
            platforms: vec![floor()],
            coins: Vec::new(),
            spawn: 0,
        };
        let mut sim = Simulation::with_level(broken, Viewport::new(800.0, 450.0), level);
        sim.start();
        for _ in 0..30 {
            assert!(sim.advance(&TickInput::right(), DT));
        }
        assert!(sim.hero.anim_frame < sim.tuning.anim_frame_count);
    }

    #[test]
    fn test_last_life_fall_ends_run() {
        let mut sim = flat_sim();
        sim.progress.lives = 1;
        push_off_world(&mut sim);

        sim.advance(&TickInput::right(), DT);
        assert_eq!(sim.progress.lives, 0);
        assert!(sim.is_game_over());
        assert_eq!(sim.hero.vel, Vec2::ZERO);
        assert!(sim.hero.control_lock.is_infinite());
        assert!(sim.events().contains(&GameEvent::GameOver));

        // Nothing moves afterwards
        let pos = sim.hero.pos;
        sim.advance(&TickInput::right(), DT);
        assert_eq!(sim.hero.pos, pos);
        assert_eq!(sim.progress.lives, 0);
    }

    #[test]
    fn test_respawn_grace_window() {
        let mut sim = flat_sim();
        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);

        assert_eq!(sim.progress.lives, 2);
        assert!(sim.events().contains(&GameEvent::LifeLost { lives_left: 2 }));
        assert!(sim.events().contains(&GameEvent::Respawned));
        assert_eq!(sim.hero.control_lock, sim.tuning.respawn_control_lock);
        assert_eq!(sim.hero.invulnerability, sim.tuning.respawn_invulnerability);
        assert_eq!(sim.hero.jump_count, 0);
        assert!(sim.hero.grounded);

        let anchor = *sim.respawn_point().unwrap();
        assert!((sim.hero.bottom() - anchor.y).abs() < 1e-3);

        // Input is dead while the lock runs
        let x = sim.hero.pos.x;
        let mut frames = 0;
        while sim.hero.control_lock > 2.0 * DT {
            sim.advance(&TickInput::right(), DT);
            sim.advance(&TickInput::jump(), DT);
            assert_eq!(sim.hero.pos.x, x);
            assert_eq!(sim.hero.jump_count, 0);
            frames += 2;
        }
        assert!(frames >= 30);

        // Second fall while invulnerable is free
        assert!(sim.hero.is_invulnerable());
        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);
        assert_eq!(sim.progress.lives, 2);
    }

    #[test]
    fn test_control_returns_after_lock() {
        let mut sim = flat_sim();
        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);
        let frames = (sim.tuning.respawn_control_lock / DT).ceil() as usize + 1;
        for _ in 0..frames {
            sim.advance(&TickInput::default(), DT);
        }
        assert_eq!(sim.hero.control_lock, 0.0);
        let x = sim.hero.pos.x;
        sim.advance(&TickInput::right(), DT);
        assert!(sim.hero.pos.x > x);
    }

    #[test]
    fn test_fallback_respawn_without_safe_platform() {
        let mut sim = flat_sim();
        sim.hero.last_safe_platform = None;
        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);
        assert_eq!(sim.progress.lives, 2);
        assert_eq!(sim.hero.pos, Vec2::new(80.0, 450.0 * 0.25));
        assert!(sim.hero.ground_y.is_none());
    }

    #[test]
    fn test_coin_counts_once() {
        let coin = Coin::above(&floor(), 22.0, 6.0);
        let mut sim = flat_sim_with(vec![floor()], vec![coin]);
        // Park the hero on top of the coin
        sim.hero.pos.x = sim.coins[0].x;
        for _ in 0..30 {
            sim.advance(&TickInput::default(), DT);
        }
        assert!(sim.coins[0].collected);
        assert_eq!(sim.progress.coins_collected, 1);
    }

    #[test]
    fn test_coin_event_carries_index() {
        let far_ledge = Platform::new(1500.0, 400.0, 100.0, 24.0, PlatformKind::Ground);
        let far = Coin::above(&far_ledge, 22.0, 6.0);
        let near = Coin::above(&floor(), 22.0, 6.0);
        let mut sim = flat_sim_with(vec![floor()], vec![far, near]);
        sim.hero.pos.x = sim.coins[1].x;
        sim.advance(&TickInput::default(), DT);
        assert_eq!(sim.events(), &[GameEvent::CoinCollected { index: 1 }]);
        assert!(!sim.coins[0].collected);
    }

    #[test]
    fn test_awaiting_start_gates_everything() {
        let level = crate::sim::layout::build_level(
            &LayoutPolicy::default(),
            Viewport::new(800.0, 450.0),
            &Tuning::default(),
        );
        let mut sim = Simulation::with_level(Tuning::default(), Viewport::new(800.0, 450.0), level);
        assert_eq!(sim.phase(), GamePhase::AwaitingStart);
        let pos = sim.hero.pos;
        for _ in 0..10 {
            sim.advance(&TickInput::right(), DT);
            sim.advance(&TickInput::jump(), DT);
        }
        assert_eq!(sim.hero.pos, pos);
        assert_eq!(sim.hero.vel, Vec2::ZERO);
        assert_eq!(sim.hero.jump_count, 0);
    }

    #[test]
    fn test_orientation_block_freezes_without_touching_counters() {
        let mut sim = flat_sim();
        sim.advance(&TickInput::right(), DT);
        sim.set_orientation_blocked(true);
        let pos = sim.hero.pos;
        push_off_world(&mut sim);
        let fallen = sim.hero.pos;
        sim.advance(&TickInput::right(), DT);
        assert_eq!(sim.hero.pos, fallen);
        assert_eq!(sim.progress.lives, 3);
        assert_ne!(pos, fallen);

        sim.set_orientation_blocked(false);
        sim.advance(&TickInput::default(), DT);
        assert_eq!(sim.progress.lives, 2);
    }

    #[test]
    fn test_non_finite_dt_is_rejected() {
        let mut sim = flat_sim();
        let pos = sim.hero.pos;
        assert!(!sim.advance(&TickInput::right(), f32::NAN));
        assert!(!sim.advance(&TickInput::right(), f32::INFINITY));
        assert!(!sim.advance(&TickInput::right(), -0.01));
        assert_eq!(sim.hero.pos, pos);
        assert!(sim.hero.pos.is_finite());
    }

    #[test]
    fn test_running_edges() {
        let mut sim = flat_sim();
        sim.advance(&TickInput::right(), DT);
        assert!(sim.events().contains(&GameEvent::RunningChanged { running: true }));
        sim.advance(&TickInput::right(), DT);
        assert!(!sim.events().iter().any(|e| matches!(e, GameEvent::RunningChanged { .. })));
        sim.advance(&TickInput::default(), DT);
        assert!(sim.events().contains(&GameEvent::RunningChanged { running: false }));
        assert_eq!(sim.hero.anim_frame, 0);
    }

    #[test]
    fn test_run_cycle_advances() {
        let mut sim = flat_sim();
        for _ in 0..4 {
            sim.advance(&TickInput::right(), DT);
        }
        // 0.064s of running crosses one 0.055s frame boundary
        assert_eq!(sim.hero.anim_frame, 1);
    }

    #[test]
    fn test_clamped_at_world_edges() {
        let mut sim = flat_sim();
        for _ in 0..100 {
            sim.advance(&TickInput::left(), DT);
        }
        assert_eq!(sim.hero.pos.x, 0.0);
        assert_eq!(sim.hero.facing, -1.0);

        sim.hero.pos.x = 1990.0 - sim.hero.width;
        for _ in 0..10 {
            sim.advance(&TickInput::right(), DT);
        }
        assert_eq!(sim.hero.pos.x, 2000.0 - sim.hero.width);
    }

    #[test]
    fn test_restart_after_game_over() {
        let policy = LayoutPolicy::default();
        let mut sim = Simulation::new(Tuning::default(), Viewport::new(800.0, 450.0), &policy);
        sim.start();
        sim.progress.lives = 1;
        push_off_world(&mut sim);
        sim.advance(&TickInput::default(), DT);
        assert!(sim.is_game_over());

        assert!(sim.restart(&policy));
        assert_eq!(sim.phase(), GamePhase::AwaitingStart);
        assert_eq!(sim.progress.lives, 3);
        assert_eq!(sim.hero.control_lock, 0.0);
        assert!(sim.start());
        let x = sim.hero.pos.x;
        sim.advance(&TickInput::right(), DT);
        assert!(sim.hero.pos.x > x);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(left, right, crouch, jump)| TickInput {
                left,
                right,
                crouch,
                jump,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_core_invariants_hold(
            inputs in proptest::collection::vec(arb_input(), 1..400),
            dt in 0.001f32..crate::consts::MAX_FRAME_DT,
        ) {
            let kind = PlatformKind::Ledge { skip_coins: false };
            let ledge = Platform::new(600.0, 280.0, 300.0, 24.0, kind);
            let coin = Coin::above(&ledge, 22.0, 6.0);
            let mut sim = flat_sim_with(vec![floor(), ledge], vec![coin]);
            let mut lives = sim.progress.lives;
            let mut coins = sim.progress.coins_collected;
            for input in &inputs {
                let was_grounded = sim.hero.grounded;
                sim.advance(input, dt);
                let hero = &sim.hero;
                prop_assert!(hero.jump_count <= sim.tuning.max_jumps);
                prop_assert!(hero.pos.x >= 0.0);
                prop_assert!(hero.pos.x <= sim.world.width - hero.width + 1e-3);
                prop_assert!(!hero.crouching || hero.grounded);
                prop_assert!(hero.control_lock >= 0.0 && hero.invulnerability >= 0.0);
                prop_assert!(
                    hero.height == sim.tuning.stand_height
                        || hero.height == sim.tuning.crouch_height
                );
                if hero.grounded && !was_grounded {
                    prop_assert_eq!(hero.jump_count, 0);
                }
                prop_assert!(sim.progress.lives <= lives);
                prop_assert!(sim.progress.coins_collected >= coins);
                prop_assert!(sim.progress.coins_collected <= 1);
                lives = sim.progress.lives;
                coins = sim.progress.coins_collected;
            }
        }

        #[test]
        fn prop_jump_requests_never_exceed_budget(
            jumps in proptest::collection::vec(any::<bool>(), 1..60),
        ) {
            let mut sim = flat_sim();
            airborne(&mut sim, 0);
            sim.hero.pos.y = -2000.0;
            let mut accepted = 0u32;
            for jump in jumps {
                sim.advance(&TickInput { jump, ..Default::default() }, DT);
                if sim.events().contains(&GameEvent::Jumped) {
                    accepted += 1;
                }
                prop_assert!(!sim.hero.grounded, "should still be airborne");
            }
            prop_assert!(accepted <= sim.tuning.max_jumps as u32);
        }
    }
}
