use std::time::Duration;

use engine::clock::TimeoutId;
use engine::scene::{Rgb, Scene};
use glam::Vec3;

use super::ball::{BALL_RADIUS, Ball};
use super::{EndReason, GameCtx, GameKind, GameTimer};
use crate::input::Controls;

pub const ARENA_WIDTH: f32 = 20.0;
pub const WALL_THICKNESS: f32 = 0.5;
pub const WALL_HEIGHT: f32 = 4.0;
pub const WALL_COLOR: Rgb = [0xad, 0x8b, 0x00];
pub const FLOOR_COLOR: Rgb = [0xd4, 0xb1, 0x06];
pub const ITEM_COLOR: Rgb = [0xff, 0xff, 0xff];

pub const ITEM_LIFETIME: Duration = Duration::from_millis(5_000);
pub const ITEM_RESPAWN_DELAY: Duration = Duration::from_millis(3_000);

const SPEED: f32 = 15.0;
const ITEM_SIZE: f32 = 1.0;
const ITEM_START: Vec3 = Vec3::new(5.0, 1.0, 0.0);
/// Wall centers sit this far from the middle.
const WALL_OFFSET: f32 = (ARENA_WIDTH - WALL_THICKNESS) / 2.0;
const INNER_HALF_WIDTH: f32 = ARENA_WIDTH / 2.0 - WALL_THICKNESS;
const BALL_LIMIT: f32 = INNER_HALF_WIDTH - BALL_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Item {
    position: Vec3,
    visible: bool,
    /// Run time the item last appeared; it shrinks from there until it expires.
    spawned_at: Duration,
}

/// A walled arena with one item to pick up before it shrinks away.
///
/// The item's expiry and respawn are timeouts on the run clock, so pausing the run pauses them too.
#[derive(Debug, Clone)]
pub struct CollectGame {
    ball: Ball,
    item: Item,
    item_scale: f32,
    pending: Option<TimeoutId>,
}

impl CollectGame {
    pub fn new() -> Self {
        Self {
            ball: Ball::new(Vec3::new(0.0, BALL_RADIUS, 0.0)),
            item: Item {
                position: ITEM_START,
                visible: true,
                spawned_at: Duration::ZERO,
            },
            item_scale: 1.0,
            pending: None,
        }
    }

    /// Back to the opening layout. While the game is in play this also starts the expiry countdown.
    pub fn reset(&mut self, ctx: &mut GameCtx<'_>) {
        self.cancel_pending(ctx);
        self.ball.reset();
        self.item = Item {
            position: ITEM_START,
            visible: true,
            spawned_at: ctx.run.elapsed(),
        };
        self.item_scale = 1.0;
        if ctx.run.is_active(GameKind::Collect) {
            self.arm(ctx, GameTimer::ItemExpired, ITEM_LIFETIME);
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn item_visible(&self) -> bool {
        self.item.visible
    }

    pub fn item_position(&self) -> Vec3 {
        self.item.position
    }

    /// 1 when the item appears, 0 when it expires.
    pub fn item_scale(&self) -> f32 {
        self.item_scale
    }

    pub fn step(&mut self, dt: f32, controls: &Controls, ctx: &mut GameCtx<'_>) -> Option<EndReason> {
        self.ball.velocity = velocity_for(controls);
        self.ball.integrate(dt, 0.0);
        self.ball.position.x = self.ball.position.x.clamp(-BALL_LIMIT, BALL_LIMIT);
        self.ball.position.z = self.ball.position.z.clamp(-BALL_LIMIT, BALL_LIMIT);

        let age = ctx.run.elapsed().saturating_sub(self.item.spawned_at);
        self.item_scale = 1.0 - (age.as_secs_f32() / ITEM_LIFETIME.as_secs_f32()).clamp(0.0, 1.0);

        if self.item.visible && self.ball.touches_box(self.item.position, Vec3::splat(ITEM_SIZE / 2.0)) {
            log::debug!("collect item picked up at {:?}", ctx.run.elapsed());
            self.item.visible = false;
            self.cancel_pending(ctx);
            self.arm(ctx, GameTimer::ItemRespawn, ITEM_RESPAWN_DELAY);
        }
        None
    }

    pub fn on_timer(&mut self, timer: GameTimer, ctx: &mut GameCtx<'_>) -> Option<EndReason> {
        self.pending = None;
        match timer {
            GameTimer::ItemExpired if self.item.visible => Some(EndReason::ItemExpired),
            GameTimer::ItemExpired => None,
            GameTimer::ItemRespawn => {
                self.item = Item {
                    position: Vec3::new(
                        ctx.rng.centered(INNER_HALF_WIDTH),
                        ITEM_SIZE / 2.0,
                        ctx.rng.centered(INNER_HALF_WIDTH),
                    ),
                    visible: true,
                    spawned_at: ctx.run.elapsed(),
                };
                self.item_scale = 1.0;
                self.arm(ctx, GameTimer::ItemExpired, ITEM_LIFETIME);
                None
            }
        }
    }

    fn arm(&mut self, ctx: &mut GameCtx<'_>, timer: GameTimer, delay: Duration) {
        self.pending = Some(ctx.run.schedule_game_timer(GameKind::Collect, timer, delay));
    }

    fn cancel_pending(&mut self, ctx: &mut GameCtx<'_>) {
        if let Some(id) = self.pending.take() {
            ctx.run.cancel_game_timer(id);
        }
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new("collect");
        scene.cuboid(
            Vec3::new(0.0, -0.05, 0.0),
            Vec3::new(ARENA_WIDTH, 0.1, ARENA_WIDTH),
            FLOOR_COLOR,
        );
        let y = WALL_HEIGHT / 2.0;
        let along_x = Vec3::new(ARENA_WIDTH, WALL_HEIGHT, WALL_THICKNESS);
        let along_z = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, ARENA_WIDTH);
        scene
            .cuboid(Vec3::new(0.0, y, WALL_OFFSET), along_x, WALL_COLOR)
            .cuboid(Vec3::new(0.0, y, -WALL_OFFSET), along_x, WALL_COLOR)
            .cuboid(Vec3::new(WALL_OFFSET, y, 0.0), along_z, WALL_COLOR)
            .cuboid(Vec3::new(-WALL_OFFSET, y, 0.0), along_z, WALL_COLOR);
        if self.item.visible && self.item_scale > 0.0 {
            scene.cuboid(
                self.item.position,
                Vec3::splat(ITEM_SIZE * self.item_scale),
                ITEM_COLOR,
            );
        }
        self.ball.draw(&mut scene);
        scene
    }
}

impl Default for CollectGame {
    fn default() -> Self {
        Self::new()
    }
}

fn velocity_for(controls: &Controls) -> Vec3 {
    let axis = |neg: bool, pos: bool| match (neg, pos) {
        (true, false) => -SPEED,
        (false, true) => SPEED,
        _ => 0.0,
    };
    Vec3::new(
        axis(controls.move_left, controls.move_right),
        0.0,
        axis(controls.move_up, controls.move_down),
    )
}
