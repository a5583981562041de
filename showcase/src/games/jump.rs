use engine::scene::{Rgb, Scene};
use glam::Vec3;

use super::ball::{BALL_RADIUS, Ball, Net};
use super::rng::Rng;
use super::EndReason;
use crate::input::Controls;

pub const STONE_COUNT: usize = 20;
pub const STONE_WIDTH: f32 = 3.0;
pub const STONE_HEIGHT: f32 = 0.2;
pub const STONE_SPEED: f32 = 5.0;
pub const STONE_COLOR: Rgb = [0x19, 0x15, 0x7d];

const GRAVITY: f32 = -15.0;
const JUMP_SPEED: f32 = 7.0;
/// A missing stone is parked this high, out of the ball's reach.
const GAP_HEIGHT: f32 = 15.0;
const WRAP_AT: f32 = -(STONE_COUNT as f32 / 2.0) * STONE_WIDTH;
const WRAP_BY: f32 = STONE_COUNT as f32 * STONE_WIDTH;
const STONE_TOP: f32 = STONE_HEIGHT / 2.0;
/// Ball heights that count as standing on a stone.
const JUMP_BAND: (f32, f32) = (0.45, STONE_TOP + BALL_RADIUS + 1e-3);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Stone {
    x: f32,
    y: f32,
}

impl Stone {
    fn start(index: usize) -> Self {
        // Stones are numbered from 1 so the row is centered on the origin.
        let i = index as f32 + 1.0;
        Self {
            x: STONE_WIDTH * (i - STONE_COUNT as f32 / 2.0 + 0.5),
            y: 0.0,
        }
    }

    fn is_solid(&self) -> bool {
        self.y < GAP_HEIGHT
    }

    fn covers(&self, x: f32) -> bool {
        (x - self.x).abs() <= STONE_WIDTH / 2.0
    }
}

/// A row of stones streams under the ball; Shift hops over the missing ones.
#[derive(Debug, Clone)]
pub struct JumpGame {
    ball: Ball,
    stones: Vec<Stone>,
    gap_chance: f32,
    prev_solid: bool,
    net: Net,
}

impl JumpGame {
    pub fn new(gap_chance: f32) -> Self {
        Self {
            ball: Ball::new(Vec3::new(0.02, 0.75, 0.0)),
            stones: (0..STONE_COUNT).map(Stone::start).collect(),
            gap_chance,
            prev_solid: true,
            net: Net::default(),
        }
    }

    pub fn reset(&mut self) {
        self.ball.reset();
        for (i, stone) in self.stones.iter_mut().enumerate() {
            *stone = Stone::start(i);
        }
        self.prev_solid = true;
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn step(&mut self, dt: f32, controls: &Controls, rng: &mut Rng) -> Option<EndReason> {
        for stone in &mut self.stones {
            stone.x -= STONE_SPEED * dt;
            if stone.x <= WRAP_AT {
                stone.x += WRAP_BY;
                // Never two holes in a row, or the ball could not clear them.
                let solid = !self.prev_solid || !rng.chance(self.gap_chance);
                stone.y = if solid { 0.0 } else { GAP_HEIGHT };
                self.prev_solid = solid;
            }
        }

        let y = self.ball.position.y;
        if controls.shift && (JUMP_BAND.0..=JUMP_BAND.1).contains(&y) {
            self.ball.velocity.y = JUMP_SPEED;
        }

        let prev_bottom = self.ball.bottom();
        self.ball.integrate(dt, GRAVITY);
        let supported = self
            .stones
            .iter()
            .any(|s| s.is_solid() && s.covers(self.ball.position.x));
        if supported && prev_bottom >= STONE_TOP && self.ball.bottom() < STONE_TOP {
            self.ball.position.y = STONE_TOP + BALL_RADIUS;
            self.ball.velocity.y = 0.0;
        }

        self.net
            .catches(self.ball.position)
            .then_some(EndReason::FellThroughNet)
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new("jump");
        let size = Vec3::new(STONE_WIDTH, STONE_HEIGHT, STONE_WIDTH);
        for stone in self.stones.iter().filter(|s| s.is_solid()) {
            scene.cuboid(Vec3::new(stone.x, stone.y, 0.0), size, STONE_COLOR);
        }
        self.ball.draw(&mut scene);
        scene
    }
}
