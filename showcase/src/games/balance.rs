use engine::scene::{Rgb, Scene};
use glam::{Vec2, Vec3};

use super::ball::{Ball, Net};
use super::EndReason;
use crate::input::Controls;

pub const BEAM_LENGTH: f32 = 8.0;
pub const BEAM_THICKNESS: f32 = 0.5;
pub const BEAM_DEPTH: f32 = 1.0;
pub const BEAM_COLOR: Rgb = [0xcc, 0x33, 0x29];
const PIVOT_COLOR: Rgb = [0x33, 0x33, 0x33];

const BEAM_MASS: f32 = 10.0;
const BALL_MASS: f32 = 0.5;
const GRAVITY: f32 = 4.0;
const TORQUE: f32 = 150.0;
const ANGULAR_DAMPING: f32 = 0.01;
/// Ball center height above the beam's axis while it rests on top.
const REST_HEIGHT: f32 = 0.75;
const BEAM_SEGMENTS: usize = 8;
const SPAWN_OFFSET: f32 = 0.02;

fn beam_inertia() -> f32 {
    BEAM_MASS * (BEAM_LENGTH * BEAM_LENGTH + BEAM_THICKNESS * BEAM_THICKNESS) / 12.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BallState {
    /// Distance and speed along the beam from the pivot.
    OnBeam { offset: f32, speed: f32 },
    Falling,
}

/// A beam on a hinge with a ball on top; Left / Right push the beam to keep the ball on it.
#[derive(Debug, Clone)]
pub struct BalanceGame {
    angle: f32,
    angular_velocity: f32,
    ball_state: BallState,
    ball: Ball,
    net: Net,
}

impl BalanceGame {
    pub fn new() -> Self {
        let mut game = Self {
            angle: 0.0,
            angular_velocity: 0.0,
            ball_state: BallState::OnBeam {
                offset: SPAWN_OFFSET,
                speed: 0.0,
            },
            ball: Ball::new(Vec3::new(SPAWN_OFFSET, REST_HEIGHT, 0.0)),
            net: Net::default(),
        };
        game.place_ball();
        game
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_on_beam(&self) -> bool {
        matches!(self.ball_state, BallState::OnBeam { .. })
    }

    fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    pub fn step(&mut self, dt: f32, controls: &Controls) -> Option<EndReason> {
        let mut torque = 0.0;
        if controls.left {
            torque += TORQUE;
        }
        if controls.right {
            torque -= TORQUE;
        }

        let mut inertia = beam_inertia();
        if let BallState::OnBeam { offset, .. } = self.ball_state {
            torque -= BALL_MASS * GRAVITY * offset * self.angle.cos();
            inertia += BALL_MASS * offset * offset;
        }
        self.angular_velocity += torque / inertia * dt;
        self.angular_velocity *= (1.0 - ANGULAR_DAMPING).powf(dt);
        self.angle += self.angular_velocity * dt;

        match self.ball_state {
            BallState::OnBeam { offset, speed } => {
                let speed = speed - GRAVITY * self.angle.sin() * dt;
                let offset = offset + speed * dt;
                self.ball_state = BallState::OnBeam { offset, speed };
                self.place_ball();
                // Past an end, or the beam has turned over and no longer holds it up.
                if offset.abs() > BEAM_LENGTH / 2.0 || self.angle.cos() <= 0.0 {
                    let along = self.direction() * speed;
                    self.ball.velocity = Vec3::new(along.x, along.y, 0.0);
                    self.ball_state = BallState::Falling;
                }
            }
            BallState::Falling => self.ball.integrate(dt, -GRAVITY),
        }

        self.net
            .catches(self.ball.position)
            .then_some(EndReason::FellThroughNet)
    }

    fn place_ball(&mut self) {
        if let BallState::OnBeam { offset, speed } = self.ball_state {
            let dir = self.direction();
            let normal = dir.perp();
            let p = dir * offset + normal * REST_HEIGHT;
            self.ball.position = Vec3::new(p.x, p.y, 0.0);
            let v = dir * speed;
            self.ball.velocity = Vec3::new(v.x, v.y, 0.0);
        }
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new("balance");
        let dir = self.direction();
        let segment = BEAM_LENGTH / BEAM_SEGMENTS as f32;
        // The renderer only knows axis-aligned boxes, so the tilted beam is a staircase of blocks.
        for k in 0..BEAM_SEGMENTS {
            let along = (k as f32 + 0.5) * segment - BEAM_LENGTH / 2.0;
            let c = dir * along;
            scene.cuboid(
                Vec3::new(c.x, c.y, 0.0),
                Vec3::new(segment, BEAM_THICKNESS, BEAM_DEPTH),
                BEAM_COLOR,
            );
        }
        scene.cuboid(Vec3::ZERO, Vec3::new(0.2, 0.2, 1.2), PIVOT_COLOR);
        self.ball.draw(&mut scene);
        scene
    }
}

impl Default for BalanceGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn hold(left: bool, right: bool) -> Controls {
        Controls {
            left,
            right,
            ..Controls::default()
        }
    }

    #[test]
    fn ball_starts_resting_on_the_level_beam() {
        let game = BalanceGame::new();
        assert_eq!(game.angle(), 0.0);
        assert!(game.ball_on_beam());
        assert!((game.ball().position - Vec3::new(0.02, 0.75, 0.0)).length() < 1e-6);
    }

    #[test]
    fn left_raises_the_right_end_and_right_lowers_it() {
        let mut game = BalanceGame::new();
        for _ in 0..10 {
            game.step(DT, &hold(true, false));
        }
        assert!(game.angle() > 0.0);

        let mut game = BalanceGame::new();
        for _ in 0..10 {
            game.step(DT, &hold(false, true));
        }
        assert!(game.angle() < 0.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut both = BalanceGame::new();
        let mut none = BalanceGame::new();
        for _ in 0..50 {
            both.step(DT, &hold(true, true));
            none.step(DT, &Controls::default());
        }
        assert_eq!(both.angle(), none.angle());
    }

    #[test]
    fn ball_rolls_downhill() {
        let mut game = BalanceGame::new();
        for _ in 0..25 {
            game.step(DT, &hold(true, false));
        }
        // Right end up: the ball heads for the left end.
        assert!(game.ball().position.x < 0.0);
    }

    #[test]
    fn unattended_beam_tips_and_drops_the_ball() {
        let mut game = BalanceGame::new();
        let end = (0..3_000).find_map(|_| game.step(DT, &Controls::default()));
        assert_eq!(end, Some(EndReason::FellThroughNet));
        assert!(!game.ball_on_beam());
    }

    #[test]
    fn ball_leaves_a_beam_tipped_past_vertical() {
        let mut game = BalanceGame::new();
        game.angle = std::f32::consts::FRAC_PI_2 + 0.1;
        game.step(DT, &Controls::default());
        assert!(!game.ball_on_beam());

        let mut steep = BalanceGame::new();
        steep.angle = std::f32::consts::FRAC_PI_2 - 0.1;
        steep.step(DT, &Controls::default());
        assert!(steep.ball_on_beam());
    }

    #[test]
    fn scene_draws_beam_pivot_and_ball() {
        let scene = BalanceGame::new().scene();
        assert_eq!(scene.len(), BEAM_SEGMENTS + 2);
        assert_eq!(scene.primitives[0].color(), BEAM_COLOR);
    }

    #[test]
    fn reset_levels_the_beam() {
        let mut game = BalanceGame::new();
        for _ in 0..100 {
            game.step(DT, &hold(false, true));
        }
        game.reset();
        assert_eq!(game.angle(), 0.0);
        assert!(game.ball_on_beam());
    }
}
