use engine::scene::{Rgb, Scene};
use glam::Vec3;

pub const BALL_RADIUS: f32 = 0.5;
pub const BALL_COLOR: Rgb = [0xbb, 0xbb, 0xbb];

/// The player's ball, in scene-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    spawn: Vec3,
}

impl Ball {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            spawn,
        }
    }

    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec3::ZERO;
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - BALL_RADIUS
    }

    /// Semi-implicit Euler step under vertical acceleration `gravity`.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;
    }

    /// Whether the ball touches the axis-aligned box at `center` with `half_extents`.
    pub fn touches_box(&self, center: Vec3, half_extents: Vec3) -> bool {
        let closest = self.position.clamp(center - half_extents, center + half_extents);
        closest.distance_squared(self.position) < BALL_RADIUS * BALL_RADIUS
    }

    pub fn draw(&self, scene: &mut Scene) {
        scene.sphere(self.position, BALL_RADIUS, BALL_COLOR);
    }
}

/// Catch plane below a scene: a ball that drops under it has left the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Net {
    displacement: Vec3,
    height: f32,
}

pub const NET_HEIGHT: f32 = -10.0;

impl Default for Net {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Net {
    pub fn at(displacement: Vec3) -> Self {
        Self {
            displacement,
            height: NET_HEIGHT,
        }
    }

    /// `position` is in the same space as the net's displacement.
    pub fn catches(&self, position: Vec3) -> bool {
        position.y - self.displacement.y < self.height
    }
}
