use engine::scene::{Rgb, Scene};
use glam::Vec3;

use super::ball::{Ball, Net};
use super::rng::Rng;
use super::EndReason;
use crate::input::Controls;

pub const COLUMN_COUNT: usize = 6;
pub const COLUMN_WIDTH: f32 = 3.0;
pub const COLUMN_HEIGHT: f32 = 30.0;
/// Half the opening between the upper and lower block.
pub const GAP_HALF_HEIGHT: f32 = 5.0;
pub const COLUMN_SPACING: f32 = 13.0;
pub const COLUMN_SPEED: f32 = 5.0;
pub const COLUMN_COLOR: Rgb = [0x13, 0x52, 0x00];

const GRAVITY: f32 = -9.81;
/// Upward acceleration while Space is held.
const THRUST: f32 = 84.0;
const WRAP_AT: f32 = -(COLUMN_COUNT as f32 * COLUMN_SPACING) / 2.0 + COLUMN_WIDTH / 2.0;
const WRAP_BY: f32 = COLUMN_COUNT as f32 * COLUMN_SPACING;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Column {
    x: f32,
    gap_y: f32,
}

impl Column {
    fn start(index: usize) -> Self {
        Self {
            x: COLUMN_SPACING * (index as f32 - COLUMN_COUNT as f32 / 2.0),
            gap_y: 0.0,
        }
    }

    /// Centers of the upper and lower block.
    fn blocks(&self) -> [Vec3; 2] {
        let dy = COLUMN_HEIGHT / 2.0 + GAP_HALF_HEIGHT;
        [
            Vec3::new(self.x, self.gap_y + dy, 0.0),
            Vec3::new(self.x, self.gap_y - dy, 0.0),
        ]
    }
}

/// Columns with an opening slide past; Space keeps the ball in the air and clear of them.
#[derive(Debug, Clone)]
pub struct FlappyGame {
    ball: Ball,
    columns: Vec<Column>,
    net: Net,
}

impl FlappyGame {
    pub fn new() -> Self {
        Self {
            ball: Ball::new(Vec3::new(0.0, 0.5, 0.0)),
            columns: (0..COLUMN_COUNT).map(Column::start).collect(),
            net: Net::default(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn step(&mut self, dt: f32, controls: &Controls, rng: &mut Rng) -> Option<EndReason> {
        for column in &mut self.columns {
            column.x -= COLUMN_SPEED * dt;
            if column.x <= WRAP_AT {
                column.x += WRAP_BY;
                column.gap_y = rng.centered(GAP_HALF_HEIGHT);
            }
        }

        let lift = if controls.space { THRUST } else { 0.0 };
        self.ball.integrate(dt, GRAVITY + lift);

        let half = Vec3::new(COLUMN_WIDTH, COLUMN_HEIGHT, COLUMN_WIDTH) / 2.0;
        let hit = self
            .columns
            .iter()
            .flat_map(Column::blocks)
            .any(|center| self.ball.touches_box(center, half));
        if hit {
            return Some(EndReason::HitColumn);
        }
        self.net
            .catches(self.ball.position)
            .then_some(EndReason::FellThroughNet)
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new("flappy");
        let size = Vec3::new(COLUMN_WIDTH, COLUMN_HEIGHT, COLUMN_WIDTH);
        for center in self.columns.iter().flat_map(Column::blocks) {
            scene.cuboid(center, size, COLUMN_COLOR);
        }
        self.ball.draw(&mut scene);
        scene
    }
}

impl Default for FlappyGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn run(game: &mut FlappyGame, controls: &Controls, seconds: f32) -> Option<EndReason> {
        let mut rng = Rng::new(11);
        let steps = (seconds / DT) as usize;
        (0..steps).find_map(|_| game.step(DT, controls, &mut rng))
    }

    fn thrusting() -> Controls {
        Controls {
            space: true,
            ..Controls::default()
        }
    }

    #[test]
    fn columns_start_evenly_spaced() {
        let game = FlappyGame::new();
        let xs: Vec<f32> = game.columns.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![-39.0, -26.0, -13.0, 0.0, 13.0, 26.0]);
    }

    #[test]
    fn wrapped_columns_keep_their_spacing() {
        let mut game = FlappyGame::new();
        let mut rng = Rng::new(2);
        // Hover roughly in place; the run may end, the columns keep moving regardless.
        for _ in 0..500 {
            game.step(DT, &Controls::default(), &mut rng);
        }
        let mut xs: Vec<f32> = game.columns.iter().map(|c| c.x).collect();
        xs.sort_by(f32::total_cmp);
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - COLUMN_SPACING).abs() < 1e-2);
        }
        assert!(game.columns.iter().all(|c| c.gap_y.abs() <= GAP_HALF_HEIGHT));
    }

    #[test]
    fn idle_ball_falls_into_the_net() {
        let mut game = FlappyGame::new();
        assert_eq!(
            run(&mut game, &Controls::default(), 5.0),
            Some(EndReason::FellThroughNet)
        );
    }

    #[test]
    fn holding_space_hits_the_upper_block() {
        let mut game = FlappyGame::new();
        assert_eq!(run(&mut game, &thrusting(), 5.0), Some(EndReason::HitColumn));
        assert!(game.ball().position.y > 0.5);
    }

    #[test]
    fn scene_draws_two_blocks_per_column() {
        let scene = FlappyGame::new().scene();
        assert_eq!(scene.len(), COLUMN_COUNT * 2 + 1);
    }
}
