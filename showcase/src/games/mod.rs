//! The mini-games and the data that describes them.
//!
//! Every game simulates in its own scene-local space around the origin. The view's displacement
//! is only applied when a scene is produced for rendering, so the rules never see it.

use std::fmt;

use engine::scene::{Rgb, Scene};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ShowcaseConfig;
use crate::input::Controls;
use crate::state::RunState;

pub mod balance;
pub mod ball;
pub mod collect;
pub mod flappy;
pub mod jump;
pub mod rng;

pub use balance::BalanceGame;
pub use collect::CollectGame;
pub use flappy::FlappyGame;
pub use jump::JumpGame;
pub use rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameKind {
    Jump,
    Balance,
    Collect,
    Flappy,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Jump,
        GameKind::Balance,
        GameKind::Collect,
        GameKind::Flappy,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            GameKind::Jump => 0,
            GameKind::Balance => 1,
            GameKind::Collect => 2,
            GameKind::Flappy => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Jump => "jump",
            GameKind::Balance => "balance",
            GameKind::Collect => "collect",
            GameKind::Flappy => "flappy",
        }
    }

    /// The keys this game listens to, shown inside its view.
    pub fn control_hint(self) -> &'static str {
        match self {
            GameKind::Jump => "SHIFT TO JUMP",
            GameKind::Balance => "LEFT / RIGHT TO BALANCE",
            GameKind::Collect => "WSAD / ZQSD TO MOVE",
            GameKind::Flappy => "SPACE TO FLY",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured mini-game: what it is and how its view looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameDescriptor {
    pub kind: GameKind,
    pub background: Rgb,
    /// Camera position relative to the scene center.
    pub camera_offset: Vec3,
}

impl GameDescriptor {
    pub const fn new(kind: GameKind, background: Rgb, camera_offset: Vec3) -> Self {
        Self {
            kind,
            background,
            camera_offset,
        }
    }
}

/// Converts a unit-range color to 8-bit channels.
pub fn unit_rgb(r: f32, g: f32, b: f32) -> Rgb {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(r), channel(g), channel(b)]
}

/// The showcase line-up, in the order the games join the screen.
pub fn default_lineup() -> Vec<GameDescriptor> {
    vec![
        GameDescriptor::new(GameKind::Jump, unit_rgb(0.5, 0.5, 0.7), Vec3::new(-4.0, 5.0, 7.0)),
        GameDescriptor::new(GameKind::Balance, unit_rgb(0.7, 0.5, 0.5), Vec3::new(-4.0, 3.0, 7.0)),
        GameDescriptor::new(GameKind::Collect, [0xff, 0xff, 0xb8], Vec3::new(0.0, 25.0, 0.0)),
        GameDescriptor::new(GameKind::Flappy, [0xba, 0xe7, 0xff], Vec3::new(-8.0, 0.0, 20.0)),
    ]
}

/// Timed events a mini-game schedules on the shared run clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTimer {
    /// The collectible was not picked up in time.
    ItemExpired,
    /// The collectible comes back after being picked up.
    ItemRespawn,
}

/// Why a mini-game ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    FellThroughNet,
    HitColumn,
    ItemExpired,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::FellThroughNet => "ball fell through the net",
            EndReason::HitColumn => "ball hit a column",
            EndReason::ItemExpired => "item was not collected in time",
        })
    }
}

/// What a mini-game may touch while it runs: the run (for its clock) and the shared RNG.
pub struct GameCtx<'a> {
    pub run: &'a mut RunState,
    pub rng: &'a mut Rng,
}

#[derive(Debug, Clone)]
pub enum MiniGame {
    Jump(JumpGame),
    Balance(BalanceGame),
    Collect(CollectGame),
    Flappy(FlappyGame),
}

impl MiniGame {
    pub fn new(kind: GameKind, config: &ShowcaseConfig) -> Self {
        match kind {
            GameKind::Jump => MiniGame::Jump(JumpGame::new(config.jump_gap_chance)),
            GameKind::Balance => MiniGame::Balance(BalanceGame::new()),
            GameKind::Collect => MiniGame::Collect(CollectGame::new()),
            GameKind::Flappy => MiniGame::Flappy(FlappyGame::new()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            MiniGame::Jump(_) => GameKind::Jump,
            MiniGame::Balance(_) => GameKind::Balance,
            MiniGame::Collect(_) => GameKind::Collect,
            MiniGame::Flappy(_) => GameKind::Flappy,
        }
    }

    /// Puts the game back at its starting layout. Called whenever its active flag flips.
    pub fn reset(&mut self, ctx: &mut GameCtx<'_>) {
        match self {
            MiniGame::Jump(game) => game.reset(),
            MiniGame::Balance(game) => game.reset(),
            MiniGame::Collect(game) => game.reset(ctx),
            MiniGame::Flappy(game) => game.reset(),
        }
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32, controls: &Controls, ctx: &mut GameCtx<'_>) -> Option<EndReason> {
        match self {
            MiniGame::Jump(game) => game.step(dt, controls, ctx.rng),
            MiniGame::Balance(game) => game.step(dt, controls),
            MiniGame::Collect(game) => game.step(dt, controls, ctx),
            MiniGame::Flappy(game) => game.step(dt, controls, ctx.rng),
        }
    }

    pub fn on_timer(&mut self, timer: GameTimer, ctx: &mut GameCtx<'_>) -> Option<EndReason> {
        match self {
            MiniGame::Collect(game) => game.on_timer(timer, ctx),
            other => {
                log::debug!("{} ignores timer {timer:?}", other.kind());
                None
            }
        }
    }

    pub fn scene(&self, displacement: Vec3) -> Scene {
        let local = match self {
            MiniGame::Jump(game) => game.scene(),
            MiniGame::Balance(game) => game.scene(),
            MiniGame::Collect(game) => game.scene(),
            MiniGame::Flappy(game) => game.scene(),
        };
        local.displaced(displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_index_their_own_slot() {
        for (i, kind) in GameKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn every_hint_is_drawable_by_the_block_font() {
        for kind in GameKind::ALL {
            let hint = kind.control_hint();
            assert!(!hint.is_empty());
            assert!(hint.chars().all(|c| c.is_ascii_uppercase() || c == ' ' || c == '/'));
        }
    }

    #[test]
    fn default_lineup_matches_the_showcase_order() {
        let lineup = default_lineup();
        let kinds: Vec<_> = lineup.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![GameKind::Jump, GameKind::Balance, GameKind::Collect, GameKind::Flappy]
        );
        assert_eq!(lineup[0].background[..2], [128, 128]);
        assert_eq!(lineup[2].camera_offset, Vec3::new(0.0, 25.0, 0.0));
    }

    #[test]
    fn scenes_are_moved_by_the_displacement() {
        let game = MiniGame::new(GameKind::Balance, &ShowcaseConfig::default());
        let local = game.scene(Vec3::ZERO);
        let moved = game.scene(Vec3::splat(300.0));
        assert_eq!(local.len(), moved.len());
        assert_eq!(
            moved.primitives[0].center(),
            local.primitives[0].center() + Vec3::splat(300.0)
        );
    }
}
