//! The per-frame driver: advances the run clock, steps the mini-games and draws every view.

use std::time::Duration;

use engine::app::{GameApp, KeyEvent};
use engine::clock::Clock;
use engine::graphics::ViewportRenderer;
use engine::surface::SurfaceSize;

use crate::config::ShowcaseConfig;
use crate::games::{EndReason, GameCtx, GameKind, MiniGame, Rng};
use crate::hud;
use crate::input::{Command, Controls, InputState};
use crate::schedule::ViewSchedule;
use crate::state::{ActiveGames, Phase, RunState, TimerEvent};

/// Longest simulation step; larger frame deltas are split.
pub const MAX_STEP: Duration = Duration::from_millis(20);

const FRAME_CLEAR: [u8; 3] = [0, 0, 0];

/// Owns everything one showcase session needs. Built once, restarted in place.
#[derive(Debug)]
pub struct Showcase {
    config: ShowcaseConfig,
    schedule: ViewSchedule,
    run: RunState,
    games: Vec<MiniGame>,
    /// Active flags as of the last sync, to spot games that joined or left.
    seen_active: ActiveGames,
    input: InputState,
    rng: Rng,
    last_elapsed: Duration,
}

impl Showcase {
    /// One mini-game per scheduled view.
    pub fn new(config: ShowcaseConfig, schedule: ViewSchedule, clock: Clock<TimerEvent>) -> Self {
        let games = schedule
            .entries()
            .iter()
            .map(|entry| MiniGame::new(entry.kind(), &config))
            .collect();
        Self::with_games(config, schedule, clock, games)
    }

    pub fn with_games(
        config: ShowcaseConfig,
        schedule: ViewSchedule,
        clock: Clock<TimerEvent>,
        games: Vec<MiniGame>,
    ) -> Self {
        let rng = Rng::new(config.seed);
        Self {
            config,
            schedule,
            run: RunState::new(clock),
            games,
            seen_active: ActiveGames::default(),
            input: InputState::default(),
            rng,
            last_elapsed: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn schedule(&self) -> &ViewSchedule {
        &self.schedule
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn games(&self) -> &[MiniGame] {
        &self.games
    }

    pub fn game(&self, kind: GameKind) -> Option<&MiniGame> {
        self.games.iter().find(|g| g.kind() == kind)
    }

    pub fn controls(&self) -> &Controls {
        &self.input.controls
    }

    pub fn start(&mut self) {
        self.run.start_game(self.schedule.entries());
        self.last_elapsed = Duration::ZERO;
        self.sync_active();
    }

    pub fn restart(&mut self) {
        self.run.restart(self.schedule.entries());
        self.last_elapsed = Duration::ZERO;
        self.sync_active();
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        match self.input.on_key(event) {
            Some(Command::TogglePause) => self.run.toggle_paused(),
            Some(Command::Restart) => self.restart(),
            None => {}
        }
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.schedule.resize(size);
    }

    /// One frame of logic. Simulation time is the run clock's, so a paused run does not move.
    pub fn update(&mut self) {
        let timers = self.run.tick();
        for (kind, timer) in timers {
            let Some(game) = self.games.iter_mut().find(|g| g.kind() == kind) else {
                log::debug!("dropping {timer:?} for unmounted {kind}");
                continue;
            };
            let mut ctx = GameCtx {
                run: &mut self.run,
                rng: &mut self.rng,
            };
            if let Some(reason) = game.on_timer(timer, &mut ctx) {
                self.end_run(kind, reason);
                break;
            }
        }
        self.sync_active();

        let elapsed = self.run.elapsed();
        let mut remaining = elapsed.saturating_sub(self.last_elapsed);
        self.last_elapsed = elapsed;

        while !remaining.is_zero() && self.run.phase() == Phase::Playing {
            let dt = remaining.min(MAX_STEP);
            remaining -= dt;
            if let Some((kind, reason)) = self.step_games(dt.as_secs_f32()) {
                self.end_run(kind, reason);
            }
        }
    }

    fn step_games(&mut self, dt: f32) -> Option<(GameKind, EndReason)> {
        let controls = self.input.controls;
        for game in &mut self.games {
            let kind = game.kind();
            if !self.run.is_simulating(kind) {
                continue;
            }
            let mut ctx = GameCtx {
                run: &mut self.run,
                rng: &mut self.rng,
            };
            if let Some(reason) = game.step(dt, &controls, &mut ctx) {
                return Some((kind, reason));
            }
        }
        None
    }

    fn end_run(&mut self, kind: GameKind, reason: EndReason) {
        log::info!("{kind}: {reason}");
        self.run.end_game();
        self.sync_active();
    }

    /// Resets every mini-game whose active flag changed since the last sync.
    fn sync_active(&mut self) {
        for game in &mut self.games {
            let kind = game.kind();
            let active = self.run.is_active(kind);
            if active == self.seen_active.get(kind) {
                continue;
            }
            self.seen_active.set(kind, active);
            let mut ctx = GameCtx {
                run: &mut self.run,
                rng: &mut self.rng,
            };
            game.reset(&mut ctx);
        }
    }

    pub fn render(&self, renderer: &mut dyn ViewportRenderer) {
        renderer.reset_viewport();
        renderer.set_clear_color(FRAME_CLEAR);
        renderer.clear();

        for view in self.schedule.frame_views(self.run.elapsed()) {
            let game = self.game(view.kind).unwrap_or_else(|| {
                panic!("view {} shows {} but no such mini-game is mounted", view.index, view.kind)
            });
            let scene = game.scene(view.displacement);
            renderer.render_viewport(&scene, &view.camera, view.rect, view.background);
            hud::draw_view_hint(renderer, view.rect, view.kind.control_hint());
        }

        renderer.reset_viewport();
        hud::draw(renderer, self.run.phase(), self.run.score());
    }
}

/// Hosts a `Showcase` in the engine's frame loop.
pub struct ShowcaseApp {
    config: ShowcaseConfig,
    schedule: ViewSchedule,
    clock: Option<Clock<TimerEvent>>,
}

impl ShowcaseApp {
    pub fn new(config: ShowcaseConfig, schedule: ViewSchedule) -> Self {
        Self {
            config,
            schedule,
            clock: None,
        }
    }

    /// Drives the run from `clock` instead of wall time.
    pub fn with_clock(mut self, clock: Clock<TimerEvent>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl GameApp for ShowcaseApp {
    type State = Showcase;

    fn init_state(&mut self, size: SurfaceSize) -> Self::State {
        let mut schedule = self.schedule.clone();
        schedule.resize(size);
        let clock = self.clock.take().unwrap_or_else(Clock::system);
        let mut showcase = Showcase::new(self.config.clone(), schedule, clock);
        showcase.start();
        showcase
    }

    fn handle_key(&mut self, state: &mut Self::State, event: KeyEvent) {
        state.handle_key(event);
    }

    fn resized(&mut self, state: &mut Self::State, size: SurfaceSize) {
        state.resize(size);
    }

    fn update_state(&mut self, state: &mut Self::State, _dt: Duration) {
        state.update();
    }

    fn render(&mut self, state: &Self::State, renderer: &mut dyn ViewportRenderer) {
        state.render(renderer);
    }

    fn shutdown(&mut self, state: &mut Self::State) {
        log::info!(
            "showcase closed in {:?} with score {}",
            state.run().phase(),
            state.run().score()
        );
    }
}
