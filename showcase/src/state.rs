//! Run phases, score and the shared clock that decides when each mini-game joins.

use std::time::Duration;

use engine::clock::{Clock, TimeoutId};
use serde::{Deserialize, Serialize};

use crate::games::{GameKind, GameTimer};
use crate::schedule::ViewEntry;

pub const SCORE_INTERVAL: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    New,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    TogglePause,
    End,
}

/// What the run clock has to do after a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEffect {
    None,
    RestartClock,
    PauseClock,
    ResumeClock,
}

impl Phase {
    /// Pure transition function for the run phase.
    ///
    /// Clock side effects are reported as a `PhaseEffect` so `RunState` applies them in one place.
    pub fn handle(self, event: PhaseEvent) -> (Phase, PhaseEffect) {
        match (self, event) {
            (_, PhaseEvent::Start) => (Phase::Playing, PhaseEffect::RestartClock),
            (_, PhaseEvent::End) => (Phase::GameOver, PhaseEffect::PauseClock),

            (Phase::Playing, PhaseEvent::TogglePause) => (Phase::Paused, PhaseEffect::PauseClock),
            (Phase::Paused, PhaseEvent::TogglePause) => (Phase::Playing, PhaseEffect::ResumeClock),

            // Pausing only means something mid-run.
            (phase, PhaseEvent::TogglePause) => (phase, PhaseEffect::None),
        }
    }
}

/// Events the run clock delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ScoreTick,
    StartMiniGame(GameKind),
    Game(GameKind, GameTimer),
}

/// Per-kind "is this mini-game in play" flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveGames([bool; GameKind::COUNT]);

impl ActiveGames {
    pub fn get(&self, kind: GameKind) -> bool {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: GameKind, active: bool) {
        self.0[kind.index()] = active;
    }

    pub fn clear(&mut self) {
        self.0 = [false; GameKind::COUNT];
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|active| **active).count()
    }
}

/// One run of the showcase: phase, score, active games and the clock that drives them.
///
/// Clock events are applied in delivery order after `update()`/`pause()` has returned, so nothing
/// here runs while the clock is iterating.
#[derive(Debug)]
pub struct RunState {
    phase: Phase,
    score: u32,
    active: ActiveGames,
    clock: Clock<TimerEvent>,
    game_timers: Vec<(GameKind, GameTimer)>,
}

impl RunState {
    pub fn new(clock: Clock<TimerEvent>) -> Self {
        Self {
            phase: Phase::New,
            score: 0,
            active: ActiveGames::default(),
            clock,
            game_timers: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn active_games(&self) -> ActiveGames {
        self.active
    }

    pub fn is_active(&self, kind: GameKind) -> bool {
        self.active.get(kind)
    }

    /// Whether `kind` should be simulating this frame.
    pub fn is_simulating(&self, kind: GameKind) -> bool {
        self.phase == Phase::Playing && self.active.get(kind)
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn clock(&self) -> &Clock<TimerEvent> {
        &self.clock
    }

    pub fn start_game(&mut self, views: &[ViewEntry]) {
        let (phase, effect) = self.phase.handle(PhaseEvent::Start);
        self.apply_effect(effect);
        self.phase = phase;
        self.score = 0;
        self.active.clear();
        self.game_timers.clear();

        self.clock.subscribe(TimerEvent::ScoreTick, SCORE_INTERVAL);
        for view in views {
            self.clock
                .set_timeout(TimerEvent::StartMiniGame(view.descriptor.kind), view.start_time);
        }
        log::info!("run started with {} games", views.len());
    }

    pub fn toggle_paused(&mut self) {
        let (phase, effect) = self.phase.handle(PhaseEvent::TogglePause);
        self.apply_effect(effect);
        if phase != self.phase {
            log::info!("run {:?} at {:?}", phase, self.clock.elapsed());
        }
        self.phase = phase;
    }

    pub fn increment_score(&mut self) {
        if self.phase == Phase::Playing {
            self.score += 1;
        }
    }

    /// Freezes the run where it is. The clock is paused, not reset, so the last frame stays put.
    pub fn end_game(&mut self) {
        let (phase, effect) = self.phase.handle(PhaseEvent::End);
        self.apply_effect(effect);
        if self.phase != Phase::GameOver {
            log::info!("game over with score {}", self.score);
        }
        self.phase = phase;
        self.active.clear();
        // A finished run has nobody left to deliver mini-game timers to.
        self.game_timers.clear();
    }

    pub fn start_mini_game(&mut self, kind: GameKind) {
        if !self.active.get(kind) {
            log::info!("mini-game {kind} joins at {:?}", self.clock.elapsed());
        }
        self.active.set(kind, true);
    }

    pub fn restart(&mut self, views: &[ViewEntry]) {
        self.end_game();
        self.start_game(views);
    }

    /// Advances the clock and applies whatever fell due. Mini-game timers are handed back for
    /// the caller to route.
    pub fn tick(&mut self) -> Vec<(GameKind, GameTimer)> {
        let due = self.clock.update();
        self.apply_events(due);
        std::mem::take(&mut self.game_timers)
    }

    pub fn schedule_game_timer(&mut self, kind: GameKind, timer: GameTimer, delay: Duration) -> TimeoutId {
        self.clock.set_timeout(TimerEvent::Game(kind, timer), delay)
    }

    pub fn cancel_game_timer(&mut self, id: TimeoutId) {
        self.clock.remove_timeout(id);
    }

    fn apply_effect(&mut self, effect: PhaseEffect) {
        match effect {
            PhaseEffect::None => {}
            PhaseEffect::RestartClock => {
                self.clock.reset();
                self.clock.start();
            }
            PhaseEffect::PauseClock => {
                // Anything due at the pause instant still lands in the phase it was due in.
                let due = self.clock.pause();
                self.apply_events(due);
            }
            PhaseEffect::ResumeClock => self.clock.resume(),
        }
    }

    fn apply_events(&mut self, events: Vec<TimerEvent>) {
        for event in events {
            match event {
                TimerEvent::ScoreTick => self.increment_score(),
                TimerEvent::StartMiniGame(kind) => self.start_mini_game(kind),
                TimerEvent::Game(kind, timer) => self.game_timers.push((kind, timer)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::clock::ManualTimeSource;

    use crate::config::ShowcaseConfig;
    use crate::games::default_lineup;
    use crate::schedule::ViewSchedule;
    use engine::surface::SurfaceSize;

    fn run_with_views() -> (ManualTimeSource, RunState, Vec<ViewEntry>) {
        let time = ManualTimeSource::new();
        let run = RunState::new(Clock::new(time.clone()));
        let schedule = ViewSchedule::new(
            default_lineup(),
            &ShowcaseConfig::default(),
            SurfaceSize::new(1024, 768),
        )
        .expect("default schedule");
        (time, run, schedule.entries().to_vec())
    }

    #[test]
    fn phase_transitions_absorb_invalid_events() {
        assert_eq!(Phase::New.handle(PhaseEvent::TogglePause), (Phase::New, PhaseEffect::None));
        assert_eq!(
            Phase::GameOver.handle(PhaseEvent::TogglePause),
            (Phase::GameOver, PhaseEffect::None)
        );
        assert_eq!(
            Phase::Playing.handle(PhaseEvent::TogglePause),
            (Phase::Paused, PhaseEffect::PauseClock)
        );
        assert_eq!(
            Phase::Paused.handle(PhaseEvent::TogglePause),
            (Phase::Playing, PhaseEffect::ResumeClock)
        );
        assert_eq!(
            Phase::GameOver.handle(PhaseEvent::Start),
            (Phase::Playing, PhaseEffect::RestartClock)
        );
    }

    #[test]
    fn toggle_paused_is_a_no_op_before_start_and_after_game_over() {
        let (_time, mut run, views) = run_with_views();
        run.toggle_paused();
        assert_eq!(run.phase(), Phase::New);
        assert!(!run.clock().is_running());

        run.start_game(&views);
        run.end_game();
        run.toggle_paused();
        assert_eq!(run.phase(), Phase::GameOver);
        assert!(!run.clock().is_running());
    }

    #[test]
    fn increment_score_only_counts_while_playing() {
        let (_time, mut run, views) = run_with_views();
        run.increment_score();
        assert_eq!(run.score(), 0);

        run.start_game(&views);
        run.increment_score();
        assert_eq!(run.score(), 1);

        run.toggle_paused();
        run.increment_score();
        assert_eq!(run.score(), 1);

        run.toggle_paused();
        run.end_game();
        run.increment_score();
        assert_eq!(run.score(), 1);
    }

    #[test]
    fn score_ticks_every_second_and_games_join_on_schedule() {
        let (time, mut run, views) = run_with_views();
        run.start_game(&views);
        assert_eq!(run.phase(), Phase::Playing);

        time.advance_ms(1);
        run.tick();
        assert!(run.is_active(GameKind::Jump));
        assert!(!run.is_active(GameKind::Balance));

        time.advance_ms(3_500);
        run.tick();
        assert_eq!(run.score(), 3);

        time.advance_ms(7_000);
        run.tick();
        assert_eq!(run.score(), 10);
        assert!(run.is_simulating(GameKind::Balance));
        assert_eq!(run.active_games().count(), 2);
    }

    #[test]
    fn events_due_at_pause_are_applied_before_pausing() {
        let (time, mut run, views) = run_with_views();
        run.start_game(&views);
        time.advance_ms(2_500);
        run.toggle_paused();
        assert_eq!(run.phase(), Phase::Paused);
        assert_eq!(run.score(), 2);
        assert!(run.is_active(GameKind::Jump));
        assert!(!run.is_simulating(GameKind::Jump));

        // Paused time is not run time.
        time.advance_ms(60_000);
        assert!(run.tick().is_empty());
        assert_eq!(run.score(), 2);
        assert_eq!(run.elapsed(), Duration::from_millis(2_500));

        run.toggle_paused();
        time.advance_ms(600);
        run.tick();
        assert_eq!(run.score(), 3);
    }

    #[test]
    fn end_game_freezes_the_clock_and_clears_flags() {
        let (time, mut run, views) = run_with_views();
        run.start_game(&views);
        time.advance_ms(12_000);
        run.tick();
        assert_eq!(run.active_games().count(), 2);

        run.end_game();
        assert_eq!(run.phase(), Phase::GameOver);
        assert_eq!(run.active_games(), ActiveGames::default());
        let frozen = run.elapsed();
        time.advance_ms(5_000);
        run.tick();
        assert_eq!(run.elapsed(), frozen);
        assert_eq!(run.score(), 11);
        // The run's events stay registered until the next start resets the clock.
        assert!(run.clock().pending_timeouts() > 0);
    }

    #[test]
    fn restart_begins_a_fresh_run() {
        let (time, mut run, views) = run_with_views();
        run.start_game(&views);
        time.advance_ms(15_000);
        run.tick();
        run.restart(&views);

        assert_eq!(run.phase(), Phase::Playing);
        assert_eq!(run.score(), 0);
        assert_eq!(run.elapsed(), Duration::ZERO);
        assert_eq!(run.active_games().count(), 0);
        assert_eq!(run.clock().pending_subscriptions(), 1);
        assert_eq!(run.clock().pending_timeouts(), views.len());
    }

    #[test]
    fn game_timers_are_handed_back_and_can_be_cancelled() {
        let (time, mut run, views) = run_with_views();
        run.start_game(&views);
        let keep = run.schedule_game_timer(GameKind::Collect, GameTimer::ItemRespawn, Duration::from_millis(100));
        let cancel = run.schedule_game_timer(GameKind::Collect, GameTimer::ItemExpired, Duration::from_millis(100));
        run.cancel_game_timer(cancel);
        run.cancel_game_timer(cancel);
        assert_ne!(keep, cancel);

        time.advance_ms(150);
        assert_eq!(run.tick(), vec![(GameKind::Collect, GameTimer::ItemRespawn)]);
        assert!(run.tick().is_empty());
    }
}
