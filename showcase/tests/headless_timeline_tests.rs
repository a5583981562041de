use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use engine::clock::{Clock, ManualTimeSource};
use engine::regression::{FrameHashGolden, assert_or_update_golden_json, update_goldens_enabled};
use engine::surface::SurfaceSize;
use engine::HeadlessRunner;
use showcase::games::default_lineup;
use showcase::state::Phase;
use showcase::{ShowcaseApp, ShowcaseConfig, ViewSchedule};
use winit::event::VirtualKeyCode;

const SIZE: SurfaceSize = SurfaceSize::new(160, 120);
const FRAME: Duration = Duration::from_millis(100);

fn unique_temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("showcase_timeline_{nanos}"))
}

fn runner() -> (ManualTimeSource, HeadlessRunner<ShowcaseApp>) {
    let config = ShowcaseConfig {
        time_between_games: Duration::from_millis(2_000),
        animation_duration: Duration::from_millis(1_000),
        ..ShowcaseConfig::default()
    };
    let schedule = ViewSchedule::new(default_lineup(), &config, SIZE).expect("valid schedule");
    let time = ManualTimeSource::new();
    let app = ShowcaseApp::new(config, schedule).with_clock(Clock::new(time.clone()));
    (time, HeadlessRunner::new(app, SIZE))
}

/// Advances the shared clock by one frame interval before each step.
fn play(time: &ManualTimeSource, runner: &mut HeadlessRunner<ShowcaseApp>, frames: usize) {
    for _ in 0..frames {
        time.advance(FRAME);
        runner.step(FRAME);
    }
}

#[test]
fn same_seed_and_timeline_render_the_same_frames() {
    let (time_a, mut a) = runner();
    let (time_b, mut b) = runner();
    play(&time_a, &mut a, 60);
    play(&time_b, &mut b, 60);
    assert_eq!(a.frame_hashes(), b.frame_hashes());
    // Views keep sliding in, so the picture keeps changing early on.
    assert_ne!(a.frame_hashes()[5], a.frame_hashes()[15]);
}

#[test]
fn paused_frames_are_identical() {
    let (time, mut runner) = runner();
    play(&time, &mut runner, 5);
    runner.tap(VirtualKeyCode::P);
    assert_eq!(runner.state().run().phase(), Phase::Paused);
    play(&time, &mut runner, 3);

    let hashes = runner.frame_hashes();
    assert_eq!(hashes[5], hashes[6]);
    assert_eq!(hashes[6], hashes[7]);
    assert_eq!(runner.state().run().elapsed(), Duration::from_millis(500));
}

#[test]
fn restart_returns_to_the_opening_frame() {
    let (time, mut runner) = runner();
    play(&time, &mut runner, 1);
    let opening = runner.state().run().elapsed();
    play(&time, &mut runner, 30);
    runner.tap(VirtualKeyCode::R);
    play(&time, &mut runner, 1);
    assert_eq!(runner.state().run().phase(), Phase::Playing);
    assert_eq!(runner.state().run().elapsed(), opening);
    assert_eq!(runner.state().run().score(), 0);
}

#[test]
fn resize_rebuilds_the_layout() {
    let (time, mut runner) = runner();
    play(&time, &mut runner, 1);
    let bigger = SurfaceSize::new(320, 240);
    runner.resize(bigger);
    play(&time, &mut runner, 1);
    assert_eq!(runner.state().schedule().screen(), bigger);
    assert_eq!(runner.surface().size(), bigger);
}

fn timeline_golden(runner: &HeadlessRunner<ShowcaseApp>) -> FrameHashGolden {
    FrameHashGolden::new(
        "showcase_timeline",
        SIZE.width,
        SIZE.height,
        runner.frame_hashes().to_vec(),
    )
}

#[test]
fn replayed_timeline_matches_the_first_run() {
    let (time, mut first) = runner();
    play(&time, &mut first, 40);
    let path = unique_temp_dir().join("showcase_timeline.json");

    // The first run writes the file; a replay must match it exactly.
    assert_or_update_golden_json(&path, &timeline_golden(&first), false).expect("write golden");
    let (time, mut replay) = runner();
    play(&time, &mut replay, 40);
    assert_or_update_golden_json(&path, &timeline_golden(&replay), false)
        .expect("replay matches the first run");

    let _ = std::fs::remove_dir_all(path.parent().expect("golden has a parent dir"));
}

#[test]
fn timeline_hashes_match_the_committed_golden() {
    let (time, mut runner) = runner();
    play(&time, &mut runner, 40);
    let golden_path = engine::regression_golden_path!("showcase_timeline");
    assert_or_update_golden_json(&golden_path, &timeline_golden(&runner), update_goldens_enabled())
        .unwrap_or_else(|e| {
            panic!(
                "golden check failed: {e}\n(hint: set SHOWCASE_UPDATE_GOLDENS=1 to regenerate {})",
                golden_path.display()
            )
        });
}
