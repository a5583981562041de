use std::time::Duration;

use engine::surface::SurfaceSize;
use proptest::prelude::*;
use showcase::games::default_lineup;
use showcase::{ShowcaseConfig, ViewSchedule};

fn schedule(spacing_ms: u64, animation_ms: u64, w: u32, h: u32) -> ViewSchedule {
    let config = ShowcaseConfig {
        time_between_games: Duration::from_millis(spacing_ms),
        animation_duration: Duration::from_millis(animation_ms),
        ..ShowcaseConfig::default()
    };
    ViewSchedule::new(default_lineup(), &config, SurfaceSize::new(w, h)).expect("valid schedule")
}

proptest! {
    #[test]
    fn at_most_one_view_is_entering(
        animation in 1u64..5_000,
        extra in 0u64..5_000,
        t in 0u64..60_000,
    ) {
        let schedule = schedule(animation + extra, animation, 1024, 768);
        let p = schedule.partition(Duration::from_millis(t));
        prop_assert!(p.visible.len() <= p.including_entering.len());
        prop_assert!(p.including_entering.len() - p.visible.len() <= 1);
        prop_assert!(!p.visible.is_empty());
    }

    #[test]
    fn alpha_is_monotonic_over_time(t0 in 0u64..40_000, dt in 0u64..500) {
        let schedule = schedule(10_000, 2_000, 1024, 768);
        let at = |ms: u64| {
            let elapsed = Duration::from_millis(ms);
            schedule.alpha(elapsed, &schedule.partition(elapsed))
        };
        let (a, b) = (at(t0), at(t0 + dt));
        prop_assert!((0.0..=1.0).contains(&a));
        // Alpha only drops when a new view starts entering.
        let same_view = schedule.partition(Duration::from_millis(t0)).including_entering.len()
            == schedule.partition(Duration::from_millis(t0 + dt)).including_entering.len();
        if same_view {
            prop_assert!(b >= a);
        }
    }

    #[test]
    fn settled_views_stay_on_screen(t in 0u64..60_000, w in 64u32..2_000, h in 64u32..2_000) {
        let schedule = schedule(10_000, 2_000, w, h);
        let p = schedule.partition(Duration::from_millis(t));
        if p.visible.len() == p.including_entering.len() {
            for view in schedule.frame_views(Duration::from_millis(t)) {
                prop_assert!(view.rect.left >= 0.0 && view.rect.right() <= w as f32 + 1e-3);
                prop_assert!(view.rect.bottom >= 0.0 && view.rect.top() <= h as f32 + 1e-3);
            }
        }
    }
}
