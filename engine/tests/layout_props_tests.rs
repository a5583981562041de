//! Property tests for the two-row viewport layout.
//!
//! 1. `viewports_for_count(n)` always has `n + 1` rects.
//! 2. Active rects never overlap and stay on screen.
//! 3. Active rects cover the screen exactly when it divides evenly into cells.
//! 4. The incoming rect is fully off screen.
//! 5. Interpolating towards another layout moves monotonically.

use engine::layout::{ViewportLayoutTable, ViewportRect, viewports_for_count};
use engine::surface::SurfaceSize;
use proptest::prelude::*;

fn arb_screen() -> impl Strategy<Value = SurfaceSize> {
    (1u32..=4096, 1u32..=2160).prop_map(|(w, h)| SurfaceSize::new(w, h))
}

fn on_screen(rect: &ViewportRect, screen: SurfaceSize) -> bool {
    rect.left >= 0.0
        && rect.bottom >= 0.0
        && rect.right() <= screen.width as f32
        && rect.top() <= screen.height as f32
}

proptest! {
    #[test]
    fn layout_has_one_extra_incoming_rect(total in 0usize..32, screen in arb_screen()) {
        prop_assert_eq!(viewports_for_count(total, screen).len(), total + 1);
    }

    #[test]
    fn active_rects_do_not_overlap_and_stay_on_screen(total in 1usize..24, screen in arb_screen()) {
        let rects = viewports_for_count(total, screen);
        let active = &rects[..total];
        for (i, a) in active.iter().enumerate() {
            prop_assert!(on_screen(a, screen), "rect {i} {a:?} leaves {screen:?}");
            for b in &active[i + 1..] {
                prop_assert!(a.intersect(b).is_none(), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn active_rects_tile_an_evenly_divisible_screen(
        total in 1usize..16,
        cell_w in 1u32..200,
        cell_h in 1u32..200,
    ) {
        let cols = total.div_ceil(2) as u32;
        let rows = if total >= 2 { 2 } else { 1 };
        let screen = SurfaceSize::new(cols * cell_w, rows * cell_h);
        let covered: f32 = viewports_for_count(total, screen)[..total]
            .iter()
            .map(ViewportRect::area)
            .sum();
        prop_assert_eq!(covered, (screen.width * screen.height) as f32);
    }

    #[test]
    fn incoming_rect_starts_off_screen(total in 0usize..24, screen in arb_screen()) {
        let rects = viewports_for_count(total, screen);
        let incoming = rects[total];
        prop_assert!(incoming.intersect(&ViewportRect::full_screen(screen)).is_none());
    }

    #[test]
    fn interpolation_is_monotonic(total in 0usize..8, t0 in 0.0f32..=1.0, t1 in 0.0f32..=1.0) {
        let screen = SurfaceSize::new(1024, 768);
        let table = ViewportLayoutTable::new(8, screen);
        let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        let from = table.entry(total).unwrap();
        let to = table.entry(total + 1).unwrap();
        for (a, b) in from.iter().zip(to.iter()) {
            let p = a.lerp(*b, lo);
            let q = a.lerp(*b, hi);
            let towards = |start: f32, end: f32, x: f32, y: f32| {
                if end >= start { x <= y + 1e-3 } else { x + 1e-3 >= y }
            };
            prop_assert!(towards(a.left, b.left, p.left, q.left));
            prop_assert!(towards(a.bottom, b.bottom, p.bottom, q.bottom));
            prop_assert!(towards(a.width, b.width, p.width, q.width));
            prop_assert!(towards(a.height, b.height, p.height, q.height));
        }
    }
}

#[test]
fn table_endpoints_match_direct_layouts() {
    let screen = SurfaceSize::new(1024, 768);
    let table = ViewportLayoutTable::new(4, screen);
    for k in 0..=4 {
        assert_eq!(table.entry(k).unwrap(), viewports_for_count(k, screen).as_slice());
        let rects = table.entry(k).unwrap();
        let next = table.entry(k + 1);
        if let Some(next) = next {
            for (a, b) in rects.iter().zip(next) {
                assert_eq!(a.lerp(*b, 0.0), *a);
                assert_eq!(a.lerp(*b, 1.0), *b);
                assert_eq!(a.lerp(*b, 3.5), *b);
            }
        }
    }
    assert!(table.entry(5).is_none());
}
