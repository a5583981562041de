//! Two-row viewport layout for a growing number of simultaneous views.
//!
//! Views fill the screen left to right, alternating bottom/top row by index parity:
//!
//! ```text
//! even count      odd count (last view takes the full height)
//! 1 3 5           1 3 4
//! 0 2 4           0 2 4
//! ```
//!
//! Rects use the GL convention: `bottom` is measured up from the bottom edge of the screen.
//! Every layout also carries one extra "incoming" rect for the next view, parked just off-screen
//! so it can slide into place.

use serde::{Deserialize, Serialize};

use crate::surface::SurfaceSize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub const fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    pub fn full_screen(screen: SurfaceSize) -> Self {
        Self::new(0.0, 0.0, screen.width as f32, screen.height as f32)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Width over height; 1.0 for degenerate rects.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Component-wise linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            left: mix(self.left, to.left),
            bottom: mix(self.bottom, to.bottom),
            width: mix(self.width, to.width),
            height: mix(self.height, to.height),
        }
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let bottom = self.bottom.max(other.bottom);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if right <= left || top <= bottom {
            return None;
        }
        Some(Self::new(left, bottom, right - left, top - bottom))
    }

    /// Converts to whole pixels in a top-left-origin buffer of `screen`, clipped to the buffer.
    ///
    /// Returns `(x, y, w, h)`, or `None` when nothing of the rect is on screen.
    pub fn to_pixel_rect(&self, screen: SurfaceSize) -> Option<(u32, u32, u32, u32)> {
        let clipped = self.intersect(&Self::full_screen(screen))?;
        let x0 = clipped.left.round().max(0.0) as u32;
        let x1 = clipped.right().round().min(screen.width as f32) as u32;
        let y_top = (screen.height as f32 - clipped.top()).round().max(0.0) as u32;
        let y_bottom = (screen.height as f32 - clipped.bottom).round().min(screen.height as f32) as u32;
        if x1 <= x0 || y_bottom <= y_top {
            return None;
        }
        Some((x0, y_top, x1 - x0, y_bottom - y_top))
    }
}

/// Rect for view `index` when `total` views are active on a `screen`.
///
/// `index == total` yields the incoming rect for the next view. Callers must keep
/// `index <= total`.
pub fn viewport_rect(index: usize, total: usize, screen: SurfaceSize) -> ViewportRect {
    debug_assert!(index <= total, "viewport index {index} beyond incoming slot {total}");

    let screen_w = screen.width as f32;
    let screen_h = screen.height as f32;

    if total == 0 && index == 0 {
        // No grid yet: a full-screen slot waiting just past the right edge.
        return ViewportRect::new(screen_w, 0.0, screen_w, screen_h);
    }

    let rows = if total >= 2 { 2 } else { 1 };
    let cols = total.div_ceil(2) as u32;
    let cell_w = (screen.width / cols) as f32;
    let cell_h = (screen.height / rows) as f32;
    let column_left = (index / 2) as f32 * cell_w;

    if index == total {
        return if index % 2 == 0 {
            ViewportRect::new(screen_w, 0.0, cell_w, screen_h)
        } else {
            ViewportRect::new(column_left, screen_h, cell_w, cell_h)
        };
    }

    if total % 2 == 1 && index == total - 1 {
        return ViewportRect::new(column_left, 0.0, cell_w, screen_h);
    }

    let bottom = if index % 2 == 0 { 0.0 } else { cell_h };
    ViewportRect::new(column_left, bottom, cell_w, cell_h)
}

/// All `total + 1` rects for `total` active views (the last one is the incoming slot).
///
/// With no active views there is only the incoming slot, so the result has exactly one rect.
pub fn viewports_for_count(total: usize, screen: SurfaceSize) -> Vec<ViewportRect> {
    (0..=total)
        .map(|index| viewport_rect(index, total, screen))
        .collect()
}

/// Precomputed layouts for every active-view count from 0 to `max_views`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportLayoutTable {
    screen: SurfaceSize,
    entries: Vec<Vec<ViewportRect>>,
}

impl ViewportLayoutTable {
    pub fn new(max_views: usize, screen: SurfaceSize) -> Self {
        let entries = (0..=max_views)
            .map(|count| viewports_for_count(count, screen))
            .collect();
        Self { screen, entries }
    }

    pub fn screen(&self) -> SurfaceSize {
        self.screen
    }

    pub fn max_views(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Rects for `active` views; `None` past `max_views`.
    pub fn entry(&self, active: usize) -> Option<&[ViewportRect]> {
        self.entries.get(active).map(Vec::as_slice)
    }

    pub fn resize(&mut self, screen: SurfaceSize) {
        if screen == self.screen {
            return;
        }
        *self = Self::new(self.max_views(), screen);
    }
}
