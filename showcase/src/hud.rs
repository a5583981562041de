//! Score readout and the pause / game-over overlays, drawn after every view.

use engine::graphics::{Color, PixelRect, ViewportRenderer, line_advance_y, text_width};
use engine::layout::ViewportRect;
use engine::surface::SurfaceSize;

use crate::state::Phase;

const TEXT_COLOR: Color = [0xf0, 0xf0, 0xf0, 0xff];
const SCORE_SHADOW: Color = [0x10, 0x10, 0x10, 0xff];
const HINT_COLOR: Color = [0x20, 0x20, 0x20, 0xff];
const DIM_COLOR: Color = [0x00, 0x00, 0x00, 0xff];
const DIM_ALPHA: u8 = 150;
const SCORE_SCALE: u32 = 3;
const BANNER_SCALE: u32 = 4;
const HINT_SCALE: u32 = 2;
const MARGIN: u32 = 12;
const HINT_MARGIN: u32 = 8;

/// Overlay text for a phase: a banner line followed by hint lines. Empty while playing.
pub fn overlay_lines(phase: Phase, score: u32) -> Vec<String> {
    match phase {
        Phase::Playing => Vec::new(),
        Phase::New => vec!["READY".to_owned(), "R TO START".to_owned()],
        Phase::Paused => vec!["PAUSED".to_owned(), "P TO RESUME".to_owned()],
        Phase::GameOver => vec![
            "GAME OVER".to_owned(),
            score_text(score),
            "R TO RESTART".to_owned(),
        ],
    }
}

pub fn score_text(score: u32) -> String {
    format!("SCORE: {score}")
}

pub fn draw(renderer: &mut dyn ViewportRenderer, phase: Phase, score: u32) {
    let size = renderer.size();
    if size.is_empty() {
        return;
    }

    let readout = score_text(score);
    renderer.draw_text_scaled(MARGIN + 2, MARGIN + 2, &readout, SCORE_SHADOW, SCORE_SCALE);
    renderer.draw_text_scaled(MARGIN, MARGIN, &readout, TEXT_COLOR, SCORE_SCALE);

    let lines = overlay_lines(phase, score);
    if lines.is_empty() {
        return;
    }
    renderer.blend_rect(PixelRect::from_size(size), DIM_COLOR, DIM_ALPHA);

    let total_h: u32 = lines
        .iter()
        .enumerate()
        .map(|(i, _)| line_advance_y(line_scale(i)))
        .sum();
    let mut y = size.height.saturating_sub(total_h) / 2;
    for (i, line) in lines.iter().enumerate() {
        let scale = line_scale(i);
        renderer.draw_text_scaled(centered_x(size, line, scale), y, line, TEXT_COLOR, scale);
        y += line_advance_y(scale);
    }
}

/// Draws a mini-game's control hint along the bottom of its view.
///
/// Skipped while the view is off screen or too small to hold the text.
pub fn draw_view_hint(renderer: &mut dyn ViewportRenderer, rect: ViewportRect, hint: &str) {
    let Some((x, y, w, h)) = rect.to_pixel_rect(renderer.size()) else {
        return;
    };
    let text_w = text_width(hint, HINT_SCALE);
    let text_h = line_advance_y(HINT_SCALE);
    if text_w > w || text_h + HINT_MARGIN > h {
        return;
    }
    let hint_x = x + (w - text_w) / 2;
    let hint_y = y + h - text_h - HINT_MARGIN;
    renderer.draw_text_scaled(hint_x, hint_y, hint, HINT_COLOR, HINT_SCALE);
}

fn line_scale(index: usize) -> u32 {
    if index == 0 { BANNER_SCALE } else { HINT_SCALE }
}

fn centered_x(size: SurfaceSize, text: &str, scale: u32) -> u32 {
    size.width.saturating_sub(text_width(text, scale)) / 2
}
