use glam::Vec3;

use crate::camera::Camera;
use crate::layout::ViewportRect;
use crate::scene::{Primitive, Rgb, Scene};
use crate::surface::SurfaceSize;

pub type Color = [u8; 4];

pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

pub fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

pub fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel-space width of `text` when drawn at `scale` (longest line).
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.lines()
        .map(|line| line.chars().count() as u32 * glyph_advance_x(scale))
        .max()
        .unwrap_or(0)
}

pub fn rgb_to_color(rgb: Rgb) -> Color {
    [rgb[0], rgb[1], rgb[2], 255]
}

/// Whole-pixel rect in a top-left-origin buffer (HUD space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(size: SurfaceSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.x.saturating_add(self.w).min(other.x.saturating_add(other.w));
        let y1 = self.y.saturating_add(self.h).min(other.y.saturating_add(other.h));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && px < self.x.saturating_add(self.w)
            && py >= self.y
            && py < self.y.saturating_add(self.h)
    }
}

/// Renderer collaborator for multi-viewport frames.
///
/// Viewport and scissor rects use the GL bottom-left convention (see `layout`); HUD calls
/// (`blend_rect`, text) use top-left pixel coordinates and ignore the scissor.
pub trait ViewportRenderer {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    fn set_viewport(&mut self, rect: ViewportRect);
    /// `None` disables the scissor test.
    fn set_scissor(&mut self, rect: Option<ViewportRect>);
    fn set_clear_color(&mut self, color: Rgb);
    /// Clears the scissor region (or the whole frame) to the clear color.
    fn clear(&mut self);
    fn render_scene(&mut self, scene: &Scene, camera: &Camera);

    fn blend_rect(&mut self, rect: PixelRect, color: Color, alpha: u8);
    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    /// One complete scene pass into `rect` over `background`.
    fn render_viewport(&mut self, scene: &Scene, camera: &Camera, rect: ViewportRect, background: Rgb) {
        self.set_viewport(rect);
        self.set_scissor(Some(rect));
        self.set_clear_color(background);
        self.clear();
        self.render_scene(scene, camera);
    }

    fn reset_viewport(&mut self) {
        let size = self.size();
        self.set_viewport(ViewportRect::full_screen(size));
        self.set_scissor(None);
    }
}

/// Software renderer drawing into a top-left-origin RGBA frame.
///
/// Spheres become flat discs and cuboids the screen bounding box of their corners, painted far to
/// near. It is meant for headless runs and small windows, not fidelity.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
    viewport: ViewportRect,
    scissor: Option<ViewportRect>,
    clear_color: Rgb,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self {
            frame,
            size,
            viewport: ViewportRect::full_screen(size),
            scissor: None,
            clear_color: [0, 0, 0],
        }
    }

    fn frame_is_valid(&self) -> bool {
        let expected = self.size.rgba_len();
        expected != 0 && self.frame.len() >= expected
    }

    /// Screen ∩ viewport ∩ scissor, in top-left pixels.
    fn draw_clip(&self) -> Option<PixelRect> {
        let screen = PixelRect::from_size(self.size);
        let viewport = self.viewport.to_pixel_rect(self.size).map(to_pixel)?;
        let clip = screen.intersect(&viewport)?;
        match self.scissor {
            Some(scissor) => clip.intersect(&scissor.to_pixel_rect(self.size).map(to_pixel)?),
            None => Some(clip),
        }
    }

    fn fill_pixels(&mut self, rect: PixelRect, color: Color) {
        let Some(rect) = rect.intersect(&PixelRect::from_size(self.size)) else {
            return;
        };
        if !self.frame_is_valid() {
            return;
        }

        let stride = self.size.width as usize * 4;
        let [r, g, b, a] = color;
        for y in rect.y..rect.y + rect.h {
            let start = y as usize * stride + rect.x as usize * 4;
            let end = start + rect.w as usize * 4;
            for px in self.frame[start..end].chunks_exact_mut(4) {
                px[0] = r;
                px[1] = g;
                px[2] = b;
                px[3] = a;
            }
        }
    }

    /// Maps NDC to top-left buffer coordinates through the current viewport.
    fn ndc_to_buffer(&self, ndc: Vec3) -> (f32, f32) {
        let vp = self.viewport;
        let x = vp.left + (ndc.x + 1.0) * 0.5 * vp.width;
        let y_up = vp.bottom + (ndc.y + 1.0) * 0.5 * vp.height;
        (x, self.size.height as f32 - y_up)
    }

    fn fill_box_clipped(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, clip: PixelRect, color: Color) {
        let left = x0.min(x1).floor().max(clip.x as f32);
        let top = y0.min(y1).floor().max(clip.y as f32);
        let right = x0.max(x1).ceil().min((clip.x + clip.w) as f32);
        let bottom = y0.max(y1).ceil().min((clip.y + clip.h) as f32);
        if right <= left || bottom <= top {
            return;
        }
        let rect = PixelRect::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        );
        self.fill_pixels(rect, color);
    }

    fn fill_disc_clipped(&mut self, cx: f32, cy: f32, radius: f32, clip: PixelRect, color: Color) {
        let radius = radius.max(0.5);
        let y_start = (cy - radius).floor().max(clip.y as f32) as i64;
        let y_end = (cy + radius).ceil().min((clip.y + clip.h) as f32) as i64;
        for y in y_start..y_end {
            let dy = y as f32 + 0.5 - cy;
            let span_sq = radius * radius - dy * dy;
            if span_sq < 0.0 {
                continue;
            }
            let span = span_sq.sqrt();
            self.fill_box_clipped(cx - span, y as f32, cx + span, y as f32 + 1.0, clip, color);
        }
    }

    fn draw_primitive(&mut self, primitive: &Primitive, camera: &Camera, clip: PixelRect) {
        match *primitive {
            Primitive::Sphere {
                center,
                radius,
                color,
            } => {
                let Some((ndc, depth)) = camera.project(center) else {
                    return;
                };
                let (cx, cy) = self.ndc_to_buffer(ndc);
                let radius_px = camera.height_fraction_at(radius, depth) * self.viewport.height;
                self.fill_disc_clipped(cx, cy, radius_px, clip, rgb_to_color(color));
            }
            Primitive::Cuboid {
                center,
                half_extents,
                color,
            } => {
                let mut bounds: Option<(f32, f32, f32, f32)> = None;
                for corner in cuboid_corners(center, half_extents) {
                    let Some((ndc, _)) = camera.project(corner) else {
                        continue;
                    };
                    let (x, y) = self.ndc_to_buffer(ndc);
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
                if let Some((x0, y0, x1, y1)) = bounds {
                    self.fill_box_clipped(x0, y0, x1, y1, clip, rgb_to_color(color));
                }
            }
        }
    }
}

fn to_pixel((x, y, w, h): (u32, u32, u32, u32)) -> PixelRect {
    PixelRect::new(x, y, w, h)
}

fn cuboid_corners(center: Vec3, half: Vec3) -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
        let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
        let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
        *corner = center + Vec3::new(sx * half.x, sy * half.y, sz * half.z);
    }
    corners
}

impl ViewportRenderer for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
        self.viewport = ViewportRect::full_screen(size);
        self.scissor = None;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn set_viewport(&mut self, rect: ViewportRect) {
        self.viewport = rect;
    }

    fn set_scissor(&mut self, rect: Option<ViewportRect>) {
        self.scissor = rect;
    }

    fn set_clear_color(&mut self, color: Rgb) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        let region = match self.scissor {
            Some(scissor) => match scissor.to_pixel_rect(self.size) {
                Some(px) => to_pixel(px),
                None => return,
            },
            None => PixelRect::from_size(self.size),
        };
        self.fill_pixels(region, rgb_to_color(self.clear_color));
    }

    fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        let Some(clip) = self.draw_clip() else {
            return;
        };

        let mut ordered: Vec<(f32, &Primitive)> = scene
            .primitives
            .iter()
            .map(|p| {
                let depth = camera.position.distance(p.center());
                (depth, p)
            })
            .collect();
        // Far to near.
        ordered.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, primitive) in ordered {
            self.draw_primitive(primitive, camera, clip);
        }
    }

    fn blend_rect(&mut self, rect: PixelRect, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.fill_pixels(rect, color);
            return;
        }
        let Some(rect) = rect.intersect(&PixelRect::from_size(self.size)) else {
            return;
        };
        if !self.frame_is_valid() {
            return;
        }

        let a = alpha as u32;
        let inv = 255u32 - a;
        let stride = self.size.width as usize * 4;
        for y in rect.y..rect.y + rect.h {
            let start = y as usize * stride + rect.x as usize * 4;
            let end = start + rect.w as usize * 4;
            for px in self.frame[start..end].chunks_exact_mut(4) {
                for c in 0..3 {
                    px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
                }
                px[3] = 255;
            }
        }
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = x;
                cursor_y = cursor_y.saturating_add(adv_y);
                continue;
            }
            if ch != ' ' {
                self.draw_glyph(cursor_x, cursor_y, ch, color, scale);
            }
            cursor_x = cursor_x.saturating_add(adv_x);
        }
    }
}

impl CpuRenderer<'_> {
    fn draw_glyph(&mut self, x: u32, y: u32, ch: char, color: Color, scale: u32) {
        for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1u8 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let px = x.saturating_add(col * scale);
                let py = y.saturating_add(row as u32 * scale);
                self.fill_pixels(PixelRect::new(px, py, scale, scale), color);
            }
        }
    }
}

// 3x5 block font, one bit per column (MSB = left).
fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010],
    }
}
