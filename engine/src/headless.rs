use std::time::Duration;

use crate::app::{GameApp, KeyEvent};
use crate::graphics::{CpuRenderer, ViewportRenderer};
use crate::regression::rgba_sha256_hex;
use crate::surface::{RgbaBufferSurface, SurfaceSize};

/// Drives a `GameApp` without a window, rendering every frame into an in-memory RGBA surface.
///
/// Each `step` runs one update followed by one render, the same order the windowed loop uses, and
/// records the frame hash so a whole run can be compared against a golden.
pub struct HeadlessRunner<G: GameApp> {
    game: G,
    state: G::State,
    surface: RgbaBufferSurface,
    frame: usize,
    hashes: Vec<String>,
}

impl<G: GameApp> HeadlessRunner<G> {
    pub fn new(mut game: G, size: SurfaceSize) -> Self {
        let state = game.init_state(size);
        Self {
            game,
            state,
            surface: RgbaBufferSurface::new(size),
            frame: 0,
            hashes: Vec::new(),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut G::State {
        &mut self.state
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn surface(&self) -> &RgbaBufferSurface {
        &self.surface
    }

    /// Hashes of every frame rendered so far, oldest first.
    pub fn frame_hashes(&self) -> &[String] {
        &self.hashes
    }

    pub fn key(&mut self, event: KeyEvent) {
        self.game.handle_key(&mut self.state, event);
    }

    /// Presses and releases `key` between frames.
    pub fn tap(&mut self, key: winit::event::VirtualKeyCode) {
        self.key(KeyEvent { key, pressed: true });
        self.key(KeyEvent { key, pressed: false });
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.surface.resize(size);
        self.game.resized(&mut self.state, size);
    }

    pub fn step(&mut self, dt: Duration) -> usize {
        self.game.update_state(&mut self.state, dt);
        self.render();
        self.frame += 1;
        self.frame
    }

    pub fn run<I>(&mut self, dts: I) -> usize
    where
        I: IntoIterator<Item = Duration>,
    {
        for dt in dts {
            self.step(dt);
        }
        self.frame
    }

    fn render(&mut self) {
        let size = self.surface.size();
        {
            let mut gfx = CpuRenderer::new(self.surface.frame_mut(), size);
            gfx.begin_frame(size);
            self.game.render(&self.state, &mut gfx);
        }
        self.hashes.push(rgba_sha256_hex(self.surface.frame()));
    }
}
