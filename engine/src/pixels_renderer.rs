use pixels::Pixels;

use crate::graphics::{CpuRenderer, ViewportRenderer};
use crate::surface::SurfaceSize;

/// Windowed presenter built on `pixels`.
///
/// Frames are rasterized on the CPU straight into the `pixels` frame buffer, which is kept the
/// same size as the window surface so viewport rects map 1:1 to physical pixels.
pub struct PixelsPresenter {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsPresenter {
    pub fn new(mut pixels: Pixels, size: SurfaceSize) -> Result<Self, pixels::Error> {
        pixels.resize_buffer(size.width.max(1), size.height.max(1))?;
        Ok(Self { pixels, size })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), pixels::Error> {
        if size.is_empty() {
            // Minimized windows report 0x0; keep the last buffer until we get a real size.
            return Ok(());
        }
        self.size = size;
        self.pixels.resize_surface(size.width, size.height)?;
        self.pixels.resize_buffer(size.width, size.height)?;
        Ok(())
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn ViewportRenderer) -> R,
    {
        let size = self.size;
        let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), size);
        cpu.begin_frame(size);
        f(&mut cpu)
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }
}
