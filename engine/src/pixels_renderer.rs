use crate::graphics::{CpuRenderer, Renderer2d};
use crate::surface::SurfaceSize;

use pixels::Pixels;

/// Window renderer built on `pixels`.
///
/// The frame buffer has a fixed logical size chosen by the game layout; `pixels` scales it to
/// the window surface, so window resizes and layout changes are independent.
pub struct PixelsRenderer2d {
    pixels: Pixels,
    buffer: SurfaceSize,
}

impl PixelsRenderer2d {
    pub fn new(mut pixels: Pixels, buffer: SurfaceSize) -> Result<Self, pixels::Error> {
        pixels.resize_buffer(buffer.width, buffer.height)?;
        Ok(Self { pixels, buffer })
    }

    pub fn buffer_size(&self) -> SurfaceSize {
        self.buffer
    }

    /// Matches the presentation surface to the window's inner size.
    pub fn resize_surface(&mut self, window: SurfaceSize) -> Result<(), pixels::Error> {
        if window.is_empty() {
            return Ok(());
        }
        self.pixels.resize_surface(window.width, window.height)?;
        Ok(())
    }

    pub fn resize_buffer(&mut self, buffer: SurfaceSize) -> Result<(), pixels::Error> {
        if buffer == self.buffer || buffer.is_empty() {
            return Ok(());
        }
        self.pixels.resize_buffer(buffer.width, buffer.height)?;
        self.buffer = buffer;
        Ok(())
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Renderer2d) -> R,
    {
        let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), self.buffer);
        cpu.begin_frame(self.buffer);
        f(&mut cpu)
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }

    /// Maps a physical window position to a frame-buffer pixel, if it lands inside the buffer.
    pub fn window_to_buffer(&self, position: (f32, f32)) -> Option<(u32, u32)> {
        self.pixels
            .window_pos_to_pixel(position)
            .ok()
            .map(|(x, y)| (x as u32, y as u32))
    }
}
