use crate::{surface::SurfaceSize, ui::Rect};

pub type Color = [u8; 4];

pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

pub fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

pub fn glyph_height(scale: u32) -> u32 {
    GLYPH_H * scale.max(1)
}

/// Width in pixels of `text` drawn on a single line at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    n.saturating_mul(glyph_advance_x(scale))
        .saturating_sub(scale.max(1))
}

/// Dims a color towards black, keeping alpha.
pub fn dim(color: Color, percent: u8) -> Color {
    let keep = u32::from(percent.min(100));
    let scale = |c: u8| ((u32::from(c) * keep) / 100) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}

/// Drawing interface used by all game rendering.
///
/// Callers never touch pixels directly, so the same drawing code can target a window, an
/// offscreen buffer, or a [`RecordingRenderer`] in tests.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill, clipped to the surface.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn rect_outline(&mut self, rect: Rect, color: Color);
    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU renderer writing into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    fn bounds(&self) -> Option<Rect> {
        if self.size.is_empty() || self.frame.len() < self.size.rgba_len() {
            return None;
        }
        Some(Rect::from_size(self.size.width, self.size.height))
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clip) = self.bounds().and_then(|b| b.intersect(rect)) else {
            return;
        };

        let stride = self.size.width as usize * 4;
        let x0 = clip.x as usize * 4;
        let x1 = clip.right() as usize * 4;
        for y in clip.y..clip.bottom() {
            let row = y as usize * stride;
            for px in self.frame[row + x0..row + x1].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.h), color);
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let mut cursor_x = x;
        for ch in text.chars() {
            if cursor_x >= self.size.width {
                break;
            }
            if ch != ' ' {
                for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
                    for col in 0..GLYPH_W {
                        if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                            continue;
                        }
                        let px = Rect::square(
                            cursor_x + col * scale,
                            y + row as u32 * scale,
                            scale,
                        );
                        self.fill_rect(px, color);
                    }
                }
            }
            cursor_x = cursor_x.saturating_add(glyph_advance_x(scale));
        }
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],

        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b011, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],

        _ => [0b111, 0b111, 0b111, 0b111, 0b111],
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    BeginFrame(SurfaceSize),
    FillRect(Rect, Color),
    RectOutline(Rect, Color),
    Text {
        x: u32,
        y: u32,
        text: String,
        color: Color,
        scale: u32,
    },
}

/// Renderer that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    size: SurfaceSize,
    calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn fills_with(&self, color: Color) -> impl Iterator<Item = &Rect> + '_ {
        self.calls.iter().filter_map(move |c| match c {
            DrawCall::FillRect(r, c) if *c == color => Some(r),
            _ => None,
        })
    }
}

impl Renderer2d for RecordingRenderer {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
        self.calls.push(DrawCall::BeginFrame(size));
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect(rect, color));
    }

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::RectOutline(rect, color));
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
            color,
            scale,
        });
    }
}
