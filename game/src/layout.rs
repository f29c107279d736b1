//! Frame-buffer layout: HUD strip, board, and control strip, top to bottom.

use engine::surface::SurfaceSize;
use engine::ui::Rect;

use crate::config::GameConfig;
use crate::input::Control;
use crate::render::BoardGeometry;

pub const HUD_TOP: u32 = 48;
pub const HUD_BOTTOM: u32 = 48;
pub const MIN_BUFFER_WIDTH: u32 = 320;
pub const PAD: u32 = 8;
pub const BUTTON_H: u32 = 28;
pub const SPEED_BUTTON_W: u32 = 28;
pub const PRIMARY_BUTTON_W: u32 = 104;
const SPEED_TEXT_W: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    jungle_width: u32,
    cell_size: u32,
}

impl Layout {
    pub fn new(jungle_width: u32, cell_size: u32) -> Self {
        Self {
            jungle_width,
            cell_size: cell_size.max(1),
        }
    }

    /// Picks the cell size for a window of `window_width` physical pixels.
    pub fn for_window(config: &GameConfig, jungle_width: u32, window_width: u32) -> Self {
        Self::new(jungle_width, config.cell_size_for_window(window_width))
    }

    /// Window size to open with: the full-size layout, widened past the compact breakpoint so
    /// the first [`Layout::for_window`] keeps the configured cell size.
    pub fn initial_window(config: &GameConfig, jungle_width: u32) -> SurfaceSize {
        let buffer = Self::new(jungle_width, config.cell_size).buffer_size();
        SurfaceSize::new(
            buffer.width.max(config.compact_breakpoint.saturating_add(1)),
            buffer.height,
        )
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn board_side(&self) -> u32 {
        self.jungle_width.saturating_mul(self.cell_size)
    }

    pub fn buffer_size(&self) -> SurfaceSize {
        SurfaceSize::new(
            self.board_side().max(MIN_BUFFER_WIDTH),
            HUD_TOP + self.board_side() + HUD_BOTTOM,
        )
    }

    pub fn board(&self) -> BoardGeometry {
        let buffer = self.buffer_size();
        BoardGeometry {
            origin_x: (buffer.width - self.board_side()) / 2,
            origin_y: HUD_TOP,
            cell_size: self.cell_size,
            jungle_width: self.jungle_width,
        }
    }

    pub fn hud_top(&self) -> Rect {
        Rect::new(0, 0, self.buffer_size().width, HUD_TOP)
    }

    pub fn hud_bottom(&self) -> Rect {
        Rect::new(
            0,
            HUD_TOP + self.board_side(),
            self.buffer_size().width,
            HUD_BOTTOM,
        )
    }

    pub fn status_origin(&self) -> (u32, u32) {
        (PAD, PAD)
    }

    pub fn score_origin(&self) -> (u32, u32) {
        (PAD, PAD + 20)
    }

    fn controls_y(&self) -> u32 {
        self.hud_bottom().y + (HUD_BOTTOM - BUTTON_H) / 2
    }

    pub fn speed_text_origin(&self) -> (u32, u32) {
        (PAD + SPEED_BUTTON_W + PAD, self.controls_y() + 9)
    }

    pub fn control_rect(&self, control: Control) -> Rect {
        let y = self.controls_y();
        match control {
            Control::SpeedDown => Rect::new(PAD, y, SPEED_BUTTON_W, BUTTON_H),
            Control::SpeedUp => Rect::new(
                PAD + SPEED_BUTTON_W + PAD + SPEED_TEXT_W,
                y,
                SPEED_BUTTON_W,
                BUTTON_H,
            ),
            Control::Primary => Rect::new(
                self.buffer_size().width - PAD - PRIMARY_BUTTON_W,
                y,
                PRIMARY_BUTTON_W,
                BUTTON_H,
            ),
        }
    }

    pub fn hit_test(&self, x: u32, y: u32) -> Option<Control> {
        [Control::Primary, Control::SpeedDown, Control::SpeedUp]
            .into_iter()
            .find(|c| self.control_rect(*c).contains(x, y))
    }
}
