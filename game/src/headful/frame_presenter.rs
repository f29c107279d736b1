use engine::graphics::Renderer2d;

use crate::config::Palette;
use crate::indicators::Indicators;
use crate::layout::Layout;
use crate::render::{draw_indicators, render_snapshot};
use crate::session::Presenter;
use crate::snapshot::RenderSnapshot;

/// Keeps the latest snapshot and indicators until the next frame is painted.
#[derive(Debug, Default)]
pub struct FramePresenter {
    snapshot: Option<RenderSnapshot>,
    indicators: Option<Indicators>,
    dirty: bool,
}

impl FramePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&RenderSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn indicators(&self) -> Option<&Indicators> {
        self.indicators.as_ref()
    }

    /// True once after anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn draw(&self, gfx: &mut dyn Renderer2d, layout: &Layout, palette: &Palette) {
        gfx.clear(palette.hud_background);
        if let Some(snapshot) = &self.snapshot {
            render_snapshot(gfx, snapshot, &layout.board(), palette);
        }
        if let Some(indicators) = &self.indicators {
            draw_indicators(gfx, indicators, layout, palette);
        }
    }
}

impl Presenter for FramePresenter {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.snapshot = Some(snapshot.clone());
        self.dirty = true;
    }

    fn update_indicators(&mut self, indicators: &Indicators) {
        if self.indicators.as_ref() != Some(indicators) {
            self.indicators = Some(indicators.clone());
            self.dirty = true;
        }
    }
}
