//! Board and HUD drawing.
//!
//! Both entry points are pure functions of their inputs: the same snapshot (or indicators) and
//! geometry always produce the same sequence of draw calls.

use engine::graphics::{Color, DEFAULT_TEXT_SCALE, Renderer2d, dim, glyph_height, text_width};
use engine::ui::Rect;

use crate::config::Palette;
use crate::indicators::Indicators;
use crate::input::Control;
use crate::layout::Layout;
use crate::sim::Direction;
use crate::snapshot::RenderSnapshot;

const TONGUE_LEN: u32 = 5;

/// Where the board sits in the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub origin_x: u32,
    pub origin_y: u32,
    pub cell_size: u32,
    pub jungle_width: u32,
}

impl BoardGeometry {
    pub fn side(&self) -> u32 {
        self.jungle_width.saturating_mul(self.cell_size)
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.origin_x, self.origin_y, self.side())
    }

    /// `None` for cells outside the grid.
    pub fn cell_rect(&self, col: u32, row: u32) -> Option<Rect> {
        if col >= self.jungle_width || row >= self.jungle_width {
            return None;
        }
        let x = col.checked_mul(self.cell_size)?.checked_add(self.origin_x)?;
        let y = row.checked_mul(self.cell_size)?.checked_add(self.origin_y)?;
        Some(Rect::square(x, y, self.cell_size))
    }

    fn cell_at(&self, snapshot: &RenderSnapshot, cell: u32) -> Option<Rect> {
        let (col, row) = snapshot.cell_coords(cell);
        self.cell_rect(col, row)
    }
}

pub fn render_snapshot(
    gfx: &mut dyn Renderer2d,
    snapshot: &RenderSnapshot,
    board: &BoardGeometry,
    palette: &Palette,
) {
    // The snapshot is authoritative for the grid size.
    let board = BoardGeometry {
        jungle_width: snapshot.jungle_width,
        ..*board
    };
    let cell = board.cell_size;
    let side = board.side();

    gfx.fill_rect(board.rect(), palette.background);

    for i in 0..=snapshot.jungle_width {
        let offset = i.saturating_mul(cell);
        gfx.fill_rect(
            Rect::new(
                board.origin_x.saturating_add(offset),
                board.origin_y,
                1,
                side.saturating_add(1),
            ),
            palette.grid,
        );
        gfx.fill_rect(
            Rect::new(
                board.origin_x,
                board.origin_y.saturating_add(offset),
                side.saturating_add(1),
                1,
            ),
            palette.grid,
        );
    }

    // Cells outside the grid are not drawn.
    if let Some(food) = board.cell_at(snapshot, snapshot.food_cell) {
        gfx.fill_rect(food.inset(1), palette.food);
    }

    for &idx in snapshot.snake_cells.iter().skip(1) {
        if let Some(body) = board.cell_at(snapshot, idx) {
            gfx.fill_rect(body.inset(1), palette.snake_body);
        }
    }

    // Head last so it sits on top of any overlapping body cell.
    if let Some(head) = snapshot.head().and_then(|h| board.cell_at(snapshot, h)) {
        draw_head(
            gfx,
            head,
            snapshot.snake_direction.unwrap_or(Direction::Up),
            &board,
            palette,
        );
    }
}

fn draw_head(
    gfx: &mut dyn Renderer2d,
    cell: Rect,
    direction: Direction,
    board: &BoardGeometry,
    palette: &Palette,
) {
    let body = cell.inset(1);
    gfx.fill_rect(body, palette.snake_head);
    if body.w > 4 {
        for (cx, cy) in [
            (body.x, body.y),
            (body.right() - 1, body.y),
            (body.x, body.bottom() - 1),
            (body.right() - 1, body.bottom() - 1),
        ] {
            gfx.fill_rect(Rect::square(cx, cy, 1), palette.background);
        }
    }

    let s = cell.w;
    let eye = (s / 8).max(2);
    let (near, far, lead) = (s * 3 / 10, s * 7 / 10, s * 35 / 100);
    let eyes = match direction {
        Direction::Up => [(near, lead), (far, lead)],
        Direction::Down => [(near, s - lead), (far, s - lead)],
        Direction::Left => [(lead, near), (lead, far)],
        Direction::Right => [(s - lead, near), (s - lead, far)],
    };
    for (ex, ey) in eyes {
        gfx.fill_rect(
            Rect::square(
                (cell.x + ex).saturating_sub(eye / 2),
                (cell.y + ey).saturating_sub(eye / 2),
                eye,
            ),
            palette.eye,
        );
    }

    let mid = s / 2;
    let tongue = match direction {
        Direction::Up => {
            let len = TONGUE_LEN.min(cell.y);
            Rect::new(cell.x + mid, cell.y - len, 1, len)
        }
        Direction::Down => Rect::new(cell.x + mid, cell.bottom(), 1, TONGUE_LEN),
        Direction::Left => {
            let len = TONGUE_LEN.min(cell.x);
            Rect::new(cell.x - len, cell.y + mid, len, 1)
        }
        Direction::Right => Rect::new(cell.right(), cell.y + mid, TONGUE_LEN, 1),
    };
    if let Some(tongue) = tongue.intersect(board.rect()) {
        gfx.fill_rect(tongue, palette.tongue);
    }
}

pub fn draw_indicators(
    gfx: &mut dyn Renderer2d,
    indicators: &Indicators,
    layout: &Layout,
    palette: &Palette,
) {
    gfx.fill_rect(layout.hud_top(), palette.hud_background);
    gfx.fill_rect(layout.hud_bottom(), palette.hud_background);

    let (x, y) = layout.status_origin();
    gfx.draw_text(x, y, &indicators.status_text, palette.text);
    let (x, y) = layout.score_origin();
    let score = format!(
        "Score: {}  Best: {}",
        indicators.score_text, indicators.best_text
    );
    gfx.draw_text(x, y, &score, palette.text);

    let (x, y) = layout.speed_text_origin();
    gfx.draw_text(x, y, &indicators.speed_text, palette.text);

    for (control, label) in [
        (Control::SpeedDown, "<"),
        (Control::SpeedUp, ">"),
        (Control::Primary, indicators.primary_label.as_str()),
    ] {
        let color = if indicators.is_enabled(control) {
            palette.accent
        } else {
            dim(palette.accent, 35)
        };
        draw_button(gfx, layout.control_rect(control), label, color);
    }
}

fn draw_button(gfx: &mut dyn Renderer2d, rect: Rect, label: &str, color: Color) {
    gfx.rect_outline(rect, color);
    let w = text_width(label, DEFAULT_TEXT_SCALE);
    let h = glyph_height(DEFAULT_TEXT_SCALE);
    let x = rect.x + rect.w.saturating_sub(w) / 2;
    let y = rect.y + rect.h.saturating_sub(h) / 2;
    gfx.draw_text(x, y, label, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionStatus;
    use engine::graphics::{DrawCall, RecordingRenderer};
    use engine::surface::SurfaceSize;

    fn board() -> BoardGeometry {
        BoardGeometry {
            origin_x: 0,
            origin_y: 0,
            cell_size: 10,
            jungle_width: 4,
        }
    }

    fn snapshot(direction: Option<Direction>) -> RenderSnapshot {
        RenderSnapshot {
            jungle_width: 4,
            snake_cells: vec![5, 4],
            snake_direction: direction,
            food_cell: 15,
            points: 0,
            status: SessionStatus::Playing,
        }
    }

    #[test]
    fn first_call_clears_the_board() {
        let palette = Palette::default();
        let mut rec = RecordingRenderer::new(SurfaceSize::square(40));
        render_snapshot(&mut rec, &snapshot(Some(Direction::Right)), &board(), &palette);
        assert_eq!(
            rec.calls()[0],
            DrawCall::FillRect(Rect::square(0, 0, 40), palette.background)
        );
    }

    #[test]
    fn grid_has_width_plus_one_lines_each_way() {
        let palette = Palette::default();
        let mut rec = RecordingRenderer::new(SurfaceSize::square(40));
        render_snapshot(&mut rec, &snapshot(None), &board(), &palette);
        assert_eq!(rec.fills_with(palette.grid).count(), 10);
    }

    #[test]
    fn food_and_body_are_inset_squares() {
        let palette = Palette::default();
        let mut rec = RecordingRenderer::new(SurfaceSize::square(40));
        render_snapshot(&mut rec, &snapshot(None), &board(), &palette);

        let food: Vec<_> = rec.fills_with(palette.food).copied().collect();
        assert_eq!(food, vec![Rect::new(31, 31, 8, 8)]);
        let body: Vec<_> = rec.fills_with(palette.snake_body).copied().collect();
        assert_eq!(body, vec![Rect::new(1, 11, 8, 8)]);
        let head: Vec<_> = rec.fills_with(palette.snake_head).copied().collect();
        assert_eq!(head, vec![Rect::new(11, 11, 8, 8)]);
    }

    #[test]
    fn head_decoration_follows_direction() {
        let palette = Palette::default();
        let eyes_for = |d: Option<Direction>| {
            let mut rec = RecordingRenderer::new(SurfaceSize::square(40));
            render_snapshot(&mut rec, &snapshot(d), &board(), &palette);
            rec.fills_with(palette.eye).copied().collect::<Vec<_>>()
        };

        let right = eyes_for(Some(Direction::Right));
        let left = eyes_for(Some(Direction::Left));
        assert_ne!(right, left);
        assert!(right.iter().all(|r| r.x > 15));
        assert!(left.iter().all(|r| r.x < 15));
        assert_eq!(eyes_for(None), eyes_for(Some(Direction::Up)));
    }

    #[test]
    fn cells_outside_the_grid_are_skipped() {
        let palette = Palette::default();
        let mut snap = snapshot(Some(Direction::Right));
        snap.food_cell = u32::MAX;
        snap.snake_cells = vec![16, 5, u32::MAX];
        let mut rec = RecordingRenderer::new(SurfaceSize::square(40));
        render_snapshot(&mut rec, &snap, &board(), &palette);

        assert_eq!(rec.fills_with(palette.food).count(), 0);
        assert_eq!(rec.fills_with(palette.snake_head).count(), 0);
        let body: Vec<_> = rec.fills_with(palette.snake_body).copied().collect();
        assert_eq!(body, vec![Rect::new(11, 11, 8, 8)]);
    }

    #[test]
    fn cell_rect_rejects_out_of_range_coordinates() {
        let b = board();
        assert_eq!(b.cell_rect(3, 3), Some(Rect::square(30, 30, 10)));
        assert_eq!(b.cell_rect(4, 0), None);
        assert_eq!(b.cell_rect(0, u32::MAX), None);
    }

    #[test]
    fn tongue_stays_inside_the_board() {
        let palette = Palette::default();
        let mut snap = snapshot(Some(Direction::Up));
        snap.snake_cells = vec![1, 0];
        let mut rec = RecordingRenderer::new(SurfaceSize::square(40));
        render_snapshot(&mut rec, &snap, &board(), &palette);
        assert_eq!(rec.fills_with(palette.tongue).count(), 0);
    }
}
