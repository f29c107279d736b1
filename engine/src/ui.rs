//! Minimal layout primitives.
//!
//! Rectangles are in frame-buffer pixels with the origin at the top-left corner.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub const fn square(x: u32, y: u32, side: u32) -> Self {
        Self { x, y, w: side, h: side }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Shrinks the rect by `by` pixels on every side.
    ///
    /// Saturates to an empty rect when the inset exceeds the rect size.
    pub fn inset(&self, by: u32) -> Self {
        let twice = by.saturating_mul(2);
        Self {
            x: self.x.saturating_add(by),
            y: self.y.saturating_add(by),
            w: self.w.saturating_sub(twice),
            h: self.h.saturating_sub(twice),
        }
    }

    /// Returns the intersection with `other`, or `None` when they do not overlap.
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_saturates_to_empty() {
        let r = Rect::new(10, 10, 4, 4);
        assert_eq!(r.inset(1), Rect::new(11, 11, 2, 2));
        assert!(r.inset(3).is_empty());
    }

    #[test]
    fn contains_excludes_far_edges() {
        let r = Rect::new(2, 2, 3, 3);
        assert!(r.contains(2, 2));
        assert!(r.contains(4, 4));
        assert!(!r.contains(5, 4));
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(Rect::new(5, 8, 10, 10)), Some(Rect::new(5, 8, 5, 2)));
        assert_eq!(a.intersect(Rect::new(10, 0, 2, 2)), None);
    }
}
