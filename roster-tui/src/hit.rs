//! Hit testing for mouse clicks.

use crate::buffer::Rect;

/// Something on screen that reacts to a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    SearchBox,
    SelectAll,
    /// A row's checkbox.
    RowCheckbox(u64),
    /// Any other part of a row, moves the cursor there.
    Row(usize),
    Edit(u64),
    Delete(u64),
    Save,
    Cancel,
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    Page(usize),
    DeleteSelected,
}

/// Clickable regions of the last rendered frame, in render order.
#[derive(Debug, Default)]
pub struct HitMap {
    boxes: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all regions (call at start of each frame)
    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn register(&mut self, rect: Rect, target: Target) {
        if rect.width > 0 && rect.height > 0 {
            self.boxes.push((rect, target));
        }
    }

    /// Find the target at a position (topmost wins)
    pub fn hit_test(&self, x: u16, y: u16) -> Option<Target> {
        self.boxes
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, target)| *target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topmost_wins() {
        let mut hits = HitMap::new();
        hits.register(Rect::new(0, 5, 80, 1), Target::Row(0));
        hits.register(Rect::new(1, 5, 3, 1), Target::RowCheckbox(7));

        assert_eq!(hits.hit_test(2, 5), Some(Target::RowCheckbox(7)));
        assert_eq!(hits.hit_test(40, 5), Some(Target::Row(0)));
        assert_eq!(hits.hit_test(40, 6), None);
    }

    #[test]
    fn test_empty_rect_not_registered() {
        let mut hits = HitMap::new();
        hits.register(Rect::new(0, 0, 0, 1), Target::Save);
        assert!(hits.boxes.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut hits = HitMap::new();
        hits.register(Rect::new(0, 0, 4, 1), Target::FirstPage);
        assert_eq!(hits.hit_test(3, 0), Some(Target::FirstPage));
        hits.clear();
        assert_eq!(hits.hit_test(0, 0), None);
    }
}
