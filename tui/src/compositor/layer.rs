//! Layer - one rectangle of the screen, drawn on its own

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;

use super::LayerId;

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Where the layer sits on screen
    pub bounds: Rect,
    /// Hidden layers are skipped when compositing
    pub visible: bool,
    /// Opaque layers cover everything below them, blanks included
    pub opaque: bool,
    /// Drawing surface, always anchored at (0, 0)
    pub buffer: Buffer,
}

impl Layer {
    /// Create a visible layer; `opaque` panels hide what is below them
    pub fn new(id: LayerId, bounds: Rect, z_index: i32, opaque: bool) -> Self {
        Self {
            id,
            z_index,
            bounds,
            visible: true,
            opaque,
            buffer: Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height)),
        }
    }

    /// Move to `bounds`, reallocating the buffer only when the size changes
    pub fn place(&mut self, bounds: Rect) {
        let resized = bounds.width != self.bounds.width || bounds.height != self.bounds.height;
        self.bounds = bounds;
        if resized {
            self.buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
        }
    }

    /// Whether `cell` from this layer replaces what is underneath.
    /// Transparent layers leave blank cells as holes.
    pub fn covers(&self, cell: &Cell) -> bool {
        self.opaque || cell.symbol() != " "
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_keeps_buffer_when_only_moving() {
        let mut layer = Layer::new(LayerId(0), Rect::new(0, 0, 4, 2), 0, false);
        layer
            .buffer
            .set_string(0, 0, "leaf", ratatui::style::Style::default());

        layer.place(Rect::new(3, 3, 4, 2));
        assert_eq!(layer.buffer[(0, 0)].symbol(), "l");

        layer.place(Rect::new(3, 3, 6, 2));
        assert_eq!(layer.buffer.area, Rect::new(0, 0, 6, 2));
        assert_eq!(layer.buffer[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_blank_cells_are_holes_unless_opaque() {
        let blank = Cell::default();
        let transparent = Layer::new(LayerId(0), Rect::new(0, 0, 1, 1), 0, false);
        let opaque = Layer::new(LayerId(1), Rect::new(0, 0, 1, 1), 0, true);
        assert!(!transparent.covers(&blank));
        assert!(opaque.covers(&blank));
    }
}
