//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::LayerId;

/// How a layer's blank cells are treated when compositing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Blank cells let lower layers show through
    SeeThrough,
    /// Every cell overwrites, so the layer hides what is beneath it
    Opaque,
}

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Position and size on screen
    pub bounds: Rect,
    /// Whether the layer is visible
    pub visible: bool,
    /// Blank-cell handling
    pub blend: Blend,
    /// The layer's render buffer, in layer-local coordinates
    pub buffer: Buffer,
}

impl Layer {
    /// Create a new see-through layer
    pub fn new(id: LayerId, bounds: Rect, z_index: i32) -> Self {
        Self {
            id,
            z_index,
            bounds,
            visible: true,
            blend: Blend::SeeThrough,
            buffer: Buffer::empty(local_area(bounds)),
        }
    }

    /// Change position and size; the buffer is reallocated when the size changes
    pub fn set_bounds(&mut self, bounds: Rect) {
        let resized = bounds.width != self.bounds.width || bounds.height != self.bounds.height;
        self.bounds = bounds;
        if resized {
            self.buffer = Buffer::empty(local_area(bounds));
        }
    }

    /// Check if a point is within this layer's bounds
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && x < self.bounds.x.saturating_add(self.bounds.width)
            && y >= self.bounds.y
            && y < self.bounds.y.saturating_add(self.bounds.height)
    }
}

/// Buffers use origin coordinates; bounds carry the screen position
fn local_area(bounds: Rect) -> Rect {
    Rect::new(0, 0, bounds.width, bounds.height)
}
