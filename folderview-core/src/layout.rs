use kurbo::{Insets, Rect, Size};

/// How a widget wants to grow inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Use the size hint and never grow.
    Fixed,
    /// Start from the size hint but accept more space.
    #[default]
    Preferred,
    /// Take all the space that is available.
    Expanding,
}

/// Identifies the widget occupying a layout slot.
pub type SlotId = u64;

/// A vertical box holding at most one child, filling it edge to edge minus a margin.
///
/// Inserting a widget replaces the previous occupant; the layout never holds
/// two children at once.
#[derive(Debug, Clone, Default)]
pub struct BoxLayout {
    margin: f64,
    child: Option<SlotId>,
    geometry: Rect,
}

impl BoxLayout {
    /// Create an empty layout with the given margin on every side.
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            ..Default::default()
        }
    }

    /// The margin on every side.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Put `child` in the slot and return the widget it replaced, if any.
    pub fn replace_widget(&mut self, child: SlotId) -> Option<SlotId> {
        let previous = self.child.replace(child);
        if let Some(previous) = previous.filter(|previous| *previous != child) {
            log::trace!("BoxLayout: slot {} replaced by {}", previous, child);
        }
        previous
    }

    /// Empty the slot.
    pub fn take_widget(&mut self) -> Option<SlotId> {
        self.child.take()
    }

    /// The widget occupying the slot.
    pub fn widget(&self) -> Option<SlotId> {
        self.child
    }

    /// Number of occupied slots (0 or 1).
    pub fn count(&self) -> usize {
        usize::from(self.child.is_some())
    }

    /// Set the rectangle of the container and return the one given to the child.
    pub fn set_geometry(&mut self, rect: Rect) -> Rect {
        self.geometry = rect;
        self.child_geometry()
    }

    /// The rectangle of the container.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// The rectangle given to the child, in container coordinates.
    pub fn child_geometry(&self) -> Rect {
        let inner = Rect::from_origin_size((0.0, 0.0), self.geometry.size()) - Insets::uniform(self.margin);
        // A negative size would flip the rectangle.
        Rect::from_origin_size(inner.origin(), Size::new(inner.width().max(0.0), inner.height().max(0.0)))
    }

    /// Size the container needs to show a child with the given hint.
    pub fn size_hint(&self, child_hint: Size) -> Size {
        Size::new(
            child_hint.width + self.margin * 2.0,
            child_hint.height + self.margin * 2.0,
        )
    }
}
