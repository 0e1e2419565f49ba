//! Click-versus-drag disambiguation for draggable cards.

/// Pointer state of a single draggable element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragGuard {
    #[default]
    Idle,
    Pressed,
    Moved,
}

impl DragGuard {
    /// Pointer went down on the element.
    pub fn press(&mut self) {
        *self = DragGuard::Pressed;
    }

    /// Pointer moved, or a drag started, after the press.
    pub fn pointer_moved(&mut self) {
        if *self == DragGuard::Pressed {
            *self = DragGuard::Moved;
        }
    }

    /// Pointer released. Returns `true` when this counts as a click.
    pub fn release(&mut self) -> bool {
        let is_click = *self == DragGuard::Pressed;
        *self = DragGuard::Idle;
        is_click
    }
}
