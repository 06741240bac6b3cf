//! Cursor shapes the GUI library can request.

/// Logical cursor kind requested by the GUI library.
///
/// "No cursor" is expressed as `Option::<MouseCursor>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseCursor {
    #[default]
    Arrow,
    TextInput,
    ResizeAll,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
    Hand,
    NotAllowed,
}

impl MouseCursor {
    /// Number of cursor kinds.
    pub const COUNT: usize = 9;

    /// Every cursor kind, in index order.
    pub const ALL: [MouseCursor; Self::COUNT] = [
        MouseCursor::Arrow,
        MouseCursor::TextInput,
        MouseCursor::ResizeAll,
        MouseCursor::ResizeNS,
        MouseCursor::ResizeEW,
        MouseCursor::ResizeNESW,
        MouseCursor::ResizeNWSE,
        MouseCursor::Hand,
        MouseCursor::NotAllowed,
    ];

    /// Index of this kind in per-cursor tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
