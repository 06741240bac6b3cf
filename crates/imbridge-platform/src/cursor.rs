//! Platform cursors for each GUI cursor kind.

use imbridge_core::MouseCursor;

use crate::window::{CursorHandle, WindowBackend};

/// One platform cursor slot per [`MouseCursor`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorTable {
    handles: [Option<CursorHandle>; MouseCursor::COUNT],
}

impl CursorTable {
    /// A table with no cursors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Asks the window for a standard cursor for every kind.
    pub fn create<W: WindowBackend + ?Sized>(window: &mut W) -> Self {
        let mut table = Self::empty();
        for cursor in MouseCursor::ALL {
            table.handles[cursor.index()] = window.create_standard_cursor(cursor);
            if table.handles[cursor.index()].is_none() {
                log::debug!("no platform cursor for {cursor:?}, arrow will be used");
            }
        }
        table
    }

    /// The cursor created for `cursor`, if any.
    pub fn get(&self, cursor: MouseCursor) -> Option<CursorHandle> {
        self.handles[cursor.index()]
    }

    /// The cursor to show for `cursor`, falling back to the arrow.
    pub fn resolve(&self, cursor: MouseCursor) -> Option<CursorHandle> {
        self.get(cursor).or_else(|| self.get(MouseCursor::Arrow))
    }

    /// Whether no slot holds a cursor.
    pub fn is_empty(&self) -> bool {
        self.handles.iter().all(Option::is_none)
    }

    /// Releases every cursor. Later calls do nothing.
    pub fn destroy<W: WindowBackend + ?Sized>(&mut self, window: &mut W) {
        for slot in &mut self.handles {
            if let Some(handle) = slot.take() {
                window.destroy_cursor(handle);
            }
        }
    }
}
