//! System clipboard backed by `arboard`.

use imbridge_core::ClipboardBackend;

use crate::error::PlatformError;

/// The desktop clipboard, handed to the GUI library for copy and paste.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Opens the system clipboard.
    pub fn new() -> Result<Self, PlatformError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| PlatformError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(err) => {
                log::warn!("clipboard read failed: {err}");
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) {
        if let Err(err) = self.inner.set_text(text.to_owned()) {
            log::warn!("clipboard write failed: {err}");
        }
    }
}
