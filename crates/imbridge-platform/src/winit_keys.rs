//! Winit key and button translation.

use imbridge_core::{Key, MouseButton};
use winit::keyboard::KeyCode;

/// Maps a physical winit key to the GUI library's key, if it tracks it.
pub fn key_from_winit(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Tab => Key::Tab,
        KeyCode::ArrowLeft => Key::LeftArrow,
        KeyCode::ArrowRight => Key::RightArrow,
        KeyCode::ArrowUp => Key::UpArrow,
        KeyCode::ArrowDown => Key::DownArrow,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::NumpadEnter => Key::KeypadEnter,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::SuperRight => Key::RightSuper,
        _ => return None,
    };
    Some(key)
}

/// Maps a winit mouse button; buttons beyond the fifth are ignored.
pub fn mouse_button_from_winit(button: winit::event::MouseButton) -> Option<MouseButton> {
    use winit::event::MouseButton as Winit;
    match button {
        Winit::Left => Some(MouseButton::Left),
        Winit::Right => Some(MouseButton::Right),
        Winit::Middle => Some(MouseButton::Middle),
        Winit::Back => Some(MouseButton::Extra1),
        Winit::Forward => Some(MouseButton::Extra2),
        Winit::Other(_) => None,
    }
}

/// Characters from a key event's text that the GUI library should receive.
pub fn text_characters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|ch| !ch.is_control())
}
