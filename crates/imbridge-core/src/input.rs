//! Per-frame input snapshot handed to the GUI library.

use glam::Vec2;

/// Pointer position reported while the window is unfocused or the cursor is elsewhere.
///
/// Lies far outside any UI so no widget reacts to it.
pub const MOUSE_POS_INVALID: Vec2 = Vec2::new(-f32::MAX, -f32::MAX);

bitflags::bitflags! {
    /// Options the GUI library sets for the platform side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConfigFlags: u32 {
        /// The bridge must not touch the platform cursor shape or visibility.
        const NO_MOUSE_CURSOR_CHANGE = 1 << 0;
    }
}

bitflags::bitflags! {
    /// Capabilities the bridge advertises to the GUI library.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BackendFlags: u32 {
        /// Requested cursor shapes are honored.
        const HAS_MOUSE_CURSORS = 1 << 0;
        /// `want_set_mouse_pos` requests are honored.
        const HAS_SET_MOUSE_POS = 1 << 1;
        /// Draw commands may carry a non-zero vertex offset.
        const RENDERER_HAS_VTX_OFFSET = 1 << 2;
    }
}

/// Logical mouse buttons tracked by the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Extra1,
    Extra2,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = 5;

    /// Every button, in index order.
    pub const ALL: [MouseButton; Self::COUNT] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Extra1,
        MouseButton::Extra2,
    ];

    /// Index of this button in per-button tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Logical keys tracked by the snapshot.
///
/// The navigation and editing keys the GUI library binds by default, the
/// shortcut letters, and both physical sides of every modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    KeypadEnter,
    A,
    C,
    V,
    X,
    Y,
    Z,
    LeftCtrl,
    RightCtrl,
    LeftShift,
    RightShift,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,
}

impl Key {
    /// Number of tracked keys.
    pub const COUNT: usize = 30;

    /// Every key, in index order.
    pub const ALL: [Key; Self::COUNT] = [
        Key::Tab,
        Key::LeftArrow,
        Key::RightArrow,
        Key::UpArrow,
        Key::DownArrow,
        Key::PageUp,
        Key::PageDown,
        Key::Home,
        Key::End,
        Key::Insert,
        Key::Delete,
        Key::Backspace,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::KeypadEnter,
        Key::A,
        Key::C,
        Key::V,
        Key::X,
        Key::Y,
        Key::Z,
        Key::LeftCtrl,
        Key::RightCtrl,
        Key::LeftShift,
        Key::RightShift,
        Key::LeftAlt,
        Key::RightAlt,
        Key::LeftSuper,
        Key::RightSuper,
    ];

    /// Index of this key in the key table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this key is one side of a modifier.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LeftCtrl
                | Key::RightCtrl
                | Key::LeftShift
                | Key::RightShift
                | Key::LeftAlt
                | Key::RightAlt
                | Key::LeftSuper
                | Key::RightSuper
        )
    }
}

/// A device event, already translated from the windowing library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer button changed state.
    MouseButton { button: MouseButton, pressed: bool },
    /// Scroll wheel or trackpad movement, in lines.
    Scroll { dx: f32, dy: f32 },
    /// A tracked key changed state.
    Key { key: Key, pressed: bool },
    /// A decoded text code point.
    Text(char),
}

/// Input state the GUI library reads once per frame.
///
/// Written by the bridge from device events and the per-frame poll; wheel
/// deltas and queued characters are consumed by the GUI library.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    /// Window size in logical pixels.
    pub display_size: Vec2,
    /// Ratio of framebuffer pixels to logical pixels.
    pub display_framebuffer_scale: Vec2,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Pointer position in logical pixels, or [`MOUSE_POS_INVALID`].
    pub mouse_pos: Vec2,
    /// Vertical wheel delta accumulated since the GUI library last consumed it.
    pub mouse_wheel: f32,
    /// Horizontal wheel delta accumulated since the GUI library last consumed it.
    pub mouse_wheel_h: f32,
    /// Set by the GUI library when it wants the pointer moved to `mouse_pos`.
    pub want_set_mouse_pos: bool,
    /// Set by the GUI library when it draws its own cursor.
    pub mouse_draw_cursor: bool,
    /// Options set by the GUI library.
    pub config_flags: ConfigFlags,
    /// Capabilities set by the bridge.
    pub backend_flags: BackendFlags,
    mouse_down: [bool; MouseButton::COUNT],
    keys_down: [bool; Key::COUNT],
    key_ctrl: bool,
    key_shift: bool,
    key_alt: bool,
    key_super: bool,
    input_characters: Vec<char>,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            display_size: Vec2::ZERO,
            display_framebuffer_scale: Vec2::ONE,
            delta_time: crate::options::DEFAULT_DELTA_TIME,
            mouse_pos: MOUSE_POS_INVALID,
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            want_set_mouse_pos: false,
            mouse_draw_cursor: false,
            config_flags: ConfigFlags::empty(),
            backend_flags: BackendFlags::empty(),
            mouse_down: [false; MouseButton::COUNT],
            keys_down: [false; Key::COUNT],
            key_ctrl: false,
            key_shift: false,
            key_alt: false,
            key_super: false,
            input_characters: Vec::new(),
        }
    }
}

impl InputSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `button` is down this frame.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    /// Sets the state of `button` for this frame.
    pub fn set_mouse_down(&mut self, button: MouseButton, down: bool) {
        self.mouse_down[button.index()] = down;
    }

    /// Returns whether `key` is held.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down[key.index()]
    }

    /// Sets the state of `key` and recomputes the modifier flags.
    pub fn set_key_down(&mut self, key: Key, down: bool) {
        self.keys_down[key.index()] = down;
        self.update_modifiers();
    }

    fn update_modifiers(&mut self) {
        let held = |key: Key| self.keys_down[key.index()];
        let ctrl = held(Key::LeftCtrl) || held(Key::RightCtrl);
        let shift = held(Key::LeftShift) || held(Key::RightShift);
        let alt = held(Key::LeftAlt) || held(Key::RightAlt);
        let sup = held(Key::LeftSuper) || held(Key::RightSuper);
        self.key_ctrl = ctrl;
        self.key_shift = shift;
        self.key_alt = alt;
        self.key_super = sup;
    }

    /// Either control key is held.
    pub fn key_ctrl(&self) -> bool {
        self.key_ctrl
    }

    /// Either shift key is held.
    pub fn key_shift(&self) -> bool {
        self.key_shift
    }

    /// Either alt key is held.
    pub fn key_alt(&self) -> bool {
        self.key_alt
    }

    /// Either super key is held.
    pub fn key_super(&self) -> bool {
        self.key_super
    }

    /// Adds wheel movement to the pending deltas.
    pub fn add_scroll(&mut self, dx: f32, dy: f32) {
        self.mouse_wheel_h += dx;
        self.mouse_wheel += dy;
    }

    /// Queues a text code point for the GUI library.
    pub fn add_input_character(&mut self, ch: char) {
        self.input_characters.push(ch);
    }

    /// Characters queued since the GUI library last drained them.
    pub fn input_characters(&self) -> &[char] {
        &self.input_characters
    }

    /// Drains the queued characters.
    pub fn take_input_characters(&mut self) -> Vec<char> {
        std::mem::take(&mut self.input_characters)
    }

    /// Returns whether `mouse_pos` holds a real pointer position.
    pub fn is_mouse_pos_valid(&self) -> bool {
        self.mouse_pos.x > -f32::MAX && self.mouse_pos.y > -f32::MAX
    }
}
