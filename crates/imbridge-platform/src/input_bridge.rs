//! Feeds window input into the GUI library's input snapshot.

use glam::Vec2;
use imbridge_core::{
    BridgeOptions, ConfigFlags, GuiContext, InputEvent, InputSnapshot, MouseButton,
    MOUSE_POS_INVALID,
};

use crate::cursor::CursorTable;
use crate::window::{CursorMode, WindowBackend};

/// Translates window events and per-frame window state into an [`InputSnapshot`].
///
/// Event handlers only record; [`InputBridge::prepare_frame`] and
/// [`InputBridge::update_cursor`] run once per frame before the GUI library
/// starts its frame.
#[derive(Debug)]
pub struct InputBridge {
    cursors: CursorTable,
    manage_cursor: bool,
    just_pressed: [bool; MouseButton::COUNT],
    last_time: Option<f64>,
    fallback_delta_time: f32,
}

impl InputBridge {
    /// Creates the bridge and, if enabled, the platform cursor table.
    pub fn new<W: WindowBackend + ?Sized>(window: &mut W, options: &BridgeOptions) -> Self {
        let cursors = if options.mouse_cursors {
            CursorTable::create(window)
        } else {
            CursorTable::empty()
        };
        Self {
            cursors,
            manage_cursor: options.mouse_cursors,
            just_pressed: [false; MouseButton::COUNT],
            last_time: None,
            fallback_delta_time: options.fallback_delta_time,
        }
    }

    /// The platform cursors, one slot per GUI cursor kind.
    pub fn cursors(&self) -> &CursorTable {
        &self.cursors
    }

    /// Whether a press of `button` is waiting for the next frame.
    pub fn is_pending_press(&self, button: MouseButton) -> bool {
        self.just_pressed[button.index()]
    }

    /// Records one input event.
    pub fn handle_event(&mut self, input: &mut InputSnapshot, event: InputEvent) {
        match event {
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    self.just_pressed[button.index()] = true;
                }
            }
            InputEvent::Scroll { dx, dy } => input.add_scroll(dx, dy),
            InputEvent::Key { key, pressed } => input.set_key_down(key, pressed),
            InputEvent::Text(ch) => input.add_input_character(ch),
        }
    }

    /// Per-frame poll: display metrics, frame time, mouse buttons and pointer.
    pub fn prepare_frame<W: WindowBackend + ?Sized>(
        &mut self,
        input: &mut InputSnapshot,
        window: &mut W,
    ) {
        self.update_display(input, window);
        self.update_delta_time(input, window);
        self.update_mouse_buttons(input, window);
        self.update_mouse_pos(input, window);
    }

    /// Refreshes the display size and the framebuffer scale.
    pub fn update_display<W: WindowBackend + ?Sized>(&self, input: &mut InputSnapshot, window: &W) {
        let size = window.size();
        let framebuffer = window.framebuffer_size();
        input.display_size = size;
        input.display_framebuffer_scale = Vec2::new(
            if size.x > 0.0 { framebuffer.x / size.x } else { 0.0 },
            if size.y > 0.0 { framebuffer.y / size.y } else { 0.0 },
        );
    }

    /// Time since the previous frame; the fallback on the first frame or if
    /// the clock did not advance.
    #[allow(clippy::cast_possible_truncation)]
    pub fn update_delta_time<W: WindowBackend + ?Sized>(
        &mut self,
        input: &mut InputSnapshot,
        window: &W,
    ) {
        let now = window.time();
        input.delta_time = match self.last_time {
            Some(last) if now > last => (now - last) as f32,
            _ => self.fallback_delta_time,
        };
        self.last_time = Some(now);
    }

    /// A button is down for the frame if it was pressed since the last frame
    /// or is held now, so a click shorter than a frame is never lost.
    pub fn update_mouse_buttons<W: WindowBackend + ?Sized>(
        &mut self,
        input: &mut InputSnapshot,
        window: &W,
    ) {
        for button in MouseButton::ALL {
            let down = self.just_pressed[button.index()] || window.is_mouse_button_down(button);
            input.set_mouse_down(button, down);
            self.just_pressed[button.index()] = false;
        }
    }

    /// Polls the pointer, or moves it if the GUI library asked to.
    ///
    /// The position is the invalid sentinel while the window is unfocused,
    /// and for the frame in which the pointer is warped.
    pub fn update_mouse_pos<W: WindowBackend + ?Sized>(
        &mut self,
        input: &mut InputSnapshot,
        window: &mut W,
    ) {
        let previous = input.mouse_pos;
        input.mouse_pos = MOUSE_POS_INVALID;
        if !window.is_focused() {
            return;
        }

        if input.want_set_mouse_pos {
            if let Err(err) = window.set_cursor_position(previous) {
                log::warn!("ignoring pointer move request: {err}");
            }
        } else if let Some(pos) = window.cursor_position() {
            input.mouse_pos = pos;
        }
    }

    /// Applies the cursor the GUI library asks for.
    ///
    /// Leaves the cursor alone when cursor management is disabled, when the
    /// GUI library set [`ConfigFlags::NO_MOUSE_CURSOR_CHANGE`], or when the
    /// application has captured the pointer.
    pub fn update_cursor<W, C>(&self, input: &InputSnapshot, gui: &C, window: &mut W)
    where
        W: WindowBackend + ?Sized,
        C: GuiContext + ?Sized,
    {
        if !self.manage_cursor
            || input.config_flags.contains(ConfigFlags::NO_MOUSE_CURSOR_CHANGE)
            || window.cursor_mode() == CursorMode::Disabled
        {
            return;
        }

        match gui.mouse_cursor() {
            Some(cursor) if !input.mouse_draw_cursor => {
                if let Some(handle) = self.cursors.resolve(cursor) {
                    window.set_cursor(handle);
                }
                window.set_cursor_mode(CursorMode::Normal);
            }
            _ => window.set_cursor_mode(CursorMode::Hidden),
        }
    }

    /// Releases the platform cursors. Later calls do nothing.
    pub fn shutdown<W: WindowBackend + ?Sized>(&mut self, window: &mut W) {
        self.cursors.destroy(window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessWindow;
    use imbridge_core::{Key, MouseCursor, ScriptedGui};
    use proptest::prelude::*;

    fn bridge(window: &mut HeadlessWindow) -> InputBridge {
        InputBridge::new(window, &BridgeOptions::default())
    }

    fn press(button: MouseButton, pressed: bool) -> InputEvent {
        InputEvent::MouseButton { button, pressed }
    }

    #[test]
    fn test_click_within_one_frame_is_seen() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();

        bridge.handle_event(&mut input, press(MouseButton::Left, true));
        bridge.handle_event(&mut input, press(MouseButton::Left, false));
        bridge.prepare_frame(&mut input, &mut window);
        assert!(input.is_mouse_down(MouseButton::Left));

        bridge.prepare_frame(&mut input, &mut window);
        assert!(!input.is_mouse_down(MouseButton::Left));
    }

    #[test]
    fn test_held_button_stays_down() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();
        window.set_mouse_button(MouseButton::Right, true);

        bridge.prepare_frame(&mut input, &mut window);
        bridge.prepare_frame(&mut input, &mut window);

        assert!(input.is_mouse_down(MouseButton::Right));
        assert!(!input.is_mouse_down(MouseButton::Left));
    }

    #[test]
    fn test_release_does_not_clear_pending_press() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();

        bridge.handle_event(&mut input, press(MouseButton::Middle, true));
        bridge.handle_event(&mut input, press(MouseButton::Middle, false));

        assert!(bridge.is_pending_press(MouseButton::Middle));
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();

        bridge.handle_event(&mut input, InputEvent::Scroll { dx: 1.0, dy: -2.0 });
        bridge.handle_event(&mut input, InputEvent::Scroll { dx: 0.5, dy: -1.0 });
        bridge.prepare_frame(&mut input, &mut window);

        assert!((input.mouse_wheel_h - 1.5).abs() < f32::EPSILON);
        assert!((input.mouse_wheel + 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_text_is_queued_in_order() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();

        for ch in "hé!".chars() {
            bridge.handle_event(&mut input, InputEvent::Text(ch));
        }

        assert_eq!(input.input_characters(), &['h', 'é', '!']);
    }

    #[test]
    fn test_pointer_is_polled_when_focused() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();
        window.move_pointer(Some(Vec2::new(12.0, 34.0)));

        bridge.prepare_frame(&mut input, &mut window);
        assert_eq!(input.mouse_pos, Vec2::new(12.0, 34.0));

        window.set_focused(false);
        bridge.prepare_frame(&mut input, &mut window);
        assert_eq!(input.mouse_pos, MOUSE_POS_INVALID);
        assert!(!input.is_mouse_pos_valid());
    }

    #[test]
    fn test_pointer_outside_window_is_invalid() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();
        window.move_pointer(None);

        bridge.prepare_frame(&mut input, &mut window);
        assert_eq!(input.mouse_pos, MOUSE_POS_INVALID);
    }

    #[test]
    fn test_warp_request_moves_pointer_to_previous_position() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();
        input.mouse_pos = Vec2::new(40.0, 50.0);
        input.want_set_mouse_pos = true;

        bridge.prepare_frame(&mut input, &mut window);

        assert_eq!(window.warps(), &[Vec2::new(40.0, 50.0)]);
        assert_eq!(input.mouse_pos, MOUSE_POS_INVALID);
    }

    #[test]
    fn test_failed_warp_is_swallowed() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();
        window.fail_cursor_warps(true);
        input.mouse_pos = Vec2::new(1.0, 1.0);
        input.want_set_mouse_pos = true;

        bridge.prepare_frame(&mut input, &mut window);

        assert!(window.warps().is_empty());
    }

    #[test]
    fn test_display_metrics_and_delta_time() {
        let mut window = HeadlessWindow::new()
            .with_size(800.0, 600.0)
            .with_framebuffer_size(1600.0, 1200.0);
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();

        bridge.prepare_frame(&mut input, &mut window);
        assert_eq!(input.display_size, Vec2::new(800.0, 600.0));
        assert_eq!(input.display_framebuffer_scale, Vec2::splat(2.0));
        assert!((input.delta_time - 1.0 / 60.0).abs() < 1e-6);

        window.advance_time(0.25);
        bridge.prepare_frame(&mut input, &mut window);
        assert!((input.delta_time - 0.25).abs() < 1e-6);

        bridge.prepare_frame(&mut input, &mut window);
        assert!((input.delta_time - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_minimized_window_has_zero_scale() {
        let mut window = HeadlessWindow::new().with_size(0.0, 0.0);
        let mut bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();

        bridge.prepare_frame(&mut input, &mut window);
        assert_eq!(input.display_framebuffer_scale, Vec2::ZERO);
    }

    #[test]
    fn test_no_cursor_hides_platform_cursor() {
        let mut window = HeadlessWindow::new();
        let bridge = bridge(&mut window);
        let input = InputSnapshot::new();
        let mut gui = ScriptedGui::new();
        gui.set_mouse_cursor(None);

        bridge.update_cursor(&input, &gui, &mut window);
        assert_eq!(window.cursor_mode(), CursorMode::Hidden);
    }

    #[test]
    fn test_self_drawn_cursor_hides_platform_cursor() {
        let mut window = HeadlessWindow::new();
        let bridge = bridge(&mut window);
        let mut input = InputSnapshot::new();
        input.mouse_draw_cursor = true;
        let gui = ScriptedGui::new();

        bridge.update_cursor(&input, &gui, &mut window);
        assert_eq!(window.cursor_mode(), CursorMode::Hidden);
    }

    #[test]
    fn test_requested_cursor_is_shown() {
        let mut window = HeadlessWindow::new();
        let bridge = bridge(&mut window);
        let input = InputSnapshot::new();
        let mut gui = ScriptedGui::new();
        window.set_cursor_mode(CursorMode::Hidden);
        gui.set_mouse_cursor(Some(MouseCursor::Hand));

        bridge.update_cursor(&input, &gui, &mut window);
        assert_eq!(window.current_cursor(), Some(MouseCursor::Hand));
        assert_eq!(window.cursor_mode(), CursorMode::Normal);
    }

    #[test]
    fn test_unmapped_cursor_uses_arrow() {
        let mut window = HeadlessWindow::new().with_supported_cursors(&[
            MouseCursor::Arrow,
            MouseCursor::TextInput,
            MouseCursor::ResizeNS,
            MouseCursor::ResizeEW,
            MouseCursor::Hand,
        ]);
        let bridge = bridge(&mut window);
        let input = InputSnapshot::new();
        let mut gui = ScriptedGui::new();
        gui.set_mouse_cursor(Some(MouseCursor::NotAllowed));

        bridge.update_cursor(&input, &gui, &mut window);
        assert_eq!(window.current_cursor(), Some(MouseCursor::Arrow));
    }

    #[test]
    fn test_cursor_untouched_when_disabled_or_flagged() {
        let mut window = HeadlessWindow::new();
        let bridge = bridge(&mut window);
        let mut gui = ScriptedGui::new();
        gui.set_mouse_cursor(None);

        window.set_cursor_mode(CursorMode::Disabled);
        bridge.update_cursor(&InputSnapshot::new(), &gui, &mut window);
        assert_eq!(window.cursor_mode(), CursorMode::Disabled);

        window.set_cursor_mode(CursorMode::Normal);
        let mut input = InputSnapshot::new();
        input.config_flags = ConfigFlags::NO_MOUSE_CURSOR_CHANGE;
        bridge.update_cursor(&input, &gui, &mut window);
        assert_eq!(window.cursor_mode(), CursorMode::Normal);
    }

    #[test]
    fn test_cursor_management_can_be_turned_off() {
        let mut window = HeadlessWindow::new();
        let options = BridgeOptions::default().with_mouse_cursors(false);
        let bridge = InputBridge::new(&mut window, &options);
        let mut gui = ScriptedGui::new();
        gui.set_mouse_cursor(None);

        bridge.update_cursor(&InputSnapshot::new(), &gui, &mut window);

        assert!(bridge.cursors().is_empty());
        assert_eq!(window.live_cursors(), 0);
        assert_eq!(window.cursor_mode(), CursorMode::Normal);
    }

    #[test]
    fn test_shutdown_releases_cursors_once() {
        let mut window = HeadlessWindow::new();
        let mut bridge = bridge(&mut window);

        bridge.shutdown(&mut window);
        bridge.shutdown(&mut window);

        assert_eq!(window.live_cursors(), 0);
        assert_eq!(window.destroyed_cursors(), MouseCursor::COUNT);
    }

    fn key_event() -> impl Strategy<Value = InputEvent> {
        (prop::sample::select(Key::ALL.to_vec()), any::<bool>())
            .prop_map(|(key, pressed)| InputEvent::Key { key, pressed })
    }

    proptest! {
        #[test]
        fn prop_modifiers_track_physical_keys(events in prop::collection::vec(key_event(), 0..64)) {
            let mut window = HeadlessWindow::new();
            let mut bridge = bridge(&mut window);
            let mut input = InputSnapshot::new();

            for event in events {
                bridge.handle_event(&mut input, event);
                prop_assert_eq!(
                    input.key_ctrl(),
                    input.is_key_down(Key::LeftCtrl) || input.is_key_down(Key::RightCtrl)
                );
                prop_assert_eq!(
                    input.key_shift(),
                    input.is_key_down(Key::LeftShift) || input.is_key_down(Key::RightShift)
                );
                prop_assert_eq!(
                    input.key_alt(),
                    input.is_key_down(Key::LeftAlt) || input.is_key_down(Key::RightAlt)
                );
                prop_assert_eq!(
                    input.key_super(),
                    input.is_key_down(Key::LeftSuper) || input.is_key_down(Key::RightSuper)
                );
            }
        }

        #[test]
        fn prop_any_press_in_frame_reads_down(
            presses in prop::collection::vec((0usize..MouseButton::COUNT, any::<bool>()), 1..32),
        ) {
            let mut window = HeadlessWindow::new();
            let mut bridge = bridge(&mut window);
            let mut input = InputSnapshot::new();

            for &(index, pressed) in &presses {
                bridge.handle_event(&mut input, press(MouseButton::ALL[index], pressed));
            }
            bridge.prepare_frame(&mut input, &mut window);

            for button in MouseButton::ALL {
                let pressed = presses.iter().any(|&(i, p)| p && i == button.index());
                prop_assert_eq!(input.is_mouse_down(button), pressed);
            }
        }
    }
}
