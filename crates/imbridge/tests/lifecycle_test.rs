//! Initialization, frame sequencing and shutdown of the bridge.
//!
//! Everything runs against the headless GL device, window and GUI context,
//! so no display or GPU is needed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use imbridge::*;

type TestBridge = ImGuiBridge<HeadlessGl, HeadlessWindow, ScriptedGui>;

/// A clipboard whose contents the test can inspect.
#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<Option<String>>>);

impl ClipboardBackend for SharedClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.0.borrow().clone()
    }

    fn set_text(&mut self, text: &str) {
        *self.0.borrow_mut() = Some(text.to_owned());
    }
}

/// A GUI context that reports its teardown after the bridge has dropped it.
struct TrackedGui {
    inner: ScriptedGui,
    shut_down: Rc<Cell<bool>>,
}

impl GuiContext for TrackedGui {
    fn font_atlas_built(&self) -> bool {
        self.inner.font_atlas_built()
    }

    fn font_atlas_rgba32(&mut self) -> Option<FontAtlasTexture<'_>> {
        self.inner.font_atlas_rgba32()
    }

    fn set_font_texture_id(&mut self, id: Option<TextureId>) {
        self.inner.set_font_texture_id(id);
    }

    fn font_texture_id(&self) -> Option<TextureId> {
        self.inner.font_texture_id()
    }

    fn set_clipboard_backend(&mut self, clipboard: Box<dyn ClipboardBackend>) {
        self.inner.set_clipboard_backend(clipboard);
    }

    fn new_frame(&mut self, input: &mut InputSnapshot) {
        self.inner.new_frame(input);
    }

    fn mouse_cursor(&self) -> Option<MouseCursor> {
        self.inner.mouse_cursor()
    }

    fn render(&mut self, input: &mut InputSnapshot) -> &DrawData {
        self.inner.render(input)
    }

    fn shutdown(&mut self) {
        self.inner.shutdown();
        self.shut_down.set(true);
    }
}

fn bridge_with(gui: ScriptedGui, options: BridgeOptions) -> TestBridge {
    ImGuiBridge::initialize_with_clipboard(
        HeadlessGl::with_viewport(1280, 720),
        HeadlessWindow::new(),
        gui,
        options,
        None,
    )
    .unwrap()
}

fn bridge() -> TestBridge {
    bridge_with(
        ScriptedGui::new().with_font_atlas(64, 64),
        BridgeOptions::default(),
    )
}

#[test]
fn test_font_atlas_becomes_one_registered_texture() {
    let bridge = bridge_with(
        ScriptedGui::new().with_font_atlas(512, 512),
        BridgeOptions::default(),
    );

    let gl = bridge.gl();
    assert_eq!(gl.live_textures(), 1);
    let texture = gl.texture_names()[0];
    assert_eq!(gl.texture_size(texture), Some((512, 512)));
    assert_eq!(bridge.gui().font_texture_id(), Some(TextureId::from(texture)));
}

#[test]
fn test_backend_flags_are_advertised() {
    let bridge = bridge();
    let flags = bridge.input().backend_flags;
    assert!(flags.contains(BackendFlags::HAS_MOUSE_CURSORS));
    assert!(flags.contains(BackendFlags::HAS_SET_MOUSE_POS));
    assert!(flags.contains(BackendFlags::RENDERER_HAS_VTX_OFFSET));

    let bridge = bridge_with(
        ScriptedGui::new().with_font_atlas(8, 8),
        BridgeOptions::default().with_mouse_cursors(false),
    );
    assert!(!bridge.input().backend_flags.contains(BackendFlags::HAS_MOUSE_CURSORS));
    assert!(bridge.cursors().is_empty());
}

#[test]
fn test_cursor_table_is_filled_at_init() {
    let bridge = bridge();
    assert_eq!(bridge.window().live_cursors(), MouseCursor::COUNT);
    for cursor in MouseCursor::ALL {
        assert!(bridge.cursors().get(cursor).is_some());
    }
}

#[test]
fn test_clipboard_is_injected() {
    let clipboard = SharedClipboard::default();
    let mut bridge = ImGuiBridge::initialize_with_clipboard(
        HeadlessGl::new(),
        HeadlessWindow::new(),
        ScriptedGui::new().with_font_atlas(8, 8),
        BridgeOptions::default(),
        Some(Box::new(clipboard.clone())),
    )
    .unwrap();

    assert!(bridge.gui_mut().copy_to_clipboard("hello"));
    assert_eq!(clipboard.0.borrow().as_deref(), Some("hello"));
    assert_eq!(bridge.gui_mut().paste_from_clipboard().as_deref(), Some("hello"));
}

#[test]
fn test_shader_failure_is_fatal() {
    let gl = HeadlessGl::new();
    gl.fail_shader_compile(ShaderStage::Fragment, "0:1: syntax error");

    let result = ImGuiBridge::initialize_with_clipboard(
        gl,
        HeadlessWindow::new(),
        ScriptedGui::new().with_font_atlas(8, 8),
        BridgeOptions::default(),
        None,
    );

    let Err(BridgeError::Render(inner)) = result else {
        panic!("expected a render error");
    };
    let err = inner.downcast_ref::<RenderError>().unwrap();
    assert!(matches!(
        err,
        RenderError::ShaderCompilation {
            stage: ShaderStage::Fragment,
            ..
        }
    ));
    assert!(err.to_string().contains("syntax error"));
}

#[test]
fn test_unbuilt_atlas_fails_initialization() {
    let result = ImGuiBridge::initialize_with_clipboard(
        HeadlessGl::new(),
        HeadlessWindow::new(),
        ScriptedGui::new(),
        BridgeOptions::default(),
        None,
    );
    assert!(matches!(result, Err(BridgeError::FontAtlasNotBuilt)));
}

#[test]
fn test_failed_initialization_shuts_gui_down() {
    let gl = HeadlessGl::new();
    gl.fail_program_link("missing main");
    let shut_down = Rc::new(Cell::new(false));
    let gui = TrackedGui {
        inner: ScriptedGui::new().with_font_atlas(8, 8),
        shut_down: Rc::clone(&shut_down),
    };

    let result = ImGuiBridge::initialize_with_clipboard(
        gl,
        HeadlessWindow::new(),
        gui,
        BridgeOptions::default(),
        None,
    );

    assert!(matches!(result, Err(BridgeError::Render(_))));
    assert!(shut_down.get());
}

#[test]
fn test_begin_frame_requires_built_atlas() {
    let mut bridge = bridge();
    bridge.gui_mut().clear_font_atlas();

    assert!(matches!(
        bridge.begin_frame(),
        Err(BridgeError::FontAtlasNotBuilt)
    ));
    assert!(!bridge.in_frame());
    assert_eq!(bridge.gui().frames_begun(), 0);

    bridge.gui_mut().build_font_atlas(vec![0; 4 * 4 * 4], 4, 4);
    bridge.begin_frame().unwrap();
}

#[test]
fn test_frames_must_be_balanced() {
    let mut bridge = bridge();

    assert!(matches!(bridge.end_frame(), Err(BridgeError::FrameNotBegun)));

    bridge.begin_frame().unwrap();
    assert!(bridge.in_frame());
    assert!(matches!(
        bridge.begin_frame(),
        Err(BridgeError::FrameAlreadyBegun)
    ));

    bridge.end_frame().unwrap();
    assert!(!bridge.in_frame());
    assert_eq!(bridge.gui().frames_begun(), 1);
    assert_eq!(bridge.gui().frames_rendered(), 1);
}

#[test]
fn test_shutdown_releases_everything_once() {
    let mut bridge = bridge();
    bridge.begin_frame().unwrap();

    bridge.shutdown();
    bridge.shutdown();

    assert!(bridge.is_shut_down());
    let gl = bridge.gl();
    assert_eq!(gl.live_textures(), 0);
    assert_eq!(gl.live_buffers(), 0);
    assert_eq!(gl.live_shaders(), 0);
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(bridge.window().live_cursors(), 0);
    assert_eq!(bridge.window().destroyed_cursors(), MouseCursor::COUNT);
    assert_eq!(bridge.gui().font_texture_id(), None);
    assert!(bridge.gui().is_shut_down());
}

#[test]
fn test_frames_fail_after_shutdown() {
    let mut bridge = bridge();
    bridge.shutdown();

    assert!(matches!(bridge.begin_frame(), Err(BridgeError::ShutDown)));
    assert!(matches!(bridge.end_frame(), Err(BridgeError::ShutDown)));
}
