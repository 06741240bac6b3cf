//! imbridge: binds an immediate-mode GUI library to OpenGL and a window.
//!
//! The bridge has two halves. The input half turns window events and
//! per-frame window state into the GUI library's input snapshot. The render
//! half replays the GUI library's draw lists through OpenGL, leaving the
//! host's GL state untouched.
//!
//! # Quick Start
//!
//! ```no_run
//! use imbridge::*;
//!
//! fn run<C: GuiContext>(gl: glow::Context, window: WinitWindow, gui: C) -> Result<()> {
//!     let mut bridge = ImGuiBridge::initialize(gl, window, gui, BridgeOptions::default())?;
//!
//!     // Once per event loop iteration, after forwarding window events
//!     // through `handle_window_event`:
//!     bridge.begin_frame()?;
//!     // ... build the UI through `bridge.gui_mut()` ...
//!     bridge.end_frame()?;
//!
//!     bridge.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Headless use
//!
//! [`HeadlessGl`], [`HeadlessWindow`] and [`ScriptedGui`] stand in for the
//! GL context, the window and the GUI library, so the whole bridge runs
//! without a display or a GPU.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub use imbridge_core::{
    BackendFlags, BridgeError, BridgeOptions, ClipRect, ClipboardBackend, ConfigFlags, DrawCmd,
    DrawCmdParams, DrawData, DrawIdx, DrawList, DrawVert, FontAtlasTexture, GuiContext,
    InputEvent, InputSnapshot, Key, MouseButton, MouseCursor, Result, ScriptedGui, TextureId,
    UserCallbackId, Vec2, MOUSE_POS_INVALID,
};
pub use imbridge_platform::{
    CursorHandle, CursorMode, CursorTable, HeadlessWindow, InputBridge, PlatformError,
    SystemClipboard, WindowBackend, WinitWindow,
};
pub use imbridge_render::{
    glow, DrawCall, GlCall, GlDevice, GlStateSnapshot, HeadlessGl, RenderError, Renderer,
    ShaderStage,
};

use winit::event::WindowEvent;

/// A bridge over a glow context and a winit window.
pub type GlowBridge<C> = ImGuiBridge<glow::Context, WinitWindow, C>;

/// Owns the GL context, the window and the GUI library context, and drives
/// both halves of the bridge once per frame.
///
/// Each frame is `begin_frame`, UI building through [`ImGuiBridge::gui_mut`],
/// then `end_frame`. Window events may arrive at any point in between.
pub struct ImGuiBridge<G: GlDevice, W: WindowBackend, C: GuiContext> {
    gl: G,
    window: W,
    gui: C,
    input: InputSnapshot,
    input_bridge: InputBridge,
    renderer: Renderer,
    in_frame: bool,
    shut_down: bool,
}

impl<G: GlDevice, W: WindowBackend, C: GuiContext> ImGuiBridge<G, W, C> {
    /// Sets up both halves of the bridge with the system clipboard.
    ///
    /// A clipboard that cannot be opened is logged and left out; copy and
    /// paste in the GUI then do nothing.
    pub fn initialize(gl: G, window: W, gui: C, options: BridgeOptions) -> Result<Self> {
        let clipboard = match SystemClipboard::new() {
            Ok(clipboard) => Some(Box::new(clipboard) as Box<dyn ClipboardBackend>),
            Err(err) => {
                log::warn!("{err}; copy and paste disabled");
                None
            }
        };
        Self::initialize_with_clipboard(gl, window, gui, options, clipboard)
    }

    /// Sets up both halves of the bridge with an explicit clipboard.
    pub fn initialize_with_clipboard(
        gl: G,
        mut window: W,
        mut gui: C,
        options: BridgeOptions,
        clipboard: Option<Box<dyn ClipboardBackend>>,
    ) -> Result<Self> {
        let _ = env_logger::try_init();

        let mut input = InputSnapshot::new();
        input.backend_flags = BackendFlags::HAS_SET_MOUSE_POS | BackendFlags::RENDERER_HAS_VTX_OFFSET;
        if options.mouse_cursors {
            input.backend_flags |= BackendFlags::HAS_MOUSE_CURSORS;
        }
        if let Some(clipboard) = clipboard {
            gui.set_clipboard_backend(clipboard);
        }

        let mut input_bridge = InputBridge::new(&mut window, &options);
        let renderer = match Renderer::new(&gl, &mut gui, &options) {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("failed to create the UI renderer: {err}");
                input_bridge.shutdown(&mut window);
                gui.shutdown();
                return Err(match err {
                    RenderError::FontAtlasUnavailable => BridgeError::FontAtlasNotBuilt,
                    err => err.into(),
                });
            }
        };

        log::info!(
            "imbridge initialized ({}, {:?})",
            options.glsl_version,
            input.backend_flags
        );
        Ok(Self {
            gl,
            window,
            gui,
            input,
            input_bridge,
            renderer,
            in_frame: false,
            shut_down: false,
        })
    }

    /// Forwards one input event to the snapshot.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input_bridge.handle_event(&mut self.input, event);
    }

    /// Polls the window, applies the requested cursor and starts a GUI frame.
    pub fn begin_frame(&mut self) -> Result<()> {
        if self.shut_down {
            return Err(BridgeError::ShutDown);
        }
        if self.in_frame {
            return Err(BridgeError::FrameAlreadyBegun);
        }
        if !self.gui.font_atlas_built() {
            return Err(BridgeError::FontAtlasNotBuilt);
        }

        self.input_bridge
            .prepare_frame(&mut self.input, &mut self.window);
        self.input_bridge
            .update_cursor(&self.input, &self.gui, &mut self.window);
        self.gui.new_frame(&mut self.input);
        self.in_frame = true;
        Ok(())
    }

    /// Ends the GUI frame and draws it.
    pub fn end_frame(&mut self) -> Result<()> {
        if self.shut_down {
            return Err(BridgeError::ShutDown);
        }
        if !self.in_frame {
            return Err(BridgeError::FrameNotBegun);
        }
        self.in_frame = false;

        let draw_data = self.gui.render(&mut self.input);
        self.renderer.render(&self.gl, draw_data)?;
        Ok(())
    }

    /// Releases GPU objects, then platform cursors, then the GUI context.
    /// Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.renderer.destroy(&self.gl, &mut self.gui);
        self.input_bridge.shutdown(&mut self.window);
        self.gui.shutdown();
        self.in_frame = false;
        self.shut_down = true;
        log::info!("imbridge shut down");
    }

    /// Whether [`ImGuiBridge::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Whether a frame is between `begin_frame` and `end_frame`.
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn gui(&self) -> &C {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut C {
        &mut self.gui
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    /// The input snapshot handed to the GUI library each frame.
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The platform cursors created at initialization.
    pub fn cursors(&self) -> &CursorTable {
        self.input_bridge.cursors()
    }
}

impl<G: GlDevice, C: GuiContext> ImGuiBridge<G, WinitWindow, C> {
    /// Tracks a winit window event and forwards what the GUI library needs.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        for event in self.window.handle_window_event(event) {
            self.handle_event(event);
        }
    }
}

impl<G: GlDevice, W: WindowBackend, C: GuiContext> Drop for ImGuiBridge<G, W, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
