//! OpenGL render bridge for imbridge.
//!
//! This crate draws the GUI library's per-frame [`imbridge_core::DrawData`]:
//! - [`GlDevice`], the narrow GL surface the renderer needs, implemented for
//!   [`glow::Context`]
//! - [`ShaderBuilder`] for the UI program
//! - [`GlStateSnapshot`] for saving and restoring the host's GL state
//! - [`Renderer`], which owns the pipeline objects and replays draw lists
//! - [`HeadlessGl`], an in-memory device for tests and GPU-less hosts

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// GL passes enum values, object names and sizes through signed integers
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod buffer;
pub mod device;
pub mod error;
pub mod headless;
pub mod renderer;
pub mod shader;
pub mod state;
pub mod texture;

pub use device::GlDevice;
pub use error::{RenderError, RenderResult};
pub use headless::{DrawCall, GlCall, HeadlessGl};
pub use renderer::{ortho_projection, Renderer};
pub use shader::{ShaderBuilder, ShaderProgram, ShaderStage};
pub use state::GlStateSnapshot;

// Re-export glow for hosts constructing a context
pub use glow;
