//! Replays GUI draw data through OpenGL.

use std::mem::{offset_of, size_of};

use glam::{Mat4, Vec2};
use imbridge_core::{
    BridgeOptions, DrawCmd, DrawCmdParams, DrawData, DrawList, DrawVert, GuiContext, TextureId,
};

use crate::buffer;
use crate::device::GlDevice;
use crate::error::{RenderError, RenderResult};
use crate::shader::{ShaderBuilder, ShaderProgram};
use crate::state::GlStateSnapshot;
use crate::texture;

/// Orthographic projection mapping the display rectangle to clip space.
///
/// `display_pos` lands on `(-1, 1)` and `display_pos + display_size` on
/// `(1, -1)`, so Y grows downwards like the GUI's coordinates.
pub fn ortho_projection(display_pos: Vec2, display_size: Vec2) -> Mat4 {
    let left = display_pos.x;
    let right = display_pos.x + display_size.x;
    let top = display_pos.y;
    let bottom = display_pos.y + display_size.y;
    Mat4::orthographic_rh_gl(left, right, bottom, top, -1.0, 1.0)
}

/// The OpenGL pipeline that draws the GUI.
///
/// Owns the UI shader program, one streaming vertex buffer, one streaming
/// index buffer and the font atlas texture. All of them are created in
/// [`Renderer::new`] and released by [`Renderer::destroy`].
#[derive(Debug)]
pub struct Renderer {
    program: ShaderProgram,
    vertex_buffer: u32,
    index_buffer: u32,
    font_texture: u32,
    destroyed: bool,
}

impl Renderer {
    /// Builds the pipeline and uploads the GUI's font atlas.
    ///
    /// The texture, array buffer and vertex array bindings in effect on entry
    /// are restored before returning, on success and on failure.
    #[allow(clippy::cast_sign_loss)]
    pub fn new<G, C>(gl: &G, gui: &mut C, options: &BridgeOptions) -> RenderResult<Self>
    where
        G: GlDevice + ?Sized,
        C: GuiContext + ?Sized,
    {
        let last_texture = gl.get_integer(glow::TEXTURE_BINDING_2D) as u32;
        let last_array_buffer = gl.get_integer(glow::ARRAY_BUFFER_BINDING) as u32;
        let last_vertex_array = gl.get_integer(glow::VERTEX_ARRAY_BINDING) as u32;

        let result = Self::create_device_objects(gl, gui, options);

        gl.bind_texture(glow::TEXTURE_2D, last_texture);
        gl.bind_buffer(glow::ARRAY_BUFFER, last_array_buffer);
        gl.bind_vertex_array(last_vertex_array);

        if let Ok(renderer) = &result {
            log::debug!(
                "UI renderer ready: program {}, font texture {}",
                renderer.program.program,
                renderer.font_texture
            );
        }
        result
    }

    fn create_device_objects<G, C>(gl: &G, gui: &mut C, options: &BridgeOptions) -> RenderResult<Self>
    where
        G: GlDevice + ?Sized,
        C: GuiContext + ?Sized,
    {
        let program = ShaderBuilder::new(options.glsl_version.as_str())
            .with_label("imgui")
            .build(gl)?;

        let mut renderer = Self {
            program,
            vertex_buffer: 0,
            index_buffer: 0,
            font_texture: 0,
            destroyed: false,
        };
        if let Err(err) = renderer.create_buffers_and_font(gl, gui) {
            renderer.destroy(gl, gui);
            return Err(err);
        }
        Ok(renderer)
    }

    fn create_buffers_and_font<G, C>(&mut self, gl: &G, gui: &mut C) -> RenderResult<()>
    where
        G: GlDevice + ?Sized,
        C: GuiContext + ?Sized,
    {
        self.vertex_buffer = buffer::create_buffer(gl)?;
        self.index_buffer = buffer::create_buffer(gl)?;

        let atlas = gui
            .font_atlas_rgba32()
            .ok_or(RenderError::FontAtlasUnavailable)?;
        self.font_texture = texture::create_font_texture(gl, &atlas)?;
        gui.set_font_texture_id(Some(TextureId::from(self.font_texture)));
        Ok(())
    }

    /// The linked UI program.
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// The texture holding the font atlas.
    pub fn font_texture(&self) -> TextureId {
        TextureId::from(self.font_texture)
    }

    /// Whether [`Renderer::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Draws one frame of GUI output.
    ///
    /// Returns without touching GL when there is nothing to draw or the
    /// framebuffer has no area. Otherwise the GL state in effect on entry is
    /// restored before returning, also when an error is returned.
    pub fn render<G: GlDevice + ?Sized>(&self, gl: &G, draw_data: &DrawData) -> RenderResult<()> {
        if self.destroyed {
            return Err(RenderError::Destroyed);
        }
        let (fb_width, fb_height) = draw_data.framebuffer_size();
        if draw_data.is_empty() || fb_width <= 0 || fb_height <= 0 {
            return Ok(());
        }

        let saved = GlStateSnapshot::capture(gl);

        // Vertex arrays are not shared between contexts, so each frame gets its own.
        let vertex_array = match gl.create_vertex_array() {
            Ok(vertex_array) => vertex_array,
            Err(reason) => {
                return Err(RenderError::CreateObject {
                    what: "vertex array",
                    reason,
                })
            }
        };
        self.setup_render_state(gl, draw_data, fb_width, fb_height, vertex_array);

        let result = draw_data
            .draw_lists
            .iter()
            .try_for_each(|list| self.render_list(gl, draw_data, list, vertex_array));

        gl.delete_vertex_array(vertex_array);
        saved.restore(gl);

        if let Err(err) = &result {
            log::error!("UI frame aborted: {err}");
        }
        result
    }

    fn render_list<G: GlDevice + ?Sized>(
        &self,
        gl: &G,
        draw_data: &DrawData,
        list: &DrawList,
        vertex_array: u32,
    ) -> RenderResult<()> {
        let (fb_width, fb_height) = draw_data.framebuffer_size();
        buffer::upload_vertices(gl, self.vertex_buffer, &list.vtx_buffer);
        buffer::upload_indices(gl, self.index_buffer, &list.idx_buffer);

        for command in &list.commands {
            match *command {
                DrawCmd::Elements { count, params } => {
                    self.render_elements(gl, draw_data, (fb_width, fb_height), count, &params);
                }
                DrawCmd::ResetRenderState => {
                    self.setup_render_state(gl, draw_data, fb_width, fb_height, vertex_array);
                }
                DrawCmd::UserCallback(id) => return Err(RenderError::UnsupportedCallback(id)),
            }
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn render_elements<G: GlDevice + ?Sized>(
        &self,
        gl: &G,
        draw_data: &DrawData,
        (fb_width, fb_height): (i32, i32),
        count: usize,
        params: &DrawCmdParams,
    ) {
        let clip = params
            .clip_rect
            .to_framebuffer(draw_data.display_pos, draw_data.framebuffer_scale);
        let Some([x, y, width, height]) = clip.scissor_box(fb_width, fb_height) else {
            return;
        };

        gl.scissor(x, y, width, height);
        gl.bind_texture(glow::TEXTURE_2D, texture_name(params.texture_id));
        gl.draw_elements_base_vertex(
            glow::TRIANGLES,
            count as i32,
            buffer::INDEX_TYPE,
            buffer::index_byte_offset(params.idx_offset),
            params.vtx_offset as i32,
        );
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn setup_render_state<G: GlDevice + ?Sized>(
        &self,
        gl: &G,
        draw_data: &DrawData,
        fb_width: i32,
        fb_height: i32,
        vertex_array: u32,
    ) {
        gl.active_texture(glow::TEXTURE0);
        gl.enable(glow::BLEND);
        gl.blend_equation_separate(glow::FUNC_ADD, glow::FUNC_ADD);
        gl.blend_func_separate(
            glow::SRC_ALPHA,
            glow::ONE_MINUS_SRC_ALPHA,
            glow::ONE,
            glow::ONE_MINUS_SRC_ALPHA,
        );
        gl.disable(glow::CULL_FACE);
        gl.disable(glow::DEPTH_TEST);
        gl.disable(glow::STENCIL_TEST);
        gl.enable(glow::SCISSOR_TEST);
        gl.disable(glow::PRIMITIVE_RESTART);
        gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);

        gl.viewport(0, 0, fb_width, fb_height);
        let projection = ortho_projection(draw_data.display_pos, draw_data.display_size);

        gl.use_program(self.program.program);
        if let Some(location) = self.program.texture_location {
            gl.uniform_1_i32(location, 0);
        }
        if let Some(location) = self.program.projection_location {
            gl.uniform_matrix_4(location, &projection.to_cols_array());
        }
        gl.bind_sampler(0, 0);

        gl.bind_vertex_array(vertex_array);
        gl.bind_buffer(glow::ARRAY_BUFFER, self.vertex_buffer);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.index_buffer);

        let stride = size_of::<DrawVert>() as i32;
        let attribs = [
            (self.program.position_attrib, 2, glow::FLOAT, false, offset_of!(DrawVert, pos)),
            (self.program.uv_attrib, 2, glow::FLOAT, false, offset_of!(DrawVert, uv)),
            (self.program.color_attrib, 4, glow::UNSIGNED_BYTE, true, offset_of!(DrawVert, col)),
        ];
        for (index, size, data_type, normalized, offset) in attribs {
            gl.enable_vertex_attrib_array(index);
            gl.vertex_attrib_pointer(index, size, data_type, normalized, stride, offset as i32);
        }
    }

    /// Releases every GL object the renderer owns and clears the GUI's font
    /// texture id. Safe to call more than once.
    pub fn destroy<G, C>(&mut self, gl: &G, gui: &mut C)
    where
        G: GlDevice + ?Sized,
        C: GuiContext + ?Sized,
    {
        if self.destroyed {
            return;
        }
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_buffer(self.index_buffer);
        self.program.destroy(gl);
        if self.font_texture != 0 {
            gl.delete_texture(self.font_texture);
            gui.set_font_texture_id(None);
        }
        self.vertex_buffer = 0;
        self.index_buffer = 0;
        self.font_texture = 0;
        self.destroyed = true;
        log::debug!("UI renderer destroyed");
    }
}

/// GL texture name for a GUI texture id; ids that do not fit a GL name bind nothing.
fn texture_name(id: TextureId) -> u32 {
    u32::try_from(id.id()).unwrap_or(0)
}
