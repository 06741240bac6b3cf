//! Capture and restore of the GL state the UI pass touches.

use crate::device::GlDevice;

/// Every piece of GL state the renderer modifies while drawing the UI.
///
/// Captured on entry to a frame and restored on exit, so the host
/// application sees the same bindings, blend setup, viewport, scissor and
/// capability flags it had before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlStateSnapshot {
    pub active_texture: u32,
    pub program: u32,
    /// Texture bound to `TEXTURE_2D` on unit 0.
    pub texture: u32,
    /// Sampler bound on unit 0.
    pub sampler: u32,
    pub vertex_array: u32,
    pub array_buffer: u32,
    pub polygon_mode: [i32; 2],
    pub viewport: [i32; 4],
    pub scissor_box: [i32; 4],
    pub blend_src_rgb: u32,
    pub blend_dst_rgb: u32,
    pub blend_src_alpha: u32,
    pub blend_dst_alpha: u32,
    pub blend_equation_rgb: u32,
    pub blend_equation_alpha: u32,
    pub blend: bool,
    pub cull_face: bool,
    pub depth_test: bool,
    pub stencil_test: bool,
    pub scissor_test: bool,
    pub primitive_restart: bool,
}

#[allow(clippy::cast_sign_loss)]
fn get_name<G: GlDevice + ?Sized>(gl: &G, pname: u32) -> u32 {
    gl.get_integer(pname) as u32
}

impl GlStateSnapshot {
    /// Reads the current state.
    ///
    /// Switches to texture unit 0 to read its bindings, then switches back.
    pub fn capture<G: GlDevice + ?Sized>(gl: &G) -> Self {
        let active_texture = get_name(gl, glow::ACTIVE_TEXTURE);
        gl.active_texture(glow::TEXTURE0);
        let texture = get_name(gl, glow::TEXTURE_BINDING_2D);
        let sampler = get_name(gl, glow::SAMPLER_BINDING);
        gl.active_texture(active_texture);

        let mut polygon_mode = [0; 2];
        gl.get_integers(glow::POLYGON_MODE, &mut polygon_mode);
        let mut viewport = [0; 4];
        gl.get_integers(glow::VIEWPORT, &mut viewport);
        let mut scissor_box = [0; 4];
        gl.get_integers(glow::SCISSOR_BOX, &mut scissor_box);

        Self {
            active_texture,
            program: get_name(gl, glow::CURRENT_PROGRAM),
            texture,
            sampler,
            vertex_array: get_name(gl, glow::VERTEX_ARRAY_BINDING),
            array_buffer: get_name(gl, glow::ARRAY_BUFFER_BINDING),
            polygon_mode,
            viewport,
            scissor_box,
            blend_src_rgb: get_name(gl, glow::BLEND_SRC_RGB),
            blend_dst_rgb: get_name(gl, glow::BLEND_DST_RGB),
            blend_src_alpha: get_name(gl, glow::BLEND_SRC_ALPHA),
            blend_dst_alpha: get_name(gl, glow::BLEND_DST_ALPHA),
            blend_equation_rgb: get_name(gl, glow::BLEND_EQUATION_RGB),
            blend_equation_alpha: get_name(gl, glow::BLEND_EQUATION_ALPHA),
            blend: gl.is_enabled(glow::BLEND),
            cull_face: gl.is_enabled(glow::CULL_FACE),
            depth_test: gl.is_enabled(glow::DEPTH_TEST),
            stencil_test: gl.is_enabled(glow::STENCIL_TEST),
            scissor_test: gl.is_enabled(glow::SCISSOR_TEST),
            primitive_restart: gl.is_enabled(glow::PRIMITIVE_RESTART),
        }
    }

    /// Writes the captured state back.
    #[allow(clippy::cast_sign_loss)]
    pub fn restore<G: GlDevice + ?Sized>(&self, gl: &G) {
        // Destructured without `..` so a new field cannot be silently skipped.
        let Self {
            active_texture,
            program,
            texture,
            sampler,
            vertex_array,
            array_buffer,
            polygon_mode,
            viewport,
            scissor_box,
            blend_src_rgb,
            blend_dst_rgb,
            blend_src_alpha,
            blend_dst_alpha,
            blend_equation_rgb,
            blend_equation_alpha,
            blend,
            cull_face,
            depth_test,
            stencil_test,
            scissor_test,
            primitive_restart,
        } = *self;

        gl.use_program(program);
        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(glow::TEXTURE_2D, texture);
        gl.bind_sampler(0, sampler);
        gl.active_texture(active_texture);
        gl.bind_vertex_array(vertex_array);
        gl.bind_buffer(glow::ARRAY_BUFFER, array_buffer);
        gl.blend_equation_separate(blend_equation_rgb, blend_equation_alpha);
        gl.blend_func_separate(blend_src_rgb, blend_dst_rgb, blend_src_alpha, blend_dst_alpha);

        set_capability(gl, glow::BLEND, blend);
        set_capability(gl, glow::CULL_FACE, cull_face);
        set_capability(gl, glow::DEPTH_TEST, depth_test);
        set_capability(gl, glow::STENCIL_TEST, stencil_test);
        set_capability(gl, glow::SCISSOR_TEST, scissor_test);
        set_capability(gl, glow::PRIMITIVE_RESTART, primitive_restart);

        gl.polygon_mode(glow::FRONT_AND_BACK, polygon_mode[0] as u32);
        gl.viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
        gl.scissor(scissor_box[0], scissor_box[1], scissor_box[2], scissor_box[3]);
    }
}

fn set_capability<G: GlDevice + ?Sized>(gl: &G, cap: u32, enabled: bool) {
    if enabled {
        gl.enable(cap);
    } else {
        gl.disable(cap);
    }
}
