//! The slice of OpenGL the renderer uses.
//!
//! [`GlDevice`] names objects with plain `u32` values where `0` means "none",
//! matching how the driver reports bindings through `glGetIntegerv`. The
//! implementation for [`glow::Context`] converts to glow's typed handles at
//! the boundary, and [`crate::HeadlessGl`] implements the same surface in
//! memory for tests.

use std::num::NonZeroU32;

use glow::HasContext;

/// OpenGL operations needed to set up, replay and tear down the UI renderer.
///
/// Enum arguments take the usual `glow::*` constants. Methods mirror their GL
/// entry points one to one; none of them check for errors.
pub trait GlDevice {
    /// `glGetIntegerv` for a single-valued parameter.
    fn get_integer(&self, pname: u32) -> i32;
    /// `glGetIntegerv` for a multi-valued parameter such as `VIEWPORT`.
    fn get_integers(&self, pname: u32, out: &mut [i32]);
    /// `glIsEnabled`.
    fn is_enabled(&self, cap: u32) -> bool;
    /// `glEnable`.
    fn enable(&self, cap: u32);
    /// `glDisable`.
    fn disable(&self, cap: u32);

    fn active_texture(&self, unit: u32);
    fn use_program(&self, program: u32);
    fn bind_texture(&self, target: u32, texture: u32);
    fn bind_sampler(&self, unit: u32, sampler: u32);
    fn bind_vertex_array(&self, vertex_array: u32);
    fn bind_buffer(&self, target: u32, buffer: u32);
    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32);
    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn polygon_mode(&self, face: u32, mode: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);
    fn pixel_store(&self, pname: u32, value: i32);

    fn create_shader(&self, kind: u32) -> Result<u32, String>;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> Result<u32, String>;
    fn attach_shader(&self, program: u32, shader: u32);
    fn detach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;
    fn attrib_location(&self, program: u32, name: &str) -> Option<u32>;
    /// Sets an integer uniform on the program in use.
    fn uniform_1_i32(&self, location: u32, value: i32);
    /// Sets a column-major 4x4 matrix uniform on the program in use.
    fn uniform_matrix_4(&self, location: u32, matrix: &[f32; 16]);

    fn create_buffer(&self) -> Result<u32, String>;
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: u32);
    fn create_vertex_array(&self) -> Result<u32, String>;
    fn delete_vertex_array(&self, vertex_array: u32);
    fn enable_vertex_attrib_array(&self, index: u32);
    /// `glVertexAttribPointer` with a byte offset into the bound array buffer.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    fn create_texture(&self) -> Result<u32, String>;
    fn tex_parameter(&self, target: u32, pname: u32, value: i32);
    /// Uploads tightly packed RGBA8 pixels as level 0 of the bound texture.
    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]);
    fn delete_texture(&self, texture: u32);

    /// `glDrawElementsBaseVertex`; `offset` is in bytes into the element buffer.
    fn draw_elements_base_vertex(
        &self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        base_vertex: i32,
    );
}

fn texture(name: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn program(name: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn shader(name: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn buffer(name: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn vertex_array(name: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn sampler(name: u32) -> Option<glow::NativeSampler> {
    NonZeroU32::new(name).map(glow::NativeSampler)
}

// Deleting or using name 0 is a no-op in GL, so the `None` arms do nothing.
#[allow(unsafe_code)]
impl GlDevice for glow::Context {
    fn get_integer(&self, pname: u32) -> i32 {
        unsafe { self.get_parameter_i32(pname) }
    }

    fn get_integers(&self, pname: u32, out: &mut [i32]) {
        unsafe { self.get_parameter_i32_slice(pname, out) }
    }

    fn is_enabled(&self, cap: u32) -> bool {
        unsafe { HasContext::is_enabled(self, cap) }
    }

    fn enable(&self, cap: u32) {
        unsafe { HasContext::enable(self, cap) }
    }

    fn disable(&self, cap: u32) {
        unsafe { HasContext::disable(self, cap) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) }
    }

    fn use_program(&self, name: u32) {
        unsafe { HasContext::use_program(self, program(name)) }
    }

    fn bind_texture(&self, target: u32, name: u32) {
        unsafe { HasContext::bind_texture(self, target, texture(name)) }
    }

    fn bind_sampler(&self, unit: u32, name: u32) {
        unsafe { HasContext::bind_sampler(self, unit, sampler(name)) }
    }

    fn bind_vertex_array(&self, name: u32) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array(name)) }
    }

    fn bind_buffer(&self, target: u32, name: u32) {
        unsafe { HasContext::bind_buffer(self, target, buffer(name)) }
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        unsafe { HasContext::blend_equation_separate(self, mode_rgb, mode_alpha) }
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe { HasContext::blend_func_separate(self, src_rgb, dst_rgb, src_alpha, dst_alpha) }
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        unsafe { HasContext::polygon_mode(self, face, mode) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::scissor(self, x, y, width, height) }
    }

    fn pixel_store(&self, pname: u32, value: i32) {
        unsafe { self.pixel_store_i32(pname, value) }
    }

    fn create_shader(&self, kind: u32) -> Result<u32, String> {
        unsafe { HasContext::create_shader(self, kind) }.map(|s| s.0.get())
    }

    fn shader_source(&self, name: u32, source: &str) {
        if let Some(s) = shader(name) {
            unsafe { HasContext::shader_source(self, s, source) }
        }
    }

    fn compile_shader(&self, name: u32) {
        if let Some(s) = shader(name) {
            unsafe { HasContext::compile_shader(self, s) }
        }
    }

    fn shader_compile_status(&self, name: u32) -> bool {
        shader(name).is_some_and(|s| unsafe { self.get_shader_compile_status(s) })
    }

    fn shader_info_log(&self, name: u32) -> String {
        shader(name)
            .map(|s| unsafe { self.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, name: u32) {
        if let Some(s) = shader(name) {
            unsafe { HasContext::delete_shader(self, s) }
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        unsafe { HasContext::create_program(self) }.map(|p| p.0.get())
    }

    fn attach_shader(&self, program_name: u32, shader_name: u32) {
        if let (Some(p), Some(s)) = (program(program_name), shader(shader_name)) {
            unsafe { HasContext::attach_shader(self, p, s) }
        }
    }

    fn detach_shader(&self, program_name: u32, shader_name: u32) {
        if let (Some(p), Some(s)) = (program(program_name), shader(shader_name)) {
            unsafe { HasContext::detach_shader(self, p, s) }
        }
    }

    fn link_program(&self, name: u32) {
        if let Some(p) = program(name) {
            unsafe { HasContext::link_program(self, p) }
        }
    }

    fn program_link_status(&self, name: u32) -> bool {
        program(name).is_some_and(|p| unsafe { self.get_program_link_status(p) })
    }

    fn program_info_log(&self, name: u32) -> String {
        program(name)
            .map(|p| unsafe { self.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn delete_program(&self, name: u32) {
        if let Some(p) = program(name) {
            unsafe { HasContext::delete_program(self, p) }
        }
    }

    fn uniform_location(&self, name: u32, uniform: &str) -> Option<u32> {
        let p = program(name)?;
        unsafe { self.get_uniform_location(p, uniform) }.map(|l| l.0)
    }

    fn attrib_location(&self, name: u32, attribute: &str) -> Option<u32> {
        let p = program(name)?;
        unsafe { self.get_attrib_location(p, attribute) }
    }

    fn uniform_1_i32(&self, location: u32, value: i32) {
        let location = glow::NativeUniformLocation(location);
        unsafe { HasContext::uniform_1_i32(self, Some(&location), value) }
    }

    fn uniform_matrix_4(&self, location: u32, matrix: &[f32; 16]) {
        let location = glow::NativeUniformLocation(location);
        unsafe { self.uniform_matrix_4_f32_slice(Some(&location), false, matrix) }
    }

    fn create_buffer(&self) -> Result<u32, String> {
        unsafe { HasContext::create_buffer(self) }.map(|b| b.0.get())
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, name: u32) {
        if let Some(b) = buffer(name) {
            unsafe { HasContext::delete_buffer(self, b) }
        }
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        unsafe { HasContext::create_vertex_array(self) }.map(|v| v.0.get())
    }

    fn delete_vertex_array(&self, name: u32) {
        if let Some(v) = vertex_array(name) {
            unsafe { HasContext::delete_vertex_array(self, v) }
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe { self.vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset) }
    }

    fn create_texture(&self) -> Result<u32, String> {
        unsafe { HasContext::create_texture(self) }.map(|t| t.0.get())
    }

    fn tex_parameter(&self, target: u32, pname: u32, value: i32) {
        unsafe { self.tex_parameter_i32(target, pname, value) }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]) {
        unsafe {
            self.tex_image_2d(
                target,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    fn delete_texture(&self, name: u32) {
        if let Some(t) = texture(name) {
            unsafe { HasContext::delete_texture(self, t) }
        }
    }

    fn draw_elements_base_vertex(
        &self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        base_vertex: i32,
    ) {
        unsafe {
            HasContext::draw_elements_base_vertex(
                self,
                mode,
                count,
                element_type,
                offset,
                base_vertex,
            );
        }
    }
}
