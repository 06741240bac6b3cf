//! An in-memory OpenGL device for running the renderer without a GPU.
//!
//! [`HeadlessGl`] tracks bindings, capabilities and object lifetimes the way
//! a GL context does and logs every call it receives. Draw calls are recorded
//! together with the state they observed, so tests can check what would have
//! reached the screen. The inspectors over that log need the `headless`
//! feature outside this crate's own tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::device::GlDevice;
use crate::shader::ShaderStage;

/// A draw call and the state bound when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mode: u32,
    pub count: i32,
    pub element_type: u32,
    /// Byte offset into the element buffer.
    pub offset: i32,
    pub base_vertex: i32,
    pub program: u32,
    /// Texture bound to `TEXTURE_2D` on the active unit.
    pub texture: u32,
    pub vertex_array: u32,
    pub element_buffer: u32,
    pub scissor_box: [i32; 4],
    pub scissor_test: bool,
    pub blend: bool,
}

/// One entry of the call log.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    /// A state query (`glGet*`, `glIsEnabled`).
    Query(u32),
    Enable(u32),
    Disable(u32),
    Viewport([i32; 4]),
    Scissor([i32; 4]),
    BufferData {
        target: u32,
        len: usize,
    },
    TexImage {
        texture: u32,
        width: i32,
        height: i32,
    },
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    Draw(DrawCall),
    /// Any other call, by GL entry point name.
    Other(&'static str),
}

#[cfg_attr(not(any(test, feature = "headless")), allow(dead_code))]
#[derive(Debug, Default)]
struct TextureObject {
    width: i32,
    height: i32,
    params: HashMap<u32, i32>,
}

#[derive(Debug)]
struct ShaderObject {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
}

#[cfg_attr(not(any(test, feature = "headless")), allow(dead_code))]
#[derive(Debug)]
struct HeadlessState {
    next_name: u32,

    active_texture: u32,
    texture_units: HashMap<u32, u32>,
    sampler_units: HashMap<u32, u32>,
    program: u32,
    vertex_array: u32,
    array_buffer: u32,
    element_buffers: HashMap<u32, u32>,
    polygon_mode: [i32; 2],
    viewport: [i32; 4],
    scissor_box: [i32; 4],
    blend_func: [u32; 4],
    blend_equation: [u32; 2],
    enabled: HashSet<u32>,
    pixel_store: HashMap<u32, i32>,

    textures: HashMap<u32, TextureObject>,
    buffers: HashMap<u32, usize>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    vertex_arrays: HashSet<u32>,
    uniforms_i32: HashMap<u32, i32>,
    uniforms_mat4: HashMap<u32, [f32; 16]>,

    compile_failure: Option<(u32, String)>,
    link_failure: Option<String>,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            next_name: 1,
            active_texture: glow::TEXTURE0,
            texture_units: HashMap::new(),
            sampler_units: HashMap::new(),
            program: 0,
            vertex_array: 0,
            array_buffer: 0,
            element_buffers: HashMap::new(),
            polygon_mode: [glow::FILL as i32; 2],
            viewport: [0; 4],
            scissor_box: [0; 4],
            blend_func: [glow::ONE, glow::ZERO, glow::ONE, glow::ZERO],
            blend_equation: [glow::FUNC_ADD; 2],
            enabled: HashSet::new(),
            pixel_store: HashMap::new(),
            textures: HashMap::new(),
            buffers: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            vertex_arrays: HashSet::new(),
            uniforms_i32: HashMap::new(),
            uniforms_mat4: HashMap::new(),
            compile_failure: None,
            link_failure: None,
        }
    }
}

impl HeadlessState {
    fn gen_name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn unit(&self) -> u32 {
        self.active_texture.wrapping_sub(glow::TEXTURE0)
    }

    fn bound_texture(&self) -> u32 {
        self.texture_units.get(&self.unit()).copied().unwrap_or(0)
    }

    fn element_buffer(&self) -> u32 {
        self.element_buffers
            .get(&self.vertex_array)
            .copied()
            .unwrap_or(0)
    }

    fn query(&self, pname: u32, out: &mut [i32]) {
        fn fill(out: &mut [i32], values: &[i32]) {
            for (slot, value) in out.iter_mut().zip(values) {
                *slot = *value;
            }
        }
        match pname {
            glow::ACTIVE_TEXTURE => fill(out, &[self.active_texture as i32]),
            glow::TEXTURE_BINDING_2D => fill(out, &[self.bound_texture() as i32]),
            glow::SAMPLER_BINDING => fill(out, &[self
                .sampler_units
                .get(&self.unit())
                .copied()
                .unwrap_or(0) as i32]),
            glow::CURRENT_PROGRAM => fill(out, &[self.program as i32]),
            glow::VERTEX_ARRAY_BINDING => fill(out, &[self.vertex_array as i32]),
            glow::ARRAY_BUFFER_BINDING => fill(out, &[self.array_buffer as i32]),
            glow::ELEMENT_ARRAY_BUFFER_BINDING => fill(out, &[self.element_buffer() as i32]),
            glow::POLYGON_MODE => fill(out, &self.polygon_mode),
            glow::VIEWPORT => fill(out, &self.viewport),
            glow::SCISSOR_BOX => fill(out, &self.scissor_box),
            glow::BLEND_SRC_RGB => fill(out, &[self.blend_func[0] as i32]),
            glow::BLEND_DST_RGB => fill(out, &[self.blend_func[1] as i32]),
            glow::BLEND_SRC_ALPHA => fill(out, &[self.blend_func[2] as i32]),
            glow::BLEND_DST_ALPHA => fill(out, &[self.blend_func[3] as i32]),
            glow::BLEND_EQUATION_RGB => fill(out, &[self.blend_equation[0] as i32]),
            glow::BLEND_EQUATION_ALPHA => fill(out, &[self.blend_equation[1] as i32]),
            other => fill(out, &[self.pixel_store.get(&other).copied().unwrap_or(0)]),
        }
    }
}

/// A [`GlDevice`] that keeps all state in memory.
#[derive(Debug, Default)]
pub struct HeadlessGl {
    state: RefCell<HeadlessState>,
    calls: RefCell<Vec<GlCall>>,
}

impl HeadlessGl {
    /// Creates a device in the default GL state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a device whose viewport and scissor box cover `width x height`.
    pub fn with_viewport(width: i32, height: i32) -> Self {
        let gl = Self::new();
        {
            let mut state = gl.state.borrow_mut();
            state.viewport = [0, 0, width, height];
            state.scissor_box = [0, 0, width, height];
        }
        gl
    }

    /// Makes every later compile of `stage` fail with `log`.
    pub fn fail_shader_compile(&self, stage: ShaderStage, log: impl Into<String>) {
        self.state.borrow_mut().compile_failure = Some((stage.gl_kind(), log.into()));
    }

    /// Makes every later link fail with `log`.
    pub fn fail_program_link(&self, log: impl Into<String>) {
        self.state.borrow_mut().link_failure = Some(log.into());
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn create(&self, what: &'static str, insert: impl FnOnce(&mut HeadlessState, u32)) -> u32 {
        self.record(GlCall::Other(what));
        let mut state = self.state.borrow_mut();
        let name = state.gen_name();
        insert(&mut *state, name);
        name
    }
}

/// Inspectors over the call log and the stored objects.
#[cfg(any(test, feature = "headless"))]
impl HeadlessGl {
    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Draw calls received so far, in order.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                GlCall::Draw(draw) => Some(draw.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets the call log. State and objects are kept.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    /// Names of all live textures, sorted.
    pub fn texture_names(&self) -> Vec<u32> {
        let mut names: Vec<u32> = self.state.borrow().textures.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Size of a texture's level 0 image, if one was uploaded.
    pub fn texture_size(&self, texture: u32) -> Option<(i32, i32)> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .map(|t| (t.width, t.height))
    }

    /// A texture parameter set with `tex_parameter`.
    pub fn texture_parameter(&self, texture: u32, pname: u32) -> Option<i32> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|t| t.params.get(&pname).copied())
    }

    /// Bytes last uploaded to a buffer.
    pub fn buffer_len(&self, buffer: u32) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer).copied()
    }

    /// Source last given to a shader.
    pub fn shader_source_of(&self, shader: u32) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.source.clone())
    }

    /// Value last written to a matrix uniform location.
    pub fn uniform_matrix(&self, location: u32) -> Option<[f32; 16]> {
        self.state.borrow().uniforms_mat4.get(&location).copied()
    }

    /// Value last written to an integer uniform location.
    pub fn uniform_int(&self, location: u32) -> Option<i32> {
        self.state.borrow().uniforms_i32.get(&location).copied()
    }
}

impl GlDevice for HeadlessGl {
    fn get_integer(&self, pname: u32) -> i32 {
        let mut out = [0; 4];
        self.get_integers(pname, &mut out);
        out[0]
    }

    fn get_integers(&self, pname: u32, out: &mut [i32]) {
        self.record(GlCall::Query(pname));
        self.state.borrow().query(pname, out);
    }

    fn is_enabled(&self, cap: u32) -> bool {
        self.record(GlCall::Query(cap));
        self.state.borrow().enabled.contains(&cap)
    }

    fn enable(&self, cap: u32) {
        self.record(GlCall::Enable(cap));
        self.state.borrow_mut().enabled.insert(cap);
    }

    fn disable(&self, cap: u32) {
        self.record(GlCall::Disable(cap));
        self.state.borrow_mut().enabled.remove(&cap);
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::Other("glActiveTexture"));
        self.state.borrow_mut().active_texture = unit;
    }

    fn use_program(&self, program: u32) {
        self.record(GlCall::Other("glUseProgram"));
        self.state.borrow_mut().program = program;
    }

    fn bind_texture(&self, _target: u32, texture: u32) {
        self.record(GlCall::Other("glBindTexture"));
        let mut state = self.state.borrow_mut();
        let unit = state.unit();
        state.texture_units.insert(unit, texture);
    }

    fn bind_sampler(&self, unit: u32, sampler: u32) {
        self.record(GlCall::Other("glBindSampler"));
        self.state.borrow_mut().sampler_units.insert(unit, sampler);
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        self.record(GlCall::Other("glBindVertexArray"));
        self.state.borrow_mut().vertex_array = vertex_array;
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        self.record(GlCall::Other("glBindBuffer"));
        let mut state = self.state.borrow_mut();
        if target == glow::ELEMENT_ARRAY_BUFFER {
            let vertex_array = state.vertex_array;
            state.element_buffers.insert(vertex_array, buffer);
        } else {
            state.array_buffer = buffer;
        }
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        self.record(GlCall::Other("glBlendEquationSeparate"));
        self.state.borrow_mut().blend_equation = [mode_rgb, mode_alpha];
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.record(GlCall::Other("glBlendFuncSeparate"));
        self.state.borrow_mut().blend_func = [src_rgb, dst_rgb, src_alpha, dst_alpha];
    }

    fn polygon_mode(&self, _face: u32, mode: u32) {
        self.record(GlCall::Other("glPolygonMode"));
        self.state.borrow_mut().polygon_mode = [mode as i32; 2];
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport([x, y, width, height]));
        self.state.borrow_mut().viewport = [x, y, width, height];
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Scissor([x, y, width, height]));
        self.state.borrow_mut().scissor_box = [x, y, width, height];
    }

    fn pixel_store(&self, pname: u32, value: i32) {
        self.record(GlCall::Other("glPixelStorei"));
        self.state.borrow_mut().pixel_store.insert(pname, value);
    }

    fn create_shader(&self, kind: u32) -> Result<u32, String> {
        Ok(self.create("glCreateShader", |state, name| {
            state.shaders.insert(
                name,
                ShaderObject {
                    kind,
                    source: String::new(),
                    compiled: false,
                    log: String::new(),
                },
            );
        }))
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.record(GlCall::Other("glShaderSource"));
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(&shader) {
            object.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.record(GlCall::Other("glCompileShader"));
        let mut state = self.state.borrow_mut();
        let failure = state.compile_failure.clone();
        if let Some(object) = state.shaders.get_mut(&shader) {
            match failure {
                Some((kind, log)) if kind == object.kind => {
                    object.compiled = false;
                    object.log = log;
                }
                _ if !object.source.starts_with("#version") => {
                    object.compiled = false;
                    object.log = "0:1: error: missing #version directive".to_string();
                }
                _ => {
                    object.compiled = true;
                    object.log.clear();
                }
            }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.record(GlCall::Other("glGetShaderiv"));
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.record(GlCall::Other("glGetShaderInfoLog"));
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(GlCall::Other("glDeleteShader"));
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.create("glCreateProgram", |state, name| {
            state.programs.insert(name, ProgramObject::default());
        }))
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::Other("glAttachShader"));
        if let Some(object) = self.state.borrow_mut().programs.get_mut(&program) {
            object.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(GlCall::Other("glDetachShader"));
        if let Some(object) = self.state.borrow_mut().programs.get_mut(&program) {
            object.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        self.record(GlCall::Other("glLinkProgram"));
        let mut state = self.state.borrow_mut();
        let failure = state.link_failure.clone();
        let all_compiled = state.programs.get(&program).is_some_and(|p| {
            p.attached.len() == 2
                && p.attached
                    .iter()
                    .all(|s| state.shaders.get(s).is_some_and(|s| s.compiled))
        });
        if let Some(object) = state.programs.get_mut(&program) {
            match failure {
                Some(log) => {
                    object.linked = false;
                    object.log = log;
                }
                None if !all_compiled => {
                    object.linked = false;
                    object.log = "error: program has no compiled vertex and fragment stage".into();
                }
                None => {
                    object.linked = true;
                    object.log.clear();
                }
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.record(GlCall::Other("glGetProgramiv"));
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.record(GlCall::Other("glGetProgramInfoLog"));
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        self.record(GlCall::Other("glDeleteProgram"));
        self.state.borrow_mut().programs.remove(&program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.record(GlCall::Other("glGetUniformLocation"));
        let state = self.state.borrow();
        if !state.programs.get(&program).is_some_and(|p| p.linked) {
            return None;
        }
        match name {
            "Texture" => Some(0),
            "ProjMtx" => Some(1),
            _ => None,
        }
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.record(GlCall::Other("glGetAttribLocation"));
        let state = self.state.borrow();
        if !state.programs.get(&program).is_some_and(|p| p.linked) {
            return None;
        }
        match name {
            "Position" => Some(0),
            "UV" => Some(1),
            "Color" => Some(2),
            _ => None,
        }
    }

    fn uniform_1_i32(&self, location: u32, value: i32) {
        self.record(GlCall::Other("glUniform1i"));
        self.state.borrow_mut().uniforms_i32.insert(location, value);
    }

    fn uniform_matrix_4(&self, location: u32, matrix: &[f32; 16]) {
        self.record(GlCall::Other("glUniformMatrix4fv"));
        self.state.borrow_mut().uniforms_mat4.insert(location, *matrix);
    }

    fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.create("glGenBuffers", |state, name| {
            state.buffers.insert(name, 0);
        }))
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        self.record(GlCall::BufferData {
            target,
            len: data.len(),
        });
        let mut state = self.state.borrow_mut();
        let bound = if target == glow::ELEMENT_ARRAY_BUFFER {
            state.element_buffer()
        } else {
            state.array_buffer
        };
        if let Some(len) = state.buffers.get_mut(&bound) {
            *len = data.len();
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(GlCall::Other("glDeleteBuffers"));
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        if state.array_buffer == buffer {
            state.array_buffer = 0;
        }
        for bound in state.element_buffers.values_mut() {
            if *bound == buffer {
                *bound = 0;
            }
        }
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.create("glGenVertexArrays", |state, name| {
            state.vertex_arrays.insert(name);
        }))
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(GlCall::Other("glDeleteVertexArrays"));
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vertex_array);
        state.element_buffers.remove(&vertex_array);
        if state.vertex_array == vertex_array {
            state.vertex_array = 0;
        }
    }

    fn enable_vertex_attrib_array(&self, _index: u32) {
        self.record(GlCall::Other("glEnableVertexAttribArray"));
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
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn create_texture(&self) -> Result<u32, String> {
        Ok(self.create("glGenTextures", |state, name| {
            state.textures.insert(name, TextureObject::default());
        }))
    }

    fn tex_parameter(&self, _target: u32, pname: u32, value: i32) {
        self.record(GlCall::Other("glTexParameteri"));
        let mut state = self.state.borrow_mut();
        let bound = state.bound_texture();
        if let Some(texture) = state.textures.get_mut(&bound) {
            texture.params.insert(pname, value);
        }
    }

    fn tex_image_2d_rgba8(&self, _target: u32, width: i32, height: i32, _pixels: &[u8]) {
        let bound = self.state.borrow().bound_texture();
        self.record(GlCall::TexImage {
            texture: bound,
            width,
            height,
        });
        if let Some(texture) = self.state.borrow_mut().textures.get_mut(&bound) {
            texture.width = width;
            texture.height = height;
        }
    }

    fn delete_texture(&self, texture: u32) {
        self.record(GlCall::Other("glDeleteTextures"));
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        for bound in state.texture_units.values_mut() {
            if *bound == texture {
                *bound = 0;
            }
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
        let draw = {
            let state = self.state.borrow();
            DrawCall {
                mode,
                count,
                element_type,
                offset,
                base_vertex,
                program: state.program,
                texture: state.bound_texture(),
                vertex_array: state.vertex_array,
                element_buffer: state.element_buffer(),
                scissor_box: state.scissor_box,
                scissor_test: state.enabled.contains(&glow::SCISSOR_TEST),
                blend: state.enabled.contains(&glow::BLEND),
            }
        };
        self.record(GlCall::Draw(draw));
    }
}
