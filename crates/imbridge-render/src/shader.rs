//! Shader management.

use std::fmt;

use crate::device::GlDevice;
use crate::error::{RenderError, RenderResult};

/// Vertex stage of the UI program, without its version line.
pub const UI_VERTEX_SHADER: &str = "
uniform mat4 ProjMtx;
in vec2 Position;
in vec2 UV;
in vec4 Color;
out vec2 Frag_UV;
out vec4 Frag_Color;
void main()
{
    Frag_UV = UV;
    Frag_Color = Color;
    gl_Position = ProjMtx * vec4(Position.xy, 0, 1);
}
";

/// Fragment stage of the UI program, without its version line.
pub const UI_FRAGMENT_SHADER: &str = "
uniform sampler2D Texture;
in vec2 Frag_UV;
in vec4 Frag_Color;
out vec4 Out_Color;
void main()
{
    Out_Color = Frag_Color * texture(Texture, Frag_UV.st);
}
";

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL shader type constant for this stage.
    pub const fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A linked UI shader program and the locations the renderer feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    pub program: u32,
    pub vertex_shader: u32,
    pub fragment_shader: u32,
    /// `Texture` sampler uniform. `None` if the driver optimized it out.
    pub texture_location: Option<u32>,
    /// `ProjMtx` uniform. `None` if the driver optimized it out.
    pub projection_location: Option<u32>,
    pub position_attrib: u32,
    pub uv_attrib: u32,
    pub color_attrib: u32,
}

impl ShaderProgram {
    /// Detaches and deletes both stages, then deletes the program.
    pub fn destroy<G: GlDevice + ?Sized>(&self, gl: &G) {
        gl.detach_shader(self.program, self.vertex_shader);
        gl.detach_shader(self.program, self.fragment_shader);
        gl.delete_shader(self.vertex_shader);
        gl.delete_shader(self.fragment_shader);
        gl.delete_program(self.program);
    }
}

/// Builder for creating shader programs.
pub struct ShaderBuilder {
    vertex_source: String,
    fragment_source: String,
    version: String,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a builder for the UI program with the given `#version` line.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            vertex_source: UI_VERTEX_SHADER.to_string(),
            fragment_source: UI_FRAGMENT_SHADER.to_string(),
            version: version.into(),
            label: None,
        }
    }

    /// Sets the vertex shader body (GLSL, no version line).
    #[must_use]
    pub fn with_vertex(mut self, source: impl Into<String>) -> Self {
        self.vertex_source = source.into();
        self
    }

    /// Sets the fragment shader body (GLSL, no version line).
    #[must_use]
    pub fn with_fragment(mut self, source: impl Into<String>) -> Self {
        self.fragment_source = source.into();
        self
    }

    /// Sets the label used in log messages.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The full source of a stage as handed to the driver.
    pub fn stage_source(&self, stage: ShaderStage) -> String {
        let body = match stage {
            ShaderStage::Vertex => &self.vertex_source,
            ShaderStage::Fragment => &self.fragment_source,
        };
        format!("{}\n{body}", self.version)
    }

    /// Compiles both stages and links them.
    ///
    /// On failure every object created so far is deleted and the driver's
    /// info log is returned in the error.
    pub fn build<G: GlDevice + ?Sized>(&self, gl: &G) -> RenderResult<ShaderProgram> {
        let label = self.label.as_deref().unwrap_or("ui");

        let vertex_shader = self.compile(gl, ShaderStage::Vertex)?;
        let fragment_shader = match self.compile(gl, ShaderStage::Fragment) {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(vertex_shader);
                return Err(err);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(reason) => {
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                return Err(RenderError::CreateObject {
                    what: "program",
                    reason,
                });
            }
        };
        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);

        let mut linked = ShaderProgram {
            program,
            vertex_shader,
            fragment_shader,
            texture_location: None,
            projection_location: None,
            position_attrib: 0,
            uv_attrib: 0,
            color_attrib: 0,
        };

        if !gl.program_link_status(program) {
            let log = gl.program_info_log(program);
            log::error!("[{label}] failed to link shader program: {log}");
            linked.destroy(gl);
            return Err(RenderError::ProgramLink(log));
        }

        match resolve_attribs(gl, program) {
            Ok((position, uv, color)) => {
                linked.position_attrib = position;
                linked.uv_attrib = uv;
                linked.color_attrib = color;
            }
            Err(err) => {
                linked.destroy(gl);
                return Err(err);
            }
        }
        linked.texture_location = gl.uniform_location(program, "Texture");
        linked.projection_location = gl.uniform_location(program, "ProjMtx");

        log::debug!("[{label}] linked shader program {program}");
        Ok(linked)
    }

    fn compile<G: GlDevice + ?Sized>(&self, gl: &G, stage: ShaderStage) -> RenderResult<u32> {
        let shader = gl
            .create_shader(stage.gl_kind())
            .map_err(|reason| RenderError::CreateObject {
                what: "shader",
                reason,
            })?;
        gl.shader_source(shader, &self.stage_source(stage));
        gl.compile_shader(shader);

        if gl.shader_compile_status(shader) {
            Ok(shader)
        } else {
            let log = gl.shader_info_log(shader);
            log::error!(
                "[{}] failed to compile {stage} shader with '{}': {log}",
                self.label.as_deref().unwrap_or("ui"),
                self.version
            );
            gl.delete_shader(shader);
            Err(RenderError::ShaderCompilation { stage, log })
        }
    }
}

fn resolve_attribs<G: GlDevice + ?Sized>(gl: &G, program: u32) -> RenderResult<(u32, u32, u32)> {
    let attrib = |name: &'static str| {
        gl.attrib_location(program, name)
            .ok_or(RenderError::MissingAttribute(name))
    };
    Ok((attrib("Position")?, attrib("UV")?, attrib("Color")?))
}
