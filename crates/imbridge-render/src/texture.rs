//! Texture creation.

use imbridge_core::FontAtlasTexture;

use crate::device::GlDevice;
use crate::error::{RenderError, RenderResult};

/// Uploads an RGBA8 font atlas into a new linearly filtered 2D texture.
///
/// The new texture is left bound to `TEXTURE_2D` on the active unit.
#[allow(clippy::cast_possible_wrap)]
pub fn create_font_texture<G: GlDevice + ?Sized>(
    gl: &G,
    atlas: &FontAtlasTexture<'_>,
) -> RenderResult<u32> {
    let expected = atlas.expected_len();
    if atlas.pixels.len() != expected {
        return Err(RenderError::FontAtlasSize {
            expected,
            actual: atlas.pixels.len(),
        });
    }

    let texture = gl
        .create_texture()
        .map_err(|reason| RenderError::CreateObject {
            what: "texture",
            reason,
        })?;
    gl.bind_texture(glow::TEXTURE_2D, texture);
    gl.tex_parameter(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
    gl.tex_parameter(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
    gl.pixel_store(glow::UNPACK_ROW_LENGTH, 0);
    gl.tex_image_2d_rgba8(
        glow::TEXTURE_2D,
        atlas.width as i32,
        atlas.height as i32,
        atlas.pixels,
    );

    log::debug!(
        "uploaded {}x{} font atlas to texture {texture}",
        atlas.width,
        atlas.height
    );
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessGl;

    #[test]
    fn test_font_texture_is_linear_rgba() {
        let gl = HeadlessGl::new();
        let pixels = vec![0u8; 8 * 4 * 4];
        let atlas = FontAtlasTexture {
            pixels: &pixels,
            width: 8,
            height: 4,
        };

        let texture = create_font_texture(&gl, &atlas).unwrap();

        assert_eq!(gl.texture_size(texture), Some((8, 4)));
        assert_eq!(
            gl.texture_parameter(texture, glow::TEXTURE_MIN_FILTER),
            Some(glow::LINEAR as i32)
        );
        assert_eq!(
            gl.texture_parameter(texture, glow::TEXTURE_MAG_FILTER),
            Some(glow::LINEAR as i32)
        );
        assert_eq!(gl.get_integer(glow::TEXTURE_BINDING_2D), texture as i32);
    }

    #[test]
    fn test_short_pixel_buffer_is_rejected() {
        let gl = HeadlessGl::new();
        let pixels = vec![0u8; 10];
        let atlas = FontAtlasTexture {
            pixels: &pixels,
            width: 8,
            height: 4,
        };

        let err = create_font_texture(&gl, &atlas).unwrap_err();
        assert!(matches!(
            err,
            RenderError::FontAtlasSize {
                expected: 128,
                actual: 10
            }
        ));
        assert_eq!(gl.live_textures(), 0);
    }
}
