//! GPU buffer management.

use imbridge_core::{DrawIdx, DrawVert};

use crate::device::GlDevice;
use crate::error::{RenderError, RenderResult};

/// Index element type matching [`DrawIdx`].
pub const INDEX_TYPE: u32 = if std::mem::size_of::<DrawIdx>() == 2 {
    glow::UNSIGNED_SHORT
} else {
    glow::UNSIGNED_INT
};

/// Creates an empty buffer object.
pub fn create_buffer<G: GlDevice + ?Sized>(gl: &G) -> RenderResult<u32> {
    gl.create_buffer()
        .map_err(|reason| RenderError::CreateObject {
            what: "buffer",
            reason,
        })
}

/// Binds `buffer` to `target` and replaces its contents with `data`.
pub fn stream_upload<G: GlDevice + ?Sized, T: bytemuck::Pod>(
    gl: &G,
    target: u32,
    buffer: u32,
    data: &[T],
) {
    gl.bind_buffer(target, buffer);
    gl.buffer_data(target, bytemuck::cast_slice(data), glow::STREAM_DRAW);
}

/// Uploads a draw list's vertices to the vertex buffer.
pub fn upload_vertices<G: GlDevice + ?Sized>(gl: &G, buffer: u32, vertices: &[DrawVert]) {
    stream_upload(gl, glow::ARRAY_BUFFER, buffer, vertices);
}

/// Uploads a draw list's indices to the element buffer of the bound vertex array.
pub fn upload_indices<G: GlDevice + ?Sized>(gl: &G, buffer: u32, indices: &[DrawIdx]) {
    stream_upload(gl, glow::ELEMENT_ARRAY_BUFFER, buffer, indices);
}

/// Byte offset of the `idx_offset`-th index.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn index_byte_offset(idx_offset: usize) -> i32 {
    (idx_offset * std::mem::size_of::<DrawIdx>()) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{GlCall, HeadlessGl};

    #[test]
    fn test_upload_sizes_match_element_types() {
        let gl = HeadlessGl::new();
        let vbo = create_buffer(&gl).unwrap();
        let ebo = create_buffer(&gl).unwrap();

        upload_vertices(&gl, vbo, &[DrawVert::default(); 3]);
        upload_indices(&gl, ebo, &[0, 1, 2, 2, 1, 0]);

        assert_eq!(gl.buffer_len(vbo), Some(60));
        assert_eq!(gl.buffer_len(ebo), Some(12));
        assert!(gl.calls().contains(&GlCall::BufferData {
            target: glow::ELEMENT_ARRAY_BUFFER,
            len: 12
        }));
    }

    #[test]
    fn test_index_offsets_are_in_bytes() {
        assert_eq!(INDEX_TYPE, glow::UNSIGNED_SHORT);
        assert_eq!(index_byte_offset(0), 0);
        assert_eq!(index_byte_offset(6), 12);
    }
}
