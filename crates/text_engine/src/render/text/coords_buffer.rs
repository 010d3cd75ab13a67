//! Vertex coordinate buffers for textured glyph quads

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Vec2;

/// Vertex data for text rendering
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TextVertex {
    /// Position in screen space
    pub position: [f32; 2],
    /// UV texture coordinates
    pub uv: [f32; 2],
}

/// Growable buffer of textured quad vertices
///
/// Each quad is emitted as two counter-clockwise triangles (six unindexed
/// vertices), ready for byte-wise upload to a vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordsBuffer {
    vertices: Vec<TextVertex>,
}

impl CoordsBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `quads` quads
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 6),
        }
    }

    /// Append one textured quad
    ///
    /// `dest_min`/`dest_max` are the top-left and bottom-right screen corners;
    /// `uv_min`/`uv_max` the matching atlas coordinates. Screen space is
    /// +Y down.
    pub fn add_quad(&mut self, dest_min: Vec2, dest_max: Vec2, uv_min: Vec2, uv_max: Vec2) {
        self.vertices.extend_from_slice(&[
            TextVertex {
                position: [dest_min.x, dest_min.y],
                uv: [uv_min.x, uv_min.y],
            },
            TextVertex {
                position: [dest_max.x, dest_min.y],
                uv: [uv_max.x, uv_min.y],
            },
            TextVertex {
                position: [dest_min.x, dest_max.y],
                uv: [uv_min.x, uv_max.y],
            },
            TextVertex {
                position: [dest_min.x, dest_max.y],
                uv: [uv_min.x, uv_max.y],
            },
            TextVertex {
                position: [dest_max.x, dest_min.y],
                uv: [uv_max.x, uv_min.y],
            },
            TextVertex {
                position: [dest_max.x, dest_max.y],
                uv: [uv_max.x, uv_max.y],
            },
        ]);
    }

    /// Remove all vertices, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Get the vertex data
    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    /// Number of vertices in the buffer
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the buffer holds no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of complete quads in the buffer
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 6
    }

    /// View the vertex data as raw bytes for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_vertex_size() {
        // Verify TextVertex is compatible with bytemuck for GPU upload
        assert_eq!(
            std::mem::size_of::<TextVertex>(),
            std::mem::size_of::<f32>() * 4 // 2 position + 2 uv
        );
    }

    #[test]
    fn test_add_quad_emits_two_triangles() {
        let mut buffer = CoordsBuffer::new();
        buffer.add_quad(
            Vec2::new(10.0, 20.0),
            Vec2::new(30.0, 50.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.25),
        );

        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.quad_count(), 1);

        let verts = buffer.vertices();
        // Top-left corner carries uv_min
        assert_eq!(verts[0].position, [10.0, 20.0]);
        assert_eq!(verts[0].uv, [0.0, 0.0]);
        // Bottom-right corner carries uv_max
        assert_eq!(verts[5].position, [30.0, 50.0]);
        assert_eq!(verts[5].uv, [0.5, 0.25]);
    }

    #[test]
    fn test_as_bytes_length() {
        let mut buffer = CoordsBuffer::new();
        buffer.add_quad(
            Vec2::zeros(),
            Vec2::new(1.0, 1.0),
            Vec2::zeros(),
            Vec2::new(1.0, 1.0),
        );

        assert_eq!(buffer.as_bytes().len(), 6 * 16);
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut buffer = CoordsBuffer::new();
        buffer.add_quad(
            Vec2::zeros(),
            Vec2::new(1.0, 1.0),
            Vec2::zeros(),
            Vec2::new(1.0, 1.0),
        );
        buffer.clear();

        assert!(buffer.is_empty());
    }
}
