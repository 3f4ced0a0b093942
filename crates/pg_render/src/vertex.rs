#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    /// Corners of an axis-aligned screen rectangle, clockwise from top-left.
    /// The full texture is mapped onto it.
    pub fn quad(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> [SpriteVertex; 4] {
        [
            SpriteVertex {
                position: [x, y],
                tex_coords: [0.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [x + width, y],
                tex_coords: [1.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [x + width, y + height],
                tex_coords: [1.0, 1.0],
                color,
            },
            SpriteVertex {
                position: [x, y + height],
                tex_coords: [0.0, 1.0],
                color,
            },
        ]
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, color) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_rect_and_full_texture() {
        let q = SpriteVertex::quad(10.0, 20.0, 50.0, 40.0, [1.0; 4]);
        assert_eq!(q[0].position, [10.0, 20.0]);
        assert_eq!(q[2].position, [60.0, 60.0]);
        assert_eq!(q[0].tex_coords, [0.0, 0.0]);
        assert_eq!(q[2].tex_coords, [1.0, 1.0]);
    }
}
