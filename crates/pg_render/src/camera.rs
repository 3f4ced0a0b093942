use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed screen-space projection: origin at the top-left corner, y grows
/// downward, one unit per logical pixel. The logical size can differ from the
/// surface size; the surface then stretches the logical frame.
pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(
            0.0,
            self.viewport.0.max(1) as f32,
            self.viewport.1.max(1) as f32,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(camera: &ScreenCamera, x: f32, y: f32) -> Vec4 {
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        m * Vec4::new(x, y, 0.0, 1.0)
    }

    #[test]
    fn top_left_maps_to_clip_top_left() {
        let camera = ScreenCamera::new(800, 600);
        let p = project(&camera, 0.0, 0.0);
        assert!((p.x + 1.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bottom_right_maps_to_clip_bottom_right() {
        let camera = ScreenCamera::new(800, 600);
        let p = project(&camera, 800.0, 600.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_viewport_does_not_produce_nan() {
        let camera = ScreenCamera::new(0, 0);
        let uniform = camera.build_uniform();
        assert!(uniform.view_proj.iter().flatten().all(|v| v.is_finite()));
    }
}
