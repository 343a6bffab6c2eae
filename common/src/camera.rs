//! Screen-space camera for 2D pixel-coordinate rendering

use glam::{Mat4, Vec2};

/// Orthographic camera mapping window pixels to clip space.
///
/// The origin is the top-left corner and y grows downwards, matching the
/// coordinates reported by pointer events.
#[derive(Debug, Clone)]
pub struct ScreenCamera {
    pub size: Vec2,
}

impl ScreenCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
        }
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.size.x, self.size.y, 0.0, -1.0, 1.0)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_screen_camera(camera: &ScreenCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn corners_map_to_clip_space() {
        let camera = ScreenCamera::new(800, 600);
        let vp = camera.view_projection();

        let top_left = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = vp * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_projection() {
        let mut camera = ScreenCamera::new(800, 600);
        camera.resize(1024, 768);
        let uniform = CameraUniform::from_screen_camera(&camera);
        let vp = Mat4::from_cols_array_2d(&uniform.view_proj);

        let bottom_right = vp * Vec4::new(1024.0, 768.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y + 1.0).abs() < 1e-6);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }
}
