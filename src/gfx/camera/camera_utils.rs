use cgmath::{Matrix4, Point3, SquareMatrix, Vector4};
use winit::event::{DeviceEvent, WindowEvent};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Button, wheel and modifier input
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        self.controller
            .process_window_event(event, &mut self.camera)
    }

    /// Raw mouse motion while a button is held
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller
            .process_device_event(event, &mut self.camera);
    }

    /// Per-frame damping step; refreshes the camera uniform
    pub fn tick(&mut self) -> bool {
        self.camera.tick()
    }

    pub fn get_view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

/// Projects a world-space point into window coordinates (origin top-left)
///
/// Returns `None` for points behind the camera or outside the depth range.
pub fn project_to_screen(
    view_proj: Matrix4<f32>,
    point: Point3<f32>,
    width: f32,
    height: f32,
) -> Option<[f32; 2]> {
    let clip = view_proj * Vector4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }

    let ndc = clip.truncate() / clip.w;
    if !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }

    Some([
        (ndc.x * 0.5 + 0.5) * width,
        (1.0 - (ndc.y * 0.5 + 0.5)) * height,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = OrbitCamera::looking_at(Vector3::new(4.0, 2.0, 4.0), Vector3::zero(), 1.5);
        let screen = project_to_screen(
            camera.build_view_projection_matrix(),
            Point3::new(0.0, 0.0, 0.0),
            1200.0,
            800.0,
        )
        .unwrap();
        assert!((screen[0] - 600.0).abs() < 1e-2);
        assert!((screen[1] - 400.0).abs() < 1e-2);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 5.0), Vector3::zero(), 1.0);
        let behind = project_to_screen(
            camera.build_view_projection_matrix(),
            Point3::new(0.0, 0.0, 10.0),
            100.0,
            100.0,
        );
        assert!(behind.is_none());
    }

    #[test]
    fn test_higher_points_appear_higher_on_screen() {
        let camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 5.0), Vector3::zero(), 1.0);
        let vp = camera.build_view_projection_matrix();
        let low = project_to_screen(vp, Point3::new(0.0, 0.0, 0.0), 100.0, 100.0).unwrap();
        let high = project_to_screen(vp, Point3::new(0.0, 1.0, 0.0), 100.0, 100.0).unwrap();
        assert!(high[1] < low[1]);
    }
}
