use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Below this the pending motion counts as settled
const SETTLE_EPSILON: f32 = 1e-5;

/// Y-up orbit camera with damped rotation and panning
///
/// Input accumulates into pending yaw/pitch/pan. Each `tick` applies the
/// damping share of what is pending and decays the rest, so motion eases
/// out after the mouse stops. Zoom is applied immediately.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub damping_factor: f32,
    pub uniform: CameraUniform,
    pending: PendingMotion,
}

#[derive(Debug, Clone, Copy)]
struct PendingMotion {
    yaw: f32,
    pitch: f32,
    pan: Vector3<f32>,
}

impl Default for PendingMotion {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            pan: Vector3::zero(),
        }
    }
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Recalculated by `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 100.0,
            damping_factor: 0.05,
            uniform: CameraUniform::default(),
            pending: PendingMotion::default(),
        };
        camera.update();
        camera.update_view_proj();
        camera
    }

    /// Places the camera at `eye` looking at `target`
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn with_projection(mut self, fovy: impl Into<Rad<f32>>, znear: f32, zfar: f32) -> Self {
        self.fovy = fovy.into();
        self.znear = znear;
        self.zfar = zfar;
        self.update_view_proj();
        self
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.damping_factor = damping_factor.clamp(0.0, 1.0);
        self
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pending.pitch += delta;
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.pending.yaw += delta;
    }

    /// Queues a pan relative to the current view direction
    ///
    /// delta.0 moves along the camera's right axis, delta.1 along its up axis.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        self.pending.pan += (right * delta.0 + up * delta.1) * pan_scale;
    }

    /// Applies one frame of damped motion
    ///
    /// Returns true while there is still motion to apply.
    pub fn tick(&mut self) -> bool {
        let factor = if self.damping_factor > 0.0 {
            self.damping_factor
        } else {
            1.0
        };

        let moving = self.pending.yaw.abs() > SETTLE_EPSILON
            || self.pending.pitch.abs() > SETTLE_EPSILON
            || self.pending.pan.magnitude2() > SETTLE_EPSILON * SETTLE_EPSILON;

        if moving {
            self.yaw += self.pending.yaw * factor;
            self.pitch = (self.pitch + self.pending.pitch * factor)
                .clamp(self.bounds.min_pitch, self.bounds.max_pitch);
            self.target += self.pending.pan * factor;

            let decay = 1.0 - factor;
            self.pending.yaw *= decay;
            self.pending.pitch *= decay;
            self.pending.pan *= decay;
        } else {
            self.pending = PendingMotion::default();
        }

        self.update();
        self.update_view_proj();
        moving
    }

    /// Recomputes `eye` after changing `distance`, `pitch`, `yaw` or `target`
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_view_proj();
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.01,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.01,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_looking_at_reproduces_eye() {
        let camera = OrbitCamera::looking_at(Vector3::new(4.0, 2.0, 4.0), Vector3::zero(), 1.5);
        assert!(close(camera.eye, Vector3::new(4.0, 2.0, 4.0)));
        assert!((camera.distance - 6.0).abs() < 1e-5);
        assert_eq!(camera.up, Vector3::unit_y());
    }

    #[test]
    fn test_damped_rotation_converges_to_full_delta() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(4.0, 2.0, 4.0), Vector3::zero(), 1.5)
            .with_damping(0.05);
        let start_yaw = camera.yaw;
        camera.add_yaw(0.5);

        // First tick only applies the damping share
        assert!(camera.tick());
        assert!((camera.yaw - (start_yaw + 0.025)).abs() < 1e-6);

        for _ in 0..1000 {
            camera.tick();
        }
        assert!((camera.yaw - (start_yaw + 0.5)).abs() < 1e-3);
        assert!(!camera.tick());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0).with_damping(0.0);
        camera.add_pitch(10.0);
        camera.tick();
        assert!(camera.pitch <= camera.bounds.max_pitch);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 5.0), Vector3::zero(), 1.0)
            .with_damping(0.0);
        let offset_before = camera.eye - camera.target;
        camera.pan((1.0, 0.0));
        camera.tick();

        assert!(camera.target.x > 0.0);
        assert!(close(camera.eye - camera.target, offset_before));
    }

    #[test]
    fn test_resize_updates_aspect_and_uniform() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(4.0, 2.0, 4.0), Vector3::zero(), 1.0);
        let before = camera.uniform.view_proj;
        camera.resize_projection(2.0);
        assert_eq!(camera.aspect, 2.0);
        assert_ne!(before, camera.uniform.view_proj);
    }

    #[test]
    fn test_zoom_respects_bounds() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.set_distance(1000.0);
        assert_eq!(camera.distance, 50.0);
        camera.set_distance(0.0);
        assert_eq!(camera.distance, 0.5);
    }
}
