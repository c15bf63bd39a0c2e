//! Global uniform bindings for per-frame camera data
//!
//! Bound to slot 0 of every render pipeline. Material data lives in its own
//! group (see `gfx::material`).

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `lightmap.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl From<CameraUniform> for GlobalUBOContent {
    fn from(camera: CameraUniform) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes the camera into the global uniform buffer
pub fn update_global_ubo(ubo: &mut GlobalUBO, queue: &wgpu::Queue, camera: CameraUniform) {
    ubo.update_content(queue, camera.into());
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout; call `create_bind_group` before rendering
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until `create_bind_group` has run
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_content_layout() {
        // vec4 + mat4x4 in WGSL
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 80);
    }

    #[test]
    fn test_content_copies_camera() {
        let mut camera = CameraUniform::default();
        camera.view_position = [1.0, 2.0, 3.0, 1.0];
        let content = GlobalUBOContent::from(camera);
        assert_eq!(content.view_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(content.view_proj, camera.view_proj);
    }
}
