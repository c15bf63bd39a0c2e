//! Lightmap material: bindings, light uniform and the blend it computes
//!
//! Group 1 of both pipelines holds the baked texture, the lightmap, a
//! shared sampler and the light uniform. The pipeline picks the fragment
//! program; the bind group layout is the same for both, so a material can
//! be rebound to new textures without rebuilding anything else.

use crate::{
    gfx::resources::TextureResource,
    scene::materials::LightParams,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Light uniform, MUST match `Light` in `lightmap.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Linear RGB
    pub color: [f32; 3],
    pub strength: f32,
}

impl From<LightParams> for LightUniform {
    fn from(light: LightParams) -> Self {
        Self {
            color: light.color.to_linear(),
            strength: light.strength,
        }
    }
}

type LightUBO = UniformBuffer<LightUniform>;

/// Fragment program a material is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// `fs_lightmap`: lighten blend with the lightmap mask
    Lightmapped,
    /// `fs_baked`: baked colour passed through
    Baked,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 2] = [PipelineKind::Lightmapped, PipelineKind::Baked];

    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::Lightmapped => "lightmapped",
            PipelineKind::Baked => "baked",
        }
    }

    pub fn fragment_entry(self) -> &'static str {
        match self {
            PipelineKind::Lightmapped => "fs_lightmap",
            PipelineKind::Baked => "fs_baked",
        }
    }
}

pub fn create_material_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::texture_2d()) // baked colour
        .next_binding_fragment(binding_types::texture_2d()) // lightmap
        .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
        .next_binding_fragment(binding_types::uniform()) // light
        .create(device, "Material Bind Group")
}

/// Bind group plus light uniform for one material
pub struct GpuMaterial {
    label: String,
    pipeline: PipelineKind,
    light_ubo: LightUBO,
    bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        pipeline: PipelineKind,
        base: &TextureResource,
        lightmap: &TextureResource,
        light: LightUniform,
        label: &str,
    ) -> Self {
        let light_ubo = LightUBO::new_with_data(device, &light);
        let bind_group = Self::create_bind_group(device, layout, &light_ubo, base, lightmap, label);

        Self {
            label: label.to_string(),
            pipeline,
            light_ubo,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        light_ubo: &LightUBO,
        base: &TextureResource,
        lightmap: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(layout)
            .texture(&base.view)
            .texture(&lightmap.view)
            .sampler(&base.sampler)
            .resource(light_ubo.binding_resource())
            .create(device, label)
    }

    /// Points the material at new textures, keeping its light uniform
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        base: &TextureResource,
        lightmap: &TextureResource,
    ) {
        self.bind_group =
            Self::create_bind_group(device, layout, &self.light_ubo, base, lightmap, &self.label);
    }

    /// Rewrites the light uniform in place
    pub fn set_light(&mut self, queue: &wgpu::Queue, light: LightUniform) -> bool {
        self.light_ubo.update_content(queue, light)
    }

    pub fn pipeline(&self) -> PipelineKind {
        self.pipeline
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// GLSL-style `mix`
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// CPU mirror of `fs_lightmap`
pub fn shade_lightmapped(base: [f32; 3], lightmap_r: f32, light: LightUniform) -> [f32; 4] {
    let opacity = lightmap_r * light.strength;
    let [r, g, b] = [0, 1, 2].map(|i| {
        let lightened = base[i].max(light.color[i]);
        mix(base[i], lightened, opacity)
    });
    [r, g, b, 1.0]
}

/// CPU mirror of `fs_baked`
pub fn shade_baked(base: [f32; 3]) -> [f32; 4] {
    [base[0], base[1], base[2], 1.0]
}

/// Output of `pipeline` for one texel
pub fn shade(pipeline: PipelineKind, base: [f32; 3], lightmap_r: f32, light: LightUniform) -> [f32; 4] {
    match pipeline {
        PipelineKind::Lightmapped => shade_lightmapped(base, lightmap_r, light),
        PipelineKind::Baked => shade_baked(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::color::LightColor;

    fn light(color: [f32; 3], strength: f32) -> LightUniform {
        LightUniform { color, strength }
    }

    fn sample_bases() -> Vec<[f32; 3]> {
        let steps = [0.0, 0.1, 0.25, 0.5, 0.731, 1.0];
        let mut bases = Vec::new();
        for r in steps {
            for g in steps {
                for b in steps {
                    bases.push([r, g, b]);
                }
            }
        }
        bases
    }

    #[test]
    fn test_light_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 16);
    }

    #[test]
    fn test_uniform_from_params_is_linear() {
        let params = LightParams {
            color: LightColor::from_srgb([1.0, 0.5, 0.0]),
            strength: 1.5,
        };
        let uniform = LightUniform::from(params);
        assert_eq!(uniform.color[0], 1.0);
        assert!((uniform.color[1] - 0.214).abs() < 1e-3);
        assert_eq!(uniform.color[2], 0.0);
        assert_eq!(uniform.strength, 1.5);
    }

    #[test]
    fn test_baked_output_is_base_bit_for_bit() {
        let lights = [light([1.0, 0.0, 0.3], 3.0), light([0.0, 0.0, 0.0], 0.0)];
        for base in sample_bases() {
            for l in lights {
                for lightmap_r in [0.0, 0.5, 1.0] {
                    let out = shade(PipelineKind::Baked, base, lightmap_r, l);
                    assert_eq!(out.map(f32::to_bits), [base[0], base[1], base[2], 1.0].map(f32::to_bits));
                }
            }
        }
    }

    #[test]
    fn test_black_lightmap_leaves_base_unchanged() {
        let l = light([1.0, 0.02, 0.1], 3.0);
        for base in sample_bases() {
            let out = shade_lightmapped(base, 0.0, l);
            assert_eq!(out, [base[0], base[1], base[2], 1.0]);
        }
    }

    #[test]
    fn test_lighten_blend() {
        let l = light([1.0, 0.0, 0.5], 1.0);
        let base = [0.2, 0.4, 0.6];

        // Full mask: per-channel max of base and light
        let full = shade_lightmapped(base, 1.0, l);
        assert!((full[0] - 1.0).abs() < 1e-6);
        assert!((full[1] - 0.4).abs() < 1e-6);
        assert!((full[2] - 0.6).abs() < 1e-6);

        // Half mask: halfway towards the lightened colour
        let half = shade_lightmapped(base, 0.5, l);
        assert!((half[0] - 0.6).abs() < 1e-6);
        assert!((half[1] - 0.4).abs() < 1e-6);
        assert_eq!(half[3], 1.0);
    }

    #[test]
    fn test_strength_scales_mask() {
        let base = [0.0, 0.0, 0.0];
        let weak = shade_lightmapped(base, 0.5, light([1.0, 1.0, 1.0], 0.5));
        let strong = shade_lightmapped(base, 0.5, light([1.0, 1.0, 1.0], 2.0));
        assert!((weak[0] - 0.25).abs() < 1e-6);
        assert!((strong[0] - 1.0).abs() < 1e-6);
        let off = shade_lightmapped(base, 1.0, light([1.0, 1.0, 1.0], 0.0));
        assert_eq!(off[0], 0.0);
    }
}
