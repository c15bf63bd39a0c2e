//! Material sequencing for the scene
//!
//! Assets complete in any order. This module decides, without touching the
//! GPU, which material every mesh uses and when the shader material comes
//! into existence:
//!
//! - the base material exists from the start and is what a freshly loaded
//!   model gets unless the shader material is already ready;
//! - the shader material is built once the lightmap outcome is known and
//!   the baked texture has resolved (loaded or failed);
//! - only the first lightmap outcome counts;
//! - light colour and strength are stored even while the shader material
//!   is pending, and the shader material is created with the stored values.

use log::{debug, info};

use crate::gfx::color::LightColor;
use crate::gfx::scene::model::Model;

/// Which of the scene's two materials a mesh is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialSlot {
    /// Baked texture only
    Base,
    /// Baked texture blended with the lightmap
    Shader,
}

/// Fragment program of the shader material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderVariant {
    /// Lighten blend driven by the lightmap's red channel
    Lightmapped,
    /// Lightmap unavailable; outputs the baked colour unchanged
    BakedOnly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub color: LightColor,
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

impl AssetStatus {
    fn from_outcome(loaded: bool) -> Self {
        if loaded {
            AssetStatus::Loaded
        } else {
            AssetStatus::Failed
        }
    }
}

/// Everything the GPU side needs to build the shader material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderMaterialSpec {
    pub variant: ShaderVariant,
    pub light: LightParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialState {
    Pending,
    Ready(ShaderMaterialSpec),
}

pub struct SceneMaterials {
    lightmap_enabled: bool,
    base_texture: AssetStatus,
    lightmap: AssetStatus,
    light: LightParams,
    state: MaterialState,
}

impl SceneMaterials {
    /// `lightmap_enabled` is false for the basic scene, which never builds
    /// a shader material
    pub fn new(lightmap_enabled: bool, light: LightParams) -> Self {
        Self {
            lightmap_enabled,
            base_texture: AssetStatus::Pending,
            lightmap: AssetStatus::Pending,
            light,
            state: MaterialState::Pending,
        }
    }

    /// Records the baked texture outcome
    ///
    /// Returns the shader material spec if this completes its inputs.
    pub fn on_base_texture(&mut self, loaded: bool) -> Option<ShaderMaterialSpec> {
        if self.base_texture != AssetStatus::Pending {
            return None;
        }
        self.base_texture = AssetStatus::from_outcome(loaded);
        self.try_build()
    }

    /// Records the lightmap outcome; later outcomes are ignored
    pub fn on_lightmap(&mut self, loaded: bool) -> Option<ShaderMaterialSpec> {
        if !self.lightmap_enabled {
            return None;
        }
        if self.lightmap != AssetStatus::Pending {
            debug!("ignoring repeated lightmap outcome");
            return None;
        }

        self.lightmap = AssetStatus::from_outcome(loaded);
        if !loaded {
            info!("Lightmap unavailable, the shader will pass the baked colour through");
        }
        self.try_build()
    }

    fn try_build(&mut self) -> Option<ShaderMaterialSpec> {
        if self.state != MaterialState::Pending
            || self.lightmap == AssetStatus::Pending
            || self.base_texture == AssetStatus::Pending
        {
            return None;
        }

        let variant = match self.lightmap {
            AssetStatus::Loaded => ShaderVariant::Lightmapped,
            _ => ShaderVariant::BakedOnly,
        };
        let spec = ShaderMaterialSpec {
            variant,
            light: self.light,
        };
        info!(
            "Shader material created ({:?}) with light color {} and strength {}",
            variant,
            spec.light.color.to_hex(),
            spec.light.strength
        );
        self.state = MaterialState::Ready(spec);
        Some(spec)
    }

    /// Slot a newly loaded model's meshes start on
    pub fn slot_for_new_model(&self) -> MaterialSlot {
        match self.state {
            MaterialState::Ready(_) => MaterialSlot::Shader,
            MaterialState::Pending => MaterialSlot::Base,
        }
    }

    /// Points every mesh of `model` at the current material
    pub fn apply_to(&self, model: &mut Model) {
        model.assign_material(self.slot_for_new_model());
    }

    /// Stores the colour; returns the live parameters if the shader exists
    pub fn set_light_color(&mut self, color: LightColor) -> Option<LightParams> {
        self.light.color = color;
        self.push_light()
    }

    /// Stores the strength; returns the live parameters if the shader exists
    pub fn set_light_strength(&mut self, strength: f32) -> Option<LightParams> {
        self.light.strength = strength;
        self.push_light()
    }

    fn push_light(&mut self) -> Option<LightParams> {
        match &mut self.state {
            MaterialState::Ready(spec) => {
                spec.light = self.light;
                Some(self.light)
            }
            MaterialState::Pending => {
                debug!("Stored light parameters for when the shader is created");
                None
            }
        }
    }

    pub fn light(&self) -> LightParams {
        self.light
    }

    pub fn state(&self) -> MaterialState {
        self.state
    }

    pub fn base_texture_status(&self) -> AssetStatus {
        self.base_texture
    }

    pub fn lightmap_status(&self) -> AssetStatus {
        self.lightmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{model::MeshData, vertex::Vertex};

    fn light() -> LightParams {
        LightParams {
            color: LightColor::from_hex("#ff115e").unwrap(),
            strength: 1.5,
        }
    }

    fn model(meshes: usize, slot: MaterialSlot) -> Model {
        let data = (0..meshes)
            .map(|i| MeshData {
                name: format!("mesh{}", i),
                vertices: vec![
                    Vertex {
                        position: [0.0; 3],
                        tex_coord: [0.0; 2],
                    };
                    3
                ],
                indices: vec![0, 1, 2],
            })
            .collect();
        Model::from_data("scene", data, slot)
    }

    #[test]
    fn test_model_before_shader_gets_base_then_switches() {
        let mut materials = SceneMaterials::new(true, light());

        let mut loaded = model(4, materials.slot_for_new_model());
        assert!(loaded.materials().all(|m| m == MaterialSlot::Base));

        assert!(materials.on_lightmap(true).is_none());
        let spec = materials.on_base_texture(true).unwrap();
        assert_eq!(spec.variant, ShaderVariant::Lightmapped);

        materials.apply_to(&mut loaded);
        assert!(loaded.materials().all(|m| m == MaterialSlot::Shader));
    }

    #[test]
    fn test_model_after_shader_starts_on_shader() {
        let mut materials = SceneMaterials::new(true, light());
        materials.on_base_texture(true);
        materials.on_lightmap(true);

        let loaded = model(2, materials.slot_for_new_model());
        assert!(loaded.materials().all(|m| m == MaterialSlot::Shader));
    }

    #[test]
    fn test_lightmap_failure_builds_baked_only() {
        let mut materials = SceneMaterials::new(true, light());
        materials.on_base_texture(true);
        let spec = materials.on_lightmap(false).unwrap();
        assert_eq!(spec.variant, ShaderVariant::BakedOnly);
        assert_eq!(materials.lightmap_status(), AssetStatus::Failed);
    }

    #[test]
    fn test_only_first_lightmap_outcome_counts() {
        let mut materials = SceneMaterials::new(true, light());
        materials.on_lightmap(false);
        assert!(materials.on_lightmap(true).is_none());
        let spec = materials.on_base_texture(true).unwrap();
        assert_eq!(spec.variant, ShaderVariant::BakedOnly);

        assert!(materials.on_lightmap(true).is_none());
        assert!(matches!(
            materials.state(),
            MaterialState::Ready(ShaderMaterialSpec {
                variant: ShaderVariant::BakedOnly,
                ..
            })
        ));
    }

    #[test]
    fn test_base_texture_failure_still_unblocks_shader() {
        let mut materials = SceneMaterials::new(true, light());
        materials.on_lightmap(true);
        let spec = materials.on_base_texture(false).unwrap();
        assert_eq!(spec.variant, ShaderVariant::Lightmapped);
        assert_eq!(materials.base_texture_status(), AssetStatus::Failed);
    }

    #[test]
    fn test_light_set_before_creation_is_honoured() {
        let mut materials = SceneMaterials::new(true, light());
        let green = LightColor::from_hex("#00ff00").unwrap();

        assert!(materials.set_light_color(green).is_none());
        assert!(materials.set_light_strength(0.3).is_none());

        materials.on_lightmap(true);
        let spec = materials.on_base_texture(true).unwrap();
        assert_eq!(spec.light.color, green);
        assert_eq!(spec.light.strength, 0.3);
    }

    #[test]
    fn test_light_updates_after_creation_are_pushed() {
        let mut materials = SceneMaterials::new(true, light());
        materials.on_lightmap(true);
        materials.on_base_texture(true);

        let live = materials.set_light_strength(2.5).unwrap();
        assert_eq!(live.strength, 2.5);
        match materials.state() {
            MaterialState::Ready(spec) => assert_eq!(spec.light.strength, 2.5),
            MaterialState::Pending => panic!("shader should exist"),
        }
    }

    #[test]
    fn test_basic_scene_never_builds_shader() {
        let mut materials = SceneMaterials::new(false, light());
        assert!(materials.on_lightmap(true).is_none());
        assert!(materials.on_base_texture(true).is_none());
        assert_eq!(materials.state(), MaterialState::Pending);
        assert_eq!(materials.slot_for_new_model(), MaterialSlot::Base);

        // Still remembered for completeness
        assert!(materials.set_light_strength(2.0).is_none());
        assert_eq!(materials.light().strength, 2.0);
    }
}
