//! Viewer configuration
//!
//! Every literal the viewer depends on lives in [`ViewerConfig::default`].
//! A few values can be overridden from the environment:
//!
//! - `BAKELIGHT_ASSETS`: asset root directory
//! - `BAKELIGHT_VARIANT`: `basic` or `advanced`
//! - `BAKELIGHT_INFO_BOX`: show the info box (`1`, `true`, `yes`, `on`)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use thiserror::Error;

pub const ENV_ASSETS: &str = "BAKELIGHT_ASSETS";
pub const ENV_VARIANT: &str = "BAKELIGHT_VARIANT";
pub const ENV_INFO_BOX: &str = "BAKELIGHT_INFO_BOX";

/// Which of the two scenes to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneVariant {
    /// Baked texture on the model, no lightmap and no lighting panel
    Basic,
    /// Lightmap shader with the lighting panel
    Advanced,
}

impl SceneVariant {
    pub fn uses_lightmap(self) -> bool {
        matches!(self, SceneVariant::Advanced)
    }

    pub fn has_panel(self) -> bool {
        matches!(self, SceneVariant::Advanced)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scene variant '{0}', expected 'basic' or 'advanced'")]
pub struct UnknownVariant(String);

impl FromStr for SceneVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SceneVariant::Basic),
            "advanced" => Ok(SceneVariant::Advanced),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Asset files, resolved against the asset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub baked_texture: PathBuf,
    pub lightmap: PathBuf,
    pub model: PathBuf,
}

impl AssetPaths {
    pub fn under(root: &Path) -> Self {
        Self {
            baked_texture: root.join("textures").join("testAdvancedRender.png"),
            lightmap: root.join("textures").join("testAdvancedRender_lightmap.png"),
            model: root.join("models").join("testAdvancedRender.glb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            eye: [4.0, 2.0, 4.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightConfig {
    /// `#rrggbb`, sRGB
    pub color: String,
    pub strength: f32,
    pub strength_min: f32,
    pub strength_max: f32,
    pub strength_step: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: "#ff115e".to_string(),
            strength: 1.5,
            strength_min: 0.0,
            strength_max: 3.0,
            strength_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    /// Logical size of the initial window
    pub window_size: (u32, u32),
    pub variant: SceneVariant,
    pub asset_root: PathBuf,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Loading overlay fade-out after the last item
    pub fade_duration: Duration,
    pub panel_width: f32,
    pub info_box: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "bakelight".to_string(),
            window_size: (1200, 800),
            variant: SceneVariant::Advanced,
            asset_root: PathBuf::from("static").join("advanced-render"),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            fade_duration: Duration::from_millis(500),
            panel_width: 250.0,
            info_box: false,
        }
    }
}

impl ViewerConfig {
    /// Defaults with the `BAKELIGHT_*` overrides applied
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(root) = lookup(ENV_ASSETS).filter(|r| !r.trim().is_empty()) {
            config.asset_root = PathBuf::from(root);
        }

        if let Some(variant) = lookup(ENV_VARIANT) {
            match variant.parse() {
                Ok(variant) => config.variant = variant,
                Err(e) => warn!("{}: {}", ENV_VARIANT, e),
            }
        }

        if let Some(flag) = lookup(ENV_INFO_BOX) {
            match parse_flag(&flag) {
                Some(enabled) => config.info_box = enabled,
                None => warn!("{}: expected a boolean, got '{}'", ENV_INFO_BOX, flag),
            }
        }

        config
    }

    pub fn assets(&self) -> AssetPaths {
        AssetPaths::under(&self.asset_root)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.window_size, (1200, 800));
        assert_eq!(config.variant, SceneVariant::Advanced);
        assert_eq!(config.light.color, "#ff115e");
        assert_eq!(config.light.strength, 1.5);
        assert_eq!((config.light.strength_min, config.light.strength_max), (0.0, 3.0));
        assert_eq!(config.camera.fov_y_degrees, 45.0);
        assert_eq!(config.camera.eye, [4.0, 2.0, 4.0]);
        assert_eq!(config.fade_duration, Duration::from_millis(500));
        assert!(!config.info_box);
    }

    #[test]
    fn test_asset_paths() {
        let paths = AssetPaths::under(Path::new("static/advanced-render"));
        assert_eq!(
            paths.baked_texture,
            Path::new("static/advanced-render/textures/testAdvancedRender.png")
        );
        assert_eq!(
            paths.lightmap,
            Path::new("static/advanced-render/textures/testAdvancedRender_lightmap.png")
        );
        assert_eq!(
            paths.model,
            Path::new("static/advanced-render/models/testAdvancedRender.glb")
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = ViewerConfig::from_lookup(lookup(&[
            (ENV_ASSETS, "/srv/assets"),
            (ENV_VARIANT, "Basic"),
            (ENV_INFO_BOX, "yes"),
        ]));
        assert_eq!(config.asset_root, PathBuf::from("/srv/assets"));
        assert_eq!(config.variant, SceneVariant::Basic);
        assert!(config.info_box);
        assert_eq!(config.assets().model, Path::new("/srv/assets/models/testAdvancedRender.glb"));
    }

    #[test]
    fn test_bad_overrides_keep_defaults() {
        let config = ViewerConfig::from_lookup(lookup(&[
            (ENV_ASSETS, "  "),
            (ENV_VARIANT, "fancy"),
            (ENV_INFO_BOX, "maybe"),
        ]));
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("advanced".parse(), Ok(SceneVariant::Advanced));
        assert_eq!(" BASIC ".parse(), Ok(SceneVariant::Basic));
        assert!("".parse::<SceneVariant>().is_err());
        assert!(SceneVariant::Advanced.uses_lightmap());
        assert!(!SceneVariant::Basic.has_panel());
    }
}
