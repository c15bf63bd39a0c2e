//! The viewer scene: camera, loads, materials and what gets drawn
//!
//! One component covers both scene variants. The basic variant loads the
//! baked texture and the model; the advanced variant also loads the
//! lightmap and builds the shader material once both textures are settled.
//! Load completions are drained in `update`, on the event-loop thread.

use std::time::Instant;

use cgmath::{Deg, Vector3};
use log::{debug, info, warn};
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    config::{SceneVariant, ViewerConfig},
    gfx::{
        camera::{project_to_screen, CameraController, CameraManager, CameraUniform, OrbitCamera},
        color::{ColorSpace, LightColor},
        material::{GpuMaterial, LightUniform, PipelineKind},
        rendering::{DrawItem, GpuContext},
        resources::TextureResource,
        scene::model::Model,
        viewport::Viewport,
    },
    loading::{AssetId, AssetLoader, AssetPayload, LoadEvent, LoadingManager, TextureData},
};

use super::{
    materials::{LightParams, MaterialSlot, SceneMaterials, ShaderMaterialSpec, ShaderVariant},
    placard::{self, InfoBox, Placard, BOX_COLOR, PANEL_COLOR},
};

const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Text drawn over the scene at a window position
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub position: [f32; 2],
}

/// Shared red and black materials for every placard
struct PlacardMaterials {
    _textures: [TextureResource; 2],
    slab: GpuMaterial,
    panel: GpuMaterial,
}

struct PlacardInstance {
    placard: Placard,
    /// Meshes: slab, then panel
    model: Model,
}

pub struct ViewerScene {
    variant: SceneVariant,
    camera: CameraManager,
    loading: LoadingManager,
    loader: AssetLoader,
    materials: SceneMaterials,
    model: Option<Model>,

    /// 1x1 black, standing in for the baked texture until it arrives
    base_texture: TextureResource,
    /// 1x1 black, bound wherever no lightmap is available
    black_lightmap: TextureResource,
    lightmap: Option<TextureResource>,
    base_material: GpuMaterial,
    shader_material: Option<GpuMaterial>,

    placards: Vec<PlacardInstance>,
    placard_materials: Option<PlacardMaterials>,
    info_box: Option<InfoBox>,
}

impl ViewerScene {
    /// Sets up camera and base material and starts every load
    pub fn new(config: &ViewerConfig, viewport: Viewport, gpu: &GpuContext) -> Self {
        let light_color = LightColor::from_hex(&config.light.color).unwrap_or_else(|e| {
            warn!("{}, using white", e);
            LightColor::from_srgb([1.0, 1.0, 1.0])
        });
        let light = LightParams {
            color: light_color,
            strength: config.light.strength,
        };

        let cam = &config.camera;
        let camera = OrbitCamera::looking_at(
            Vector3::from(cam.eye),
            Vector3::from(cam.target),
            viewport.aspect(),
        )
        .with_projection(Deg(cam.fov_y_degrees), cam.near, cam.far)
        .with_damping(cam.damping_factor);
        let camera = CameraManager::new(
            camera,
            CameraController::new(cam.rotate_speed, cam.zoom_speed),
        );

        let base_texture =
            TextureResource::single_pixel(gpu.device, gpu.queue, BLACK, ColorSpace::Srgb, "Baked Placeholder");
        let black_lightmap =
            TextureResource::single_pixel(gpu.device, gpu.queue, BLACK, ColorSpace::Linear, "Black Lightmap");
        let base_material = GpuMaterial::new(
            gpu.device,
            gpu.material_layout,
            PipelineKind::Baked,
            &base_texture,
            &black_lightmap,
            LightUniform::from(light),
            "Base Material",
        );

        let mut info_box = config.info_box.then(InfoBox::new);
        if let Some(info_box) = info_box.as_mut() {
            info_box.push(match config.variant {
                SceneVariant::Basic => "Baked texture on the model.",
                SceneVariant::Advanced => "Baked texture with a lightmap. Adjust the light in the Lighting panel.",
            });
        }

        let mut scene = Self {
            variant: config.variant,
            camera,
            loading: LoadingManager::new(config.fade_duration),
            loader: AssetLoader::new(),
            materials: SceneMaterials::new(config.variant.uses_lightmap(), light),
            model: None,
            base_texture,
            black_lightmap,
            lightmap: None,
            base_material,
            shader_material: None,
            placards: Vec::new(),
            placard_materials: None,
            info_box,
        };
        scene.start_loads(config);
        scene
    }

    fn start_loads(&mut self, config: &ViewerConfig) {
        let assets = config.assets();
        info!("Starting asset loading ({:?} scene)...", self.variant);

        self.loader.load_texture(
            AssetId::BakedTexture,
            &assets.baked_texture,
            ColorSpace::Srgb,
            &mut self.loading,
        );
        if self.variant.uses_lightmap() {
            debug!("Trying to load light map from: {}", assets.lightmap.display());
            self.loader.load_texture(
                AssetId::Lightmap,
                &assets.lightmap,
                ColorSpace::Linear,
                &mut self.loading,
            );
        }
        self.loader
            .load_model(AssetId::Model, &assets.model, &mut self.loading);
    }

    /// Per-frame step: handles finished loads, the overlay fade and the
    /// camera damping
    pub fn update(&mut self, gpu: &GpuContext, now: Instant) {
        for event in self.loader.poll() {
            self.handle_load_event(gpu, event, now);
        }
        self.loading.tick(now);
        self.camera.tick();
    }

    fn handle_load_event(&mut self, gpu: &GpuContext, event: LoadEvent, now: Instant) {
        let LoadEvent { id, url, result } = event;

        match result {
            Ok(payload) => self.on_loaded(gpu, id, payload),
            Err(e) => {
                warn!("{}", e);
                self.on_failed(gpu, id);
                self.loading.item_error(&url);
            }
        }
        self.loading.item_end(&url, now);
    }

    fn on_loaded(&mut self, gpu: &GpuContext, id: AssetId, payload: AssetPayload) {
        match (id, payload) {
            (AssetId::BakedTexture, AssetPayload::Texture(data)) => {
                info!("Baked texture loaded successfully");
                self.base_texture = upload_texture(gpu, &data, "Baked Texture");
                self.base_material.rebind(
                    gpu.device,
                    gpu.material_layout,
                    &self.base_texture,
                    &self.black_lightmap,
                );
                let ready = self.materials.on_base_texture(true);
                self.build_shader_material(gpu, ready);
            }
            (AssetId::Lightmap, AssetPayload::Texture(data)) => {
                info!("Light map loaded successfully");
                if self.lightmap.is_none() {
                    self.lightmap = Some(upload_texture(gpu, &data, "Lightmap"));
                }
                let ready = self.materials.on_lightmap(true);
                self.build_shader_material(gpu, ready);
            }
            (AssetId::Model, AssetPayload::Model(meshes)) => {
                let mut model =
                    Model::from_data("model", meshes, self.materials.slot_for_new_model());
                model.upload(gpu.device);
                info!("Model loaded ({} meshes)", model.mesh_count());
                self.model = Some(model);
            }
            (id, _) => warn!("unexpected payload for {:?}", id),
        }
    }

    fn on_failed(&mut self, gpu: &GpuContext, id: AssetId) {
        match id {
            AssetId::BakedTexture => {
                warn!("Baked texture failed to load, keeping the placeholder");
                let ready = self.materials.on_base_texture(false);
                self.build_shader_material(gpu, ready);
            }
            AssetId::Lightmap => {
                info!("Will proceed without light map");
                let ready = self.materials.on_lightmap(false);
                self.build_shader_material(gpu, ready);
            }
            AssetId::Model => {}
        }
    }

    fn build_shader_material(&mut self, gpu: &GpuContext, spec: Option<ShaderMaterialSpec>) {
        let Some(spec) = spec else {
            return;
        };

        let (pipeline, lightmap) = match spec.variant {
            ShaderVariant::Lightmapped => (
                PipelineKind::Lightmapped,
                self.lightmap.as_ref().unwrap_or(&self.black_lightmap),
            ),
            ShaderVariant::BakedOnly => (PipelineKind::Baked, &self.black_lightmap),
        };
        let material = GpuMaterial::new(
            gpu.device,
            gpu.material_layout,
            pipeline,
            &self.base_texture,
            lightmap,
            LightUniform::from(spec.light),
            "Shader Material",
        );
        self.shader_material = Some(material);

        if let Some(model) = self.model.as_mut() {
            self.materials.apply_to(model);
            debug!("Applied shader material to {} meshes", model.mesh_count());
        }
    }

    /// Stores the light colour and pushes it to the live shader material
    pub fn set_light_color(&mut self, queue: &wgpu::Queue, color: LightColor) {
        info!("Updating light color to: {}", color.to_hex());
        if let Some(light) = self.materials.set_light_color(color) {
            self.push_light(queue, light);
        }
    }

    /// Stores the light strength and pushes it to the live shader material
    pub fn set_light_strength(&mut self, queue: &wgpu::Queue, strength: f32) {
        info!("Updating light strength to: {}", strength);
        if let Some(light) = self.materials.set_light_strength(strength) {
            self.push_light(queue, light);
        }
    }

    fn push_light(&mut self, queue: &wgpu::Queue, light: LightParams) {
        if let Some(material) = self.shader_material.as_mut() {
            material.set_light(queue, LightUniform::from(light));
        }
    }

    /// Adds an error placard to the scene
    pub fn show_error(&mut self, gpu: &GpuContext, message: &str) {
        let placard = placard::show_error(message, self.info_box.as_mut());

        if self.placard_materials.is_none() {
            self.placard_materials = Some(create_placard_materials(gpu, &self.black_lightmap));
        }

        let mut model = Model::from_data(
            "placard",
            vec![placard.slab.clone(), placard.panel.clone()],
            MaterialSlot::Base,
        );
        model.upload(gpu.device);
        self.placards.push(PlacardInstance { placard, model });
    }

    /// Applies a new window size; returns the drawing buffer size, or
    /// `None` for a zero-sized window
    pub fn resize(&mut self, viewport: Viewport) -> Option<(u32, u32)> {
        if !viewport.is_drawable() {
            return None;
        }
        self.camera.camera.resize_projection(viewport.aspect());
        Some(viewport.drawing_buffer_size())
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        self.camera.process_window_event(event)
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.camera.process_device_event(event);
    }

    /// Meshes to draw this frame, in model then placard order
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();

        if let Some(model) = &self.model {
            for mesh in &model.meshes {
                let Some(buffers) = mesh.buffers() else {
                    continue;
                };
                let material = match mesh.material {
                    MaterialSlot::Shader => self.shader_material.as_ref().unwrap_or(&self.base_material),
                    MaterialSlot::Base => &self.base_material,
                };
                items.push(DrawItem { buffers, material });
            }
        }

        if let Some(placard_materials) = &self.placard_materials {
            for instance in &self.placards {
                let materials = [&placard_materials.slab, &placard_materials.panel];
                for (mesh, material) in instance.model.meshes.iter().zip(materials) {
                    if let Some(buffers) = mesh.buffers() {
                        items.push(DrawItem { buffers, material });
                    }
                }
            }
        }

        items
    }

    /// Placard text positioned for a screen of `size` pixels
    pub fn placard_labels(&self, size: [f32; 2]) -> Vec<ScreenLabel> {
        let view_proj = self.camera.get_view_proj_matrix();
        self.placards
            .iter()
            .flat_map(|instance| instance.placard.lines.iter())
            .filter_map(|line| {
                project_to_screen(view_proj, line.anchor, size[0], size[1]).map(|position| {
                    ScreenLabel {
                        text: line.text.clone(),
                        position,
                    }
                })
            })
            .collect()
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        self.camera.camera.uniform
    }

    pub fn loading(&self) -> &LoadingManager {
        &self.loading
    }

    pub fn light(&self) -> LightParams {
        self.materials.light()
    }

    pub fn info_box(&self) -> Option<&InfoBox> {
        self.info_box.as_ref()
    }
}

fn upload_texture(gpu: &GpuContext, data: &TextureData, label: &str) -> TextureResource {
    TextureResource::create_from_rgba_data(
        gpu.device,
        gpu.queue,
        &data.rgba,
        data.width,
        data.height,
        data.color_space,
        label,
    )
}

fn create_placard_materials(gpu: &GpuContext, black_lightmap: &TextureResource) -> PlacardMaterials {
    let red = TextureResource::single_pixel(gpu.device, gpu.queue, BOX_COLOR, ColorSpace::Srgb, "Placard Red");
    let black =
        TextureResource::single_pixel(gpu.device, gpu.queue, PANEL_COLOR, ColorSpace::Srgb, "Placard Black");
    let no_light = LightUniform {
        color: [0.0; 3],
        strength: 0.0,
    };

    let slab = GpuMaterial::new(
        gpu.device,
        gpu.material_layout,
        PipelineKind::Baked,
        &red,
        black_lightmap,
        no_light,
        "Placard Slab",
    );
    let panel = GpuMaterial::new(
        gpu.device,
        gpu.material_layout,
        PipelineKind::Baked,
        &black,
        black_lightmap,
        no_light,
        "Placard Panel",
    );

    PlacardMaterials {
        _textures: [red, black],
        slab,
        panel,
    }
}
