//! WGPU-based rendering engine for the lightmap viewer
//!
//! Owns the surface, device and render targets, the two material pipelines
//! and the per-frame camera uniform. Draws a flat list of meshes, each with
//! its own material, then hands the resolved frame to an optional UI pass.

use std::sync::Arc;

use log::{debug, info, warn};
use wgpu::{Device, TextureFormat};

use crate::{
    error::ViewerError,
    gfx::{
        camera::camera_utils::CameraUniform,
        color::select_surface_format,
        material::{create_material_layout, GpuMaterial, PipelineKind},
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            texture_resource::TextureResource,
        },
        scene::model::MeshBuffers,
    },
    wgpu_utils::binding_builder::BindGroupLayoutWithDesc,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADER_NAME: &str = "lightmap";
const PREFERRED_SAMPLE_COUNT: u32 = 4;

/// One draw call: a mesh and the material it is shaded with
pub struct DrawItem<'a> {
    pub buffers: &'a MeshBuffers,
    pub material: &'a GpuMaterial,
}

/// Borrowed GPU handles for creating scene resources
pub struct GpuContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub material_layout: &'a BindGroupLayoutWithDesc,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    material_layout: BindGroupLayoutWithDesc,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Picks an sRGB surface format when one is offered and enables 4x MSAA
    /// when the format supports it.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, ViewerError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = select_surface_format(&surface_capabilities.formats)
            .ok_or(ViewerError::NoSurfaceFormat)?;
        if !format.is_srgb() {
            warn!("No sRGB surface format, colours will look darker");
        }

        let sample_count = if adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(PREFERRED_SAMPLE_COUNT)
        {
            PREFERRED_SAMPLE_COUNT
        } else {
            1
        };
        debug!("Surface format {:?}, {}x MSAA", format, sample_count);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, sample_count, "depth_texture");
        let msaa_view = TextureResource::create_msaa_target(&device, &config, sample_count);

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let material_layout = create_material_layout(&device);

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader(SHADER_NAME, include_str!("lightmap.wgsl"));

        for kind in PipelineKind::ALL {
            pipeline_manager.register_pipeline(
                kind.name(),
                PipelineConfig::default()
                    .with_label(kind.name())
                    .with_shader(SHADER_NAME)
                    .with_fragment_entry(kind.fragment_entry())
                    .with_bind_group_layouts(vec![
                        global_bindings.bind_group_layout().clone(),
                        material_layout.layout.clone(),
                    ])
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_sample_count(sample_count)
                    .with_color_format(format),
            );
        }
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            msaa_view,
            sample_count,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            material_layout,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Handles for building textures, meshes and materials
    pub fn gpu_context(&self) -> GpuContext<'_> {
        GpuContext {
            device: &self.device,
            queue: &self.queue,
            material_layout: &self.material_layout,
        }
    }

    /// Uploads the camera for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform);
    }

    /// Renders one frame
    ///
    /// `ui_callback` runs after the scene pass with its own encoder access
    /// and the resolved surface view, so UI is drawn on top without MSAA.
    pub fn render_frame<F>(&mut self, items: &[DrawItem<'_>], ui_callback: Option<F>)
    where
        F: FnOnce(&Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (color_view, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(&view)),
                None => (&view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(global_bind_group) = self.global_bindings.bind_group() {
                render_pass.set_bind_group(0, global_bind_group, &[]);

                let mut bound: Option<PipelineKind> = None;
                for item in items {
                    let kind = item.material.pipeline();
                    if bound != Some(kind) {
                        let Some(pipeline) = self.pipeline_manager.get_pipeline(kind.name()) else {
                            continue;
                        };
                        render_pass.set_pipeline(pipeline);
                        bound = Some(kind);
                    }

                    render_pass.set_bind_group(1, item.material.bind_group(), &[]);
                    render_pass.set_vertex_buffer(0, item.buffers.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(
                        item.buffers.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..item.buffers.index_count, 0, 0..1);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Resizes the surface and render targets; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if self.config.width == width && self.config.height == height {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            self.sample_count,
            "depth_texture",
        );
        self.msaa_view =
            TextureResource::create_msaa_target(&self.device, &self.config, self.sample_count);
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}
