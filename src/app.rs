//! Top-level wrapper: window, render engine, UI and the scene
//!
//! `ViewerApp` owns the event loop; `Viewer` is the winit application
//! handler holding everything created once the window exists. Dropping
//! the viewer's parts in `teardown` releases the scene, the GPU resources
//! and finally the window.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    error::ViewerError,
    gfx::{rendering::RenderEngine, viewport::Viewport},
    scene::ViewerScene,
    ui::{
        draw_info_box, draw_loading_overlay, draw_placard_labels, LightPanel, OverlayAction,
        PanelEvent, UiManager,
    },
};

pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    viewer: Viewer,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Result<Self, ViewerError> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop: Some(event_loop),
            viewer: Viewer::new(config),
        })
    }

    /// Runs until the window closes; returns any start-up failure
    pub fn run(mut self) -> Result<(), ViewerError> {
        if let Some(event_loop) = self.event_loop.take() {
            event_loop.set_control_flow(ControlFlow::Poll);
            event_loop.run_app(&mut self.viewer)?;
        }

        self.viewer.teardown();
        match self.viewer.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Window, GPU, UI and scene for one viewer
pub struct Viewer {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Option<ViewerScene>,
    panel: Option<LightPanel>,
    startup_error: Option<ViewerError>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            render_engine: None,
            ui_manager: None,
            scene: None,
            panel: None,
            startup_error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let (width, height) = self.config.window_size;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(LogicalSize::new(width, height)),
            )?,
        );

        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
        let (buffer_width, buffer_height) = viewport.drawing_buffer_size();

        let window_clone = window.clone();
        let render_engine = pollster::block_on(async move {
            RenderEngine::new(window_clone, buffer_width, buffer_height).await
        })?;

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(window.inner_size().width, buffer_width);

        self.window = Some(window);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(render_engine);
        self.build_scene(viewport);
        Ok(())
    }

    /// Creates a fresh scene and, for the advanced variant, its panel
    fn build_scene(&mut self, viewport: Viewport) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_ref(), self.window.as_ref())
        else {
            return;
        };

        // Drop the old scene first so its loads stop reporting
        self.scene = None;
        let scene = ViewerScene::new(&self.config, viewport, &render_engine.gpu_context());

        self.panel = self.config.variant.has_panel().then(|| {
            let width = self.config.panel_width * window.scale_factor() as f32;
            LightPanel::new(&self.config.light, scene.light().color, width)
        });
        self.scene = Some(scene);
    }

    /// Rebuilds the scene from scratch, reloading every asset
    pub fn reload(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        info!("Reloading scene");
        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
        self.build_scene(viewport);
    }

    /// Releases the scene, UI, GPU and window, in that order
    pub fn teardown(&mut self) {
        if self.window.is_none() {
            return;
        }
        info!("Tearing down viewer");
        self.panel = None;
        self.scene = None;
        self.ui_manager = None;
        self.render_engine = None;
        self.window = None;
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let (Some(scene), Some(render_engine)) = (self.scene.as_mut(), self.render_engine.as_mut())
        else {
            return;
        };

        let viewport = Viewport::from_physical(size, scale_factor);
        if let Some((width, height)) = scene.resize(viewport) {
            render_engine.resize(width, height);
            if let Some(ui_manager) = self.ui_manager.as_mut() {
                ui_manager.update_display_size(size.width, width);
            }
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let Self {
            window: Some(window),
            render_engine: Some(render_engine),
            ui_manager: Some(ui_manager),
            scene: Some(scene),
            panel,
            ..
        } = self
        else {
            return;
        };

        scene.update(&render_engine.gpu_context(), now);
        render_engine.update(scene.camera_uniform());

        let scale = window.scale_factor() as f32;
        let mut panel_events: Vec<PanelEvent> = Vec::new();
        let mut reload = false;

        {
            let scene: &ViewerScene = scene;
            let window: &Window = window;
            let draw_items = scene.draw_list();

            let ui_pass = |device: &wgpu::Device,
                           queue: &wgpu::Queue,
                           encoder: &mut wgpu::CommandEncoder,
                           color_attachment: &wgpu::TextureView| {
                ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                    let labels = scene.placard_labels(ui.io().display_size);
                    draw_placard_labels(ui, &labels);

                    if let Some(info) = scene.info_box() {
                        draw_info_box(ui, info, scale);
                    }
                    if let Some(panel) = panel.as_mut() {
                        panel_events.extend(panel.draw(ui));
                    }
                    if draw_loading_overlay(ui, scene.loading(), now, scale)
                        == Some(OverlayAction::Reload)
                    {
                        reload = true;
                    }
                });
            };
            render_engine.render_frame(&draw_items, Some(ui_pass));
        }

        for event in panel_events {
            match event {
                PanelEvent::ColorChanged(color) => scene.set_light_color(render_engine.queue(), color),
                PanelEvent::StrengthChanged(strength) => {
                    scene.set_light_strength(render_engine.queue(), strength)
                }
            }
        }

        if reload {
            self.reload();
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.teardown();
        event_loop.exit();
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            error!("Could not start the viewer: {}", e);
            self.startup_error = Some(e);
            self.exit(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets input first
        let ui_captured = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                ui_manager.handle_input(&window, &ui_event)
            }
            None => false,
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if !ui_captured => {
                self.exit(event_loop);
            }
            WindowEvent::CloseRequested => {
                self.exit(event_loop);
            }
            WindowEvent::Resized(size) => {
                self.resize(size, window.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.resize(window.inner_size(), scale_factor);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            // Releases always reach the camera so a drag never sticks
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.process_window_event(&event);
                }
            }
            _ => {
                if ui_captured {
                    window.request_redraw();
                } else if let Some(scene) = self.scene.as_mut() {
                    scene.process_window_event(&event);
                }
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.ui_manager.as_ref().is_some_and(|ui| ui.wants_input()) {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.process_device_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
