//! ImGui UI manager for the viewer
//!
//! Handles ImGui integration with wgpu and winit, providing frame management,
//! input handling, and rendering for the overlay and the lighting panel.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use log::warn;
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

const BASE_FONT_SIZE: f64 = 16.0;

/// Whether a UI frame was built and still awaits rendering
///
/// Dear ImGui asserts when `render()` runs outside a started frame.
#[derive(Debug, Default)]
struct PendingFrame(bool);

impl PendingFrame {
    fn open(&mut self) {
        self.0 = true;
    }

    /// Returns true once per opened frame
    fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

/// ImGui UI manager
///
/// Manages ImGui context, platform integration, and rendering pipeline.
/// ImGui works in physical window pixels; when the drawing buffer is
/// smaller than the window (pixel ratio clamped) the framebuffer scale
/// maps UI coordinates onto it.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
    framebuffer_scale: f32,
    pending_frame: PendingFrame,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// Uses locked DPI mode so UI coordinates stay in physical pixels, and
    /// sizes the font from the window's scale factor instead.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = (BASE_FONT_SIZE * window.scale_factor()) as f32;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
            framebuffer_scale: 1.0,
            pending_frame: PendingFrame::default(),
        }
    }

    /// Matches the UI to a drawing buffer of `buffer_width` for a window
    /// `window_width` physical pixels wide
    pub fn update_display_size(&mut self, window_width: u32, buffer_width: u32) {
        self.framebuffer_scale = if window_width == 0 {
            1.0
        } else {
            buffer_width as f32 / window_width as f32
        };
    }

    /// Handles input events and returns whether UI captured them
    ///
    /// Returns true if the UI wants the input, so it must not reach the
    /// camera controls.
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        match event {
            Event::WindowEvent {
                event: window_event,
                ..
            } => match window_event {
                WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::ModifiersChanged(_)
                | WindowEvent::Focused(_) => {
                    self.platform
                        .handle_event(self.context.io_mut(), window, event);

                    let io = self.context.io();
                    io.want_capture_mouse || io.want_capture_keyboard
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// True while the pointer or keyboard belongs to the UI
    pub fn wants_input(&self) -> bool {
        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Builds this frame's UI
    ///
    /// Returns false when no frame could be started; nothing is rendered
    /// for it then.
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> bool
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("Failed to prepare UI frame: {}", e);
            return false;
        }
        self.context.io_mut().display_framebuffer_scale =
            [self.framebuffer_scale, self.framebuffer_scale];

        let ui = self.context.frame();
        self.pending_frame.open();
        run_ui(&ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(&ui, window);
        }

        true
    }

    /// Renders the UI built in the last `update_logic()` call
    ///
    /// Uses LoadOp::Load to keep the 3D scene underneath. Does nothing when
    /// no frame was built since the last render.
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        if !self.pending_frame.take() {
            return;
        }
        let draw_data = self.context.render();

        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            warn!("Failed to render UI: {:?}", e);
        }
    }

    /// `update_logic()` followed by `render_display_only()`
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        if self.update_logic(window, run_ui) {
            self.render_display_only(device, queue, encoder, color_attachment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_render_without_a_frame() {
        let mut pending = PendingFrame::default();
        assert!(!pending.take());
    }

    #[test]
    fn test_each_frame_renders_once() {
        let mut pending = PendingFrame::default();
        pending.open();
        assert!(pending.take());
        assert!(!pending.take());
    }
}
