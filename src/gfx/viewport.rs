//! Window size and pixel ratio passed explicitly into the scene
//!
//! The scene never queries the window directly; the application builds a
//! `Viewport` from winit's physical size and scale factor and hands it to
//! the scene constructor and to every resize.

/// Upper bound on the pixel ratio used for the drawing buffer
pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width in points
    pub width: f64,
    /// Logical height in points
    pub height: f64,
    /// Scale factor reported by the window system
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Builds a viewport from a physical window size and its scale factor
    pub fn from_physical(size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        Self::new(logical.width, logical.height, scale_factor)
    }

    /// True when both dimensions are positive
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.device_pixel_ratio > 0.0
    }

    /// Camera aspect ratio
    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Pixel ratio used for rendering, clamped to `MAX_PIXEL_RATIO`
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Drawing buffer size in physical pixels, never smaller than 1x1
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let w = (self.width * ratio).floor().max(1.0) as u32;
        let h = (self.height * ratio).floor().max(1.0) as u32;
        (w, h)
    }
}
