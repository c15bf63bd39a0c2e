//! Colour-space helpers
//!
//! Baked textures are authored in sRGB while lightmaps carry linear mask
//! data, and the renderer writes sRGB output. These helpers pick matching
//! wgpu formats and convert UI colours into the linear working space the
//! shaders blend in.

use thiserror::Error;
use wgpu::TextureFormat;

/// Encoding of the texel data in a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Gamma-encoded colour, decoded to linear when sampled
    Srgb,
    /// Raw data, sampled as stored
    Linear,
}

impl ColorSpace {
    /// RGBA8 texture format for this encoding
    pub fn texture_format(self) -> TextureFormat {
        match self {
            ColorSpace::Srgb => TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => TextureFormat::Rgba8Unorm,
        }
    }
}

/// Picks the renderer output format, preferring an sRGB surface
///
/// Returns `None` only when the surface reports no formats at all.
pub fn select_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// sRGB transfer function, decoded to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("colour '{0}' must look like #rrggbb")]
    Format(String),
}

/// Light colour as edited in the UI (sRGB, 0..1 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    srgb: [f32; 3],
}

impl LightColor {
    pub fn from_srgb(srgb: [f32; 3]) -> Self {
        Self {
            srgb: srgb.map(|c| c.clamp(0.0, 1.0)),
        }
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::Format(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| -> Result<f32, ColorParseError> {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorParseError::Format(hex.to_string()))
        };

        Ok(Self {
            srgb: [channel(0..2)?, channel(2..4)?, channel(4..6)?],
        })
    }

    pub fn srgb(&self) -> [f32; 3] {
        self.srgb
    }

    /// Colour in the linear working space used by the shaders
    pub fn to_linear(&self) -> [f32; 3] {
        self.srgb.map(srgb_to_linear)
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.srgb.map(|c| (c * 255.0).round() as u8);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_of_default_light() {
        let color = LightColor::from_hex("#ff115e").unwrap();
        assert_eq!(color.srgb()[0], 1.0);
        assert!((color.srgb()[1] - 17.0 / 255.0).abs() < 1e-6);
        assert!((color.srgb()[2] - 94.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.to_hex(), "#ff115e");
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(LightColor::from_hex("#ff11").is_err());
        assert!(LightColor::from_hex("#gg115e").is_err());
        assert!(LightColor::from_hex("").is_err());
        assert!(LightColor::from_hex("00ff00").is_ok());
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        let white = LightColor::from_srgb([1.0, 1.0, 1.0]);
        let black = LightColor::from_srgb([0.0, 0.0, 0.0]);
        assert_eq!(white.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(black.to_linear(), [0.0, 0.0, 0.0]);

        // Mid grey is darker in linear space
        let grey = LightColor::from_srgb([0.5, 0.5, 0.5]).to_linear();
        assert!((grey[0] - 0.214).abs() < 1e-3);
    }

    #[test]
    fn test_from_srgb_clamps() {
        let color = LightColor::from_srgb([1.5, -0.2, 0.5]);
        assert_eq!(color.srgb(), [1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_surface_format_prefers_srgb() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            select_surface_format(&formats),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            select_surface_format(&[TextureFormat::Rgba8Unorm]),
            Some(TextureFormat::Rgba8Unorm)
        );
        assert_eq!(select_surface_format(&[]), None);
    }

    #[test]
    fn test_texture_formats() {
        assert_eq!(ColorSpace::Srgb.texture_format(), TextureFormat::Rgba8UnormSrgb);
        assert_eq!(ColorSpace::Linear.texture_format(), TextureFormat::Rgba8Unorm);
    }
}
