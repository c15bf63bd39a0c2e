//! Image decoding for the baked texture and the lightmap

use std::path::Path;

use crate::{error::LoadError, gfx::color::ColorSpace};

/// Decoded RGBA8 image plus the colour space it is sampled in
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub color_space: ColorSpace,
}

/// Decodes PNG or JPEG bytes into RGBA8
///
/// Rows are kept in file order (top row first), which matches glTF texture
/// coordinates without any flipping.
pub fn decode_image(url: &str, bytes: &[u8], color_space: ColorSpace) -> Result<TextureData, LoadError> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| LoadError::Image {
            url: url.to_string(),
            source,
        })?
        .to_rgba8();

    Ok(TextureData {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
        color_space,
    })
}

pub fn load_texture_file(path: &Path, color_space: ColorSpace) -> Result<TextureData, LoadError> {
    let url = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        url: url.clone(),
        source,
    })?;
    decode_image(&url, &bytes, color_space)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_png_from_disk() {
        let path = std::env::temp_dir().join(format!("bakelight-texture-{}.png", std::process::id()));
        let mut image = image::RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        image.save(&path).unwrap();

        let data = load_texture_file(&path, ColorSpace::Srgb).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((data.width, data.height), (2, 1));
        assert_eq!(data.rgba, vec![255, 0, 0, 255, 0, 0, 255, 255]);
        assert_eq!(data.color_space, ColorSpace::Srgb);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_texture_file(Path::new("does/not/exist.png"), ColorSpace::Linear).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.url(), "does/not/exist.png");
    }

    #[test]
    fn test_garbage_is_image_error() {
        let err = decode_image("broken.png", b"definitely not a png", ColorSpace::Srgb).unwrap_err();
        assert!(matches!(err, LoadError::Image { .. }));
    }
}
