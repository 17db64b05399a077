//! Loading PNG images for [`ImageView`](crate::controls::ImageView) and
//! [`Painter::draw_image`](crate::layer::Painter::draw_image).

use crate::error::Result;
use image::{ImageFormat, RgbaImage};
use std::path::Path;

/// Loads a PNG file as 8-bit RGBA.
pub fn load_png(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let data = std::fs::read(path)?;
    load_png_bytes(&data)
}

/// Decodes an in-memory PNG as 8-bit RGBA.
pub fn load_png_bytes(data: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory_with_format(data, ImageFormat::Png)?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::Rgba;
    use std::io::Cursor;

    #[test]
    fn decodes_png() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(2, 1, Rgba([9, 8, 7, 6]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let image = load_png_bytes(&bytes).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1), &Rgba([9, 8, 7, 6]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(load_png_bytes(b"not a png"), Err(Error::Image(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_png("/nonexistent/image.png"),
            Err(Error::Io(_))
        ));
    }
}
