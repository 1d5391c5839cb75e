//! Output sinks: console preview, text file and rendered image file
//!
//! File sinks write to a temporary file next to the destination and rename
//! it into place, so a failed write never leaves a truncated file behind.

use std::io::Write;
use std::path::Path;

use image::{DynamicImage, ImageFormat, imageops};
use tempfile::NamedTempFile;

use crate::error::{Result, TextifyError};

/// Widest output still printed to the console
pub const CONSOLE_MAX_WIDTH: u32 = 116;

/// Printed instead of the text when it is too wide for a console
pub const TOO_WIDE_NOTICE: &str = "Image Too Large To Display On Console";

/// What to print on stdout for text of the given width
pub fn console_preview(text: &str, size: u32) -> &str {
    if size < CONSOLE_MAX_WIDTH {
        text
    } else {
        TOO_WIDE_NOTICE
    }
}

fn temp_file_for(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).map_err(|e| TextifyError::output(path, e))
}

fn persist(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path)
        .map(|_| ())
        .map_err(|e| TextifyError::output(path, e.error))
}

/// Write the ASCII text verbatim to `path`
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut file = temp_file_for(path)?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| TextifyError::output(path, e))?;
    persist(file, path)?;
    log::info!("{} Saved", path.display());
    Ok(())
}

/// Resize a rendered image to an exact size with the bicubic filter
pub fn force_size(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    log::info!("Resizing Output Image");
    img.resize_exact(width, height, imageops::FilterType::CatmullRom)
}

/// Encode `img` to `path`, inferring the format from the extension
pub fn save_image(path: &Path, img: &DynamicImage) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| TextifyError::output(path, e))?;
    let mut file = temp_file_for(path)?;
    img.write_to(&mut file, format)
        .map_err(|e| TextifyError::output(path, e))?;
    persist(file, path)?;

    log::info!(
        "Produced Image Aspect Ratio: {}",
        f64::from(img.height()) / f64::from(img.width().max(1))
    );
    log::info!("{} Saved", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_console_preview_threshold() {
        assert_eq!(console_preview("abc", 115), "abc");
        assert_eq!(console_preview("abc", 116), TOO_WIDE_NOTICE);
        assert_eq!(console_preview("abc", 300), TOO_WIDE_NOTICE);
    }

    #[test]
    fn test_write_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        write_text(&path, " #\n#").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), " #\n#");
    }

    #[test]
    fn test_write_text_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();
        write_text(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_text_unwritable() {
        let err = write_text(Path::new("/no/such/dir/art.txt"), "x").unwrap_err();
        assert!(matches!(err, TextifyError::Output { .. }));
    }

    #[test]
    fn test_save_image_infers_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 3, Luma([200])));
        save_image(&path, &img).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
        assert_eq!(decoded.to_luma8().get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_save_image_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.nope");
        let img = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let err = save_image(&path, &img).unwrap_err();
        assert!(matches!(err, TextifyError::Output { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_force_size() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(40, 20));
        let out = force_size(&img, 10, 30);
        assert_eq!((out.width(), out.height()), (10, 30));
    }
}
