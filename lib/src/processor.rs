use std::path::Path;

use image::{DynamicImage, GrayImage, imageops};
use rand::Rng;

use crate::ascii::{AsciiArt, map_deterministic, map_random};
use crate::config::TextifyConfig;
use crate::error::{Result, TextifyError};
use crate::filters::{autocontrast, invert, quantize, sharpen};

/// Compute the resized dimensions for a source image
///
/// Width is always `size`. Height follows the source aspect ratio, divided
/// by `y_shrink` when it is nonzero to compensate for character cells being
/// taller than wide. Rounds half to even and never returns a zero height.
///
/// # Arguments
/// * `width`, `height` - Source dimensions
/// * `size` - Target width in characters
/// * `y_shrink` - Vertical shrink factor, 0 to disable
pub fn target_dimensions(width: u32, height: u32, size: u32, y_shrink: f64) -> (u32, u32) {
    let aspect_ratio = f64::from(width) / f64::from(height.max(1));
    let mut h = f64::from(size) / aspect_ratio;
    if y_shrink != 0.0 {
        h /= y_shrink;
    }
    let h = h.round_ties_even().max(1.0) as u32;
    (size, h)
}

/// Resize to the configured width with the bicubic filter
pub fn resize(img: &GrayImage, size: u32, y_shrink: f64) -> GrayImage {
    let (width, height) = img.dimensions();
    let (target_width, target_height) = target_dimensions(width, height, size, y_shrink);
    log::debug!("Resizing {width}x{height} -> {target_width}x{target_height}");
    imageops::resize(
        img,
        target_width,
        target_height,
        imageops::FilterType::CatmullRom,
    )
}

/// Runs the image pipeline on a grayscale image
///
/// Stages, in order:
/// 1. Resize to `size` columns
/// 2. Invert (if enabled)
/// 3. Autocontrast with the configured cutoff
/// 4. Quantize (only below the color limit)
/// 5. Sharpen, repeated `sharpen` times
pub fn process_gray(input: &GrayImage, config: &TextifyConfig) -> GrayImage {
    log::info!("Resizing Image");
    let mut img = resize(input, config.size, config.y_shrink);

    if config.invert {
        log::info!("Inverting Image");
        invert(&mut img);
    }

    log::info!("Adjusting Contrast");
    autocontrast(&mut img, config.cutoff);

    if config.quantize_enabled() {
        log::info!("Quantizing Color");
        quantize(&mut img, config.quantize);
    }

    if config.sharpen > 0 {
        log::info!("Sharpening Image ({} passes)", config.sharpen);
    }
    sharpen(img, config.sharpen)
}

/// Converts a decoded image to ASCII text
///
/// Randomized mode draws from `rng`; deterministic mode ignores it.
pub fn textify_image_with_rng<R: Rng + ?Sized>(
    input: &DynamicImage,
    config: &TextifyConfig,
    rng: &mut R,
) -> Result<AsciiArt> {
    config.validate()?;

    let gray = input.to_luma8();
    log::info!(
        "Input Image Aspect Ratio: {}",
        f64::from(gray.height()) / f64::from(gray.width().max(1))
    );

    let processed = process_gray(&gray, config);

    log::info!("Converting Image to ASCII");
    let art = if config.random {
        map_random(&processed, &config.chars, rng)
    } else {
        map_deterministic(&processed, &config.chars)
    };
    Ok(art)
}

/// Converts a decoded image to ASCII text using the thread-local RNG
pub fn textify_image(input: &DynamicImage, config: &TextifyConfig) -> Result<AsciiArt> {
    textify_image_with_rng(input, config, &mut rand::thread_rng())
}

/// Decode the image at `path` as grayscale-ready input
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| TextifyError::Input {
        path: path.to_path_buf(),
        source,
    })
}

/// Open, convert and return the ASCII text for the image at `path`
///
/// The configuration is validated before the file is touched.
pub fn textify_path(path: &Path, config: &TextifyConfig) -> Result<AsciiArt> {
    config.validate()?;
    let img = open_image(path)?;
    textify_image(&img, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cutoff;
    use image::Luma;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_target_dimensions_half_to_even() {
        // 110 / 2.0 / 2.0 = 27.5 -> 28
        assert_eq!(target_dimensions(200, 100, 110, 2.0), (110, 28));
        // 106 / 2.0 / 2.0 = 26.5 -> 26
        assert_eq!(target_dimensions(200, 100, 106, 2.0), (106, 26));
    }

    #[test]
    fn test_target_dimensions_without_shrink() {
        assert_eq!(target_dimensions(100, 50, 40, 0.0), (40, 20));
        assert_eq!(target_dimensions(4, 4, 4, 0.0), (4, 4));
    }

    #[test]
    fn test_target_dimensions_never_zero_height() {
        assert_eq!(target_dimensions(1000, 1, 10, 2.0), (10, 1));
    }

    #[test]
    fn test_resize_keeps_width() {
        let img = GrayImage::new(300, 200);
        let out = resize(&img, 110, 1.99999);
        assert_eq!(out.width(), 110);
        assert_eq!(out.height(), 37); // 110 / 1.5 / 1.99999 = 36.67
    }

    #[test]
    fn test_process_uniform_gray() {
        let img = GrayImage::from_pixel(4, 4, Luma([128]));
        let config = TextifyConfig {
            size: 4,
            y_shrink: 0.0,
            cutoff: Cutoff::Percent(0.0),
            ..Default::default()
        };
        let out = process_gray(&img, &config);
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn test_process_invert() {
        let img = GrayImage::from_fn(8, 8, |x, _| Luma([if x < 4 { 0 } else { 255 }]));
        let config = TextifyConfig {
            size: 8,
            y_shrink: 0.0,
            invert: true,
            cutoff: Cutoff::Percent(0.0),
            ..Default::default()
        };
        let out = process_gray(&img, &config);
        assert_eq!(out.get_pixel(0, 0)[0], 255);
        assert_eq!(out.get_pixel(7, 0)[0], 0);
    }

    #[test]
    fn test_end_to_end_mid_gray() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([128])));
        let config = TextifyConfig {
            size: 4,
            y_shrink: 0.0,
            chars: vec![' ', '.'],
            cutoff: Cutoff::Percent(0.0),
            quantize: 255,
            ..Default::default()
        };
        let art = textify_image(&img, &config).unwrap();
        assert_eq!(art.as_str(), "....\n....\n....\n..");
    }

    #[test]
    fn test_random_mode_uses_given_rng() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(6, 6, |x, _| {
            Luma([if x < 3 { 0 } else { 255 }])
        }));
        let config = TextifyConfig {
            size: 6,
            y_shrink: 0.0,
            random: true,
            cutoff: Cutoff::Percent(0.0),
            ..Default::default()
        };
        let first = textify_image_with_rng(&img, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = textify_image_with_rng(&img, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
        assert!(first.as_str().lines().all(|line| line.starts_with("   ")));
    }

    #[test]
    fn test_invalid_config_rejected_before_io() {
        let config = TextifyConfig {
            chars: vec!['x'],
            ..Default::default()
        };
        let err = textify_path(Path::new("/definitely/missing.png"), &config).unwrap_err();
        assert!(matches!(err, TextifyError::Config(_)));
    }

    #[test]
    fn test_missing_input_is_input_error() {
        let err = textify_path(Path::new("/definitely/missing.png"), &TextifyConfig::default())
            .unwrap_err();
        assert!(matches!(err, TextifyError::Input { .. }));
    }
}
