//! Rendering ASCII text back into a raster image
//!
//! The text is laid out top-left aligned with a monospace font. The canvas
//! is sized to exactly fit the multiline block: the widest line by the
//! line count times the line height, plus the spacing between lines.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use crate::error::{Result, TextifyError};

/// How deep to descend into system font directories
const FONT_SEARCH_DEPTH: usize = 3;

/// Options for `render_text`
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub font_face: PathBuf,
    /// Em size in pixels
    pub font_size: u32,
    /// Extra pixels between consecutive lines
    pub line_spacing: u32,
    /// Black text on white instead of white on black
    pub white_bg: bool,
    /// Four-channel output with a fully transparent background
    pub transparent: bool,
}

/// Horizontal and vertical metrics needed to lay out text
pub trait GlyphMetrics {
    /// Horizontal advance of `ch` in pixels
    fn advance(&self, ch: char) -> f32;

    /// Height of one line of text in pixels, without spacing
    fn line_height(&self) -> f32;
}

/// A font face loaded at a fixed pixel scale
pub struct LoadedFont {
    font: FontVec,
    scale: PxScale,
}

impl LoadedFont {
    pub fn scale(&self) -> PxScale {
        self.scale
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }
}

impl GlyphMetrics for LoadedFont {
    fn advance(&self, ch: char) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.h_advance(scaled.glyph_id(ch))
    }

    fn line_height(&self) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.ascent() - scaled.descent()
    }
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from(r"C:\Windows\Fonts"),
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
    ];
    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

fn find_in_dir(dir: &Path, file_name: &std::ffi::OsStr, depth: usize) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name() == Some(file_name) {
            return Some(path);
        }
    }
    if depth == 0 {
        return None;
    }
    subdirs
        .iter()
        .find_map(|sub| find_in_dir(sub, file_name, depth - 1))
}

/// Locate a font file
///
/// The path is used as given when it exists. A relative path that does not
/// exist is looked up by file name in the usual system font directories.
pub fn resolve_font_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }
    let file_name = path.file_name()?;
    system_font_dirs()
        .iter()
        .find_map(|dir| find_in_dir(dir, file_name, FONT_SEARCH_DEPTH))
}

/// Load a TrueType/OpenType face with an em size of `font_size` pixels
///
/// The em square, not the ascent to descent height, is `font_size` pixels
/// tall, so the line height is `font_size * (ascent - descent) / units_per_em`.
pub fn load_font(path: &Path, font_size: u32) -> Result<LoadedFont> {
    let font_error = |reason: String| TextifyError::FontLoad {
        path: path.to_path_buf(),
        reason,
    };

    if font_size == 0 {
        return Err(font_error("font size must be at least 1".into()));
    }

    let resolved = resolve_font_path(path)
        .ok_or_else(|| font_error("file is missing or the path is invalid".into()))?;
    log::debug!("Using font {}", resolved.display());

    let data = fs::read(&resolved).map_err(|e| font_error(e.to_string()))?;
    let font = FontVec::try_from_vec(data).map_err(|e| font_error(e.to_string()))?;
    let scale = match font.units_per_em() {
        Some(units) if units > 0.0 => {
            PxScale::from(font_size as f32 * font.height_unscaled() / units)
        }
        _ => PxScale::from(font_size as f32),
    };

    Ok(LoadedFont { font, scale })
}

/// Pixel size of the block needed to draw `text`
///
/// # Arguments
/// * `text` - Newline separated text
/// * `metrics` - Glyph metrics of the font
/// * `spacing` - Pixels between consecutive lines
///
/// # Returns
/// `(width, height)`, each at least 1
pub fn measure_multiline<M: GlyphMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    spacing: u32,
) -> (u32, u32) {
    let line_height = metrics.line_height().ceil().max(0.0) as u32;
    let mut widest = 0.0f32;
    let mut lines = 0u32;

    for line in text.split('\n') {
        let width: f32 = line.chars().map(|ch| metrics.advance(ch)).sum();
        widest = widest.max(width);
        lines += 1;
    }

    let width = widest.ceil() as u32;
    let height = line_height * lines + spacing * lines.saturating_sub(1);
    (width.max(1), height.max(1))
}

/// Allocate the output canvas filled with the background
pub fn blank_canvas(width: u32, height: u32, white_bg: bool, transparent: bool) -> DynamicImage {
    if transparent {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
    } else {
        let bg = if white_bg { 255 } else { 0 };
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([bg])))
    }
}

/// Top offset of each line, paired with the line
fn line_positions<'a>(
    text: &'a str,
    font: &LoadedFont,
    spacing: u32,
) -> impl Iterator<Item = (i32, &'a str)> {
    let pitch = font.line_height().ceil() as i32 + spacing as i32;
    text.split('\n')
        .enumerate()
        .map(move |(index, line)| (index as i32 * pitch, line))
}

/// Draw every line of `text` onto `canvas`, top-left aligned
fn draw_multiline(
    canvas: &mut DynamicImage,
    text: &str,
    font: &LoadedFont,
    spacing: u32,
    white_bg: bool,
) {
    let fill = if white_bg { 0 } else { 255 };

    match canvas {
        DynamicImage::ImageRgba8(rgba) => {
            for (y, line) in line_positions(text, font, spacing) {
                let color = Rgba([fill, fill, fill, 255]);
                draw_text_mut(rgba, color, 0, y, font.scale(), font.font(), line);
            }
        }
        other => {
            let mut gray = other.to_luma8();
            for (y, line) in line_positions(text, font, spacing) {
                draw_text_mut(&mut gray, Luma([fill]), 0, y, font.scale(), font.font(), line);
            }
            *other = DynamicImage::ImageLuma8(gray);
        }
    }
}

/// Render ASCII text as an image
///
/// Opaque output is single-channel, white text on black (swapped with
/// `white_bg`). Transparent output is RGBA with opaque text.
pub fn render_text(text: &str, options: &RenderOptions) -> Result<DynamicImage> {
    let font = load_font(&options.font_face, options.font_size)?;

    log::info!("Getting Image Size");
    let (width, height) = measure_multiline(text, &font, options.line_spacing);
    log::debug!("Canvas {width}x{height}");

    log::info!("Rendering Image");
    let mut canvas = blank_canvas(width, height, options.white_bg, options.transparent);
    draw_multiline(&mut canvas, text, &font, options.line_spacing, options.white_bg);
    Ok(canvas)
}
