use std::path::PathBuf;

use crate::error::{Result, TextifyError};
use crate::lut::{ALT_CHARS, DEFAULT_CHARS, distinct_chars};
use crate::render::RenderOptions;

/// Font face used when none is given
pub const DEFAULT_FONT_FACE: &str = "consola.ttf";

/// Font face of the alternative bundle (mac/linux friendly)
pub const ALT_FONT_FACE: &str = "font/Inconsolata-Regular.ttf";

/// Quantization is skipped at or above this many colors
pub const QUANTIZE_LIMIT: u32 = 150;

/// Histogram clipping applied by autocontrast
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// Percentage of pixels clipped from each tail
    Percent(f64),
    /// Explicit number of pixels clipped from the dark and bright tails
    Counts { low: u32, high: u32 },
}

/// Configuration for an image to text conversion
#[derive(Debug, Clone)]
pub struct TextifyConfig {
    /// Output width in characters
    pub size: u32,
    pub cutoff: Cutoff,
    /// Target color count; only applied below `QUANTIZE_LIMIT`
    pub quantize: u32,
    /// Palette, brightness-ascending; index 0 is the background character
    pub chars: Vec<char>,

    pub random: bool,
    pub invert: bool,
    pub white_bg: bool,
    pub transparent: bool,

    // Rendering
    pub font_face: PathBuf,
    pub font_size: u32,
    pub line_spacing: u32,
    /// Vertical shrink applied to the resized height; 0 disables it
    pub y_shrink: f64,
    pub sharpen: u32,
    /// Force the rendered image to this size
    pub image_size: Option<(u32, u32)>,

    // Sinks
    pub output_text: Option<PathBuf>,
    pub output_image: Option<PathBuf>,
}

impl Default for TextifyConfig {
    fn default() -> Self {
        Self {
            size: 110,
            cutoff: Cutoff::Percent(3.0),
            quantize: 255,
            chars: DEFAULT_CHARS.chars().collect(),

            random: false,
            invert: false,
            white_bg: false,
            transparent: false,

            font_face: PathBuf::from(DEFAULT_FONT_FACE),
            font_size: 12,
            line_spacing: 5,
            y_shrink: 1.99999,
            sharpen: 0,
            image_size: None,

            output_text: None,
            output_image: None,
        }
    }
}

impl TextifyConfig {
    /// Apply the alternative font bundle
    ///
    /// Overrides font face, line spacing, y-shrink and palette together,
    /// taking precedence over any value set for those fields before.
    pub fn with_alt(mut self) -> Self {
        self.font_face = PathBuf::from(ALT_FONT_FACE);
        self.line_spacing = 1;
        self.y_shrink = 2.0;
        self.chars = ALT_CHARS.chars().collect();
        self
    }

    /// Whether the quantize stage runs for this configuration
    pub fn quantize_enabled(&self) -> bool {
        self.quantize < QUANTIZE_LIMIT
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if distinct_chars(&self.chars) < 2 {
            return Err(TextifyError::Config(format!(
                "specify at least 2 distinct characters, got {:?}",
                self.chars.iter().collect::<String>()
            )));
        }
        if self.size == 0 {
            return Err(TextifyError::Config("size must be at least 1".into()));
        }
        if let Cutoff::Percent(percent) = self.cutoff {
            if !percent.is_finite() {
                return Err(TextifyError::Config(format!(
                    "cutoff must be a number, got {percent}"
                )));
            }
        }
        if !self.y_shrink.is_finite() || self.y_shrink < 0.0 {
            return Err(TextifyError::Config(format!(
                "y-shrink must be a non-negative number, got {}",
                self.y_shrink
            )));
        }
        Ok(())
    }

    /// Options for rendering the text back into an image
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            font_face: self.font_face.clone(),
            font_size: self.font_size,
            line_spacing: self.line_spacing,
            white_bg: self.white_bg,
            transparent: self.transparent,
        }
    }
}
