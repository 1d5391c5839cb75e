use std::path::PathBuf;

use clap::Parser;
use textify::config::{Cutoff, DEFAULT_FONT_FACE, TextifyConfig};
use textify::lut::DEFAULT_CHARS;

/// Textify images: convert a picture into ASCII art
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image to textify
    pub image: PathBuf,

    /// Number of characters in a line
    #[arg(short, long, default_value_t = 110, value_name = "VALUE")]
    pub size: u32,

    /// Histogram pixel cutoff percentage
    #[arg(short, long, default_value_t = 3.0, value_name = "VALUE")]
    pub cutoff: f64,

    /// Pixels to clip from the dark and bright ends of the histogram (overrides --cutoff)
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    pub cutoff_low_high: Option<Vec<u32>>,

    /// Number of colors to quantize the image into (skipped at 150 or more)
    #[arg(short, long, default_value_t = 255, value_name = "VALUE")]
    pub quantize: u32,

    /// Text output file
    #[arg(short = 't', long = "text", value_name = "FILE")]
    pub output_text: Option<PathBuf>,

    /// Image output file
    #[arg(short = 'i', long = "image", value_name = "FILE")]
    pub output_image: Option<PathBuf>,

    /// Pick random characters for pixels brighter than the background (for black and white images)
    #[arg(long, default_value_t = false)]
    pub random: bool,

    /// Invert the provided image
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Use white background for output image (black text)
    #[arg(long, default_value_t = false)]
    pub white_bg: bool,

    /// Make a transparent output image
    #[arg(long, default_value_t = false)]
    pub transparent: bool,

    /// ASCII character list to use, darkest first
    #[arg(long, default_value = DEFAULT_CHARS, value_name = "STRING")]
    pub chars: String,

    /// Font size for image output
    #[arg(long, default_value_t = 12, value_name = "VALUE")]
    pub font_size: u32,

    /// Line spacing for image output
    #[arg(long, default_value_t = 5, value_name = "VALUE")]
    pub line_spacing: u32,

    /// Font face for image output
    #[arg(long, default_value = DEFAULT_FONT_FACE, value_name = "TTF_FILE")]
    pub font_face: PathBuf,

    /// Input image y-axis shrink factor (0 disables it)
    #[arg(long, default_value_t = 1.99999, value_name = "VALUE")]
    pub y_shrink: f64,

    /// Number of sharpen passes
    #[arg(long, default_value_t = 0, value_name = "VALUE")]
    pub sharpen: u32,

    /// Force a specific size for the produced image
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    pub image_size: Option<Vec<u32>>,

    /// Use alternative font settings (for mac or linux)
    #[arg(long, default_value_t = false)]
    pub alt: bool,

    /// Seed for --random, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn pair(values: Option<&Vec<u32>>) -> Option<(u32, u32)> {
    match values.map(Vec::as_slice) {
        Some([a, b]) => Some((*a, *b)),
        _ => None,
    }
}

impl Cli {
    /// Resolve the arguments into a configuration
    ///
    /// Precedence: defaults, then explicit arguments, then the `--alt` bundle.
    pub fn to_config(&self) -> TextifyConfig {
        let cutoff = match pair(self.cutoff_low_high.as_ref()) {
            Some((low, high)) => Cutoff::Counts { low, high },
            None => Cutoff::Percent(self.cutoff),
        };

        let config = TextifyConfig {
            size: self.size,
            cutoff,
            quantize: self.quantize,
            chars: self.chars.chars().collect(),
            random: self.random,
            invert: self.invert,
            white_bg: self.white_bg,
            transparent: self.transparent,
            font_face: self.font_face.clone(),
            font_size: self.font_size,
            line_spacing: self.line_spacing,
            y_shrink: self.y_shrink,
            sharpen: self.sharpen,
            image_size: pair(self.image_size.as_ref()),
            output_text: self.output_text.clone(),
            output_image: self.output_image.clone(),
        };

        if self.alt { config.with_alt() } else { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use textify::config::ALT_FONT_FACE;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("textify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["in.png"]).to_config();
        let defaults = TextifyConfig::default();
        assert_eq!(config.size, defaults.size);
        assert_eq!(config.cutoff, Cutoff::Percent(3.0));
        assert_eq!(config.chars, defaults.chars);
        assert_eq!(config.font_face, defaults.font_face);
        assert_eq!(config.y_shrink, 1.99999);
        assert!(config.output_text.is_none() && config.output_image.is_none());
    }

    #[test]
    fn test_short_forms() {
        let cli = parse(&[
            "in.png", "-s", "80", "-c", "5", "-q", "8", "-t", "o.txt", "-i", "o.png",
        ]);
        assert_eq!(cli.image, PathBuf::from("in.png"));
        let config = cli.to_config();
        assert_eq!(config.size, 80);
        assert_eq!(config.cutoff, Cutoff::Percent(5.0));
        assert_eq!(config.quantize, 8);
        assert_eq!(config.output_text, Some(PathBuf::from("o.txt")));
        assert_eq!(config.output_image, Some(PathBuf::from("o.png")));
    }

    #[test]
    fn test_cutoff_pair_overrides_percent() {
        let config = parse(&["in.png", "-c", "9", "--cutoff-low-high", "4", "7"]).to_config();
        assert_eq!(config.cutoff, Cutoff::Counts { low: 4, high: 7 });
    }

    #[test]
    fn test_alt_wins_over_explicit_fields() {
        let config = parse(&[
            "in.png",
            "--alt",
            "--chars",
            "ab",
            "--line-spacing",
            "9",
            "--font-face",
            "x.ttf",
            "--y-shrink",
            "4",
            "--font-size",
            "30",
        ])
        .to_config();
        assert_eq!(config.font_face, PathBuf::from(ALT_FONT_FACE));
        assert_eq!(config.line_spacing, 1);
        assert_eq!(config.y_shrink, 2.0);
        assert_eq!(config.chars.iter().collect::<String>(), " `~!1f2d@");
        assert_eq!(config.font_size, 30);
    }

    #[test]
    fn test_flags_and_image_size() {
        let config = parse(&[
            "in.png",
            "--random",
            "--invert",
            "--white-bg",
            "--transparent",
            "--sharpen",
            "2",
            "--image-size",
            "640",
            "480",
        ])
        .to_config();
        assert!(config.random && config.invert && config.white_bg && config.transparent);
        assert_eq!(config.sharpen, 2);
        assert_eq!(config.image_size, Some((640, 480)));
    }

    #[test]
    fn test_single_char_palette_fails_validation() {
        let config = parse(&["in.png", "--chars", "#"]).to_config();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_image_is_usage_error() {
        assert!(Cli::try_parse_from(["textify"]).is_err());
    }
}
