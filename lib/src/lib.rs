//! Textify - image to ASCII art converter
//!
//! Converts a raster image into text by running a short grayscale pipeline
//! (resize, invert, autocontrast, quantize, sharpen) and mapping each pixel
//! to a character of a brightness-ordered palette. The text can be rendered
//! back into an image with a monospace font.
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//! use textify::{TextifyConfig, render_text, textify_path};
//!
//! let config = TextifyConfig::default();
//! let art = textify_path(Path::new("photo.jpg"), &config).unwrap();
//! println!("{art}");
//!
//! let rendered = render_text(art.as_str(), &config.render_options()).unwrap();
//! rendered.save("ascii_art.png").unwrap();
//! ```

pub mod ascii;
pub mod config;
pub mod error;
pub mod filters;
pub mod lut;
pub mod output;
pub mod processor;
pub mod render;

// Re-export main types for convenience
pub use ascii::AsciiArt;
pub use config::{Cutoff, TextifyConfig};
pub use error::{Result, TextifyError};
pub use processor::{textify_image, textify_image_with_rng, textify_path};
pub use render::{RenderOptions, render_text};
