use std::fmt;

use image::GrayImage;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use crate::lut::{RANDOM_THRESHOLD, build_index_lut};

/// Text produced from a processed image
///
/// One line per image row, one character per column. The final two
/// characters of the assembled text are dropped, which removes the last
/// newline together with the last character of the final row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiArt {
    text: String,
    columns: u32,
    rows: u32,
}

impl AsciiArt {
    fn from_rows(rows: Vec<String>, columns: u32) -> Self {
        let row_count = rows.len() as u32;
        let mut text = String::with_capacity(rows.iter().map(|row| row.len() + 1).sum());
        for row in &rows {
            text.push_str(row);
            text.push('\n');
        }
        truncate_tail(&mut text);
        Self {
            text,
            columns,
            rows: row_count,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Width of the source grid in characters
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the source grid in rows
    pub fn rows(&self) -> u32 {
        self.rows
    }
}

impl fmt::Display for AsciiArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Drop the last two characters of the assembled text
fn truncate_tail(text: &mut String) {
    text.pop();
    text.pop();
}

/// Map every pixel to a palette character by brightness
///
/// Index `round(v / 255 * (len - 1))`: monotonic and brightness-ascending.
///
/// # Arguments
/// * `img` - Processed grayscale image
/// * `chars` - Palette, at least one character
pub fn map_deterministic(img: &GrayImage, chars: &[char]) -> AsciiArt {
    let (width, _) = img.dimensions();
    let lut = build_index_lut(chars.len());

    // Rows are independent
    let rows: Vec<String> = img
        .as_raw()
        .par_chunks(width.max(1) as usize)
        .map(|row| row.iter().map(|&v| chars[lut[v as usize]]).collect())
        .collect();

    AsciiArt::from_rows(rows, width)
}

/// Palette indices for randomized mode, row-major
///
/// Pixels at or below `RANDOM_THRESHOLD` get index 0; all others a uniform
/// index in `[1, palette_len - 1]`.
pub fn random_indices<R: Rng + ?Sized>(
    img: &GrayImage,
    palette_len: usize,
    rng: &mut R,
) -> Vec<usize> {
    img.as_raw()
        .iter()
        .map(|&v| {
            if v <= RANDOM_THRESHOLD || palette_len < 2 {
                0
            } else {
                rng.gen_range(1..palette_len)
            }
        })
        .collect()
}

/// Map pixels to randomly chosen foreground characters
///
/// The non-background part of the palette is shuffled once, then every
/// pixel above the threshold draws a random character from it. Dark pixels
/// keep the background character. Suited to near-binary images.
pub fn map_random<R: Rng + ?Sized>(img: &GrayImage, chars: &[char], rng: &mut R) -> AsciiArt {
    let (width, _) = img.dimensions();

    let mut palette = chars.to_vec();
    if palette.len() > 1 {
        palette[1..].shuffle(rng);
    }

    let indices = random_indices(img, palette.len(), rng);
    let rows: Vec<String> = indices
        .chunks(width.max(1) as usize)
        .map(|row| row.iter().map(|&index| palette[index]).collect())
        .collect();

    AsciiArt::from_rows(rows, width)
}
