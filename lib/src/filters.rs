use image::{GrayImage, Luma};
use rayon::prelude::*;

use crate::config::Cutoff;

/// Sharpen kernel, applied with `SHARPEN_DIVISOR`
///
/// ```text
/// [-2 -2 -2]
/// [-2 32 -2]  / 16
/// [-2 -2 -2]
/// ```
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-2, -2, -2], [-2, 32, -2], [-2, -2, -2]];
pub const SHARPEN_DIVISOR: i32 = 16;

/// Apply a 256-entry lookup table to every sample
pub fn apply_lut(img: &mut GrayImage, lut: &[u8; 256]) {
    img.par_iter_mut().for_each(|sample| *sample = lut[*sample as usize]);
}

/// Replace each sample `v` with `255 - v`
pub fn invert(img: &mut GrayImage) {
    img.par_iter_mut().for_each(|sample| *sample = 255 - *sample);
}

/// Count samples per luminance level
pub fn histogram(img: &GrayImage) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &sample in img.as_raw() {
        hist[sample as usize] += 1;
    }
    hist
}

/// Remove `cut` pixels from one end of a histogram
///
/// Walks the levels in `order`, emptying whole bins while the remaining cut
/// exceeds them and partially reducing the bin where it runs out.
fn clip_tail(hist: &mut [u32; 256], mut cut: u64, order: impl Iterator<Item = usize>) {
    for level in order {
        if cut == 0 {
            break;
        }
        let count = u64::from(hist[level]);
        if cut > count {
            cut -= count;
            hist[level] = 0;
        } else {
            hist[level] = (count - cut) as u32;
            cut = 0;
        }
    }
}

/// Build the contrast stretching lookup table for a histogram
///
/// # Arguments
/// * `hist` - Luminance histogram of the image
/// * `cutoff` - How many pixels to ignore at each end
///
/// # Returns
/// Identity when the clipped histogram spans a single level, otherwise a
/// linear map of `[lo, hi]` onto `[0, 255]`
pub fn autocontrast_lut(hist: &[u32; 256], cutoff: Cutoff) -> [u8; 256] {
    let mut clipped = *hist;
    let total: u64 = hist.iter().map(|&count| u64::from(count)).sum();

    let (cut_low, cut_high) = match cutoff {
        Cutoff::Percent(percent) => {
            let cut = (total as f64 * percent / 100.0).floor().max(0.0) as u64;
            (cut, cut)
        }
        Cutoff::Counts { low, high } => (u64::from(low), u64::from(high)),
    };

    clip_tail(&mut clipped, cut_low, 0..256);
    clip_tail(&mut clipped, cut_high, (0..256).rev());

    let lo = clipped.iter().position(|&count| count > 0);
    let hi = clipped.iter().rposition(|&count| count > 0);

    let mut lut = [0u8; 256];
    match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => {
            let scale = 255.0 / (hi - lo) as f64;
            let offset = -(lo as f64) * scale;
            for (level, slot) in lut.iter_mut().enumerate() {
                let mapped = (level as f64 * scale + offset).trunc();
                *slot = mapped.clamp(0.0, 255.0) as u8;
            }
        }
        _ => {
            for (level, slot) in lut.iter_mut().enumerate() {
                *slot = level as u8;
            }
        }
    }
    lut
}

/// Stretch the histogram to the full [0, 255] range
pub fn autocontrast(img: &mut GrayImage, cutoff: Cutoff) {
    let lut = autocontrast_lut(&histogram(img), cutoff);
    apply_lut(img, &lut);
}

/// A run of luminance levels grouped during quantization
#[derive(Debug, Clone, Copy)]
struct LevelBox {
    lo: usize,
    hi: usize,
}

impl LevelBox {
    fn population(&self, hist: &[u32; 256]) -> u64 {
        hist[self.lo..=self.hi].iter().map(|&c| u64::from(c)).sum()
    }

    fn occupied_levels(&self, hist: &[u32; 256]) -> usize {
        hist[self.lo..=self.hi].iter().filter(|&&c| c > 0).count()
    }

    /// Split at the population median so that both halves stay non-empty
    fn split(&self, hist: &[u32; 256]) -> (LevelBox, LevelBox) {
        let half = self.population(hist).div_ceil(2);
        let last_occupied = (self.lo..=self.hi)
            .rev()
            .find(|&level| hist[level] > 0)
            .unwrap_or(self.hi);

        let mut running = 0u64;
        let mut cut = self.lo;
        for level in self.lo..=self.hi {
            running += u64::from(hist[level]);
            cut = level;
            if running >= half {
                break;
            }
        }
        // The upper half must keep at least one occupied level
        if cut >= last_occupied {
            cut = (self.lo..last_occupied)
                .rev()
                .find(|&level| hist[level] > 0)
                .unwrap_or(self.lo);
        }
        (
            LevelBox { lo: self.lo, hi: cut },
            LevelBox {
                lo: cut + 1,
                hi: self.hi,
            },
        )
    }

    fn mean(&self, hist: &[u32; 256]) -> u8 {
        let population = self.population(hist);
        if population == 0 {
            return ((self.lo + self.hi) / 2) as u8;
        }
        let weighted: u64 = (self.lo..=self.hi)
            .map(|level| level as u64 * u64::from(hist[level]))
            .sum();
        (weighted as f64 / population as f64).round_ties_even() as u8
    }
}

/// Build a lookup table reducing the image to at most `colors` levels
///
/// 1-D median cut: the most populated box with more than one occupied level
/// is split at its median until `colors` boxes exist. Every level maps to the
/// population-weighted mean of its box.
pub fn quantize_lut(hist: &[u32; 256], colors: u32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (level, slot) in lut.iter_mut().enumerate() {
        *slot = level as u8;
    }

    let colors = colors.max(1) as usize;
    let first = hist.iter().position(|&c| c > 0);
    let last = hist.iter().rposition(|&c| c > 0);
    let (Some(first), Some(last)) = (first, last) else {
        return lut;
    };

    let mut boxes = vec![LevelBox {
        lo: first,
        hi: last,
    }];
    if boxes[0].occupied_levels(hist) <= colors {
        return lut;
    }

    while boxes.len() < colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.occupied_levels(hist) > 1)
            .max_by_key(|(_, b)| b.population(hist))
            .map(|(index, _)| index);
        let Some(index) = candidate else { break };

        let (left, right) = boxes[index].split(hist);
        boxes[index] = left;
        boxes.insert(index + 1, right);
    }

    for level_box in &boxes {
        let value = level_box.mean(hist);
        for slot in &mut lut[level_box.lo..=level_box.hi] {
            *slot = value;
        }
    }
    lut
}

/// Reduce the image to at most `colors` distinct luminance levels
pub fn quantize(img: &mut GrayImage, colors: u32) {
    let lut = quantize_lut(&histogram(img), colors);
    apply_lut(img, &lut);
}

/// Apply the sharpen kernel once
///
/// Border pixels are copied unchanged.
pub fn sharpen_once(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = img.clone();
    if width < 3 || height < 3 {
        return output;
    }

    for y in 1..(height - 1) {
        for x in 1..(width - 1) {
            let mut sum = 0i32;
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let sample = img.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1)[0];
                    sum += weight * i32::from(sample);
                }
            }
            let value = (f64::from(sum) / f64::from(SHARPEN_DIVISOR)).round();
            output.put_pixel(x, y, Luma([value.clamp(0.0, 255.0) as u8]));
        }
    }

    output
}

/// Apply the sharpen kernel `passes` times
pub fn sharpen(img: GrayImage, passes: u32) -> GrayImage {
    (0..passes).fold(img, |current, _| sharpen_once(&current))
}
