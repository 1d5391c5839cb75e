//! Character palettes and the brightness to palette index lookup
//!
//! Palettes are ordered brightness-ascending: index 0 is the darkest
//! (background) character, the last index the brightest.

use std::collections::HashSet;

/// Default palette
pub const DEFAULT_CHARS: &str = " `~!sTomN@";

/// Palette used by the alternative font bundle
pub const ALT_CHARS: &str = " `~!1f2d@";

/// Pixels at or below this value always map to the background character
/// in randomized mode
pub const RANDOM_THRESHOLD: u8 = 10;

/// Map a luminance sample to a palette index
///
/// `round(value / 255 * (palette_len - 1))`, rounding half to even.
///
/// # Arguments
/// * `value` - Luminance sample in [0, 255]
/// * `palette_len` - Number of characters in the palette (>= 1)
///
/// # Returns
/// An index in `0..palette_len`
pub fn fill_index(value: u8, palette_len: usize) -> usize {
    let top = palette_len.saturating_sub(1);
    let scaled = (f64::from(value) / 255.0 * top as f64).round_ties_even();
    (scaled as usize).min(top)
}

/// Precompute `fill_index` for every possible sample value
pub fn build_index_lut(palette_len: usize) -> [usize; 256] {
    let mut lut = [0usize; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        *slot = fill_index(value as u8, palette_len);
    }
    lut
}

/// Number of distinct characters in a palette
pub fn distinct_chars(chars: &[char]) -> usize {
    chars.iter().collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_index_boundaries() {
        for len in 2..=16 {
            assert_eq!(fill_index(0, len), 0);
            assert_eq!(fill_index(255, len), len - 1);
        }
    }

    #[test]
    fn test_fill_index_monotonic() {
        let len = DEFAULT_CHARS.chars().count();
        let mut previous = 0;
        for value in 0..=255u8 {
            let index = fill_index(value, len);
            assert!(index >= previous, "index dropped at {value}");
            previous = index;
        }
    }

    #[test]
    fn test_fill_index_mid_gray() {
        // 128 / 255 * 1 = 0.502 -> 1
        assert_eq!(fill_index(128, 2), 1);
        // 127 / 255 * 1 = 0.498 -> 0
        assert_eq!(fill_index(127, 2), 0);
    }

    #[test]
    fn test_lut_matches_fill_index() {
        let lut = build_index_lut(10);
        for value in 0..=255u8 {
            assert_eq!(lut[value as usize], fill_index(value, 10));
        }
    }

    #[test]
    fn test_distinct_chars() {
        assert_eq!(distinct_chars(&[]), 0);
        assert_eq!(distinct_chars(&['a', 'a', 'a']), 1);
        assert_eq!(distinct_chars(&['a', 'b', 'a', 'c', 'b']), 3);
        assert_eq!(distinct_chars(&DEFAULT_CHARS.chars().collect::<Vec<_>>()), 10);
        assert_eq!(distinct_chars(&ALT_CHARS.chars().collect::<Vec<_>>()), 9);
    }
}
