//! Palette struct with nearest-color matching.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Rgb;

/// An ordered, non-empty set of allowed output colors.
///
/// Every pixel the ditherer emits is one of these colors. Order matters:
/// when two entries are equidistant from an input pixel, the one with the
/// lower index wins, so the same palette written in a different order can
/// produce a different (but still deterministic) image.
///
/// Validation happens entirely at construction time. A `Palette` value is
/// guaranteed non-empty and duplicate-free, which lets the per-pixel
/// matching loop skip all checks.
///
/// # Example
///
/// ```
/// use palette_dither::{Palette, Rgb};
///
/// let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.nearest(30, 30, 30), Rgb::new(0, 0, 0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from a slice of colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] for an empty slice and
    /// [`PaletteError::DuplicateColor`] if the same color appears twice
    /// (a duplicate entry could never be selected and indicates a caller
    /// bug).
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut seen = HashSet::new();
        for (index, color) in colors.iter().enumerate() {
            if !seen.insert(color.to_bytes()) {
                return Err(PaletteError::DuplicateColor { index });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette from hex color strings.
    ///
    /// Accepts the formats of [`Rgb::from_str`]: `#RRGGBB`, `RRGGBB`,
    /// `#RGB`, `RGB`.
    ///
    /// # Example
    ///
    /// ```
    /// use palette_dither::Palette;
    ///
    /// let palette = Palette::from_hex(&["#0f380f", "#306230", "#8bac0f", "#9bbc0f"]).unwrap();
    /// assert_eq!(palette.len(), 4);
    /// ```
    pub fn from_hex<S: AsRef<str>>(specs: &[S]) -> Result<Self, PaletteError> {
        let colors: Vec<Rgb> = specs
            .iter()
            .map(|s| Rgb::from_str(s.as_ref()).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(&colors)
    }

    /// Create a palette from a comma-separated list of hex colors.
    ///
    /// Convenience for CLI flags and form fields, e.g.
    /// `"#000000, #FFFFFF, #FF0000"`. Empty segments are rejected as
    /// malformed colors.
    pub fn parse_list(spec: &str) -> Result<Self, PaletteError> {
        let specs: Vec<&str> = spec.split(',').map(str::trim).collect();
        Palette::from_hex(&specs)
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the palette is empty.
    ///
    /// Note: this always returns `false` since empty palettes are rejected
    /// at construction time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the color at the given index.
    #[inline]
    pub fn get(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    /// All colors, in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Returns true if the exact color is a palette entry.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Find the palette entry closest to the given channel values.
    ///
    /// Distance is squared Euclidean over the three channels. The strict
    /// `<` comparison means the FIRST entry achieving the minimum distance
    /// wins, keeping tie-breaks stable and deterministic in palette order.
    ///
    /// Linear scan, no allocation. Called once per pixel, so this loop
    /// dominates the runtime of a dithering pass.
    #[inline]
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> Rgb {
        let pixel = Rgb::new(r, g, b);
        let mut best = self.colors[0];
        let mut best_dist = u32::MAX;

        for &candidate in &self.colors {
            let dist = pixel.distance_squared(candidate);
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_basic_construction() {
        let colors = [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), Rgb::new(255, 0, 0)];
        let palette = Palette::new(&colors).unwrap();
        assert_eq!(palette.len(), 3);
        assert!(!palette.is_empty());
        assert_eq!(palette.get(2), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_palette_empty_error() {
        let result = Palette::new(&[]);
        assert!(matches!(result, Err(PaletteError::EmptyPalette)));
    }

    #[test]
    fn test_palette_duplicate_error() {
        let colors = [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(255, 0, 0), // Duplicate
        ];
        let result = Palette::new(&colors);
        assert!(matches!(
            result,
            Err(PaletteError::DuplicateColor { index: 2 })
        ));
    }

    #[test]
    fn test_from_hex() {
        let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Rgb::new(0, 0, 0));
        assert_eq!(palette.get(1), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_from_hex_shorthand_and_bare() {
        let palette = Palette::from_hex(&["000", "#FFF", "F00"]).unwrap();
        assert_eq!(palette.get(0), Rgb::new(0, 0, 0));
        assert_eq!(palette.get(1), Rgb::new(255, 255, 255));
        assert_eq!(palette.get(2), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_from_hex_invalid() {
        let result = Palette::from_hex(&["#ZZZZZZ"]);
        assert!(matches!(result, Err(PaletteError::ParseColor(_))));
    }

    #[test]
    fn test_parse_list() {
        let palette = Palette::parse_list("#000000, #FFFFFF ,#FF0000").unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(2), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_parse_list_trailing_comma_rejected() {
        let result = Palette::parse_list("#000000,");
        assert!(matches!(result, Err(PaletteError::ParseColor(_))));
    }

    #[test]
    fn test_nearest_exact_match() {
        let palette = Palette::from_hex(&["#000000", "#FFFFFF", "#FF0000"]).unwrap();
        assert_eq!(palette.nearest(255, 0, 0), Rgb::new(255, 0, 0));
        assert_eq!(palette.nearest(0, 0, 0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_nearest_closest_wins() {
        let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
        assert_eq!(palette.nearest(60, 60, 60), Rgb::new(0, 0, 0));
        assert_eq!(palette.nearest(200, 200, 200), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_nearest_tie_break_first_entry() {
        // (127,127,127) is not exactly equidistant (127² vs 128² per
        // channel), so use a genuinely equidistant pair instead: 100 is
        // 50 away from both 50 and 150.
        let palette = Palette::new(&[Rgb::new(150, 150, 150), Rgb::new(50, 50, 50)]).unwrap();
        assert_eq!(
            palette.nearest(100, 100, 100),
            Rgb::new(150, 150, 150),
            "first palette entry should win ties"
        );

        // Same pair in the opposite order flips the winner.
        let palette = Palette::new(&[Rgb::new(50, 50, 50), Rgb::new(150, 150, 150)]).unwrap();
        assert_eq!(palette.nearest(100, 100, 100), Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_nearest_single_entry() {
        let palette = Palette::from_hex(&["#8bac0f"]).unwrap();
        assert_eq!(palette.nearest(0, 0, 0), Rgb::new(0x8B, 0xAC, 0x0F));
        assert_eq!(palette.nearest(255, 255, 255), Rgb::new(0x8B, 0xAC, 0x0F));
    }

    #[test]
    fn test_contains() {
        let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
        assert!(palette.contains(Rgb::new(0, 0, 0)));
        assert!(!palette.contains(Rgb::new(1, 1, 1)));
    }
}
