//! Named palette presets.
//!
//! A fixed registry of retro-flavored palettes, looked up by the string key
//! that upload requests and CLI flags use. The registry is process-wide
//! static data: built once on first access, never mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::palette::Palette;

/// Preset keys and their hex colors, in registry order.
///
/// Most presets are four tones of one hue (solid plus monochrome ramps);
/// the rest are stylistic combinations. `gameBoy` is the DMG-01 LCD green
/// ramp.
const PRESET_TABLE: &[(&str, &[&str])] = &[
    ("red", &["#FF0000", "#800000", "#400000", "#200000"]),
    ("redMonochrome", &["#FF0000", "#BF0000", "#800000", "#400000"]),
    ("greenMonochrome", &["#00FF00", "#00BF00", "#008000", "#004000"]),
    ("green", &["#00FF00", "#008000", "#004000", "#002000"]),
    ("blueMonochrome", &["#0000FF", "#0000BF", "#000080", "#000040"]),
    ("blue", &["#0000FF", "#000080", "#000040", "#000020"]),
    ("yellowMonochrome", &["#FFFF00", "#BFBF00", "#808000", "#404000"]),
    ("yellow", &["#FFFF00", "#808000", "#404000", "#202000"]),
    ("purpleGreen", &["#800080", "#008000", "#400040", "#004000"]),
    ("yellowRed", &["#FFFF00", "#FF0000", "#808000", "#800000"]),
    ("blueYellow", &["#0000FF", "#FFFF00", "#000080", "#808000"]),
    ("blackWhite", &["#FFFFFF", "#AAAAAA", "#555555", "#000000"]),
    ("rgby", &["#FF0000", "#00FF00", "#0000FF", "#FFFF00"]),
    ("cmyk", &["#00FFFF", "#FF00FF", "#FFFF00", "#000000"]),
    ("gameBoy", &["#0f380f", "#306230", "#8bac0f", "#9bbc0f"]),
    ("blackWhiteRed", &["#FFFFFF", "#000000", "#FF0000"]),
];

static REGISTRY: LazyLock<HashMap<&'static str, Palette>> = LazyLock::new(|| {
    PRESET_TABLE
        .iter()
        .map(|&(name, specs)| {
            let palette = Palette::from_hex(specs)
                .expect("preset table entries are valid, distinct hex colors");
            (name, palette)
        })
        .collect()
});

/// Look up a preset palette by name.
///
/// Names are case-sensitive and match the table keys exactly.
///
/// # Example
///
/// ```
/// use palette_dither::presets;
///
/// let gb = presets::preset("gameBoy").unwrap();
/// assert_eq!(gb.len(), 4);
/// assert!(presets::preset("noSuchPreset").is_none());
/// ```
pub fn preset(name: &str) -> Option<&'static Palette> {
    REGISTRY.get(name)
}

/// All preset names, in registry order.
pub fn preset_names() -> Vec<&'static str> {
    PRESET_TABLE.iter().map(|&(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_all_presets_resolve() {
        for name in preset_names() {
            let palette = preset(name).unwrap_or_else(|| panic!("preset {name} missing"));
            assert!(!palette.is_empty(), "preset {name} is empty");
        }
    }

    #[test]
    fn test_registry_size() {
        assert_eq!(preset_names().len(), 16);
        assert_eq!(REGISTRY.len(), 16);
    }

    #[test]
    fn test_game_boy_colors() {
        let gb = preset("gameBoy").unwrap();
        assert_eq!(gb.len(), 4);
        assert_eq!(gb.get(0), Rgb::new(0x0F, 0x38, 0x0F));
        assert_eq!(gb.get(3), Rgb::new(0x9B, 0xBC, 0x0F));
    }

    #[test]
    fn test_black_white_red_is_three_colors() {
        let bwr = preset("blackWhiteRed").unwrap();
        assert_eq!(bwr.len(), 3);
        assert_eq!(bwr.get(2), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(preset("sepia").is_none());
        // Case-sensitive: the table key is "gameBoy"
        assert!(preset("gameboy").is_none());
    }
}
