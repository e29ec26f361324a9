use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Rgb – renderer-independent colour
// ---------------------------------------------------------------------------

/// 8-bit sRGB colour, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const GRAY: Rgb = Rgb([160, 160, 160]);

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: identifier → Rgb
// ---------------------------------------------------------------------------

/// Maps identifiers to distinct colours, stable across charts.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<i64, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map over the given identifiers (duplicates ignored).
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut unique: Vec<i64> = ids.into_iter().collect();
        unique.sort_unstable();
        unique.dedup();

        let palette = generate_palette(unique.len());
        let mapping = unique.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for an identifier.
    pub fn color_for(&self, id: i64) -> Rgb {
        self.mapping.get(&id).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_identifier_falls_back_to_gray() {
        let map = ColorMap::new([3, 1, 3]);
        assert_ne!(map.color_for(1), map.color_for(3));
        assert_eq!(map.color_for(99), Rgb::GRAY);
    }

    #[test]
    fn serializes_as_hex() {
        let json = serde_json::to_string(&Rgb([255, 0, 16])).unwrap();
        assert_eq!(json, "\"#ff0010\"");
    }
}
