use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting from `base_hue` (degrees). The noir profile's colour picker
/// re-seeds the base hue; the classic profile always uses 0.
pub fn generate_palette(n: usize, base_hue: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = base_hue + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue % 360.0, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// The swatch colour shown for a given base hue in the picker widget.
pub fn hue_color(hue: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue % 360.0, 0.75, 0.55).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Recover the hue (degrees) of a picked colour, for re-seeding the palette.
pub fn hue_of(color: Color32) -> f32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let hsl: Hsl = rgb.into_color();
    hsl.hue.into_positive_degrees()
}

// ---------------------------------------------------------------------------
// Color mapping: genus → Color32
// ---------------------------------------------------------------------------

/// Maps every genus in the dataset to a distinct colour, shared by the
/// on-screen chart, the filter checkboxes, and the PNG export.
#[derive(Debug, Clone)]
pub struct GenusColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl GenusColors {
    /// Build a colour map over the dataset's distinct genus values.
    pub fn new(genera: &BTreeSet<String>, base_hue: f32) -> Self {
        let palette = generate_palette(genera.len(), base_hue);
        let mapping: BTreeMap<String, Color32> = genera
            .iter()
            .zip(palette.into_iter())
            .map(|(g, c)| (g.clone(), c))
            .collect();

        GenusColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a genus.
    pub fn color_for(&self, genus: &str) -> Color32 {
        self.mapping
            .get(genus)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        let palette = generate_palette(8, 0.0);
        assert_eq!(palette.len(), 8);
        let distinct: std::collections::BTreeSet<_> =
            palette.iter().map(|c| (c.r(), c.g(), c.b())).collect();
        assert_eq!(distinct.len(), 8);
    }

    #[test]
    fn empty_palette_for_zero_values() {
        assert!(generate_palette(0, 0.0).is_empty());
    }

    #[test]
    fn unknown_genus_falls_back_to_default() {
        let genera: BTreeSet<String> = ["ACER".to_string()].into_iter().collect();
        let colors = GenusColors::new(&genera, 0.0);
        assert_eq!(colors.color_for("SALIX"), Color32::GRAY);
        assert_ne!(colors.color_for("ACER"), Color32::GRAY);
    }
}
