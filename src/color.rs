use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical field to distinct colours,
/// so a category keeps its colour across every chart.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a field's sorted distinct values.
    pub fn new(values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<String, Color32> = values
            .iter()
            .zip(palette.into_iter())
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Diverging map for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a correlation coefficient in [-1, 1] to a cool/warm colour
/// (blue → white → red). NaN (zero-variance column) renders gray.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::from_gray(110);
    }
    let cool = LinSrgb::new(0.23f32, 0.30, 0.75);
    let white = LinSrgb::new(0.87f32, 0.87, 0.87);
    let warm = LinSrgb::new(0.71f32, 0.02, 0.15);

    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let blended = if t < 0.5 {
        cool.mix(white, t * 2.0)
    } else {
        white.mix(warm, (t - 0.5) * 2.0)
    };
    let srgb: Srgb<f32> = Srgb::from_linear(blended);
    Color32::from_rgb(
        (srgb.red * 255.0) as u8,
        (srgb.green * 255.0) as u8,
        (srgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_assigns_distinct_colors() {
        let values: BTreeSet<String> = ["No", "Yes"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for("Yes"), map.color_for("No"));
        assert_eq!(map.color_for("Maybe"), Color32::GRAY);
    }

    #[test]
    fn correlation_endpoints_diverge() {
        let negative = correlation_color(-1.0);
        let positive = correlation_color(1.0);
        assert!(negative.b() > negative.r());
        assert!(positive.r() > positive.b());
    }
}
