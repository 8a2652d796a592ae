use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            to_color32(hsl.into_color())
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Maps category labels (e.g. emission sources) to distinct colours, so a
/// source keeps its colour across every chart.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        ColorMap {
            mapping: labels
                .into_iter()
                .map(str::to_string)
                .zip(palette)
                .collect(),
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Sequential yellow → orange → red scale for the map
// ---------------------------------------------------------------------------

const SCALE_STOPS: [(u8, u8, u8); 3] = [(255, 255, 204), (253, 141, 60), (189, 0, 38)];

/// Colour for `value` on a 0..=`max` scale. Values outside are clamped;
/// without a usable maximum everything gets the low end.
pub fn intensity_color(value: f64, max: Option<f64>) -> Color32 {
    let t = match max {
        Some(max) if max > 0.0 => (value / max).clamp(0.0, 1.0) as f32,
        _ => 0.0,
    };

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let scaled = t * (SCALE_STOPS.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(SCALE_STOPS.len() - 2);
    let mixed = stop(SCALE_STOPS[lower]).mix(stop(SCALE_STOPS[lower + 1]), scaled - lower as f32);

    to_color32(Srgb::from_linear(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(4).len(), 4);
    }

    #[test]
    fn color_map_is_stable_per_label() {
        let map = ColorMap::new(["Agriculture", "Energy", "Waste"]);
        assert_eq!(map.color_for("Energy"), map.color_for("Energy"));
        assert_ne!(map.color_for("Energy"), map.color_for("Waste"));
        assert_eq!(map.color_for("Unknown"), Color32::GRAY);
    }

    #[test]
    fn intensity_scale_ends() {
        assert_eq!(intensity_color(0.0, Some(100.0)), Color32::from_rgb(255, 255, 204));
        assert_eq!(intensity_color(250.0, Some(100.0)), intensity_color(100.0, Some(100.0)));
        assert_eq!(intensity_color(5.0, None), intensity_color(0.0, Some(1.0)));
        let mid = intensity_color(50.0, Some(100.0));
        assert!(mid.r() > 240 && mid.g() < 160);
    }
}
