use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Indicator;

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
// Color mapping: indicator → Color32
// ---------------------------------------------------------------------------

/// Assigns each indicator a stable, distinct series colour so a series keeps
/// its colour across tabs and filter changes.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<Indicator, Color32>,
    default_color: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        let palette = generate_palette(Indicator::ALL.len());
        let mapping: BTreeMap<Indicator, Color32> = Indicator::ALL
            .iter()
            .zip(palette.into_iter())
            .map(|(&ind, c): (&Indicator, Color32)| (ind, c))
            .collect();

        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl SeriesColors {
    /// Look up the colour for an indicator's series.
    pub fn color_for(&self, indicator: Indicator) -> Color32 {
        self.mapping
            .get(&indicator)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(Indicator::ALL.len());
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn every_indicator_has_a_color() {
        let colors = SeriesColors::default();
        for ind in Indicator::ALL {
            assert_ne!(colors.color_for(ind), Color32::GRAY);
        }
    }
}
