use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

pub const STUDENT: Color32 = Color32::from_rgb(67, 130, 246);
pub const COHORT: Color32 = Color32::from_rgb(255, 99, 132);
pub const GPA: Color32 = Color32::from_rgb(139, 92, 246);
pub const TREND: Color32 = Color32::from_rgb(75, 192, 192);
pub const REFERENCE: Color32 = Color32::from_rgb(22, 163, 74);
pub const MARKER: Color32 = Color32::from_rgb(220, 38, 38);

pub const HELP_NEEDED_BG: Color32 = Color32::from_rgb(254, 226, 226);
pub const HELP_NEEDED_FG: Color32 = Color32::from_rgb(220, 38, 38);
pub const NO_HELP_BG: Color32 = Color32::from_rgb(220, 252, 231);
pub const NO_HELP_FG: Color32 = Color32::from_rgb(22, 163, 74);
pub const AWARD_BG: Color32 = Color32::from_rgb(255, 237, 74);

/// Translucent fill for a polygon drawn in `base`.
pub fn fill(base: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), 60)
}

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
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column (e.g. psychological level)
/// to distinct colours, so the same level always reads the same.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = labels.into_iter().collect();
        unique.sort_unstable();
        unique.dedup();
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Colour for a label; unknown labels are gray.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}
