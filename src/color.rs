use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Heat gradient
// ---------------------------------------------------------------------------

/// Number of colour bins used when batching heat points for the plot.
pub const HEAT_BINS: usize = 8;

/// Colour for a normalised intensity `t` in `[0, 1]`: hue slides from
/// yellow (cool end) to red (hot end).
pub fn heat_color(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let hsl = Hsl::new(60.0 * (1.0 - t), 0.9, 0.5);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// HeatScale: intensity → colour / bin
// ---------------------------------------------------------------------------

/// Maps raw brightness values onto the heat gradient. Built once per loaded
/// dataset from the observed intensity range.
#[derive(Debug, Clone)]
pub struct HeatScale {
    min: f64,
    max: f64,
}

impl HeatScale {
    /// Build a scale spanning the observed intensities. A constant or empty
    /// input collapses to a scale that maps everything mid-gradient.
    pub fn from_intensities<I: IntoIterator<Item = f64>>(intensities: I) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in intensities {
            min = min.min(v);
            max = max.max(v);
        }
        if !min.is_finite() || !max.is_finite() || max <= min {
            return HeatScale { min: 0.0, max: 0.0 };
        }
        HeatScale { min, max }
    }

    fn normalize(&self, intensity: f64) -> f64 {
        if self.max <= self.min {
            return 0.5;
        }
        ((intensity - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Gradient bin for an intensity, `0..HEAT_BINS`.
    pub fn bin(&self, intensity: f64) -> usize {
        ((self.normalize(intensity) * HEAT_BINS as f64) as usize).min(HEAT_BINS - 1)
    }

    /// Representative colour of a bin (its midpoint on the gradient).
    pub fn bin_color(&self, bin: usize) -> Color32 {
        heat_color((bin as f64 + 0.5) / HEAT_BINS as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_ends_differ() {
        assert_ne!(heat_color(0.0), heat_color(1.0));
    }

    #[test]
    fn bins_are_monotone_in_intensity() {
        let scale = HeatScale::from_intensities([250.0, 300.0, 350.0]);
        let mut last = 0;
        for i in 0..=20 {
            let bin = scale.bin(250.0 + 5.0 * f64::from(i));
            assert!(bin >= last);
            last = bin;
        }
        assert_eq!(scale.bin(250.0), 0);
        assert_eq!(scale.bin(350.0), HEAT_BINS - 1);
    }

    #[test]
    fn constant_intensity_maps_mid_gradient() {
        let scale = HeatScale::from_intensities([300.0, 300.0]);
        assert_eq!(scale.bin(300.0), HEAT_BINS / 2);
    }

    #[test]
    fn empty_input_does_not_panic() {
        let scale = HeatScale::from_intensities(std::iter::empty());
        assert!(scale.bin(42.0) < HEAT_BINS);
    }
}
