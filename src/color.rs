use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Layer;

/// Hue (degrees) of the slowest layer in the ramp.
const SLOW_HUE: f32 = 30.0;
/// Hue (degrees) of the fastest layer.
const FAST_HUE: f32 = 220.0;

/// Alpha applied to layer bands so the grid stays visible underneath.
pub const BAND_ALPHA: u8 = 70;

// ---------------------------------------------------------------------------
// Velocity ramp
// ---------------------------------------------------------------------------

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Colour for `velocity` on a warm (soft soil) → cool (rock) ramp spanning
/// `[min, max]`.
pub fn velocity_color(velocity: f64, min: f64, max: f64) -> Color32 {
    let t = if max > min {
        ((velocity - min) / (max - min)).clamp(0.0, 1.0) as f32
    } else {
        0.5
    };
    let hue = SLOW_HUE + t * (FAST_HUE - SLOW_HUE);
    hsl_to_color32(Hsl::new(hue, 0.65, 0.55))
}

/// One translucent band colour per layer, keyed on the stack's velocity range.
pub fn layer_band_colors(layers: &[Layer]) -> Vec<Color32> {
    let min = layers.iter().map(|l| l.velocity).fold(f64::INFINITY, f64::min);
    let max = layers.iter().map(|l| l.velocity).fold(f64::NEG_INFINITY, f64::max);
    layers
        .iter()
        .map(|l| {
            let c = velocity_color(l.velocity, min, max);
            Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), BAND_ALPHA)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LayerStack;

    #[test]
    fn ramp_runs_warm_to_cool() {
        let slow = velocity_color(100.0, 100.0, 1000.0);
        let fast = velocity_color(1000.0, 100.0, 1000.0);
        assert!(slow.r() > slow.b());
        assert!(fast.b() > fast.r());
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(velocity_color(-5.0, 0.0, 10.0), velocity_color(0.0, 0.0, 10.0));
        assert_eq!(velocity_color(50.0, 0.0, 10.0), velocity_color(10.0, 0.0, 10.0));
    }

    #[test]
    fn equal_velocities_share_a_colour() {
        let layers = [Layer::new(0.0, 5.0, 300.0, 2.0), Layer::new(5.0, 9.0, 300.0, 2.0)];
        let colors = layer_band_colors(&layers);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0], colors[1]);
    }

    #[test]
    fn bands_are_translucent() {
        let stack = LayerStack::default_model();
        let colors = layer_band_colors(stack.layers());
        assert_eq!(colors.len(), 3);
        assert!(colors.iter().all(|c| c.a() == BAND_ALPHA));
    }
}
