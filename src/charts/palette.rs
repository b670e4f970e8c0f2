//! Sequential color schemes for the department map.

use egui::Color32;

/// Fill for departments without any record.
pub const NO_DATA_COLOR: Color32 = Color32::from_rgb(210, 210, 210);

/// Bar color of the ranking chart.
pub const BAR_COLOR: Color32 = Color32::from_rgb(70, 130, 180); // Steel blue

pub const GIRLS_COLOR: Color32 = Color32::from_rgb(255, 182, 193); // Pink
pub const BOYS_COLOR: Color32 = Color32::from_rgb(173, 216, 230); // Light blue

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Blues,
    Greens,
    Reds,
    Purples,
    Oranges,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Blues,
        ColorScheme::Greens,
        ColorScheme::Reds,
        ColorScheme::Purples,
        ColorScheme::Oranges,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ColorScheme::Blues => "blues",
            ColorScheme::Greens => "greens",
            ColorScheme::Reds => "reds",
            ColorScheme::Purples => "purples",
            ColorScheme::Oranges => "oranges",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.id().eq_ignore_ascii_case(id))
    }

    /// Light, middle and dark stops of the ramp.
    fn stops(self) -> [Color32; 3] {
        match self {
            ColorScheme::Blues => [
                Color32::from_rgb(222, 235, 247),
                Color32::from_rgb(107, 174, 214),
                Color32::from_rgb(8, 48, 107),
            ],
            ColorScheme::Greens => [
                Color32::from_rgb(229, 245, 224),
                Color32::from_rgb(116, 196, 118),
                Color32::from_rgb(0, 68, 27),
            ],
            ColorScheme::Reds => [
                Color32::from_rgb(254, 224, 210),
                Color32::from_rgb(251, 106, 74),
                Color32::from_rgb(103, 0, 13),
            ],
            ColorScheme::Purples => [
                Color32::from_rgb(239, 237, 245),
                Color32::from_rgb(158, 154, 200),
                Color32::from_rgb(63, 0, 125),
            ],
            ColorScheme::Oranges => [
                Color32::from_rgb(254, 230, 206),
                Color32::from_rgb(253, 141, 60),
                Color32::from_rgb(127, 39, 4),
            ],
        }
    }

    /// Color at position `t` of the ramp, `t` clamped to [0, 1].
    pub fn color_at(self, t: f64) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let [light, mid, dark] = self.stops();
        if t <= 0.5 {
            lerp(light, mid, t * 2.0)
        } else {
            lerp(mid, dark, (t - 0.5) * 2.0)
        }
    }

    /// Color for `value` on a linear scale from 0 to `max`.
    pub fn color_for(self, value: i64, max: i64) -> Color32 {
        if max <= 0 {
            return self.color_at(0.0);
        }
        self.color_at(value as f64 / max as f64)
    }
}

fn lerp(a: Color32, b: Color32, t: f64) -> Color32 {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_ids() {
        for scheme in ColorScheme::ALL {
            assert_eq!(ColorScheme::parse(scheme.id()), Some(scheme));
        }
        assert_eq!(ColorScheme::parse("GREENS"), Some(ColorScheme::Greens));
        assert_eq!(ColorScheme::parse("viridis"), None);
    }

    #[test]
    fn test_ramp_endpoints() {
        let [light, mid, dark] = ColorScheme::Reds.stops();
        assert_eq!(ColorScheme::Reds.color_at(0.0), light);
        assert_eq!(ColorScheme::Reds.color_at(0.5), mid);
        assert_eq!(ColorScheme::Reds.color_at(1.0), dark);
        assert_eq!(ColorScheme::Reds.color_at(7.0), dark);
        assert_eq!(ColorScheme::Reds.color_at(f64::NAN), light);
    }

    #[test]
    fn test_color_for_zero_max() {
        assert_eq!(
            ColorScheme::Blues.color_for(0, 0),
            ColorScheme::Blues.color_at(0.0)
        );
    }

    #[test]
    fn test_darker_for_larger_values() {
        let low = ColorScheme::Blues.color_for(10, 100);
        let high = ColorScheme::Blues.color_for(90, 100);
        let brightness = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(brightness(high) < brightness(low));
    }
}
