use serde::Serialize;

/// A color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgb {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl Rgb {
    /// The color with 8 bit channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b)]
    }
}

/// Convert a hue, saturation, value triple to RGB.
///
/// All inputs are in `[0, 1]`. A saturation of zero or below gives a gray of
/// intensity `v`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let (mut r, mut g, mut b) = (v, v, v);
    if s <= 0.0 {
        return Rgb { r, g, b };
    }

    let h = h * 6.0;
    let i = h.floor();
    let f = h - i;

    if i < 1.0 {
        g *= 1.0 - s * (1.0 - f);
        b *= 1.0 - s;
    } else if i < 2.0 {
        r *= 1.0 - s * f;
        b *= 1.0 - s;
    } else if i < 3.0 {
        r *= 1.0 - s;
        b *= 1.0 - s * (1.0 - f);
    } else if i < 4.0 {
        r *= 1.0 - s;
        g *= 1.0 - s * f;
    } else if i < 5.0 {
        r *= 1.0 - s * (1.0 - f);
        g *= 1.0 - s;
    } else if i < 6.0 {
        g *= 1.0 - s;
        b *= 1.0 - s * f;
    }

    Rgb { r, g, b }
}

/// The stroke color of a person.
///
/// Hues step by `0.111` per id so neighbouring ids get distinct colors.
pub fn person_color(person: i64) -> Rgb {
    let h = person as f64 * 0.111;
    hsv_to_rgb(h - h.floor(), 0.5, 1.0)
}
