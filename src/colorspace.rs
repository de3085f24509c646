//! Conversions between RGB, HSV, HSL, CIE XYZ, and CIELAB.
//!
//! RGB components are in the range `0.0..=255.0`.
//! Hue is in degrees (`0.0..360.0`), while saturation, value, and lightness are percentages (`0.0..=100.0`).
//! XYZ and Lab are relative to the D65 white point.

use palette::Srgb;

/// The color space in which distances between colors are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Plain sRGB components in `0.0..=255.0`.
    #[default]
    Srgb,
    /// CIELAB, which is closer to perceptually uniform.
    Lab,
}

impl ColorSpace {
    /// Converts an sRGB color to the components used for clustering in this color space.
    #[must_use]
    pub fn components(self, color: Srgb<u8>) -> [f32; 3] {
        let rgb = srgb_components(color);
        match self {
            ColorSpace::Srgb => rgb,
            ColorSpace::Lab => Lab::from_rgb(rgb).into(),
        }
    }
}

/// The D65 reference white used for XYZ and Lab.
pub const D65_WHITE: [f32; 3] = [0.9505, 1.0, 1.089];

/// The linear sRGB to XYZ matrix (D65).
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// The XYZ to linear sRGB matrix (D65).
const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// `(6/29)^3`, the breakpoint of the Lab companding function.
const LAB_EPSILON: f32 = 216.0 / 24389.0;

/// `6/29`, the inverse breakpoint of the Lab companding function.
const LAB_DELTA: f32 = 6.0 / 29.0;

/// Returns the components of an 8-bit sRGB color as `f32`s.
#[must_use]
pub fn srgb_components(color: Srgb<u8>) -> [f32; 3] {
    let Srgb { red, green, blue, .. } = color;
    [red.into(), green.into(), blue.into()]
}

/// Rounds and clamps `0.0..=255.0` components back into an 8-bit sRGB color.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn srgb_from_components(rgb: [f32; 3]) -> Srgb<u8> {
    let [r, g, b] = rgb.map(|c| c.round().clamp(0.0, 255.0) as u8);
    Srgb::new(r, g, b)
}

/// Applies the inverse sRGB transfer function to a component in `0.0..=1.0`.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies the sRGB transfer function to a linear component in `0.0..=1.0`.
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Returns the `(max, min)` of the given components.
fn max_min([r, g, b]: [f32; 3]) -> (f32, f32) {
    (r.max(g).max(b), r.min(g).min(b))
}

/// Computes the hue in degrees shared by HSV and HSL.
///
/// `chroma` must be nonzero.
#[allow(clippy::float_cmp)]
fn hue([r, g, b]: [f32; 3], max: f32, chroma: f32) -> f32 {
    let h = if max == r {
        60.0 * ((g - b) / chroma)
    } else if max == g {
        60.0 * (2.0 + (b - r) / chroma)
    } else {
        60.0 * (4.0 + (r - g) / chroma)
    };

    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// Maps a hue, chroma, and an offset back to RGB (all on the `0.0..=1.0` scale).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hexagon(hue: f32, chroma: f32, m: f32) -> [f32; 3] {
    let hue = if hue >= 360.0 { 0.0 } else { hue.max(0.0) };
    let h = hue / 60.0;
    let sector = h.floor() as u32 % 6;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());

    let [r, g, b] = match sector {
        0 => [chroma, x, 0.0],
        1 => [x, chroma, 0.0],
        2 => [0.0, chroma, x],
        3 => [0.0, x, chroma],
        4 => [x, 0.0, chroma],
        _ => [chroma, 0.0, x],
    };

    [r + m, g + m, b + m]
}

/// A color in the HSV model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue in degrees, `0.0..360.0`.
    pub hue: f32,
    /// Saturation, `0.0..=100.0`.
    pub saturation: f32,
    /// Value, `0.0..=100.0`.
    pub value: f32,
}

impl Hsv {
    /// Converts RGB components (`0.0..=255.0`) to HSV.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        let (max, min) = max_min(rgb);
        let value = max * 100.0 / 255.0;

        if max == min {
            Self { hue: 0.0, saturation: 0.0, value }
        } else {
            let chroma = max - min;
            Self {
                hue: hue(rgb, max, chroma),
                saturation: chroma / max * 100.0,
                value,
            }
        }
    }

    /// Converts HSV back to RGB components (`0.0..=255.0`).
    ///
    /// A hue of `360.0` is treated as `0.0`.
    #[must_use]
    pub fn into_rgb(self) -> [f32; 3] {
        let v = self.value / 100.0;
        let chroma = v * (self.saturation / 100.0);
        hexagon(self.hue, chroma, v - chroma).map(|c| c * 255.0)
    }
}

impl From<Srgb<u8>> for Hsv {
    fn from(color: Srgb<u8>) -> Self {
        Self::from_rgb(srgb_components(color))
    }
}

/// A color in the HSL model.
///
/// Lightness is the midpoint of the largest and smallest RGB components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    /// Hue in degrees, `0.0..360.0`.
    pub hue: f32,
    /// Saturation, `0.0..=100.0`.
    pub saturation: f32,
    /// Lightness, `0.0..=100.0`.
    pub lightness: f32,
}

impl Hsl {
    /// Converts RGB components (`0.0..=255.0`) to HSL.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        let (max, min) = max_min(rgb);
        let max_n = max / 255.0;
        let min_n = min / 255.0;
        let lightness = 0.5 * (max_n + min_n);

        if max == min {
            Self { hue: 0.0, saturation: 0.0, lightness: lightness * 100.0 }
        } else {
            let chroma = max_n - min_n;
            let saturation = chroma / (1.0 - (2.0 * lightness - 1.0).abs());
            Self {
                hue: hue(rgb, max, max - min),
                saturation: saturation.min(1.0) * 100.0,
                lightness: lightness * 100.0,
            }
        }
    }

    /// Converts HSL back to RGB components (`0.0..=255.0`).
    ///
    /// A hue of `360.0` is treated as `0.0`.
    #[must_use]
    pub fn into_rgb(self) -> [f32; 3] {
        let l = self.lightness / 100.0;
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * (self.saturation / 100.0);
        hexagon(self.hue, chroma, l - 0.5 * chroma).map(|c| c * 255.0)
    }
}

impl From<Srgb<u8>> for Hsl {
    fn from(color: Srgb<u8>) -> Self {
        Self::from_rgb(srgb_components(color))
    }
}

/// A color in CIE XYZ (D65, `Y` of white is `1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    /// X tristimulus value.
    pub x: f32,
    /// Y tristimulus value (relative luminance).
    pub y: f32,
    /// Z tristimulus value.
    pub z: f32,
}

impl Xyz {
    /// Converts gamma encoded sRGB components (`0.0..=255.0`) to XYZ.
    #[must_use]
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| srgb_to_linear(c / 255.0));
        let [x, y, z] = RGB_TO_XYZ.map(|[m0, m1, m2]| m0 * r + m1 * g + m2 * b);
        Self { x, y, z }
    }

    /// Converts XYZ back to sRGB components, rounded to whole numbers in `0.0..=255.0`.
    #[must_use]
    pub fn into_rgb(self) -> [f32; 3] {
        let Self { x, y, z } = self;
        XYZ_TO_RGB.map(|[m0, m1, m2]| {
            let linear = (m0 * x + m1 * y + m2 * z).clamp(0.0, 1.0);
            (linear_to_srgb(linear) * 255.0).round()
        })
    }
}

/// The forward Lab companding function.
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        t / (3.0 * LAB_DELTA * LAB_DELTA) + 4.0 / 29.0
    }
}

/// The inverse Lab companding function.
fn lab_f_inv(t: f32) -> f32 {
    if t > LAB_DELTA {
        t * t * t
    } else {
        3.0 * LAB_DELTA * LAB_DELTA * (t - 4.0 / 29.0)
    }
}

/// Returns CIE L* (`0.0..=100.0`) for a relative luminance `Y` in `0.0..=1.0`.
#[must_use]
pub fn lightness_from_luminance(y: f32) -> f32 {
    116.0 * lab_f(y) - 16.0
}

/// A color in CIELAB (D65).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, `0.0..=100.0`.
    pub l: f32,
    /// Green-red axis.
    pub a: f32,
    /// Blue-yellow axis.
    pub b: f32,
}

impl Lab {
    /// Converts XYZ to Lab.
    #[must_use]
    pub fn from_xyz(xyz: Xyz) -> Self {
        let [xn, yn, zn] = D65_WHITE;
        let fx = lab_f(xyz.x / xn);
        let fy = lab_f(xyz.y / yn);
        let fz = lab_f(xyz.z / zn);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Converts Lab back to XYZ.
    #[must_use]
    pub fn into_xyz(self) -> Xyz {
        let [xn, yn, zn] = D65_WHITE;
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        Xyz {
            x: xn * lab_f_inv(fx),
            y: yn * lab_f_inv(fy),
            z: zn * lab_f_inv(fz),
        }
    }

    /// Converts sRGB components (`0.0..=255.0`) to Lab.
    #[must_use]
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        Self::from_xyz(Xyz::from_rgb(rgb))
    }

    /// Converts Lab back to sRGB components, rounded to whole numbers in `0.0..=255.0`.
    #[must_use]
    pub fn into_rgb(self) -> [f32; 3] {
        self.into_xyz().into_rgb()
    }
}

impl From<Srgb<u8>> for Lab {
    fn from(color: Srgb<u8>) -> Self {
        Self::from_rgb(srgb_components(color))
    }
}

impl From<Lab> for [f32; 3] {
    fn from(Lab { l, a, b }: Lab) -> Self {
        [l, a, b]
    }
}

impl From<[f32; 3]> for Lab {
    fn from([l, a, b]: [f32; 3]) -> Self {
        Self { l, a, b }
    }
}
