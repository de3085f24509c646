//! Predicates that classify a color as perceptually dark.
//!
//! Three families are provided:
//! - [`is_dark_value`]: the HSV value midpoint, used for the k-means theme color.
//! - [`is_dark_luminance`]: CIE L* from gamma decoded relative luminance, used by the octree generator.
//! - [`is_dark_hsv`]: a value floor combined with a saturation dependent threshold
//!   shaped by a display [`TransferFunction`].

use crate::colorspace::{lightness_from_luminance, srgb_components, srgb_to_linear, Hsv};
use palette::Srgb;

/// The HSV value (`0.0..=100.0`) that splits the dark half from the light half.
pub const VALUE_MIDPOINT: f32 = 50.0;

/// Colors with an L* at or below this are dark.
pub const LIGHTNESS_THRESHOLD: f32 = 55.0;

/// Colors with an HSV value below this are always dark for [`is_dark_hsv`].
pub const VALUE_FLOOR: f32 = 65.0;

/// How far the threshold of [`is_dark_hsv`] rises above [`VALUE_FLOOR`] for fully saturated colors.
const SATURATION_RISE: f32 = 0.30;

/// Returns whether a color is dark by its HSV value alone (value `<=` [`VALUE_MIDPOINT`]).
#[must_use]
pub fn is_dark_value(hsv: Hsv) -> bool {
    hsv.value <= VALUE_MIDPOINT
}

/// Returns whether a color belongs to the dark half of a histogram (value `<` [`VALUE_MIDPOINT`]).
#[must_use]
pub fn in_dark_half(hsv: Hsv) -> bool {
    hsv.value < VALUE_MIDPOINT
}

/// Returns the relative luminance (`0.0..=1.0`) of an 8-bit sRGB color.
#[must_use]
pub fn relative_luminance(color: Srgb<u8>) -> f32 {
    let [r, g, b] = srgb_components(color).map(|c| srgb_to_linear(c / 255.0));
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Returns whether the CIE lightness of a color is at most [`LIGHTNESS_THRESHOLD`].
#[must_use]
pub fn is_dark_luminance(color: Srgb<u8>) -> bool {
    lightness_from_luminance(relative_luminance(color)) <= LIGHTNESS_THRESHOLD
}

/// A display transfer function used to shape the threshold of [`is_dark_hsv`].
///
/// Each curve has a near-black segment below its gap and a power-law or logarithmic segment above it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransferFunction {
    /// ITU-R BT.709 camera curve (linear segment below `0.018`).
    #[default]
    Bt709,
    /// ITU-R BT.2100 hybrid log-gamma (square root segment below `1/12`).
    Hlg,
    /// The sRGB encoding curve (linear segment below `0.0031308`).
    Srgb,
}

impl TransferFunction {
    /// The end of the BT.709 linear segment.
    pub const BT709_GAP: f32 = 0.018;

    /// The end of the HLG square root segment.
    pub const HLG_GAP: f32 = 1.0 / 12.0;

    /// The end of the sRGB linear segment.
    pub const SRGB_GAP: f32 = 0.0031308;

    /// Returns the input level at which the curve switches segments.
    #[must_use]
    pub const fn gap(self) -> f32 {
        match self {
            TransferFunction::Bt709 => Self::BT709_GAP,
            TransferFunction::Hlg => Self::HLG_GAP,
            TransferFunction::Srgb => Self::SRGB_GAP,
        }
    }

    /// Encodes a linear level in `0.0..=1.0`, returning a level in `0.0..=1.0`.
    #[must_use]
    pub fn encode(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        let encoded = match self {
            TransferFunction::Bt709 => {
                if x < Self::BT709_GAP {
                    4.5 * x
                } else {
                    1.099 * x.powf(0.45) - 0.099
                }
            }
            TransferFunction::Hlg => {
                const A: f32 = 0.178_832_77;
                const B: f32 = 0.284_668_92;
                const C: f32 = 0.559_910_7;
                if x <= Self::HLG_GAP {
                    (3.0 * x).sqrt()
                } else {
                    A * (12.0 * x - B).ln() + C
                }
            }
            TransferFunction::Srgb => {
                if x <= Self::SRGB_GAP {
                    12.92 * x
                } else {
                    1.055 * x.powf(1.0 / 2.4) - 0.055
                }
            }
        };

        encoded.clamp(0.0, 1.0)
    }

    /// The value (`0.0..=1.0`) below which a color with the given saturation (`0.0..=1.0`) is dark.
    fn threshold(self, saturation: f32) -> f32 {
        VALUE_FLOOR / 100.0 + SATURATION_RISE * self.encode(saturation)
    }
}

/// Returns whether an HSV color is dark under the given transfer model.
///
/// Colors with a value below [`VALUE_FLOOR`] are always dark.
/// Otherwise, more saturated colors need a higher value to be classified as light.
/// For a fixed hue and saturation, raising the value switches the result
/// from dark to light exactly once.
#[must_use]
pub fn is_dark_hsv(hsv: Hsv, transfer: TransferFunction) -> bool {
    if hsv.value < VALUE_FLOOR {
        true
    } else {
        hsv.value / 100.0 < transfer.threshold(hsv.saturation / 100.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TRANSFERS: [TransferFunction; 3] = [
        TransferFunction::Bt709,
        TransferFunction::Hlg,
        TransferFunction::Srgb,
    ];

    #[test]
    fn value_midpoint() {
        assert!(is_dark_value(Hsv::from(Srgb::new(0, 0, 0))));
        assert!(is_dark_value(Hsv::from(Srgb::new(127, 20, 20))));
        assert!(!is_dark_value(Hsv::from(Srgb::new(128, 20, 20))));
        assert!(in_dark_half(Hsv::from(Srgb::new(127, 127, 127))));
        assert!(!in_dark_half(Hsv::from(Srgb::new(128, 128, 128))));
    }

    #[test]
    fn luminance_classification() {
        assert!(is_dark_luminance(Srgb::new(0, 0, 0)));
        assert!(!is_dark_luminance(Srgb::new(255, 255, 255)));
        assert!(!is_dark_luminance(Srgb::new(255, 255, 0)));
        assert!(is_dark_luminance(Srgb::new(0, 0, 255)));
        // L* of pure red is about 53.2
        assert!(is_dark_luminance(Srgb::new(255, 0, 0)));
    }

    #[test]
    fn transfer_curves_are_continuous_and_bounded() {
        for transfer in TRANSFERS {
            let gap = transfer.gap();
            let below = transfer.encode(gap - 1e-5);
            let above = transfer.encode(gap + 1e-5);
            assert!((below - above).abs() < 0.01, "{transfer:?}");
            assert!(transfer.encode(0.0).abs() < 1e-6);
            assert!((transfer.encode(1.0) - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn low_value_is_dark() {
        for transfer in TRANSFERS {
            let hsv = Hsv { hue: 0.0, saturation: 0.0, value: 64.9 };
            assert!(is_dark_hsv(hsv, transfer));
            let hsv = Hsv { hue: 0.0, saturation: 0.0, value: 65.0 };
            assert!(!is_dark_hsv(hsv, transfer));
        }
    }

    #[test]
    fn saturated_colors_need_more_value() {
        for transfer in TRANSFERS {
            let hsv = Hsv { hue: 240.0, saturation: 100.0, value: 80.0 };
            assert!(is_dark_hsv(hsv, transfer));
            let hsv = Hsv { hue: 240.0, saturation: 100.0, value: 100.0 };
            assert!(!is_dark_hsv(hsv, transfer));
        }
    }

    #[test]
    fn monotonic_in_value() {
        for transfer in TRANSFERS {
            for saturation in (0..=100).step_by(5) {
                let mut transitions = 0;
                let mut previous = true;
                for value in 0..=1000 {
                    #[allow(clippy::cast_precision_loss)]
                    let hsv = Hsv {
                        hue: 200.0,
                        saturation: saturation as f32,
                        value: value as f32 / 10.0,
                    };
                    let dark = is_dark_hsv(hsv, transfer);
                    assert!(!(dark && !previous), "flapped back to dark");
                    if previous && !dark {
                        transitions += 1;
                    }
                    previous = dark;
                }
                assert_eq!(transitions, 1, "{transfer:?} at saturation {saturation}");
            }
        }
    }
}
