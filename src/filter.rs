//! Shared policies for narrowing a histogram before clustering.

use crate::ColorHistogram;
use palette::Srgb;
use std::borrow::Cow;

/// Colors with every channel above this are considered near-white.
pub const WHITE_THRESHOLD: u8 = 250;

/// Returns whether every channel of the color is above [`WHITE_THRESHOLD`].
#[must_use]
pub fn is_near_white(color: Srgb<u8>) -> bool {
    let Srgb { red, green, blue, .. } = color;
    red > WHITE_THRESHOLD && green > WHITE_THRESHOLD && blue > WHITE_THRESHOLD
}

/// Whether white filtering applies to this histogram.
///
/// A histogram with a single color is never white filtered.
pub(crate) fn should_ignore_white(histogram: &ColorHistogram, ignore_white: bool) -> bool {
    ignore_white && histogram.num_colors() > 1
}

/// Removes near-white colors if `ignore_white` applies.
///
/// If every color is near-white, the histogram is returned unchanged.
pub(crate) fn without_white(histogram: &ColorHistogram, ignore_white: bool) -> Cow<'_, ColorHistogram> {
    if should_ignore_white(histogram, ignore_white) {
        retain_or_keep(histogram, |color| !is_near_white(color), "near-white")
    } else {
        Cow::Borrowed(histogram)
    }
}

/// Keeps the colors on one side of a dark/light split.
///
/// `is_dark` classifies each color, and colors are kept when their class matches `dark`.
/// Near-white colors are also removed when `ignore_white` applies.
/// If nothing would remain, the histogram is returned unchanged.
pub(crate) fn bisect(
    histogram: &ColorHistogram,
    dark: bool,
    ignore_white: bool,
    is_dark: impl Fn(Srgb<u8>) -> bool,
) -> Cow<'_, ColorHistogram> {
    let ignore_white = should_ignore_white(histogram, ignore_white);
    retain_or_keep(
        histogram,
        |color| is_dark(color) == dark && !(ignore_white && is_near_white(color)),
        if dark { "dark" } else { "light" },
    )
}

/// Applies `keep`, falling back to the full histogram when nothing would remain.
fn retain_or_keep<'a>(
    histogram: &'a ColorHistogram,
    keep: impl FnMut(Srgb<u8>) -> bool,
    what: &str,
) -> Cow<'a, ColorHistogram> {
    if let Some(kept) = histogram.retain(keep) {
        Cow::Owned(kept)
    } else {
        log::debug!("no {what} colors left after filtering, keeping all {} colors", histogram.num_colors());
        Cow::Borrowed(histogram)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::darkness::is_dark_luminance;

    #[test]
    fn near_white() {
        assert!(is_near_white(Srgb::new(255, 255, 255)));
        assert!(is_near_white(Srgb::new(251, 251, 251)));
        assert!(!is_near_white(Srgb::new(250, 255, 255)));
        assert!(!is_near_white(Srgb::new(255, 255, 0)));
    }

    #[test]
    fn single_color_keeps_white() {
        let histogram = ColorHistogram::new([(Srgb::new(255, 255, 255), 3)]).unwrap();
        assert!(!should_ignore_white(&histogram, true));
        assert_eq!(without_white(&histogram, true).num_colors(), 1);
    }

    #[test]
    fn white_removed() {
        let histogram = ColorHistogram::new([
            (Srgb::new(255, 255, 255), 100),
            (Srgb::new(0, 0, 0), 50),
        ])
        .unwrap();
        let filtered = without_white(&histogram, true);
        assert_eq!(filtered.colors(), &[Srgb::new(0, 0, 0)]);
        assert_eq!(without_white(&histogram, false).num_colors(), 2);
    }

    #[test]
    fn all_white_falls_back() {
        let histogram = ColorHistogram::new([
            (Srgb::new(255, 255, 255), 1),
            (Srgb::new(252, 253, 254), 1),
        ])
        .unwrap();
        assert!(matches!(without_white(&histogram, true), Cow::Borrowed(_)));
    }

    #[test]
    fn bisect_sides() {
        let histogram = ColorHistogram::new([
            (Srgb::new(255, 255, 255), 100),
            (Srgb::new(0, 0, 0), 50),
            (Srgb::new(255, 255, 0), 30),
        ])
        .unwrap();

        let dark = bisect(&histogram, true, false, is_dark_luminance);
        assert_eq!(dark.colors(), &[Srgb::new(0, 0, 0)]);

        let light = bisect(&histogram, false, false, is_dark_luminance);
        assert_eq!(light.num_colors(), 2);

        let light = bisect(&histogram, false, true, is_dark_luminance);
        assert_eq!(light.colors(), &[Srgb::new(255, 255, 0)]);
    }
}
