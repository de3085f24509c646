//! Contains various types needed across the crate.

use crate::{ColorSpace, PaletteError, MAX_COLORS};
use palette::Srgb;
use std::fmt::Display;

/// This type is used to specify the number of colors to include in a palette.
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be
/// in the range `1..=`[`MAX_COLORS`].
///
/// # Examples
/// Use `try_into` or [`PaletteSize::from_clamped`] to create [`PaletteSize`]s.
///
/// ```
/// # use impressionist::{PaletteSize, PaletteError};
/// # fn main() -> Result<(), PaletteError> {
/// let size = PaletteSize::try_from(5u16)?;
/// let size: PaletteSize = 16u16.try_into()?;
/// let size = PaletteSize::from_clamped(1024);
/// assert!(PaletteSize::try_from(0u16).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(u16);

impl PaletteSize {
    /// The maximum supported palette size (given by [`MAX_COLORS`]).
    pub const MAX: Self = Self(MAX_COLORS);

    /// The smallest palette size, a single color.
    pub const MIN: Self = Self(1);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Gets the inner value as a `usize` for lengths and indexing.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Creates a [`PaletteSize`] by clamping the given `u16` to be in `1..=MAX_COLORS`.
    #[must_use]
    pub const fn from_clamped(value: u16) -> Self {
        if value == 0 {
            Self::MIN
        } else if value <= MAX_COLORS {
            Self(value)
        } else {
            Self::MAX
        }
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self(5)
    }
}

impl From<PaletteSize> for u16 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u16> for PaletteSize {
    type Error = PaletteError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (1..=MAX_COLORS).contains(&value) {
            Ok(PaletteSize(value))
        } else {
            Err(PaletteError::InvalidPaletteSize(value))
        }
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// The settings shared by every palette generator for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteSettings {
    /// The number of colors in the output palette.
    pub palette_size: PaletteSize,
    /// The color space in which distances are measured (k-means only).
    pub colorspace: ColorSpace,
    /// Whether to exclude near-white colors (all channels above `250`).
    ///
    /// This is ignored when the histogram has a single color.
    pub ignore_white: bool,
}

impl PaletteSettings {
    /// Creates new [`PaletteSettings`] with the given palette size,
    /// the sRGB color space, and white colors included.
    #[must_use]
    pub const fn new(palette_size: PaletteSize) -> Self {
        Self {
            palette_size,
            colorspace: ColorSpace::Srgb,
            ignore_white: false,
        }
    }
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self::new(PaletteSize::default())
    }
}

/// A single color judged most representative of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColor {
    /// The theme color.
    pub color: Srgb<u8>,
    /// Whether the theme color is classified as dark.
    pub is_dark: bool,
}

/// The output struct returned by palette generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteResult {
    /// The representative colors, ordered by the generator.
    ///
    /// This always has exactly as many entries as the requested
    /// [`PaletteSize`]. If fewer distinct colors were found,
    /// the found colors are repeated in order.
    pub palette: Vec<Srgb<u8>>,
    /// Whether the palette was drawn from the dark half of the histogram.
    pub palette_is_dark: bool,
    /// The theme color the palette was computed around.
    pub theme: ThemeColor,
}

impl PaletteResult {
    /// Creates a [`PaletteResult`], cycling through `colors` to fill `palette_size` entries.
    ///
    /// `colors` must not be empty.
    pub(crate) fn padded(
        colors: &[Srgb<u8>],
        palette_size: PaletteSize,
        palette_is_dark: bool,
        theme: ThemeColor,
    ) -> Self {
        debug_assert!(!colors.is_empty());
        let palette = colors
            .iter()
            .copied()
            .cycle()
            .take(palette_size.as_usize())
            .collect();

        Self { palette, palette_is_dark, theme }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_bounds() {
        assert_eq!(
            PaletteSize::try_from(0u16),
            Err(PaletteError::InvalidPaletteSize(0))
        );
        assert_eq!(
            PaletteSize::try_from(MAX_COLORS + 1),
            Err(PaletteError::InvalidPaletteSize(MAX_COLORS + 1))
        );
        assert_eq!(PaletteSize::try_from(1u16).unwrap(), PaletteSize::MIN);
        assert_eq!(PaletteSize::try_from(MAX_COLORS).unwrap(), PaletteSize::MAX);
        assert_eq!(PaletteSize::from_clamped(0), PaletteSize::MIN);
        assert_eq!(PaletteSize::from_clamped(u16::MAX), PaletteSize::MAX);
    }

    #[test]
    fn invalid_size_message() {
        let error = PaletteSize::try_from(0u16).unwrap_err();
        assert_eq!(error.to_string(), "palette size must be between 1 and 256, got 0");
    }

    #[test]
    fn padding_cycles_in_order() {
        let theme = ThemeColor { color: Srgb::new(0, 0, 0), is_dark: true };
        let colors = [Srgb::new(1, 1, 1), Srgb::new(2, 2, 2)];
        let result = PaletteResult::padded(&colors, 5u16.try_into().unwrap(), true, theme);
        assert_eq!(
            result.palette,
            vec![colors[0], colors[1], colors[0], colors[1], colors[0]]
        );

        let result = PaletteResult::padded(&colors, 1u16.try_into().unwrap(), true, theme);
        assert_eq!(result.palette, vec![colors[0]]);
    }
}
