//! The error type returned when palette inputs fail validation.

use thiserror::Error;

/// An error for inputs that violate the contract of the palette functions.
///
/// All validation happens up front when a [`ColorHistogram`](crate::ColorHistogram)
/// or [`PaletteSize`](crate::PaletteSize) is constructed.
/// Once those exist, every palette computation is infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// The histogram did not contain any colors.
    #[error("the color histogram is empty")]
    EmptyHistogram,
    /// A color was given a count of zero.
    #[error("color ({}, {}, {}) has a count of zero", .color[0], .color[1], .color[2])]
    ZeroCount {
        /// The components of the offending color.
        color: [u8; 3],
    },
    /// The summed count of a single color does not fit in a `u32`.
    #[error("the count of color ({}, {}, {}) overflowed", .color[0], .color[1], .color[2])]
    CountOverflow {
        /// The components of the offending color.
        color: [u8; 3],
    },
    /// The requested palette size was zero or above [`MAX_COLORS`](crate::MAX_COLORS).
    #[error("palette size must be between 1 and {max}, got {0}", max = crate::MAX_COLORS)]
    InvalidPaletteSize(u16),
}
