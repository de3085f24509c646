use crate::{
    ColorHistogram, ColorSpace, PaletteGenerator, PaletteResult, PaletteSettings, PaletteSize,
    QuantizeMethod, ThemeColor,
};

#[cfg(feature = "threads")]
use super::auto;

/// A builder struct to specify options to compute a theme color and palette from a [`ColorHistogram`].
///
/// # Examples
/// ```
/// # use impressionist::{ColorHistogram, ColorSpace, PalettePipeline, PaletteError, QuantizeMethod};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let histogram = ColorHistogram::new([
///     (Srgb::new(255, 255, 255), 100),
///     (Srgb::new(0, 0, 0), 50),
///     (Srgb::new(255, 0, 0), 30),
/// ])?;
///
/// let result = PalettePipeline::new(&histogram)
///     .palette_size(2u16.try_into()?)
///     .colorspace(ColorSpace::Lab)
///     .quantize_method(QuantizeMethod::kmeans())
///     .palette();
///
/// assert_eq!(result.palette.len(), 2);
/// assert_eq!(result.theme.color, Srgb::new(255, 255, 255));
/// assert!(!result.palette_is_dark);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PalettePipeline<'a> {
    /// The input histogram.
    pub(crate) histogram: &'a ColorHistogram,
    /// The per-call settings.
    pub(crate) settings: PaletteSettings,
    /// The generation method to use.
    pub(crate) quantize_method: QuantizeMethod,
}

impl<'a> PalettePipeline<'a> {
    /// Creates a new [`PalettePipeline`] with default settings.
    #[must_use]
    pub fn new(histogram: &'a ColorHistogram) -> Self {
        Self {
            histogram,
            settings: PaletteSettings::default(),
            quantize_method: QuantizeMethod::default(),
        }
    }

    /// Sets the palette size which determines the number of colors in the output palette.
    ///
    /// The default palette size is `5`.
    #[must_use]
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.settings.palette_size = size;
        self
    }

    /// Sets the color space in which k-means measures distances.
    ///
    /// The octree quantizer always works in sRGB.
    /// The default color space is [`ColorSpace::Srgb`].
    #[must_use]
    pub fn colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.settings.colorspace = colorspace;
        self
    }

    /// Sets whether near-white colors are excluded.
    ///
    /// This has no effect on histograms with a single color.
    /// The default is `false`.
    #[must_use]
    pub fn ignore_white(mut self, ignore_white: bool) -> Self {
        self.settings.ignore_white = ignore_white;
        self
    }

    /// Sets the generation method.
    ///
    /// The default is [`QuantizeMethod::Kmeans`] with default options.
    #[must_use]
    pub fn quantize_method(mut self, quantize_method: impl Into<QuantizeMethod>) -> Self {
        self.quantize_method = quantize_method.into();
        self
    }

    /// Computes the theme color.
    #[must_use]
    pub fn theme_color(&self) -> ThemeColor {
        self.quantize_method.theme_color(self.histogram, &self.settings)
    }

    /// Computes the palette.
    #[must_use]
    pub fn palette(&self) -> PaletteResult {
        self.quantize_method.palette(self.histogram, &self.settings)
    }

    /// Computes the palette, running both generators of [`QuantizeMethod::Auto`] in parallel.
    ///
    /// Other methods give the same result as [`palette`](Self::palette).
    #[cfg(feature = "threads")]
    #[must_use]
    pub fn palette_par(&self) -> PaletteResult {
        match self.quantize_method {
            QuantizeMethod::Auto(options) => {
                auto::palette_par(self.histogram, &self.settings, &options)
            }
            method => method.palette(self.histogram, &self.settings),
        }
    }
}
