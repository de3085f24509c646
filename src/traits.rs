use crate::{
    api::auto, kmeans, octree, ColorHistogram, KmeansOptions, OctreeOptions, PaletteResult,
    PaletteSettings, QuantizeMethod, ThemeColor,
};

/// A method of computing a theme color and a palette from a [`ColorHistogram`].
///
/// Implementations are stateless: every call builds its own clusters or tree and discards them.
pub trait PaletteGenerator {
    /// Computes the single most representative color of the histogram.
    #[must_use]
    fn theme_color(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> ThemeColor;

    /// Computes a palette with exactly `settings.palette_size` colors,
    /// drawn from the dark or light half of the histogram to match the theme color.
    #[must_use]
    fn palette(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> PaletteResult;
}

impl PaletteGenerator for KmeansOptions {
    fn theme_color(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> ThemeColor {
        kmeans::theme_color(histogram, settings, self)
    }

    fn palette(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> PaletteResult {
        kmeans::palette(histogram, settings, self)
    }
}

impl PaletteGenerator for OctreeOptions {
    fn theme_color(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> ThemeColor {
        octree::theme_color(histogram, settings, self)
    }

    fn palette(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> PaletteResult {
        octree::palette(histogram, settings, self)
    }
}

impl PaletteGenerator for QuantizeMethod {
    fn theme_color(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> ThemeColor {
        match self {
            QuantizeMethod::Kmeans(options) => options.theme_color(histogram, settings),
            QuantizeMethod::Octree(options) => options.theme_color(histogram, settings),
            QuantizeMethod::Auto(options) => auto::theme_color(histogram, settings, options),
        }
    }

    fn palette(&self, histogram: &ColorHistogram, settings: &PaletteSettings) -> PaletteResult {
        match self {
            QuantizeMethod::Kmeans(options) => options.palette(histogram, settings),
            QuantizeMethod::Octree(options) => options.palette(histogram, settings),
            QuantizeMethod::Auto(options) => auto::palette(histogram, settings, options),
        }
    }
}
