//! Chooses between the k-means and octree palettes for [`QuantizeMethod::Auto`](crate::QuantizeMethod::Auto).

use crate::{
    kmeans, octree, ColorHistogram, KmeansOptions, Lab, OctreeOptions, PaletteResult,
    PaletteSettings, Seeding, ThemeColor,
};
use ordered_float::OrderedFloat;
use palette::Srgb;

/// Returns how unevenly the colors of a palette are spread around their CIELAB centroid.
///
/// This is the variance of the squared distances from each color to the centroid,
/// so a palette mixing tight groups with outliers scores higher than an evenly spaced one.
/// Returns `0.0` for an empty palette.
#[must_use]
pub fn lab_variance(palette: &[Srgb<u8>]) -> f64 {
    if palette.is_empty() {
        return 0.0;
    }

    let points = palette
        .iter()
        .map(|&color| <[f32; 3]>::from(Lab::from(color)).map(f64::from))
        .collect::<Vec<_>>();

    #[allow(clippy::cast_precision_loss)]
    let k = points.len() as f64;

    let mut centroid = [0.0; 3];
    for point in &points {
        for (c, x) in centroid.iter_mut().zip(point) {
            *c += x;
        }
    }
    let centroid = centroid.map(|c| c / k);

    let distances = points
        .iter()
        .map(|point| {
            point
                .iter()
                .zip(centroid)
                .map(|(x, c)| (x - c) * (x - c))
                .sum::<f64>()
        })
        .collect::<Vec<_>>();

    let mean = distances.iter().sum::<f64>() / k;
    distances.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / k
}

/// Returns `kmeans` if its palette has a strictly higher [`lab_variance`], otherwise `octree`.
fn select(kmeans: PaletteResult, octree: PaletteResult) -> PaletteResult {
    let kmeans_variance = lab_variance(&kmeans.palette);
    let octree_variance = lab_variance(&octree.palette);
    let use_kmeans = OrderedFloat(kmeans_variance) > OrderedFloat(octree_variance);

    log::debug!(
        "auto palette: k-means variance {kmeans_variance:.3}, octree variance {octree_variance:.3}, chose {}",
        if use_kmeans { "k-means" } else { "octree" }
    );

    if use_kmeans {
        kmeans
    } else {
        octree
    }
}

/// The k-means options used by the auto selector.
fn plus_plus(options: &KmeansOptions) -> KmeansOptions {
    options.seeding(Seeding::PlusPlus)
}

/// Computes both palettes and returns the one that is more spread out.
#[must_use]
pub fn palette(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    options: &KmeansOptions,
) -> PaletteResult {
    let kmeans = kmeans::palette(histogram, settings, &plus_plus(options));
    let octree = octree::palette(histogram, settings, &OctreeOptions::new());
    select(kmeans, octree)
}

/// Computes both palettes in parallel and returns the one that is more spread out.
#[cfg(feature = "threads")]
#[must_use]
pub fn palette_par(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    options: &KmeansOptions,
) -> PaletteResult {
    let options = plus_plus(options);
    let (kmeans, octree) = rayon::join(
        || kmeans::palette(histogram, settings, &options),
        || octree::palette(histogram, settings, &OctreeOptions::new()),
    );
    select(kmeans, octree)
}

/// Returns the theme color of the palette that [`palette`] would choose.
#[must_use]
pub fn theme_color(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    options: &KmeansOptions,
) -> ThemeColor {
    palette(histogram, settings, options).theme
}
