//! Weighted k-means clustering over colors.
//!
//! Each distinct color is a point weighted by its count.
//! Points are assigned to their nearest center by Euclidean distance
//! (ties go to the earlier center), and each center is then replaced with
//! the count-weighted mean of its points. This repeats until no center moves
//! by more than a small epsilon or the iteration cap is reached.
//!
//! Initial centers are either distinct points chosen uniformly at random
//! or chosen with k-means++ seeding.

use crate::{
    darkness::{in_dark_half, is_dark_value},
    filter, ColorHistogram, Hsv, KmeansOptions, PaletteResult, PaletteSettings, ThemeColor,
};
use palette::Srgb;
use rand::{distributions::WeightedIndex, seq::index, SeedableRng};
use rand_distr::{Distribution, Uniform};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// The default maximum number of assignment/update rounds.
pub const MAX_ITERATIONS: u32 = 100;

/// Centers that move less than this squared distance are considered stable.
const TOLERANCE: f32 = 1e-6;

/// How the initial cluster centers are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Seeding {
    /// Pick `k` distinct points uniformly at random.
    #[default]
    Random,
    /// Pick the first center uniformly at random, then each next center with probability
    /// proportional to its squared distance from the nearest chosen center.
    PlusPlus,
}

/// A cluster produced by [`cluster`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// The final center of the cluster.
    pub centroid: [f32; 3],
    /// Indices of the points assigned to this cluster, in ascending order.
    pub members: Vec<usize>,
}

/// Squared Euclidean distance.
#[inline]
fn distance_squared(a: [f32; 3], b: [f32; 3]) -> f32 {
    let mut sum = 0.0;
    for i in 0..3 {
        let d = a[i] - b[i];
        sum += d * d;
    }
    sum
}

/// Returns the index of the center nearest to `point`, preferring the earliest on ties.
#[inline]
fn nearest(centers: &[[f32; 3]], point: [f32; 3]) -> usize {
    let mut min_index = 0;
    let mut min_distance = f32::INFINITY;
    for (i, &center) in centers.iter().enumerate() {
        let distance = distance_squared(point, center);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    min_index
}

/// Chooses `k` distinct points uniformly at random.
fn random_centers(points: &[[f32; 3]], k: usize, rng: &mut Xoroshiro128PlusPlus) -> Vec<[f32; 3]> {
    index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Chooses up to `k` centers with k-means++ seeding.
fn plus_plus_centers(
    points: &[[f32; 3]],
    k: usize,
    rng: &mut Xoroshiro128PlusPlus,
) -> Vec<[f32; 3]> {
    let mut centers = Vec::with_capacity(k);

    let first = points[Uniform::new(0, points.len()).sample(rng)];
    centers.push(first);

    let mut min_distances = points
        .iter()
        .map(|&p| f64::from(distance_squared(p, first)))
        .collect::<Vec<_>>();

    while centers.len() < k {
        // fails only if every remaining point coincides with a chosen center
        let Ok(distribution) = WeightedIndex::new(&min_distances) else {
            break;
        };

        let next = points[distribution.sample(rng)];
        centers.push(next);

        for (d, &p) in min_distances.iter_mut().zip(points) {
            *d = d.min(f64::from(distance_squared(p, next)));
        }
    }

    centers
}

/// Assigns each point to its nearest center.
fn assign(points: &[[f32; 3]], centers: &[[f32; 3]], assignments: &mut [usize]) {
    for (a, &point) in assignments.iter_mut().zip(points) {
        *a = nearest(centers, point);
    }
}

/// Computes the count-weighted mean of the points assigned to each center.
///
/// Centers without any points keep their previous position.
#[allow(clippy::cast_possible_truncation)]
fn update(
    points: &[[f32; 3]],
    counts: &[u32],
    assignments: &[usize],
    centers: &[[f32; 3]],
) -> Vec<[f32; 3]> {
    let mut sums = vec![([0.0f64; 3], 0u64); centers.len()];

    for ((&point, &count), &a) in points.iter().zip(counts).zip(assignments) {
        let (sum, total) = &mut sums[a];
        let w = f64::from(count);
        for (s, c) in sum.iter_mut().zip(point) {
            *s += w * f64::from(c);
        }
        *total += u64::from(count);
    }

    sums.into_iter()
        .zip(centers)
        .map(|((sum, total), &center)| {
            if total == 0 {
                center
            } else {
                #[allow(clippy::cast_precision_loss)]
                let n = total as f64;
                sum.map(|s| (s / n) as f32)
            }
        })
        .collect()
}

/// Clusters weighted points into at most `k` clusters.
///
/// `k` is clamped to the number of points, and empty clusters are dropped,
/// so fewer than `k` clusters may be returned.
/// The same `seed` always produces the same clusters for the same input.
///
/// # Panics
/// Panics if `points` and `counts` have different lengths.
#[must_use]
pub fn cluster(
    points: &[[f32; 3]],
    counts: &[u32],
    k: usize,
    seeding: Seeding,
    seed: u64,
    max_iterations: u32,
) -> Vec<Cluster> {
    assert_eq!(points.len(), counts.len());

    let k = k.min(points.len());
    if k == 0 {
        return Vec::new();
    }

    let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
    let mut centers = match seeding {
        Seeding::Random => random_centers(points, k, rng),
        Seeding::PlusPlus => plus_plus_centers(points, k, rng),
    };

    let mut assignments = vec![0; points.len()];
    let mut iterations = 0;
    let mut converged = false;
    while !converged && iterations < max_iterations.max(1) {
        assign(points, &centers, &mut assignments);
        let next = update(points, counts, &assignments, &centers);
        converged = centers
            .iter()
            .zip(&next)
            .all(|(&a, &b)| distance_squared(a, b) <= TOLERANCE);
        centers = next;
        iterations += 1;
    }

    if converged {
        log::debug!("k-means with {k} centers converged after {iterations} iterations");
    } else {
        log::warn!("k-means with {k} centers stopped at the iteration cap of {iterations}");
    }

    assign(points, &centers, &mut assignments);

    let mut members = vec![Vec::new(); centers.len()];
    for (i, &a) in assignments.iter().enumerate() {
        members[a].push(i);
    }

    centers
        .into_iter()
        .zip(members)
        .filter(|(_, members)| !members.is_empty())
        .map(|(centroid, members)| Cluster { centroid, members })
        .collect()
}

/// Clusters a histogram and returns the highest-count member of each cluster.
fn representatives(
    histogram: &ColorHistogram,
    k: usize,
    settings: &PaletteSettings,
    options: &KmeansOptions,
) -> Vec<Srgb<u8>> {
    let points = histogram.points(settings.colorspace);
    cluster(
        &points,
        histogram.counts(),
        k,
        options.seeding,
        options.seed,
        options.max_iterations,
    )
    .iter()
    .filter_map(|cluster| histogram.heaviest(cluster.members.iter().copied()))
    .map(|i| histogram.colors()[i])
    .collect()
}

/// Computes the theme color: the highest-count member of a single cluster.
///
/// The theme color is dark if its HSV value is at most `50`.
#[must_use]
pub fn theme_color(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    options: &KmeansOptions,
) -> ThemeColor {
    let histogram = filter::without_white(histogram, settings.ignore_white);
    let color = representatives(&histogram, 1, settings, options)
        .first()
        .copied()
        .unwrap_or(histogram.colors()[0]);

    ThemeColor {
        color,
        is_dark: is_dark_value(Hsv::from(color)),
    }
}

/// Computes a palette from the half of the histogram that matches the theme color's darkness.
///
/// The dark half holds colors with an HSV value below `50`, and the light half the rest.
#[must_use]
pub fn palette(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    options: &KmeansOptions,
) -> PaletteResult {
    let settings = PaletteSettings {
        ignore_white: filter::should_ignore_white(histogram, settings.ignore_white),
        ..*settings
    };

    let theme = theme_color(histogram, &settings, options);

    let half = filter::bisect(histogram, theme.is_dark, settings.ignore_white, |color| {
        in_dark_half(Hsv::from(color))
    });

    let colors = representatives(&half, settings.palette_size.as_usize(), &settings, options);
    let colors = if colors.is_empty() { vec![theme.color] } else { colors };

    PaletteResult::padded(&colors, settings.palette_size, theme.is_dark, theme)
}
