//! Contains [`ColorHistogram`], the weighted multiset of colors that every generator consumes.

use crate::{colorspace::ColorSpace, PaletteError};
use palette::Srgb;
use std::collections::BTreeMap;
#[cfg(feature = "threads")]
use rayon::prelude::*;
#[cfg(feature = "image")]
use image::RgbImage;

/// A mapping from distinct colors to the number of pixels with that color.
///
/// A [`ColorHistogram`] is never empty and every count is nonzero.
/// The colors are stored in ascending component order,
/// so results are reproducible for a fixed random seed regardless of input order.
///
/// # Examples
/// ```
/// # use impressionist::{ColorHistogram, PaletteError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let histogram = ColorHistogram::new([
///     (Srgb::new(255, 255, 255), 100),
///     (Srgb::new(0, 0, 0), 50),
///     (Srgb::new(255, 0, 0), 30),
/// ])?;
/// assert_eq!(histogram.num_colors(), 3);
/// assert_eq!(histogram.total_count(), 180);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistogram {
    /// The distinct colors, sorted by components.
    colors: Vec<Srgb<u8>>,
    /// The count for each color in `colors`.
    counts: Vec<u32>,
    /// The sum of `counts`.
    total_count: u64,
}

impl ColorHistogram {
    /// Creates a [`ColorHistogram`] from `(color, count)` pairs.
    ///
    /// Repeated colors have their counts summed.
    ///
    /// # Errors
    /// Returns an error if there are no pairs, if any count is zero,
    /// or if the summed count of a color does not fit in a `u32`.
    pub fn new(
        color_counts: impl IntoIterator<Item = (Srgb<u8>, u32)>,
    ) -> Result<Self, PaletteError> {
        let mut map = BTreeMap::<[u8; 3], u32>::new();
        for (color, count) in color_counts {
            let key: [u8; 3] = color.into();
            if count == 0 {
                return Err(PaletteError::ZeroCount { color: key });
            }
            let entry = map.entry(key).or_insert(0);
            *entry = entry
                .checked_add(count)
                .ok_or(PaletteError::CountOverflow { color: key })?;
        }

        Self::from_sorted_map(map)
    }

    /// Creates a [`ColorHistogram`] by counting each pixel in the given slice.
    ///
    /// Transparent pixels should be removed by the caller beforehand.
    ///
    /// # Errors
    /// Returns an error if `pixels` is empty or a color appears more than `u32::MAX` times.
    pub fn from_pixels(pixels: &[Srgb<u8>]) -> Result<Self, PaletteError> {
        Self::new(pixels.iter().map(|&color| (color, 1)))
    }

    /// Creates a [`ColorHistogram`] by counting each pixel of an image.
    ///
    /// # Errors
    /// Returns an error if the image has no pixels or a color appears more than `u32::MAX` times.
    #[cfg(feature = "image")]
    pub fn try_from_rgbimage(image: &RgbImage) -> Result<Self, PaletteError> {
        Self::new(image.pixels().map(|pixel| (Srgb::from(pixel.0), 1)))
    }

    /// Builds the histogram from an already deduplicated and sorted map.
    fn from_sorted_map(map: BTreeMap<[u8; 3], u32>) -> Result<Self, PaletteError> {
        if map.is_empty() {
            return Err(PaletteError::EmptyHistogram);
        }

        let (colors, counts): (Vec<_>, Vec<_>) = map
            .into_iter()
            .map(|(key, count)| (Srgb::from(key), count))
            .unzip();

        let total_count = counts.iter().copied().map(u64::from).sum();

        Ok(Self { colors, counts, total_count })
    }

    /// The distinct colors in ascending component order.
    #[must_use]
    pub fn colors(&self) -> &[Srgb<u8>] {
        &self.colors
    }

    /// The number of pixels for each color returned by [`colors`](Self::colors).
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The sum of all counts.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// The number of distinct colors.
    #[must_use]
    pub fn num_colors(&self) -> usize {
        self.colors.len()
    }

    /// Iterates over `(color, count)` pairs in ascending color order.
    pub fn iter(&self) -> impl Iterator<Item = (Srgb<u8>, u32)> + '_ {
        self.colors.iter().copied().zip(self.counts.iter().copied())
    }

    /// Returns the count of the given color, or `None` if it is not present.
    #[must_use]
    pub fn count_of(&self, color: Srgb<u8>) -> Option<u32> {
        let key: [u8; 3] = color.into();
        self.colors
            .binary_search_by_key(&key, |&c| c.into())
            .ok()
            .map(|i| self.counts[i])
    }

    /// Returns the sub-histogram of colors for which `keep` returns true,
    /// or `None` if no color is kept.
    pub(crate) fn retain(&self, mut keep: impl FnMut(Srgb<u8>) -> bool) -> Option<Self> {
        let (colors, counts): (Vec<_>, Vec<_>) = self.iter().filter(|&(c, _)| keep(c)).unzip();

        if colors.is_empty() {
            None
        } else {
            let total_count = counts.iter().copied().map(u64::from).sum();
            Some(Self { colors, counts, total_count })
        }
    }

    /// Returns the components of each color in the given color space.
    #[must_use]
    pub fn points(&self, colorspace: ColorSpace) -> Vec<[f32; 3]> {
        self.colors
            .iter()
            .map(|&color| colorspace.components(color))
            .collect()
    }

    /// Returns the index of the color with the highest count among `indices`.
    ///
    /// Ties go to the first such index. Returns `None` if `indices` is empty.
    pub(crate) fn heaviest(&self, indices: impl IntoIterator<Item = usize>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in indices {
            match best {
                Some(b) if self.counts[b] >= self.counts[i] => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

#[cfg(feature = "threads")]
impl ColorHistogram {
    /// Creates a [`ColorHistogram`] by counting each pixel in the given slice in parallel.
    ///
    /// # Errors
    /// Returns an error if `pixels` is empty or a color appears more than `u32::MAX` times.
    pub fn from_pixels_par(pixels: &[Srgb<u8>]) -> Result<Self, PaletteError> {
        let chunk_size = pixels.len().div_ceil(rayon::current_num_threads()).max(1);

        let map = pixels
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut map = BTreeMap::<[u8; 3], u32>::new();
                for &color in chunk {
                    let key: [u8; 3] = color.into();
                    let entry = map.entry(key).or_insert(0);
                    *entry = entry
                        .checked_add(1)
                        .ok_or(PaletteError::CountOverflow { color: key })?;
                }
                Ok::<_, PaletteError>(map)
            })
            .try_reduce(BTreeMap::new, |mut a, b| {
                for (key, count) in b {
                    let entry = a.entry(key).or_insert(0);
                    *entry = entry
                        .checked_add(count)
                        .ok_or(PaletteError::CountOverflow { color: key })?;
                }
                Ok(a)
            })?;

        Self::from_sorted_map(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn assert_valid(histogram: &ColorHistogram) {
        let colors = histogram.colors();
        for i in 1..colors.len() {
            let a: [u8; 3] = colors[i - 1].into();
            let b: [u8; 3] = colors[i].into();
            assert!(a < b);
        }
        assert!(histogram.counts().iter().all(|&n| n > 0));
        assert_eq!(
            histogram.total_count(),
            histogram.counts().iter().copied().map(u64::from).sum::<u64>()
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(ColorHistogram::new([]), Err(PaletteError::EmptyHistogram));
        assert_eq!(
            ColorHistogram::from_pixels(&[]),
            Err(PaletteError::EmptyHistogram)
        );
        #[cfg(feature = "threads")]
        assert_eq!(
            ColorHistogram::from_pixels_par(&[]),
            Err(PaletteError::EmptyHistogram)
        );
    }

    #[test]
    fn zero_count() {
        let result = ColorHistogram::new([(Srgb::new(1, 2, 3), 4), (Srgb::new(4, 5, 6), 0)]);
        assert_eq!(result, Err(PaletteError::ZeroCount { color: [4, 5, 6] }));
    }

    #[test]
    fn count_overflow() {
        let color = Srgb::new(9, 9, 9);
        let result = ColorHistogram::new([(color, u32::MAX), (color, 1)]);
        assert_eq!(result, Err(PaletteError::CountOverflow { color: [9, 9, 9] }));
    }

    #[test]
    fn duplicates_are_summed() {
        let a = Srgb::new(10, 20, 30);
        let b = Srgb::new(0, 0, 0);
        let histogram = ColorHistogram::new([(a, 3), (b, 1), (a, 2)]).unwrap();
        assert_valid(&histogram);
        assert_eq!(histogram.colors(), &[b, a]);
        assert_eq!(histogram.counts(), &[1, 5]);
        assert_eq!(histogram.count_of(a), Some(5));
        assert_eq!(histogram.count_of(Srgb::new(1, 1, 1)), None);
    }

    #[test]
    fn reordered_input() {
        let colors = [test_data_1024().as_slice(); 3].concat();
        let mut reordered = colors.clone();
        reordered.shuffle(&mut Xoroshiro128PlusPlus::seed_from_u64(0));

        let expected = ColorHistogram::from_pixels(&colors).unwrap();
        let actual = ColorHistogram::from_pixels(&reordered).unwrap();
        assert_valid(&actual);
        assert_eq!(actual, expected);
        assert_eq!(actual.total_count(), 3 * 1024);

        #[cfg(feature = "threads")]
        assert_eq!(ColorHistogram::from_pixels_par(&reordered).unwrap(), expected);
    }

    #[test]
    #[cfg(feature = "image")]
    fn from_rgbimage() {
        let image = RgbImage::from_raw(3, 1, vec![1, 2, 3, 200, 100, 0, 1, 2, 3]).unwrap();
        let histogram = ColorHistogram::try_from_rgbimage(&image).unwrap();
        assert_valid(&histogram);
        assert_eq!(histogram.colors(), &[Srgb::new(1, 2, 3), Srgb::new(200, 100, 0)]);
        assert_eq!(histogram.counts(), &[2, 1]);

        let empty = RgbImage::new(0, 0);
        assert_eq!(
            ColorHistogram::try_from_rgbimage(&empty),
            Err(PaletteError::EmptyHistogram)
        );
    }

    #[test]
    fn retain_and_heaviest() {
        let histogram = ColorHistogram::new([
            (Srgb::new(0, 0, 0), 7),
            (Srgb::new(1, 1, 1), 9),
            (Srgb::new(2, 2, 2), 9),
        ])
        .unwrap();

        assert_eq!(histogram.heaviest(0..3), Some(1));
        assert_eq!(histogram.heaviest([0]), Some(0));
        assert_eq!(histogram.heaviest([]), None);

        let kept = histogram.retain(|c| c.red > 0).unwrap();
        assert_valid(&kept);
        assert_eq!(kept.num_colors(), 2);
        assert_eq!(kept.total_count(), 18);
        assert!(histogram.retain(|c| c.red > 5).is_none());
    }
}
