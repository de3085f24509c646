//! Contains the builder structs for the supported palette generation methods.

use crate::kmeans::{Seeding, MAX_ITERATIONS};

/// A builder struct to specify the parameters for the octree quantizer.
///
/// No options currently exist, but future options can be specified here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeOptions {}

impl Default for OctreeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OctreeOptions {
    /// Creates a new [`OctreeOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

/// A builder struct to specify the parameters for k-means.
///
/// # Examples
/// ```
/// # use impressionist::{KmeansOptions, Seeding};
/// let options = KmeansOptions::new()
///     .seeding(Seeding::PlusPlus)
///     .seed(42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOptions {
    /// How the initial centers are chosen.
    pub(crate) seeding: Seeding,
    /// The seed value for the random number generator.
    pub(crate) seed: u64,
    /// The maximum number of assignment/update rounds.
    pub(crate) max_iterations: u32,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seeding: Seeding::Random,
            seed: 0,
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// Sets how the initial cluster centers are chosen.
    ///
    /// The default is [`Seeding::Random`].
    #[must_use]
    pub const fn seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the maximum number of iterations to run if the centers have not yet settled.
    ///
    /// At least one iteration is always run.
    /// The default is `100`.
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// The set of supported palette generation methods.
///
/// See the descriptions on each enum variant for more information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeMethod {
    /// Weighted k-means clustering.
    ///
    /// Each palette color is the most common color of its cluster,
    /// so every output color is present in the input.
    /// Combine this with [`ColorSpace::Lab`](crate::ColorSpace::Lab)
    /// to measure distances perceptually.
    ///
    /// See the [`kmeans`](crate::kmeans) module for more details.
    Kmeans(KmeansOptions),
    /// Octree quantization.
    ///
    /// Palette colors are averages of nearby colors and may not appear in the input.
    ///
    /// See the [`octree`](crate::octree) module for more details.
    Octree(OctreeOptions),
    /// Runs both k-means (with k-means++ seeding) and the octree quantizer,
    /// then returns the palette whose colors are more spread out in CIELAB.
    ///
    /// The seeding setting of the given options is ignored.
    Auto(KmeansOptions),
}

impl Default for QuantizeMethod {
    fn default() -> Self {
        Self::kmeans()
    }
}

impl QuantizeMethod {
    /// Creates a new [`QuantizeMethod::Kmeans`] with the default [`KmeansOptions`].
    #[must_use]
    pub const fn kmeans() -> Self {
        Self::Kmeans(KmeansOptions::new())
    }

    /// Creates a new [`QuantizeMethod::Octree`] with the default [`OctreeOptions`].
    #[must_use]
    pub const fn octree() -> Self {
        Self::Octree(OctreeOptions::new())
    }

    /// Creates a new [`QuantizeMethod::Auto`] with the default [`KmeansOptions`].
    #[must_use]
    pub const fn auto() -> Self {
        Self::Auto(KmeansOptions::new())
    }
}

impl From<KmeansOptions> for QuantizeMethod {
    fn from(options: KmeansOptions) -> Self {
        Self::Kmeans(options)
    }
}

impl From<OctreeOptions> for QuantizeMethod {
    fn from(options: OctreeOptions) -> Self {
        Self::Octree(options)
    }
}
