//! A library for extracting a representative color palette and theme color from a color histogram.
//!
//! `impressionist` summarizes the dominant colors of an image without treating every pixel
//! as a separate sample: the input is a [`ColorHistogram`] mapping each distinct color to its pixel count.
//!
//! Two generators are provided, along with an automatic choice between them:
//! - [`kmeans`]: weighted k-means clustering with random or k-means++ seeding,
//!   optionally measuring distances in CIELAB.
//! - [`octree`]: octree quantization with level-wise merging of the least populated subtrees.
//! - [`QuantizeMethod::Auto`]: runs both and keeps the palette that is more spread out in CIELAB.
//!
//! Each generator first finds a theme color and classifies it as dark or light.
//! The palette is then drawn only from the matching half of the histogram,
//! so that palette colors stay visually consistent with the theme color.
//!
//! # Features
//! - `threads`: exposes parallel versions of some functions via [`rayon`].
//! - `image`: enables building histograms from the [`image`] crate's `RgbImage`.
//!
//! # High-Level API
//! To get started, see [`PalettePipeline`]:
//! ```
//! # use impressionist::{ColorHistogram, PalettePipeline, PaletteError, QuantizeMethod};
//! # use palette::Srgb;
//! # fn main() -> Result<(), PaletteError> {
//! let pixels = [Srgb::new(20, 40, 200), Srgb::new(20, 40, 200), Srgb::new(240, 200, 30)];
//! let histogram = ColorHistogram::from_pixels(&pixels)?;
//!
//! let result = PalettePipeline::new(&histogram)
//!     .palette_size(4u16.try_into()?)
//!     .ignore_white(true)
//!     .quantize_method(QuantizeMethod::auto())
//!     .palette();
//!
//! assert_eq!(result.palette.len(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! The [`PaletteGenerator`] trait offers the same operations on the option structs directly.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod error;
mod filter;
mod histogram;
mod traits;
mod types;

pub mod colorspace;
pub mod darkness;
pub mod kmeans;
pub mod octree;

pub use api::*;
pub use colorspace::{ColorSpace, Hsl, Hsv, Lab, Xyz};
pub use error::PaletteError;
pub use filter::{is_near_white, WHITE_THRESHOLD};
pub use histogram::ColorHistogram;
pub use kmeans::Seeding;
pub use traits::*;
pub use types::*;

/// The maximum supported number of palette colors is `256`.
pub const MAX_COLORS: u16 = u8::MAX as u16 + 1;
