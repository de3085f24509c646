//! Contains the types and functions for the high level pipeline builder API.

pub mod auto;
mod palette_pipeline;
mod quantize_method;

pub use palette_pipeline::PalettePipeline;
pub use quantize_method::*;
