//! Core library for packing character "expression variant" artwork.
//!
//! A base portrait plus N variants that differ only in a small region (mouth,
//! eyes) would normally cost N full-size textures. This crate instead:
//! - detects the minimal rectangle that differs across all variants
//!   (plus a block-aligned cover for compression safety),
//! - packs the base image and each variant's cropped diff region into one
//!   atlas, recording every placed sub-rectangle by name,
//! - generates a mesh split around the diff rect so switching expressions
//!   only rewrites the small diff quad's UVs.
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use diff_atlas_core::{generate, GeneratorConfig, InputImage, NullProgress};
//! # fn main() -> anyhow::Result<()> {
//! let base = InputImage { key: "chara".into(), image: ImageReader::open("chara.png")?.decode()? };
//! let variants = vec![
//!     InputImage { key: "smile".into(), image: ImageReader::open("smile.png")?.decode()? },
//!     InputImage { key: "angry".into(), image: ImageReader::open("angry.png")?.decode()? },
//! ];
//! let out = generate(base, variants, GeneratorConfig::default(), &NullProgress)?;
//! println!("atlas: {}x{}", out.atlas.width(), out.atlas.height());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod mesh;
pub mod model;
pub mod pack;
pub mod pipeline;
pub mod progress;

pub use config::*;
pub use detect::*;
pub use error::*;
pub use export::*;
pub use mesh::*;
pub use model::*;
pub use pack::*;
pub use pipeline::*;
pub use progress::*;

/// Convenience prelude for common types and functions.
/// Importing `diff_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{DiffRegionMode, GeneratorConfig, GeneratorConfigBuilder};
    pub use crate::detect::detect_diff_region;
    pub use crate::mesh::{build_full_rect, build_tight, BorderMeshes, Mesh};
    pub use crate::model::{DiffRegion, InputImage, NamedRegion, PreparedImage, Rect};
    pub use crate::pack::{pack_atlas, PackOutput};
    pub use crate::pipeline::{generate, GenerateOutput};
    pub use crate::progress::{NullProgress, Progress};
}
