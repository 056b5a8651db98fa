use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::model::{TIGHT_BOTTOM, TIGHT_LEFT, TIGHT_RIGHT, TIGHT_TOP};

/// Which rectangle the diff-summary region (and the tight border strips)
/// record: the pixel-exact raw rect, or the block-aligned cover.
///
/// Aligned keeps compression blocks intact across the swap boundary; raw
/// gives the smallest possible swap quad.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiffRegionMode {
    Raw,
    BlockAligned,
}

impl FromStr for DiffRegionMode {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "aligned" | "block_aligned" => Ok(Self::BlockAligned),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Compression block granularity in pixels; packed rects snap to multiples.
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    /// Name recorded for the diff-summary region inside the base slot.
    #[serde(default = "default_diff_region_name")]
    pub diff_region_name: String,
    /// Emit the four border strip regions and build the tight mesh.
    #[serde(default)]
    pub tight_mesh: bool,
    /// Raw vs block-aligned rect for the diff-summary region.
    #[serde(default = "default_diff_region_mode")]
    pub diff_region_mode: DiffRegionMode,
    /// Replicate each packed slot's edge pixels into its margin after packing,
    /// so compression-block bleed samples artwork instead of transparency.
    #[serde(default)]
    pub extrude_slots: bool,
    /// Scale dividing pixel coordinates into local mesh units.
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            diff_region_name: default_diff_region_name(),
            tight_mesh: false,
            diff_region_mode: default_diff_region_mode(),
            extrude_slots: false,
            pixels_per_unit: default_pixels_per_unit(),
        }
    }
}

impl GeneratorConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::DiffAtlasError;

        if self.block_size == 0 {
            return Err(DiffAtlasError::InvalidConfig(
                "block_size must be at least 1".into(),
            ));
        }
        if !(self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0) {
            return Err(DiffAtlasError::InvalidConfig(format!(
                "pixels_per_unit must be positive, got {}",
                self.pixels_per_unit
            )));
        }
        if self.diff_region_name.is_empty() {
            return Err(DiffAtlasError::InvalidConfig(
                "diff_region_name must not be empty".into(),
            ));
        }
        let reserved = [TIGHT_LEFT, TIGHT_RIGHT, TIGHT_BOTTOM, TIGHT_TOP];
        if self.tight_mesh && reserved.contains(&self.diff_region_name.as_str()) {
            return Err(DiffAtlasError::InvalidConfig(format!(
                "diff_region_name `{}` collides with a border region name",
                self.diff_region_name
            )));
        }
        Ok(())
    }

    /// Create a fluent builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }
}

fn default_block_size() -> u32 {
    4
}
fn default_diff_region_name() -> String {
    "Default".into()
}
fn default_diff_region_mode() -> DiffRegionMode {
    DiffRegionMode::BlockAligned
}
fn default_pixels_per_unit() -> f32 {
    100.0
}

/// Builder for `GeneratorConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct GeneratorConfigBuilder {
    cfg: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: GeneratorConfig::default(),
        }
    }
    pub fn block_size(mut self, v: u32) -> Self {
        self.cfg.block_size = v;
        self
    }
    pub fn diff_region_name(mut self, v: impl Into<String>) -> Self {
        self.cfg.diff_region_name = v.into();
        self
    }
    pub fn tight_mesh(mut self, v: bool) -> Self {
        self.cfg.tight_mesh = v;
        self
    }
    pub fn diff_region_mode(mut self, v: DiffRegionMode) -> Self {
        self.cfg.diff_region_mode = v;
        self
    }
    pub fn extrude_slots(mut self, v: bool) -> Self {
        self.cfg.extrude_slots = v;
        self
    }
    pub fn pixels_per_unit(mut self, v: f32) -> Self {
        self.cfg.pixels_per_unit = v;
        self
    }
    pub fn build(self) -> GeneratorConfig {
        self.cfg
    }
}
