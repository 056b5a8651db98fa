use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{DiffAtlasError, Result};

/// Region name of the border strip left of the diff rect (tight mode).
pub const TIGHT_LEFT: &str = "_Tight-L";
/// Region name of the border strip right of the diff rect (tight mode).
pub const TIGHT_RIGHT: &str = "_Tight-R";
/// Region name of the border strip below the diff rect (tight mode).
pub const TIGHT_BOTTOM: &str = "_Tight-B";
/// Region name of the border strip above the diff rect (tight mode).
pub const TIGHT_TOP: &str = "_Tight-T";

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge coordinate (`x + w`).
    pub fn x_max(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn y_max(&self) -> u32 {
        self.y + self.h
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x_max() <= self.x_max() && r.y_max() <= self.y_max()
    }
    /// Returns true if `self` and `r` share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        self.x < r.x_max() && r.x < self.x_max() && self.y < r.y_max() && r.y < self.y_max()
    }
    /// Overlapping area of `self` and `r`, if any.
    pub fn intersection(&self, r: &Rect) -> Option<Rect> {
        let x = self.x.max(r.x);
        let y = self.y.max(r.y);
        let xm = self.x_max().min(r.x_max());
        let ym = self.y_max().min(r.y_max());
        (x < xm && y < ym).then(|| Rect::new(x, y, xm - x, ym - y))
    }
    /// Smallest rect containing `self` whose origin is rounded down to a
    /// `block` multiple and whose extent is rounded up to a `block` multiple.
    pub fn aligned_to(&self, block: u32) -> Rect {
        let x = self.x - self.x % block;
        let y = self.y - self.y % block;
        let w = (self.x_max() - x).next_multiple_of(block);
        let h = (self.y_max() - y).next_multiple_of(block);
        Rect::new(x, y, w, h)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
}

/// A named sub-rectangle placed inside the atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRegion {
    pub name: String,
    pub rect: Rect,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            rect,
        }
    }
}

/// Looks up a region by name; absent names are a `MissingRegion` error.
pub fn find_region(regions: &[NamedRegion], name: &str) -> Result<Rect> {
    regions
        .iter()
        .find(|r| r.name == name)
        .map(|r| r.rect)
        .ok_or_else(|| DiffAtlasError::MissingRegion(name.to_string()))
}

/// Output of detection: the pixel-exact diff rect and its block-aligned cover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffRegion {
    pub raw: Rect,
    pub aligned: Rect,
}

/// In-memory image handed to the pipeline (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Image decoded to RGBA once, ready for detection and packing.
pub struct PreparedImage {
    pub key: String,
    pub rgba: RgbaImage,
}

impl PreparedImage {
    pub fn new(key: impl Into<String>, rgba: RgbaImage) -> Self {
        Self {
            key: key.into(),
            rgba,
        }
    }
}

impl From<InputImage> for PreparedImage {
    fn from(inp: InputImage) -> Self {
        Self {
            key: inp.key,
            rgba: inp.image.to_rgba8(),
        }
    }
}
