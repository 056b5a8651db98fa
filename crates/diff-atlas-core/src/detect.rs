use image::RgbaImage;
use tracing::{debug, instrument};

use crate::error::{DiffAtlasError, Result};
use crate::model::{DiffRegion, PreparedImage, Rect};
use crate::progress::Progress;

/// Scans `base` against every variant and returns the bounding rect of all
/// differing pixels, plus its `block_size`-aligned cover.
///
/// Fails with `DimensionMismatch` before any pixel work if a variant's size
/// differs from the base, and with `NoDifferences` when fewer than two
/// variants are supplied or no pixel differs.
#[instrument(skip_all, fields(variants = variants.len(), block_size))]
pub fn detect_diff_region(
    base: &RgbaImage,
    variants: &[PreparedImage],
    block_size: u32,
    progress: &dyn Progress,
) -> Result<DiffRegion> {
    if block_size == 0 {
        return Err(DiffAtlasError::InvalidConfig(
            "block_size must be at least 1".into(),
        ));
    }
    let (w, h) = base.dimensions();
    for v in variants {
        let (vw, vh) = v.rgba.dimensions();
        if (vw, vh) != (w, h) {
            return Err(DiffAtlasError::DimensionMismatch {
                name: v.key.clone(),
                expected_w: w,
                expected_h: h,
                actual_w: vw,
                actual_h: vh,
            });
        }
    }
    if variants.len() < 2 {
        return Err(DiffAtlasError::NoDifferences);
    }

    let stride = w as usize * 4;
    let base_raw: &[u8] = base.as_raw();
    let variant_raws: Vec<&[u8]> = variants.iter().map(|v| v.rgba.as_raw().as_slice()).collect();

    let mut min_x = u32::MAX;
    let mut max_x = 0u32;
    let mut min_y = u32::MAX;
    let mut max_y = 0u32;

    for y in 0..h {
        let row = y as usize * stride;
        let base_row = &base_raw[row..row + stride];
        // Whole-row slice compare first; most rows are untouched.
        let row_differs = variant_raws
            .iter()
            .any(|v| &v[row..row + stride] != base_row);
        if row_differs {
            for x in 0..w {
                let o = x as usize * 4;
                let px = &base_row[o..o + 4];
                if variant_raws.iter().any(|v| &v[row + o..row + o + 4] != px) {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        progress.report("scanning rows", (y + 1) as f32 / h as f32);
    }

    if min_x > max_x {
        return Err(DiffAtlasError::NoDifferences);
    }

    let raw = Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
    let aligned = raw.aligned_to(block_size);
    debug!(?raw, ?aligned, "diff region");
    Ok(DiffRegion { raw, aligned })
}
