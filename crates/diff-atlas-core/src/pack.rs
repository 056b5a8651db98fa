use image::RgbaImage;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

use crate::compositing::{copy_rect, extrude_edges};
use crate::config::{DiffRegionMode, GeneratorConfig};
use crate::error::{DiffAtlasError, Result};
use crate::model::{
    DiffRegion, NamedRegion, PreparedImage, Rect, TIGHT_BOTTOM, TIGHT_LEFT, TIGHT_RIGHT, TIGHT_TOP,
};

/// Output of a packing run: the atlas pixels and every placed region.
#[derive(Debug)]
pub struct PackOutput {
    pub atlas: RgbaImage,
    pub regions: Vec<NamedRegion>,
}

/// Packs the base image and each variant's diff crop into a single atlas.
///
/// Layout: the base occupies the left edge verbatim; diff crops stack
/// row-major into columns to its right, each crop surrounded by a
/// `block_size` margin so neighboring slots cannot bleed into each other
/// under block compression.
#[instrument(skip_all, fields(variants = variants.len()))]
pub fn pack_atlas(
    base: &PreparedImage,
    variants: &[PreparedImage],
    cfg: &GeneratorConfig,
    diff: &DiffRegion,
) -> Result<PackOutput> {
    let (base_w, base_h) = base.rgba.dimensions();
    let block = cfg.block_size;
    let aligned = diff.aligned;
    let slot_w = aligned.w + 2 * block;
    let slot_h = aligned.h + 2 * block;

    let rows = base_h / slot_h;
    if rows == 0 {
        return Err(DiffAtlasError::PackingInfeasible {
            diff_w: aligned.w,
            diff_h: aligned.h,
            base_h,
            block_size: block,
        });
    }
    let cols = (variants.len() as u32).div_ceil(rows);

    let atlas_w = base_w + block + cols * slot_w;
    let atlas_h = base_h;
    // RgbaImage::new zero-fills, so unwritten padding stays fully transparent.
    let mut atlas = RgbaImage::new(atlas_w, atlas_h);

    let base_rect = Rect::new(0, 0, base_w, base_h);
    copy_rect(&base.rgba, &mut atlas, base_rect, 0, 0);

    // The aligned rect's rounded-up extent can overhang the base edge; the
    // summary region is clipped the same way the crop copies are.
    let summary = match cfg.diff_region_mode {
        DiffRegionMode::Raw => diff.raw,
        DiffRegionMode::BlockAligned => aligned,
    };
    let summary = summary.intersection(&base_rect).unwrap_or(diff.raw);

    let mut regions = Vec::with_capacity(variants.len() + 6);
    regions.push(NamedRegion::new(base.key.clone(), base_rect));
    regions.push(NamedRegion::new(cfg.diff_region_name.clone(), summary));

    for (i, v) in variants.iter().enumerate() {
        let col = i as u32 / rows;
        let row = i as u32 % rows;
        let sx = base_w + 2 * block + col * slot_w;
        let sy = row * slot_h + block;
        copy_rect(&v.rgba, &mut atlas, aligned, sx, sy);
        if cfg.extrude_slots {
            extrude_edges(&mut atlas, Rect::new(sx, sy, aligned.w, aligned.h), block);
        }
        // The recorded rect matches the summary rect's size so a UV swap
        // between the summary and any variant maps texel for texel.
        let rect = Rect::new(
            sx + (summary.x - aligned.x),
            sy + (summary.y - aligned.y),
            summary.w,
            summary.h,
        );
        debug!(key = %v.key, ?rect, col, row, "placed variant");
        regions.push(NamedRegion::new(v.key.clone(), rect));
    }

    if cfg.tight_mesh {
        let d = summary;
        regions.push(NamedRegion::new(
            TIGHT_LEFT,
            Rect::new(base_rect.x, base_rect.y, d.x - base_rect.x, base_rect.h),
        ));
        regions.push(NamedRegion::new(
            TIGHT_RIGHT,
            Rect::new(d.x_max(), base_rect.y, base_rect.x_max() - d.x_max(), base_rect.h),
        ));
        regions.push(NamedRegion::new(
            TIGHT_TOP,
            Rect::new(d.x, base_rect.y, d.w, d.y - base_rect.y),
        ));
        regions.push(NamedRegion::new(
            TIGHT_BOTTOM,
            Rect::new(d.x, d.y_max(), d.w, base_rect.y_max() - d.y_max()),
        ));
    }

    let mut seen = HashSet::new();
    for r in &regions {
        if !seen.insert(r.name.as_str()) {
            return Err(DiffAtlasError::InvalidConfig(format!(
                "duplicate region name `{}`",
                r.name
            )));
        }
    }

    info!(atlas_w, atlas_h, rows, cols, regions = regions.len(), "packed atlas");
    Ok(PackOutput { atlas, regions })
}
