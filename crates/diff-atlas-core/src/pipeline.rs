use image::RgbaImage;
use tracing::{info, instrument};

use crate::config::GeneratorConfig;
use crate::detect::detect_diff_region;
use crate::error::Result;
use crate::mesh::{build_full_rect, build_tight, BorderMeshes, Mesh};
use crate::model::{find_region, DiffRegion, InputImage, NamedRegion, PreparedImage};
use crate::pack::pack_atlas;
use crate::progress::Progress;

/// Output of a generation run: atlas pixels, placed regions, the renderable
/// mesh, and the detected diff region.
#[derive(Debug)]
pub struct GenerateOutput {
    pub atlas: RgbaImage,
    pub regions: Vec<NamedRegion>,
    pub mesh: Mesh,
    pub diff: DiffRegion,
}

/// Runs the whole pipeline: detect the diff region, pack the atlas, build
/// the mesh. Pure in-memory transformation; persisting the artifacts is the
/// caller's concern.
///
/// In tight mode the border strips get rectangular stand-in geometry;
/// callers with hand-tooled silhouettes can rebuild via `mesh::build_tight`
/// against the returned regions.
#[instrument(skip_all)]
pub fn generate(
    base: InputImage,
    variants: Vec<InputImage>,
    cfg: GeneratorConfig,
    progress: &dyn Progress,
) -> Result<GenerateOutput> {
    cfg.validate()?;
    let base = PreparedImage::from(base);
    let variants: Vec<PreparedImage> = variants.into_iter().map(PreparedImage::from).collect();

    let diff = detect_diff_region(&base.rgba, &variants, cfg.block_size, progress)?;
    info!(raw = ?diff.raw, aligned = ?diff.aligned, "diff region detected");

    let packed = pack_atlas(&base, &variants, &cfg, &diff)?;
    let atlas_size = packed.atlas.dimensions();

    let mesh = if cfg.tight_mesh {
        let borders = BorderMeshes::quads(&packed.regions, atlas_size, cfg.pixels_per_unit)?;
        build_tight(
            &packed.regions,
            &base.key,
            &cfg.diff_region_name,
            &borders,
            atlas_size,
            cfg.pixels_per_unit,
        )?
    } else {
        let base_rect = find_region(&packed.regions, &base.key)?;
        let diff_rect = find_region(&packed.regions, &cfg.diff_region_name)?;
        build_full_rect(&base_rect, &diff_rect, atlas_size, cfg.pixels_per_unit)
    };
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.indices.len() / 3,
        tight = cfg.tight_mesh,
        "mesh generated"
    );

    Ok(GenerateOutput {
        atlas: packed.atlas,
        regions: packed.regions,
        mesh,
        diff,
    })
}
