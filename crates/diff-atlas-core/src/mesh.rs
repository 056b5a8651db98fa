use serde::{Deserialize, Serialize};

use crate::error::{DiffAtlasError, Result};
use crate::model::{
    find_region, NamedRegion, Rect, TIGHT_BOTTOM, TIGHT_LEFT, TIGHT_RIGHT, TIGHT_TOP,
};

/// Vertex positions (z = 0), matching-length UVs, and a triangle index list.
///
/// Conventions: pixel space is y-down with the origin at the atlas top-left;
/// local mesh space is y-up with the pivot at the base region's center;
/// UV origin is the atlas top-left.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Appends `other`, translating its vertices by `offset` and rebasing its
    /// indices past the current vertex count.
    pub fn append(&mut self, other: &Mesh, offset: [f32; 2]) {
        let rebase = self.positions.len() as u32;
        self.positions.extend(
            other
                .positions
                .iter()
                .map(|p| [p[0] + offset[0], p[1] + offset[1], p[2]]),
        );
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + rebase));
    }

    /// Axis-aligned quad spanning `(x0, y0)`..`(x1, y1)` in local space:
    /// 4 vertices, 2 triangles. Vertex order is bottom-left, top-left,
    /// top-right, bottom-right.
    pub fn quad(x0: f32, y0: f32, x1: f32, y1: f32, uv: [[f32; 2]; 4]) -> Mesh {
        Mesh {
            positions: vec![
                [x0, y0, 0.0],
                [x0, y1, 0.0],
                [x1, y1, 0.0],
                [x1, y0, 0.0],
            ],
            uvs: uv.to_vec(),
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Rectangular sub-mesh for `region`, centered on the region's own
    /// center. Stand-in border geometry for tight meshes when no hand-tooled
    /// silhouette is supplied.
    pub fn region_quad(region: &Rect, atlas: (u32, u32), ppu: f32) -> Mesh {
        let hw = region.w as f32 / (2.0 * ppu);
        let hh = region.h as f32 / (2.0 * ppu);
        Mesh::quad(-hw, -hh, hw, hh, region_uvs(region, atlas))
    }

    /// Rewrites the UVs of the diff quad (vertices 0..4) to point at another
    /// packed region, switching the displayed expression without touching
    /// the rest of the mesh.
    pub fn set_diff_quad_uvs(&mut self, uv: [[f32; 2]; 4]) -> Result<()> {
        if self.uvs.len() < 4 {
            return Err(DiffAtlasError::InvalidConfig(
                "mesh has no diff quad to retarget".into(),
            ));
        }
        self.uvs[..4].copy_from_slice(&uv);
        Ok(())
    }
}

/// UVs for `region` in quad vertex order (bottom-left first, UV origin at
/// the atlas top-left).
pub fn region_uvs(region: &Rect, atlas: (u32, u32)) -> [[f32; 2]; 4] {
    let aw = atlas.0 as f32;
    let ah = atlas.1 as f32;
    let u0 = region.x as f32 / aw;
    let u1 = region.x_max() as f32 / aw;
    let vt = region.y as f32 / ah;
    let vb = region.y_max() as f32 / ah;
    [[u0, vb], [u0, vt], [u1, vt], [u1, vb]]
}

/// Builds the 16-vertex / 10-triangle full-rect mesh: the base footprint
/// split around the diff rectangle so only vertices 0..4 (the diff quad)
/// need their UVs swapped at runtime.
///
/// Vertex layout (local space, y up):
///
/// ```text
///   05-06-12-15   y3
///   |  |   |  |
///   |  11 13  |
///   |  01-02  |   y2
///   |  |   |  |
///   |  00-03  |   y1
///   |  08 09  |
///   |  |   |  |
///   04-07-10-14   y0
///
///   x0 x1  x2 x3
/// ```
///
/// Seam vertices are duplicated on purpose (8/9/11/13 mirror 0/3/1/2) so
/// each border quad owns a full set of corners while the shared coordinates
/// keep the grid crack-free. Borders with zero width or height still emit
/// their (degenerate) quads, keeping vertex indices stable.
pub fn build_full_rect(base: &Rect, diff: &Rect, atlas: (u32, u32), ppu: f32) -> Mesh {
    let pivot_x = base.x as f32 + base.w as f32 / 2.0;
    let pivot_y = base.y as f32 + base.h as f32 / 2.0;
    let lx = |px: u32| (px as f32 - pivot_x) / ppu;
    let ly = |py: u32| (pivot_y - py as f32) / ppu;

    let (x0, x1, x2, x3) = (lx(base.x), lx(diff.x), lx(diff.x_max()), lx(base.x_max()));
    let (y0, y1, y2, y3) = (
        ly(base.y_max()),
        ly(diff.y_max()),
        ly(diff.y),
        ly(base.y),
    );

    let aw = atlas.0 as f32;
    let ah = atlas.1 as f32;
    let u = |px: u32| px as f32 / aw;
    let v = |py: u32| py as f32 / ah;
    let (u0, u1, u2, u3) = (u(base.x), u(diff.x), u(diff.x_max()), u(base.x_max()));
    let (v0, v1, v2, v3) = (
        v(base.y_max()),
        v(diff.y_max()),
        v(diff.y),
        v(base.y),
    );

    let positions = vec![
        // diff quad
        [x1, y1, 0.0],
        [x1, y2, 0.0],
        [x2, y2, 0.0],
        [x2, y1, 0.0],
        // left column
        [x0, y0, 0.0],
        [x0, y3, 0.0],
        [x1, y3, 0.0],
        [x1, y0, 0.0],
        // seam duplicates and right column
        [x1, y1, 0.0],
        [x2, y1, 0.0],
        [x2, y0, 0.0],
        [x1, y2, 0.0],
        [x2, y3, 0.0],
        [x2, y2, 0.0],
        [x3, y0, 0.0],
        [x3, y3, 0.0],
    ];

    let uvs = vec![
        [u1, v1],
        [u1, v2],
        [u2, v2],
        [u2, v1],
        [u0, v0],
        [u0, v3],
        [u1, v3],
        [u1, v0],
        [u1, v1],
        [u2, v1],
        [u2, v0],
        [u1, v2],
        [u2, v3],
        [u2, v2],
        [u3, v0],
        [u3, v3],
    ];

    let indices = vec![
        // center (the swappable diff quad)
        0, 1, 2, 2, 3, 0,
        // left border
        4, 5, 6, 6, 7, 4,
        // below the diff quad
        7, 8, 9, 9, 10, 7,
        // above the diff quad
        11, 6, 12, 12, 13, 11,
        // right border
        10, 12, 15, 15, 14, 10,
    ];

    Mesh {
        positions,
        uvs,
        indices,
    }
}

/// Externally tessellated border geometry for `build_tight`, one sub-mesh
/// per strip, each local to its own region center.
#[derive(Debug)]
pub struct BorderMeshes {
    pub left: Mesh,
    pub right: Mesh,
    pub bottom: Mesh,
    pub top: Mesh,
}

impl BorderMeshes {
    /// Rectangular stand-in borders built straight from the packed strip
    /// regions.
    pub fn quads(regions: &[NamedRegion], atlas: (u32, u32), ppu: f32) -> Result<Self> {
        Ok(Self {
            left: Mesh::region_quad(&find_region(regions, TIGHT_LEFT)?, atlas, ppu),
            right: Mesh::region_quad(&find_region(regions, TIGHT_RIGHT)?, atlas, ppu),
            bottom: Mesh::region_quad(&find_region(regions, TIGHT_BOTTOM)?, atlas, ppu),
            top: Mesh::region_quad(&find_region(regions, TIGHT_TOP)?, atlas, ppu),
        })
    }
}

/// Assembles the diff quad with the four border sub-meshes, translating each
/// border so its local origin lands on its region's offset from the base
/// region's center, then concatenating everything into one buffer.
///
/// Every named region this strategy relies on (base, diff summary, four
/// borders) must be present, else `MissingRegion` names the absentee.
pub fn build_tight(
    regions: &[NamedRegion],
    base_name: &str,
    diff_name: &str,
    borders: &BorderMeshes,
    atlas: (u32, u32),
    ppu: f32,
) -> Result<Mesh> {
    let base = find_region(regions, base_name)?;
    let diff = find_region(regions, diff_name)?;
    let left = find_region(regions, TIGHT_LEFT)?;
    let right = find_region(regions, TIGHT_RIGHT)?;
    let bottom = find_region(regions, TIGHT_BOTTOM)?;
    let top = find_region(regions, TIGHT_TOP)?;

    let pivot_x = base.x as f32 + base.w as f32 / 2.0;
    let pivot_y = base.y as f32 + base.h as f32 / 2.0;
    let lx = |px: u32| (px as f32 - pivot_x) / ppu;
    let ly = |py: u32| (pivot_y - py as f32) / ppu;

    let mut mesh = Mesh::quad(
        lx(diff.x),
        ly(diff.y_max()),
        lx(diff.x_max()),
        ly(diff.y),
        region_uvs(&diff, atlas),
    );

    let offset = |r: &Rect| -> [f32; 2] {
        let cx = r.x as f32 + r.w as f32 / 2.0;
        let cy = r.y as f32 + r.h as f32 / 2.0;
        [(cx - pivot_x) / ppu, (pivot_y - cy) / ppu]
    };
    mesh.append(&borders.left, offset(&left));
    mesh.append(&borders.bottom, offset(&bottom));
    mesh.append(&borders.top, offset(&top));
    mesh.append(&borders.right, offset(&right));
    Ok(mesh)
}
