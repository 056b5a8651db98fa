use diff_atlas_core::error::DiffAtlasError;
use diff_atlas_core::mesh::region_uvs;
use diff_atlas_core::prelude::*;
use image::{DynamicImage, Rgba, RgbaImage};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(rgba))
}

fn input(key: &str, rgba: RgbaImage) -> InputImage {
    InputImage {
        key: key.into(),
        image: DynamicImage::ImageRgba8(rgba),
    }
}

fn inputs() -> (InputImage, Vec<InputImage>) {
    let base = solid(64, 64, WHITE);
    let mut a = solid(64, 64, WHITE);
    a.put_pixel(10, 10, Rgba(RED));
    let mut b = solid(64, 64, WHITE);
    b.put_pixel(12, 12, Rgba(BLUE));
    (
        input("chara", base),
        vec![input("smile", a), input("angry", b)],
    )
}

#[test]
fn full_rect_run_produces_consistent_triple() {
    let (base, variants) = inputs();
    let out = generate(base, variants, GeneratorConfig::default(), &NullProgress).unwrap();

    assert_eq!(out.diff.raw, Rect::new(10, 10, 3, 3));
    assert_eq!(out.diff.aligned, Rect::new(8, 8, 8, 8));
    assert_eq!(out.atlas.dimensions(), (84, 64));

    let names: Vec<&str> = out.regions.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["chara", "Default", "smile", "angry"]);

    assert_eq!(out.mesh.vertex_count(), 16);
    assert_eq!(out.mesh.indices.len(), 30);

    // the red pixel survives packing at its slot-relative offset
    let smile = out.regions.iter().find(|r| r.name == "smile").unwrap();
    assert_eq!(
        out.atlas.get_pixel(smile.rect.x + 2, smile.rect.y + 2).0,
        RED
    );
}

#[test]
fn tight_run_adds_border_regions_and_mesh() {
    let (base, variants) = inputs();
    let cfg = GeneratorConfig::builder().tight_mesh(true).build();
    let out = generate(base, variants, cfg, &NullProgress).unwrap();

    assert_eq!(out.regions.len(), 8);
    // diff quad (4) + four rectangular stand-in borders (4 each)
    assert_eq!(out.mesh.vertex_count(), 20);
    assert_eq!(out.mesh.indices.len(), 30);
    let n = out.mesh.vertex_count() as u32;
    assert!(out.mesh.indices.iter().all(|&i| i < n));
}

#[test]
fn no_differences_skips_packing() {
    let base = solid(32, 32, WHITE);
    let variants = vec![
        input("a", solid(32, 32, WHITE)),
        input("b", solid(32, 32, WHITE)),
    ];
    let err = generate(
        input("chara", base),
        variants,
        GeneratorConfig::default(),
        &NullProgress,
    )
    .unwrap_err();
    assert!(matches!(err, DiffAtlasError::NoDifferences));
}

#[test]
fn dimension_mismatch_aborts_with_offender() {
    let (base, mut variants) = inputs();
    variants.push(input("short", solid(64, 32, WHITE)));
    let err = generate(base, variants, GeneratorConfig::default(), &NullProgress).unwrap_err();
    match err {
        DiffAtlasError::DimensionMismatch { name, .. } => assert_eq!(name, "short"),
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn invalid_config_rejected_before_any_work() {
    let (base, variants) = inputs();
    let cfg = GeneratorConfig::builder().block_size(0).build();
    let err = generate(base, variants, cfg, &NullProgress).unwrap_err();
    assert!(matches!(err, DiffAtlasError::InvalidConfig(_)));
}

#[test]
fn swapping_diff_quad_uvs_targets_a_variant_slot() {
    let (base, variants) = inputs();
    let out = generate(base, variants, GeneratorConfig::default(), &NullProgress).unwrap();
    let mut mesh = out.mesh.clone();
    let angry = out.regions.iter().find(|r| r.name == "angry").unwrap();
    let uv = region_uvs(&angry.rect, out.atlas.dimensions());
    mesh.set_diff_quad_uvs(uv).unwrap();
    assert_eq!(&mesh.uvs[..4], &uv);
    // everything outside the diff quad is untouched
    assert_eq!(mesh.uvs[4..], out.mesh.uvs[4..]);
    assert_eq!(mesh.positions, out.mesh.positions);
}

#[test]
fn atlas_round_trips_through_png() {
    let (base, variants) = inputs();
    let out = generate(base, variants, GeneratorConfig::default(), &NullProgress).unwrap();
    let bytes = diff_atlas_core::encode_png(&out.atlas).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), out.atlas.dimensions());
    assert_eq!(decoded.as_raw(), out.atlas.as_raw());
}
