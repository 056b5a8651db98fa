use diff_atlas_core::config::{DiffRegionMode, GeneratorConfig};
use diff_atlas_core::error::DiffAtlasError;
use diff_atlas_core::model::TIGHT_LEFT;

#[test]
fn defaults_match_documented_values() {
    let cfg = GeneratorConfig::default();
    assert_eq!(cfg.block_size, 4);
    assert_eq!(cfg.diff_region_name, "Default");
    assert!(!cfg.tight_mesh);
    assert_eq!(cfg.diff_region_mode, DiffRegionMode::BlockAligned);
    assert!(!cfg.extrude_slots);
    assert_eq!(cfg.pixels_per_unit, 100.0);
    cfg.validate().unwrap();
}

#[test]
fn builder_sets_every_field() {
    let cfg = GeneratorConfig::builder()
        .block_size(8)
        .diff_region_name("Mouth")
        .tight_mesh(true)
        .diff_region_mode(DiffRegionMode::Raw)
        .extrude_slots(true)
        .pixels_per_unit(32.0)
        .build();
    assert_eq!(cfg.block_size, 8);
    assert_eq!(cfg.diff_region_name, "Mouth");
    assert!(cfg.tight_mesh);
    assert_eq!(cfg.diff_region_mode, DiffRegionMode::Raw);
    assert!(cfg.extrude_slots);
    assert_eq!(cfg.pixels_per_unit, 32.0);
    cfg.validate().unwrap();
}

#[test]
fn zero_block_size_is_invalid() {
    let cfg = GeneratorConfig::builder().block_size(0).build();
    assert!(matches!(
        cfg.validate(),
        Err(DiffAtlasError::InvalidConfig(_))
    ));
}

#[test]
fn empty_diff_region_name_is_invalid() {
    let cfg = GeneratorConfig::builder().diff_region_name("").build();
    assert!(matches!(
        cfg.validate(),
        Err(DiffAtlasError::InvalidConfig(_))
    ));
}

#[test]
fn pixels_per_unit_must_be_finite_and_positive() {
    for ppu in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let cfg = GeneratorConfig::builder().pixels_per_unit(ppu).build();
        assert!(
            matches!(cfg.validate(), Err(DiffAtlasError::InvalidConfig(_))),
            "ppu {ppu} should be rejected"
        );
    }
}

#[test]
fn border_region_names_are_reserved_in_tight_mode() {
    let cfg = GeneratorConfig::builder()
        .diff_region_name(TIGHT_LEFT)
        .tight_mesh(true)
        .build();
    assert!(matches!(
        cfg.validate(),
        Err(DiffAtlasError::InvalidConfig(_))
    ));

    // without the tight mesh nothing else claims the name
    let cfg = GeneratorConfig::builder().diff_region_name(TIGHT_LEFT).build();
    cfg.validate().unwrap();
}

#[test]
fn mode_parses_from_cli_spellings() {
    assert_eq!("raw".parse(), Ok(DiffRegionMode::Raw));
    assert_eq!("aligned".parse(), Ok(DiffRegionMode::BlockAligned));
    assert_eq!("block_aligned".parse(), Ok(DiffRegionMode::BlockAligned));
    assert_eq!("ALIGNED".parse(), Ok(DiffRegionMode::BlockAligned));
    assert!("tight".parse::<DiffRegionMode>().is_err());
}

#[test]
fn empty_document_deserializes_to_defaults() {
    let cfg: GeneratorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg.block_size, 4);
    assert_eq!(cfg.diff_region_name, "Default");
    assert_eq!(cfg.diff_region_mode, DiffRegionMode::BlockAligned);
}

#[test]
fn mode_round_trips_through_serde() {
    let json = serde_json::to_string(&DiffRegionMode::BlockAligned).unwrap();
    assert_eq!(json, "\"block_aligned\"");
    let back: DiffRegionMode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, DiffRegionMode::BlockAligned);
}
