use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde_json::{json, Value};

use crate::error::Result;
use crate::model::NamedRegion;

/// Region sheet as a TexturePacker-like JSON hash:
/// `{ frames: { name: { frame: {x,y,w,h}, ... } }, meta }`.
/// Downstream slicers consume this to cut the atlas back into sprites.
pub fn regions_to_json(atlas_size: (u32, u32), regions: &[NamedRegion]) -> Value {
    let mut frames = serde_json::Map::new();
    for r in regions {
        frames.insert(
            r.name.clone(),
            json!({
                "frame": {"x": r.rect.x, "y": r.rect.y, "w": r.rect.w, "h": r.rect.h},
                "rotated": false,
                "trimmed": false,
                "pivot": {"x": 0.5, "y": 0.5},
            }),
        );
    }
    json!({
        "frames": frames,
        "meta": {
            "app": "diff-atlas",
            "version": env!("CARGO_PKG_VERSION"),
            "format": "RGBA8888",
            "size": {"w": atlas_size.0, "h": atlas_size.1},
        }
    })
}

/// Encodes the atlas as PNG bytes (lossless; pixel values round-trip).
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}
