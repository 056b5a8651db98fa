use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffAtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("variant `{name}` is {actual_w}x{actual_h}, base is {expected_w}x{expected_h}")]
    DimensionMismatch {
        name: String,
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
    #[error("no pixels differ between the base image and the variants")]
    NoDifferences,
    #[error(
        "diff region {diff_w}x{diff_h} plus {block_size}px margins does not fit a single row in base height {base_h}"
    )]
    PackingInfeasible {
        diff_w: u32,
        diff_h: u32,
        base_h: u32,
        block_size: u32,
    },
    #[error("region `{0}` missing from the packed atlas")]
    MissingRegion(String),
}

pub type Result<T> = std::result::Result<T, DiffAtlasError>;
