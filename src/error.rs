use thiserror::Error;

/// Problems detected before any drawing starts.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),
    #[error("Texture Mapping requires a texture and the default checkerboard is disabled")]
    MissingTexture,
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Tile size must be at least 1")]
    InvalidTileSize,
    #[error("Focal length must be positive and finite, got {0}")]
    InvalidFocalLength(f32),
    #[error("Invalid sampling parameter {name}: {value}")]
    InvalidSampling { name: &'static str, value: f32 },
    #[error("Texture has {actual} texels, expected {expected}")]
    TextureSize { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
