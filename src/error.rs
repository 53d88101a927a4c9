use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up a scene or exporting a frame.
///
/// Rendering itself never fails: degenerate or out-of-range triangles are dropped
/// and counted in the frame statistics instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error on '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load OBJ '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("framebuffer is empty ({width}x{height})")]
    EmptyFramebuffer { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;
