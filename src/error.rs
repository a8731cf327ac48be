// ============================================================================
// ERRORS
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not save '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported output format '{0}'")]
    UnsupportedFormat(String),

    #[error("no image loaded")]
    NoImage,

    #[error("no result to save yet")]
    NoResult,

    /// A user-supplied number failed to parse or is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl Error {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Short title used by the GUI notice windows.
    pub fn title(&self) -> &'static str {
        match self {
            Error::Load { .. } => "Load failed",
            Error::Save { .. } | Error::UnsupportedFormat(_) => "Save failed",
            Error::NoImage => "No image",
            Error::NoResult => "No result",
            Error::InvalidParameter { .. } => "Invalid input",
        }
    }
}
