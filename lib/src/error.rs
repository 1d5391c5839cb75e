use std::path::PathBuf;

use thiserror::Error;

/// Where to look when a font face cannot be opened
pub const FONT_HINT_URL: &str = "https://github.com/millionhz/textify#resolving-the-font-issue";

/// Errors produced while converting an image to text or rendering it back
#[derive(Error, Debug)]
pub enum TextifyError {
    /// Invalid option value, detected before any image work
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input image missing, unreadable, or not a decodable format
    #[error("cannot read input image {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Font face could not be opened at the requested size
    #[error(
        "font not found or unusable ({}): {reason}. Check this link to resolve the error: {}",
        .path.display(),
        FONT_HINT_URL
    )]
    FontLoad { path: PathBuf, reason: String },

    /// Destination for a text or image sink is not writable
    #[error("cannot write {}: {reason}", .path.display())]
    Output { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, TextifyError>;

impl TextifyError {
    pub(crate) fn output(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TextifyError::Output {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
