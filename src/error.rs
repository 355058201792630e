use std::path::PathBuf;
use thiserror::Error;

/// Broad classes of failure, for mapping onto client-facing statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied bad configuration or unusable inputs
    InvalidInput,
    /// The build ran but could not produce an atlas
    BuildFatal,
    /// Anything else
    Internal,
}

#[derive(Error, Debug)]
pub enum TilesheetError {
    #[error("Invalid {field}: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid color '{0}': expected six hex digits like #ff00ff")]
    InvalidColor(String),

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to read input '{path}': {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No images provided")]
    NoImages,

    #[error("Too many images ({count}, max {max})")]
    TooManyInputs { count: usize, max: usize },

    #[error("Total upload size too large ({bytes} bytes, max {max})")]
    InputsTooLarge { bytes: u64, max: u64 },

    #[error("Failed to decode background image: {0}")]
    BackgroundDecode(image::ImageError),

    #[error("Missing shadow for {sprite}")]
    MissingShadow { sprite: String },

    #[error("No images to process")]
    NoSprites,

    #[error("Failed to encode atlas image: {0}")]
    ImageEncode(image::ImageError),

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG: {0}")]
    PngCompress(String),
}

impl TilesheetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TilesheetError::InvalidConfig { .. }
            | TilesheetError::ConfigParse { .. }
            | TilesheetError::InvalidColor(_)
            | TilesheetError::InputNotFound(_)
            | TilesheetError::InputRead { .. }
            | TilesheetError::NoImages
            | TilesheetError::TooManyInputs { .. }
            | TilesheetError::InputsTooLarge { .. }
            | TilesheetError::BackgroundDecode(_) => ErrorKind::InvalidInput,
            TilesheetError::MissingShadow { .. } | TilesheetError::NoSprites => {
                ErrorKind::BuildFatal
            }
            TilesheetError::ImageEncode(_)
            | TilesheetError::OutputWrite { .. }
            | TilesheetError::PngCompress(_) => ErrorKind::Internal,
        }
    }

    /// True for failures the caller can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidInput | ErrorKind::BuildFatal)
    }
}

/// Process exit status for a failed run: 2 when a client-facing
/// [`TilesheetError`] sits anywhere in the chain, 1 otherwise
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let client_error = err.chain().any(|cause| {
        cause
            .downcast_ref::<TilesheetError>()
            .is_some_and(TilesheetError::is_client_error)
    });
    if client_error { 2 } else { 1 }
}
