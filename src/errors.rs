use std::io;
use thiserror::Error;

/// Possible errors that arise from attempting to convert an HSQ or F7 binary into its
/// decompressed data, or vise-versa.
#[derive(Error, Debug)]
pub enum HsqError {
    #[error("Invalid HSQ header: {0}")]
    FormatError(String),

    #[error("HSQ stream ended unexpectedly at offset {0:#06x}")]
    TruncatedStream(usize),

    #[error("{what} of {size} bytes does not fit in a 16-bit HSQ size field")]
    SizeLimitExceeded { what: &'static str, size: usize },

    #[error("Back-reference of {distance} bytes reaches before the start of {written} decoded bytes")]
    InvalidBackReference { distance: usize, written: usize },

    #[error("{0}")]
    Io(#[from] io::Error),
}
