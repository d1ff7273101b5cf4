//! Compress and decompress the data formats of Cryo's 1992 *Dune*.
//!
//! * `HSQ` is an LZ77 variant used for nearly every packed resource in the game.
//!   See [`format`] for the layout.
//! * `F7` is a run length encoding used for save games. See [`f7`].
//!
//! Both work on whole buffers:
//! ```
//! let original = b"The spice must flow. The spice must flow.";
//!
//! let packed = hsq::hsq_compress(original).unwrap();
//! assert!(hsq::is_hsq(&packed));
//! assert_eq!(hsq::hsq_decompress(&packed).unwrap(), &original[..]);
//!
//! let save = hsq::f7_compress(original);
//! assert_eq!(hsq::f7_decompress(&save), &original[..]);
//! ```

mod bits;
mod decode;
mod encode;
mod errors;
pub mod f7;
pub mod format;

pub use decode::{decode, Decoder};
pub use encode::{encode, lz77::HsqSettings, EncoderBuilder, MAX_INPUT_SIZE};
pub use errors::HsqError;
pub use format::{HsqHeader, HSQ_SIGNATURE};

/// Decompress an `HSQ` file
pub fn hsq_decompress(data: &[u8]) -> Result<Vec<u8>, HsqError> {
    decode(data)
}

/// Compress `data` into an `HSQ` file
pub fn hsq_compress(data: &[u8]) -> Result<Vec<u8>, HsqError> {
    encode(data)
}

/// Read `(decompressed size, compressed size, checksum byte)` out of an `HSQ` header
/// without decompressing anything.
pub fn hsq_get_sizes(data: &[u8]) -> Result<(u16, u16, u8), HsqError> {
    let header = HsqHeader::from_bytes(data)?;
    Ok((
        header.decompressed_size,
        header.compressed_size,
        header.checksum,
    ))
}

/// Check if `data` starts with a header carrying the [`HSQ_SIGNATURE`]
pub fn is_hsq(data: &[u8]) -> bool {
    HsqHeader::from_bytes(data)
        .map(|h| h.is_signed())
        .unwrap_or(false)
}

/// Expand an `F7` encoded save game
pub fn f7_decompress(data: &[u8]) -> Vec<u8> {
    f7::decode(data)
}

/// Compress a save game with `F7` run length encoding
pub fn f7_compress(data: &[u8]) -> Vec<u8> {
    f7::encode(data)
}
