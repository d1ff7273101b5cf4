//! Information and structures for `HSQ` files.
//!
//! An `HSQ` file is a six byte header followed by an LZ77 command stream.
//!
//! ## Header
//! All multi-byte values are little endian. The key data can be extracted into an
//! [`HsqHeader`] by using [`hsq_get_sizes()`] or [`HsqHeader::from_bytes`].
//!
//! | Byte Num | Description |
//! | :------: | ----------- |
//! | 0..2     | size of the decompressed data |
//! | 2        | checksum byte (usually `0`) |
//! | 3..5     | size of the compressed file, header included |
//! | 5        | checksum byte |
//!
//! The six header bytes always sum to `0xAB` (modulo 256). The game never checks this,
//! but archive readers use it to tell `HSQ` members apart from raw data.
//! See [`is_hsq()`].
//!
//! ## Command Stream
//! The body mixes raw bytes with control bits. Control bits are packed low bit first
//! into little endian 16-bit words. A control word is read the first time a bit is needed
//! after the previous word ran dry, so any raw bytes that follow the last bit of a word
//! come *before* the next control word in the file.
//!
//! | Bits  | Command | Raw data that follows |
//! | ----- | ------- | --------------------- |
//! | `1`   | literal | the byte |
//! | `00cc`| short copy of `cc + 2` bytes | `u8` offset, `offset - 256` |
//! | `01`  | long copy | `u16` word: `ccc` in bits 0..3, offset in bits 3..16, `offset - 8192` |
//!
//! A long copy with `ccc == 0` is followed by an extra byte holding the real count.
//! If that byte is also `0`, the stream is over.
//! Copies run one byte at a time, so a copy may overlap the bytes it produces.
//!
//! ## An Example
//! Let's encode the two bytes "AB":
//! ```text
//! Header
//! 02 00 <- two bytes when decompressed
//! 00    <- checksum byte
//! 0D 00 <- thirteen bytes in the file
//! 9C    <- checksum byte: 0x02 + 0x0D + 0x9C == 0xAB
//!
//! Body
//! 0B 00 <- control word 0b1011: literal, literal, long copy
//! 41    <- uncoded ascii 'A'
//! 42    <- uncoded ascii 'B'
//! 00 00 <- long copy word with a zero count
//! 00    <- zero extra count: end of stream
//! ```
//! [`hsq_get_sizes()`]: crate::hsq_get_sizes
//! [`is_hsq()`]: crate::is_hsq

use crate::errors::HsqError;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// The value that the six header bytes of an `HSQ` file sum to
pub const HSQ_SIGNATURE: u8 = 0xAB;

/// The information stored at the start of an `HSQ` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HsqHeader {
    /// size of decompressed data
    pub decompressed_size: u16,
    /// first checksum byte; the original tools call this "the" checksum
    pub checksum: u8,
    /// size of the whole compressed file, header included
    pub compressed_size: u16,
    /// second checksum byte
    pub checksum2: u8,
}

impl HsqHeader {
    /// Size in bytes of the header
    pub const SIZE: usize = 6;

    /// Create a header for the given sizes, solving the final checksum byte
    /// so that the header carries the [`HSQ_SIGNATURE`].
    pub fn new(decompressed_size: u16, compressed_size: u16) -> Self {
        let mut header = Self {
            decompressed_size,
            checksum: 0,
            compressed_size,
            checksum2: 0,
        };
        header.checksum2 = HSQ_SIGNATURE.wrapping_sub(header.checksum_sum());

        header
    }

    /// Parse an `HSQ` header from the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self, HsqError> {
        if data.len() < Self::SIZE {
            return Err(HsqError::FormatError(format!(
                "need {} header bytes, found {}",
                Self::SIZE,
                data.len()
            )));
        }

        Ok(Self {
            decompressed_size: LittleEndian::read_u16(&data[0..2]),
            checksum: data[2],
            compressed_size: LittleEndian::read_u16(&data[3..5]),
            checksum2: data[5],
        })
    }

    /// Serialize `self` into the six byte on-disk form
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        LittleEndian::write_u16(&mut out[0..2], self.decompressed_size);
        out[2] = self.checksum;
        LittleEndian::write_u16(&mut out[3..5], self.compressed_size);
        out[5] = self.checksum2;

        out
    }

    /// Sum of all six header bytes, modulo 256
    pub fn checksum_sum(&self) -> u8 {
        self.to_bytes().iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
    }

    /// Does this header sum to the [`HSQ_SIGNATURE`]?
    pub fn is_signed(&self) -> bool {
        self.checksum_sum() == HSQ_SIGNATURE
    }
}

impl fmt::Display for HsqHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} bytes -> {} bytes (checksum {:#04x}, sum {:#04x})",
            self.compressed_size,
            self.decompressed_size,
            self.checksum,
            self.checksum_sum()
        )
    }
}
