use crate::{bits::BitWriter, errors::HsqError, format::HsqHeader};
use std::io::Write;

mod hash_chain;
pub(crate) mod lz77;

use self::lz77::{HsqSettings, LzPass};

type LogWtr<'a> = &'a mut dyn Write;

/// Largest input whose size fits in the header
pub const MAX_INPUT_SIZE: usize = u16::MAX as usize;

/// Specify the encoding settings, such as match search depth, logging, and input.
///
/// To create a new `EncoderBuilder`, use [`for_bytes()`].
/// Then, change any of the encoding settings with `EncoderBuilder`'s helper methods.
/// Finally, encode the input data with [`encode_to_writer()`] or [`encode_to_vec()`].
/// ```
/// # use hsq::{EncoderBuilder, HsqSettings};
/// let input = b"ABBACABBCADFEGABA";
/// let compressed = EncoderBuilder::for_bytes(input)
///     .with_settings(HsqSettings { max_chain: 8, ..HsqSettings::default() })
///     .with_logging(&mut ::std::io::stdout())
///     .encode_to_vec();
/// ```
///
/// The default encoding settings are as follows:
/// * No logging
/// * LZ77 settings:
///   * 8192 byte window
///   * 257 byte longest match
///   * 64 hash chain links searched per byte
///   * short copies for nearby matches of 2 to 5 bytes
///
/// [`for_bytes()`]: EncoderBuilder::for_bytes
/// [`encode_to_writer()`]: EncoderBuilder::encode_to_writer
/// [`encode_to_vec()`]: EncoderBuilder::encode_to_vec
pub struct EncoderBuilder<'a> {
    input: &'a [u8],
    settings: HsqSettings,
    log: Option<LogWtr<'a>>,
}

impl<'a> EncoderBuilder<'a> {
    /// Create a new `EncoderBuilder` for the data the `bytes` slice.
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        Self {
            input: bytes,
            settings: HsqSettings::default(),
            log: None,
        }
    }

    /// Set the settings used for the underlying LZ77 compression. See [`HsqSettings`] for more details.
    #[inline]
    pub fn with_settings(&mut self, settings: HsqSettings) -> &mut Self {
        self.settings = settings;
        self
    }

    /// Write debugging and diagnostic information to `log` while the input is
    /// being encoded.
    #[inline]
    pub fn with_logging<L: Write>(&mut self, log: &'a mut L) -> &mut Self {
        self.log = Some(log as LogWtr);
        self
    }

    /// Start the encoding and write the compressed data out to `wtr`
    #[inline]
    pub fn encode_to_writer<W: Write>(&mut self, mut wtr: W) -> Result<(), HsqError> {
        let data = do_encode(self)?;
        wtr.write_all(&data).map_err(Into::into)
    }

    /// Start the encoding and return the compressed data in a `Vec<u8>`.
    #[inline]
    pub fn encode_to_vec(&mut self) -> Result<Vec<u8>, HsqError> {
        do_encode(self)
    }
}

/// Compress data into an `HSQ` `Vec<u8>`
///
/// This is a convenience function to encode a byte slice without having to
/// set up an [`EncoderBuilder`].
pub fn encode(bytes: &[u8]) -> Result<Vec<u8>, HsqError> {
    EncoderBuilder::for_bytes(bytes).encode_to_vec()
}

fn do_encode(opts: &mut EncoderBuilder<'_>) -> Result<Vec<u8>, HsqError> {
    let EncoderBuilder {
        input,
        settings,
        ref mut log,
    } = *opts;

    if input.len() > MAX_INPUT_SIZE {
        return Err(HsqError::SizeLimitExceeded {
            what: "input",
            size: input.len(),
        });
    }

    let parsed = lz77::compress_bytes(input, settings, log)?;

    write_file(&parsed, log)
}

fn write_file(encoded_data: &LzPass, log: &mut Option<LogWtr>) -> Result<Vec<u8>, HsqError> {
    // a literal costs nine bits, and a copy never costs more than it saves
    let capacity = encoded_data.decompressed_size + encoded_data.decompressed_size / 8 + 16;
    let mut out = BitWriter::with_capacity(capacity);

    for code in &encoded_data.buf {
        code.write(&mut out);
    }

    let body = out.finish();
    let total = HsqHeader::SIZE + body.len();
    // the decoder never reads the compressed size, so an incompressible input near
    // the size limit still round trips with the field wrapped to 16 bits
    if total > u16::MAX as usize {
        if let Some(wtr) = log.as_mut() {
            writeln!(wtr, "compressed size {} wraps in the header", total)?;
        }
    }

    let header = HsqHeader::new(encoded_data.decompressed_size as u16, total as u16);
    if let Some(wtr) = log.as_mut() {
        writeln!(wtr, "# Header\n{:?}", &header)?;
    }

    let mut file = Vec::with_capacity(total);
    file.extend_from_slice(&header.to_bytes());
    file.extend_from_slice(&body);

    Ok(file)
}
