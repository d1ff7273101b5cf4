use crate::bits::BitReader;
use crate::errors::HsqError;
use crate::format::HsqHeader;
use std::io::Write;

type LogWtr<'a> = &'a mut dyn Write;

/// Specify the decoding settings, such as logging and header validation.
///
/// To create a new `Decoder`, use [`for_bytes()`]. Then, change any of the decoder settings.
/// Finally, decode the input data with [`decode()`].
/// ```
/// # use hsq::{EncoderBuilder, Decoder};
/// let original = b"ABBACABBACD";
/// let compressed = EncoderBuilder::for_bytes(original)
///     .encode_to_vec()
///     .unwrap();
/// let decompressed = Decoder::for_bytes(&compressed)
///     .decode()
///     .unwrap();
/// assert_eq!(&original[..], decompressed);
/// ```
/// You can use a `Decoder` to get the [`HsqHeader`] with [`header()`]:
/// ```
/// # use hsq::{EncoderBuilder, Decoder};
/// # let original = b"ABBACABBACD";
/// # let compressed = EncoderBuilder::for_bytes(original).encode_to_vec().unwrap();
/// let decoder = Decoder::for_bytes(&compressed);
/// let size = decoder.header().unwrap().decompressed_size as usize;
/// assert_eq!(size, original.len());
/// ```
/// [`for_bytes()`]: Decoder::for_bytes
/// [`decode()`]: Decoder::decode
/// [`header()`]: Decoder::header
pub struct Decoder<'a> {
    src: &'a [u8],
    log: Option<LogWtr<'a>>,
    strict: bool,
}

impl<'a> Decoder<'a> {
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        Self {
            src: bytes,
            log: None,
            strict: false,
        }
    }

    /// Write a trace of every decoded command to `wtr`
    #[inline]
    pub fn with_logging<W: Write>(&mut self, wtr: &'a mut W) -> &mut Self {
        self.log = Some(wtr as LogWtr);
        self
    }

    /// Reject input whose header bytes do not sum to the `HSQ` signature.
    /// The game itself never checks, so this is off by default.
    #[inline]
    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    #[inline]
    pub fn header(&self) -> Result<HsqHeader, HsqError> {
        HsqHeader::from_bytes(self.src)
    }

    #[inline]
    pub fn decode(&mut self) -> Result<Vec<u8>, HsqError> {
        do_decode(self)
    }
}

/// Decompress `HSQ` data into a `Vec<u8>`
///
/// This is a convenience function to decode a byte slice without
/// having to set up a [`Decoder`]
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>, HsqError> {
    Decoder::for_bytes(bytes).decode()
}

fn do_decode(opt: &mut Decoder) -> Result<Vec<u8>, HsqError> {
    let header = opt.header()?;
    let Decoder { src, log, strict } = opt;

    if *strict && !header.is_signed() {
        return Err(HsqError::FormatError(format!(
            "header sums to {:#04x}, not an HSQ file",
            header.checksum_sum()
        )));
    }

    let mut log = log.as_mut().map(|l| (l, LogFreq::default()));

    if let Some((wtr, _)) = &mut log {
        writeln!(wtr, "# Header\n{:?}", &header)?;
        writeln!(wtr)?;
    }

    let output_size = header.decompressed_size as usize;
    let mut output: Vec<u8> = Vec::with_capacity(output_size);
    let mut bits = BitReader::new(*src, HsqHeader::SIZE);

    loop {
        if bits.get_bit()? {
            if output.len() >= output_size {
                break;
            }
            let byte = bits.read_u8()?;
            output.push(byte);

            if let Some((wtr, freq)) = &mut log {
                writeln!(wtr, "{:04x} - Uncoded: {:02x}", output.len() - 1, byte)?;
                freq.literals += 1;
            }
            continue;
        }

        let (count, distance) = if bits.get_bit()? {
            let word = bits.read_u16()?;
            let mut count = (word & 0x7) as usize;
            let distance = 8192 - (word >> 3) as usize;

            if count == 0 {
                count = bits.read_u8()? as usize;
            }
            if count == 0 {
                if let Some((wtr, _)) = &mut log {
                    writeln!(wtr, "{:04x} - End of stream", output.len())?;
                }
                break;
            }

            if let Some((_, freq)) = &mut log {
                freq.long_refs += 1;
            }
            (count, distance)
        } else {
            let hi = bits.get_bit()? as usize;
            let lo = bits.get_bit()? as usize;
            let distance = 256 - bits.read_u8()? as usize;

            if let Some((_, freq)) = &mut log {
                freq.short_refs += 1;
            }
            ((hi << 1) | lo, distance)
        };

        if distance > output.len() {
            return Err(HsqError::InvalidBackReference {
                distance,
                written: output.len(),
            });
        }

        let start = output.len() - distance;
        let size = count + 2;

        if let Some((wtr, _)) = &mut log {
            writeln!(
                wtr,
                "{:04x} - Encoded [Copyback]: size: {} mb: {} | start: {:04x}",
                output.len(),
                size,
                distance,
                start
            )?;
        }

        // source and destination may overlap
        for i in start..start + size {
            let byte = output[i];
            output.push(byte);
        }

        if let Some((wtr, _)) = &mut log {
            writeln!(wtr, "\t{:02x?}", &output[start + distance..])?;
        }
    }

    if output.len() < output_size {
        return Err(HsqError::TruncatedStream(bits.position()));
    }
    output.truncate(output_size);

    if let Some((wtr, freq)) = &mut log {
        writeln!(wtr, "\n# Commands\n{:?}", freq)?;
    }

    Ok(output)
}

#[derive(Debug, Default)]
struct LogFreq {
    literals: u32,
    short_refs: u32,
    long_refs: u32,
}
