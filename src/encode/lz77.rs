use std::{fmt, io::Write};

use crate::{bits::BitWriter, errors::HsqError};

use super::hash_chain::{HashChain, MoveBack};

/// Farthest a long copy can reach back
pub(crate) const LONG_WINDOW: usize = 8192;
/// Farthest a short copy can reach back
pub(crate) const SHORT_WINDOW: usize = 256;
/// Longest copy that fits in a long copy's extra count byte
pub(crate) const MAX_MATCH: usize = 257;
/// Longest copy that fits in a short copy's two count bits
const MAX_SHORT_MATCH: usize = 5;
/// Shortest copy a long copy is used for
const MIN_LONG_MATCH: usize = 3;

/// Configure the LZ77 match search that underlies `HSQ` compression
///
/// By [`default`](HsqSettings::default):
///
/// | Parameter   | Field       | Value |
/// | ----------- | ----------- | :---: |
/// | Chain depth | max_chain   | 64    |
/// | Dictionary  | window      | 8192  |
/// | Max Match   | max_match   | 257   |
/// | Short copies| short_refs  | true  |
///
/// The window and max match defaults are also the largest values the format can hold.
/// [`new`](HsqSettings::new) clamps its arguments into range; fields set directly
/// are clamped when the encoder starts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HsqSettings {
    /// number of hash chain links followed per position
    pub max_chain: usize,
    /// number of bytes to look back for matches
    pub window: usize,
    /// longest match to encode
    pub max_match: usize,
    /// use the compact short copy for nearby matches
    pub short_refs: bool,
}

impl HsqSettings {
    pub const fn new(max_chain: usize, window: usize, max_match: usize, short_refs: bool) -> Self {
        Self {
            max_chain,
            window,
            max_match,
            short_refs,
        }
        .clamped()
    }

    pub(crate) const fn clamped(self) -> Self {
        let max_chain = if self.max_chain == 0 { 1 } else { self.max_chain };
        let window = if self.window == 0 {
            1
        } else if self.window > LONG_WINDOW {
            LONG_WINDOW
        } else {
            self.window
        };
        let max_match = if self.max_match < MIN_LONG_MATCH {
            MIN_LONG_MATCH
        } else if self.max_match > MAX_MATCH {
            MAX_MATCH
        } else {
            self.max_match
        };

        Self {
            max_chain,
            window,
            max_match,
            short_refs: self.short_refs,
        }
    }
}

impl Default for HsqSettings {
    fn default() -> Self {
        Self {
            max_chain: 64,
            window: LONG_WINDOW,
            max_match: MAX_MATCH,
            short_refs: true,
        }
    }
}

/// One step of an `HSQ` command stream, before it is packed into bits
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(super) enum Command {
    Literal(u8),
    /// two count bits and the offset byte
    ShortRef(u8, u8),
    LongRef(u16),
    /// long copy word with an empty count, and the count byte
    LongRefExt(u16, u8),
    Eof,
}

impl Command {
    /// Pick the cheapest command for copying `mat.size` bytes from `mat.moveback` back.
    /// Returns the command and the number of input bytes it covers.
    fn copy(mat: MoveBack, settings: &HsqSettings) -> Option<(Self, usize)> {
        let MoveBack { size, moveback } = mat;

        // longer nearby matches are cheaper as a single long copy
        if settings.short_refs && moveback <= SHORT_WINDOW && (2..=MAX_SHORT_MATCH).contains(&size) {
            let cmd = Self::ShortRef((size - 2) as u8, (SHORT_WINDOW - moveback) as u8);
            return Some((cmd, size));
        }

        if size >= MIN_LONG_MATCH && moveback <= LONG_WINDOW {
            let word = ((LONG_WINDOW - moveback) << 3) as u16;
            let count = size - 2;
            let cmd = if count <= 7 {
                Self::LongRef(word | count as u16)
            } else {
                Self::LongRefExt(word, count as u8)
            };
            return Some((cmd, size));
        }

        None
    }

    /// total number of bytes this command encodes from the uncoded input
    pub(super) fn size(&self) -> usize {
        match *self {
            Self::Literal(..) => 1,
            Self::ShortRef(count, _) => count as usize + 2,
            Self::LongRef(word) => (word & 0x7) as usize + 2,
            Self::LongRefExt(_, count) => count as usize + 2,
            Self::Eof => 0,
        }
    }

    pub(super) fn write(&self, out: &mut BitWriter) {
        match *self {
            Self::Literal(byte) => {
                out.write_bit(true);
                out.write_byte(byte);
            }
            Self::ShortRef(count, offset) => {
                out.write_bit(false);
                out.write_bit(false);
                out.write_bit(count & 0b10 != 0);
                out.write_bit(count & 0b01 != 0);
                out.write_byte(offset);
            }
            Self::LongRef(word) => {
                out.write_bit(false);
                out.write_bit(true);
                out.write_word(word);
            }
            Self::LongRefExt(word, count) => {
                out.write_bit(false);
                out.write_bit(true);
                out.write_word(word);
                out.write_byte(count);
            }
            Self::Eof => Self::LongRefExt(0, 0).write(out),
        }
    }
}

#[derive(Debug)]
pub(super) struct LzPass {
    pub buf: Vec<Command>,
    pub decompressed_size: usize,
    pub literals: u32,
    pub short_refs: u32,
    pub long_refs: u32,
}

impl LzPass {
    fn new(input_size: usize) -> Self {
        Self {
            buf: Vec::with_capacity(input_size / 2 + 1),
            decompressed_size: input_size,
            literals: 0,
            short_refs: 0,
            long_refs: 0,
        }
    }

    fn add(&mut self, cmd: Command) {
        match cmd {
            Command::Literal(..) => self.literals += 1,
            Command::ShortRef(..) => self.short_refs += 1,
            Command::LongRef(..) | Command::LongRefExt(..) => self.long_refs += 1,
            Command::Eof => {}
        }
        self.buf.push(cmd);
    }
}

impl fmt::Display for LzPass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "# Commands: {} literals, {} short copies, {} long copies",
            self.literals, self.short_refs, self.long_refs
        )?;
        writeln!(f)?;
        writeln!(f, "# LZ77 Encoded File")?;
        let mut position = 0;
        for cmd in &self.buf {
            write!(f, "{:04x} - ", position)?;
            match *cmd {
                Command::Literal(b) => writeln!(f, "Uncoded: {:02x}", b),
                Command::ShortRef(count, offset) => writeln!(
                    f,
                    "Short [Copyback]: size: {} mb: {}",
                    count + 2,
                    SHORT_WINDOW - offset as usize
                ),
                Command::LongRef(word) | Command::LongRefExt(word, _) => writeln!(
                    f,
                    "Long [Copyback]: size: {} mb: {}",
                    cmd.size(),
                    LONG_WINDOW - (word >> 3) as usize
                ),
                Command::Eof => writeln!(f, "End of stream"),
            }?;
            position += cmd.size();
        }

        Ok(())
    }
}

/// Greedily parse `input` into `HSQ` commands, ending with [`Command::Eof`].
/// The parsed commands will be printed to `log` if present.
pub(super) fn compress_bytes(
    input: &[u8],
    settings: HsqSettings,
    log: &mut Option<&mut dyn Write>,
) -> Result<LzPass, HsqError> {
    let settings = settings.clamped();
    let mut chain = HashChain::new(input.len());
    let mut compressed = LzPass::new(input.len());

    let mut pos = 0;
    while pos < input.len() {
        let copy = chain
            .find(input, pos, &settings)
            .and_then(|m| Command::copy(m, &settings));

        let (cmd, covered) = copy.unwrap_or((Command::Literal(input[pos]), 1));
        compressed.add(cmd);

        // index every covered position so later matches can start inside this one
        for p in pos..pos + covered {
            chain.insert(input, p);
        }
        pos += covered;
    }

    compressed.add(Command::Eof);

    if let Some(wtr) = log.as_mut() {
        writeln!(wtr, "{}", &compressed)?;
    }

    Ok(compressed)
}
