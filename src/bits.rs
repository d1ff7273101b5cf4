//! Readers and writers for the mixed bit/byte layout of an `HSQ` command stream.

use crate::errors::HsqError;
use bitstream_io::{BitQueue, LittleEndian};
use byteorder::{ByteOrder, LE};

/// Pull control bits, raw bytes, and raw words out of an `HSQ` body.
///
/// The bit queue is a 16-bit register with a sentinel bit:
/// refilling it plants a `1` above the fifteen bits that are left,
/// so the register hits zero again exactly when the word is used up.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    buf: &'a [u8],
    csr: usize,
    queue: u16,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(buf: &'a [u8], csr: usize) -> Self {
        Self { buf, csr, queue: 0 }
    }

    /// Current byte offset into the buffer
    pub(crate) fn position(&self) -> usize {
        self.csr
    }

    pub(crate) fn get_bit(&mut self) -> Result<bool, HsqError> {
        let mut bit = self.queue & 1;
        self.queue >>= 1;

        if self.queue == 0 {
            let word = self.read_u16()?;
            bit = word & 1;
            self.queue = 0x8000 | (word >> 1);
        }

        Ok(bit != 0)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, HsqError> {
        let byte = *self
            .buf
            .get(self.csr)
            .ok_or(HsqError::TruncatedStream(self.csr))?;
        self.csr += 1;

        Ok(byte)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, HsqError> {
        let bytes = self
            .buf
            .get(self.csr..self.csr + 2)
            .ok_or(HsqError::TruncatedStream(self.csr))?;
        self.csr += 2;

        Ok(LE::read_u16(bytes))
    }
}

/// Build an `HSQ` body by interleaving control bits with raw bytes.
///
/// The first bit of every control word reserves a two byte slot in the output.
/// Raw data is appended after the slot as it arrives, and the slot is filled in
/// once sixteen bits have been pushed or the writer is finished.
pub(crate) struct BitWriter {
    out: Vec<u8>,
    queue: BitQueue<LittleEndian, u16>,
    /// offset of the reserved control word, if one is open
    slot: Option<usize>,
}

impl BitWriter {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            out: Vec::with_capacity(cap),
            queue: BitQueue::new(),
            slot: None,
        }
    }

    pub(crate) fn write_bit(&mut self, bit: bool) {
        if self.slot.is_none() {
            self.slot = Some(self.out.len());
            self.out.extend_from_slice(&[0, 0]);
        }

        self.queue.push(1, bit as u16);

        if self.queue.is_full() {
            self.commit();
        }
    }

    pub(crate) fn write_byte(&mut self, byte: u8) {
        self.out.push(byte);
    }

    pub(crate) fn write_word(&mut self, word: u16) {
        self.out.extend_from_slice(&word.to_le_bytes());
    }

    /// Write out any partial control word, padded with zero bits, and return the body
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.commit();
        self.out
    }

    fn commit(&mut self) {
        let queue = std::mem::replace(&mut self.queue, BitQueue::new());
        if let Some(slot) = self.slot.take() {
            LE::write_u16(&mut self.out[slot..slot + 2], queue.value());
        }
    }
}
