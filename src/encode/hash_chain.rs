//! Hash chains over three byte prefixes, used to find copy-back candidates.
//!
//! `head[hash]` is the most recent position whose next three bytes hash to `hash`,
//! and `prev[pos]` is the position before `pos` with the same hash.
//! Both are plain indices into the input, so walking a chain never allocates.

use super::lz77::{HsqSettings, SHORT_WINDOW};

const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;
/// end of a chain
const NIL: u32 = u32::MAX;
/// bytes hashed per position
const PREFIX: usize = 3;

/// The shortest match reachable through a short copy
const MIN_SHORT_MATCH: usize = 2;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(super) struct MoveBack {
    pub size: usize,     // length
    pub moveback: usize, // offset
}

#[derive(Debug)]
pub(super) struct HashChain {
    head: Vec<u32>,
    prev: Vec<u32>,
}

impl HashChain {
    pub(super) fn new(input_size: usize) -> Self {
        Self {
            head: vec![NIL; HASH_SIZE],
            prev: vec![NIL; input_size],
        }
    }

    /// Add `pos` to the front of its chain. Every position should be inserted once,
    /// and only after any search from it is done.
    pub(super) fn insert(&mut self, input: &[u8], pos: usize) {
        if pos + PREFIX > input.len() {
            return;
        }
        let h = hash3(&input[pos..]);
        self.prev[pos] = self.head[h];
        self.head[h] = pos as u32;
    }

    /// Find the longest earlier match for the data at `pos`.
    /// Ties go to the closest candidate.
    pub(super) fn find(&self, input: &[u8], pos: usize, settings: &HsqSettings) -> Option<MoveBack> {
        let remaining = input.len() - pos;
        let max_size = remaining.min(settings.max_match);
        let min_pos = pos.saturating_sub(settings.window);

        let mut best: Option<MoveBack> = None;

        if remaining >= PREFIX {
            let mut candidate = self.head[hash3(&input[pos..])];
            let mut depth = 0;

            while candidate != NIL && depth < settings.max_chain {
                let cand = candidate as usize;
                if cand < min_pos {
                    break;
                }

                let size = match_len(input, cand, pos, max_size);
                if size >= PREFIX && best.map_or(true, |b| size > b.size) {
                    best = Some(MoveBack {
                        size,
                        moveback: pos - cand,
                    });
                    if size == max_size {
                        break;
                    }
                }

                candidate = self.prev[cand];
                depth += 1;
            }
        }

        // pairs are too short to hash, but can still go in a short copy
        if best.is_none() && settings.short_refs && remaining >= MIN_SHORT_MATCH {
            let short_window = settings.window.min(SHORT_WINDOW).min(pos);
            best = (1..=short_window)
                .map(|moveback| MoveBack {
                    size: match_len(input, pos - moveback, pos, max_size),
                    moveback,
                })
                .find(|m| m.size >= MIN_SHORT_MATCH);
        }

        best
    }
}

fn hash3(bytes: &[u8]) -> usize {
    let v = u32::from(bytes[0]) | u32::from(bytes[1]) << 8 | u32::from(bytes[2]) << 16;
    (v.wrapping_mul(2_654_435_761) >> (32 - HASH_BITS)) as usize
}

/// Count matching bytes between `input[src..]` and `input[pos..]`, up to `max`.
/// The source may run into the bytes being matched.
fn match_len(input: &[u8], src: usize, pos: usize, max: usize) -> usize {
    input[src..]
        .iter()
        .zip(&input[pos..])
        .take(max)
        .take_while(|(s, d)| s == d)
        .count()
}
