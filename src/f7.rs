//! The `F7` run length encoding used by save games.
//!
//! | Bytes      | Meaning |
//! | ---------- | ------- |
//! | `F7 01 F7` | a literal `F7` |
//! | `F7 nn vv` | `vv` repeated `nn` times, for `nn > 2` |
//! | anything else | itself |
//!
//! Runs of up to three bytes are cheaper as plain bytes, so the encoder only
//! packs runs of four or more.

/// The control byte that starts a run or an escape
pub const F7_MARKER: u8 = 0xF7;

/// Longest run a single triple can hold
const MAX_RUN: usize = u8::MAX as usize;
/// Longest run that stays as plain bytes
const MAX_PLAIN_RUN: usize = 3;

/// Expand `F7` run length encoded data
pub fn decode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut i = 0;

    while i + 3 <= data.len() {
        match [data[i], data[i + 1], data[i + 2]] {
            [F7_MARKER, 0x01, F7_MARKER] => {
                out.push(F7_MARKER);
                i += 3;
            }
            [F7_MARKER, count, value] if count > 2 => {
                out.resize(out.len() + count as usize, value);
                i += 3;
            }
            // the last window holds only literals
            _ if i + 3 == data.len() => {
                out.extend_from_slice(&data[i..]);
                i += 3;
            }
            [byte, _, _] => {
                out.push(byte);
                i += 1;
            }
        }
    }
    out.extend_from_slice(&data[i..]);

    out
}

/// Compress data with `F7` run length encoding
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];

        if byte == F7_MARKER {
            out.extend_from_slice(&[F7_MARKER, 0x01, F7_MARKER]);
            i += 1;
            continue;
        }

        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == byte)
            .count();

        if run > MAX_PLAIN_RUN {
            out.extend_from_slice(&[F7_MARKER, run as u8, byte]);
            i += run;
        } else {
            out.push(byte);
            i += 1;
        }
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn escape() {
        assert_eq!(encode(&[0xF7]), vec![0xF7, 0x01, 0xF7]);
        assert_eq!(decode(&[0xF7, 0x01, 0xF7]), vec![0xF7]);
        assert_eq!(encode(&[0xF7, 0xF7]), vec![0xF7, 0x01, 0xF7, 0xF7, 0x01, 0xF7]);
    }

    #[test]
    fn run_threshold() {
        assert_eq!(encode(&[0xAA; 3]), vec![0xAA; 3]);
        assert_eq!(encode(&[0xAA; 4]), vec![0xF7, 0x04, 0xAA]);
        assert_eq!(decode(&[0xF7, 0x04, 0xAA]), vec![0xAA; 4]);
    }

    #[test]
    fn long_runs_split() {
        let input = vec![0x00; 600];
        let packed = encode(&input);

        assert_eq!(packed, vec![0xF7, 0xFF, 0x00, 0xF7, 0xFF, 0x00, 0xF7, 90, 0x00]);
        assert_eq!(decode(&packed), input);
    }

    #[test]
    fn trailing_bytes_pass_through() {
        assert_eq!(decode(&[]), Vec::<u8>::new());
        assert_eq!(decode(&[0xF7]), vec![0xF7]);
        assert_eq!(decode(&[0x01, 0xF7]), vec![0x01, 0xF7]);
        assert_eq!(decode(&[0x10, 0x20, 0x30]), vec![0x10, 0x20, 0x30]);
        assert_eq!(decode(&[0x10, 0xF7, 0x02, 0x30]), vec![0x10, 0xF7, 0x02, 0x30]);
    }

    #[test]
    fn mixed() {
        let input = [1, 2, 2, 2, 2, 2, 0xF7, 3, 3, 3, 4];
        let packed = encode(&input);

        assert_eq!(packed, vec![1, 0xF7, 5, 2, 0xF7, 1, 0xF7, 3, 3, 3, 4]);
        assert_eq!(decode(&packed), input.to_vec());
    }
}
