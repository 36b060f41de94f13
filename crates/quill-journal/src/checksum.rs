//! The 16-bit line checksum and its on-disk shape.
//!
//! Journal lines end with a single whitespace separator and four hex digits
//! holding a CRC-16/X-25 of everything before the separator. The algorithm
//! (reflected CCITT polynomial 0x1021, init and xorout 0xFFFF) matches the
//! checksums produced by the tooling that writes journals; swap the catalog
//! constant to change it.

use crc::{Crc, CRC_16_IBM_SDLC};

/// The journal checksum algorithm (CRC-16/X-25).
pub const JOURNAL_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

/// Checksum value that requests regeneration instead of comparison.
///
/// Only honored when the engine runs in fix-checksums mode; otherwise it is
/// simply not a hex number.
pub const FIX_SENTINEL: &str = "****";

/// Checksum of one journal line's text (separator and checksum stripped).
pub fn line_checksum(text: &str) -> u16 {
    JOURNAL_CRC.checksum(text.as_bytes())
}

/// Render a checksum the way journal lines carry it.
pub fn format_checksum(value: u16) -> String {
    format!("{value:04x}")
}

/// Split a trimmed journal line into its text and checksum field.
///
/// The line must have more than five characters, with whitespace at
/// position `len - 5` separating the text from the final four characters.
/// Returns `None` when the line does not have that shape; the checksum
/// field itself is not interpreted here.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let mut tail: Vec<(usize, char)> = line
        .char_indices()
        .rev()
        .take(5)
        .collect();
    if tail.len() < 5 {
        return None;
    }
    tail.reverse();

    let (sep_idx, sep) = tail[0];
    // More than five characters: something must precede the separator.
    if sep_idx == 0 || !sep.is_whitespace() {
        return None;
    }

    let (checksum_idx, _) = tail[1];
    Some((&line[..sep_idx], &line[checksum_idx..]))
}
