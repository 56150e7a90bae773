// src/data/message.rs

//! Decode the payload of a log record into readable text.
//!
//! A payload is UTF-8 text interleaved with binary control blocks and
//! private-use-area glyphs of the game client. The payload is scanned once,
//! left to right. At each position the byte is classified by
//! [`classify_byte`] into a [`ByteClass`], which also determines how many
//! bytes the position consumes.
//!
//! Classification order, first match wins:
//!
//! 1. `0x02` [`ControlBlock`]
//! 2. `0x20..=0x7E` [`Ascii`]
//! 3. `0xC0..=0xDF` + continuation [`Utf8Lead2`]
//! 4. `0xEE80A0..=0xEE839B` + 2 continuations [`PrivateUseSymbol`]
//! 5. `0xE0..=0xEF` + 2 continuations [`Utf8Lead3`]
//! 6. `0xF0..=0xF4` + 3 continuations [`Utf8Lead4`]
//! 7. anything else [`Invalid`]
//!
//! Bytes past the end of the payload read as `0`, which is never a
//! continuation byte.
//!
//! Decoding never fails. Unexpected bytes are dropped.
//!
//! [`ControlBlock`]: ByteClass::ControlBlock
//! [`Ascii`]: ByteClass::Ascii
//! [`Utf8Lead2`]: ByteClass::Utf8Lead2
//! [`PrivateUseSymbol`]: ByteClass::PrivateUseSymbol
//! [`Utf8Lead3`]: ByteClass::Utf8Lead3
//! [`Utf8Lead4`]: ByteClass::Utf8Lead4
//! [`Invalid`]: ByteClass::Invalid

use crate::common::{Bytes, Count};

use ::more_asserts::debug_assert_lt;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Introduces a binary control block.
pub const CONTROL_BLOCK_START: u8 = 0x02;

/// Placeholder printed for a private-use glyph in debug mode.
pub const SYMBOL_PLACEHOLDER: u8 = b'*';

/// Lowest three-byte value of the private-use glyphs, `U+E020`.
pub const PRIVATE_USE_SYMBOL_MIN: u32 = 0xEE80A0;
/// Highest three-byte value of the private-use glyphs, `U+E0DB`.
pub const PRIVATE_USE_SYMBOL_MAX: u32 = 0xEE839B;

/// Is `byte` a UTF-8 continuation byte, `0x80..=0xBF`.
#[inline(always)]
pub const fn is_continuation(byte: u8) -> bool {
    matches!(byte, 0x80..=0xBF)
}

/// Byte at `at` or `0` if `at` is past the end of `buffer`.
#[inline(always)]
const fn byte_at(buffer: &[u8], at: usize) -> u8 {
    if at < buffer.len() {
        buffer[at]
    } else {
        0
    }
}

/// Classification of the byte at one position of a payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ByteClass {
    /// `0x02`, an opcode byte, a declared length byte, then the block data.
    /// Never treated as text.
    ControlBlock {
        /// The declared length byte, third byte of the block.
        declared_len: u8,
    },
    /// Printable ASCII.
    Ascii,
    /// Two-byte UTF-8 character.
    Utf8Lead2,
    /// Three-byte UTF-8 character in the game client's private-use range.
    PrivateUseSymbol,
    /// Three-byte UTF-8 character.
    Utf8Lead3,
    /// Four-byte UTF-8 character.
    Utf8Lead4,
    /// Control character, DEL, stray continuation byte, lead byte without its
    /// continuation bytes, or a byte above `0xF4`.
    Invalid,
}

impl ByteClass {
    /// Count of bytes this class consumes, i.e. how far the cursor advances.
    ///
    /// A control block advances past the `0x02`, opcode, and length bytes
    /// plus `declared_len` more bytes.
    pub const fn consumed(&self) -> usize {
        match self {
            ByteClass::ControlBlock { declared_len } => *declared_len as usize + 3,
            ByteClass::Ascii => 1,
            ByteClass::Utf8Lead2 => 2,
            ByteClass::PrivateUseSymbol => 3,
            ByteClass::Utf8Lead3 => 3,
            ByteClass::Utf8Lead4 => 4,
            ByteClass::Invalid => 1,
        }
    }

    /// Is this class copied verbatim to the decoded text.
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            ByteClass::Ascii | ByteClass::Utf8Lead2 | ByteClass::Utf8Lead3 | ByteClass::Utf8Lead4
        )
    }
}

/// Classify the byte of `buffer` at index `at`.
///
/// `at` must be less than `buffer.len()`.
pub fn classify_byte(
    buffer: &[u8],
    at: usize,
) -> ByteClass {
    debug_assert_lt!(at, buffer.len(), "at {} is past buffer len {}", at, buffer.len());
    let c1: u8 = byte_at(buffer, at);
    let c2: u8 = byte_at(buffer, at + 1);
    let c3: u8 = byte_at(buffer, at + 2);
    let c4: u8 = byte_at(buffer, at + 3);
    let utf3: u32 = ((c1 as u32) << 16) | ((c2 as u32) << 8) | (c3 as u32);

    if c1 == CONTROL_BLOCK_START {
        return ByteClass::ControlBlock { declared_len: c3 };
    }
    if (0x20..0x7F).contains(&c1) {
        return ByteClass::Ascii;
    }
    if (0xC0..=0xDF).contains(&c1) {
        if is_continuation(c2) {
            return ByteClass::Utf8Lead2;
        }
        return ByteClass::Invalid;
    }
    // value range first, then continuation validity
    if (PRIVATE_USE_SYMBOL_MIN..=PRIVATE_USE_SYMBOL_MAX).contains(&utf3)
        && is_continuation(c2)
        && is_continuation(c3)
    {
        return ByteClass::PrivateUseSymbol;
    }
    if (0xE0..=0xEF).contains(&c1) {
        if is_continuation(c2) && is_continuation(c3) {
            return ByteClass::Utf8Lead3;
        }
        return ByteClass::Invalid;
    }
    if (0xF0..=0xF4).contains(&c1) {
        if is_continuation(c2) && is_continuation(c3) && is_continuation(c4) {
            return ByteClass::Utf8Lead4;
        }
        return ByteClass::Invalid;
    }

    ByteClass::Invalid
}

/// Render `bytes` as `[XX-XX-XX]`, uppercase hexadecimal separated by `-`.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3 + 2);
    s.push('[');
    for (i, byte) in bytes.iter().enumerate() {
        if i != 0 {
            s.push('-');
        }
        s.push_str(format!("{:02X}", byte).as_str());
    }
    s.push(']');

    s
}

/// Statistics gathered while decoding payloads. Intended for `--summary`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecodeSummary {
    /// Count of binary control blocks skipped.
    pub control_blocks: Count,
    /// Count of private-use glyphs dropped or replaced.
    pub symbols: Count,
    /// Count of bytes dropped as [`ByteClass::Invalid`].
    pub bytes_dropped: Count,
}

impl DecodeSummary {
    /// Add the counts of `other` to `self`.
    pub fn add(&mut self, other: &DecodeSummary) {
        self.control_blocks += other.control_blocks;
        self.symbols += other.symbols;
        self.bytes_dropped += other.bytes_dropped;
    }
}

/// Decode a record payload to text.
///
/// If `debug` then control blocks are rendered with [`hex_dump`] and
/// private-use glyphs as [`SYMBOL_PLACEHOLDER`], otherwise both are dropped.
pub fn decode_message(
    payload: &[u8],
    debug: bool,
) -> String {
    let mut summary = DecodeSummary::default();

    decode_message_summary(payload, debug, &mut summary)
}

/// Decode a record payload to text, counting what was skipped into
/// `summary`.
pub fn decode_message_summary(
    payload: &[u8],
    debug: bool,
    summary: &mut DecodeSummary,
) -> String {
    defn!("(payload len {}, debug {})", payload.len(), debug);
    let len: usize = payload.len();
    let mut out: Bytes = Bytes::with_capacity(len);
    let mut at: usize = 0;
    while at < len {
        let class: ByteClass = classify_byte(payload, at);
        match class {
            ByteClass::ControlBlock { declared_len } => {
                summary.control_blocks += 1;
                if debug {
                    // the window starts at the `0x02`, not after the length byte
                    let end: usize = std::cmp::min(at + declared_len as usize, len);
                    let dump: String = hex_dump(&payload[at..end]);
                    defo!("control block at {}: {}", at, dump);
                    out.extend_from_slice(dump.as_bytes());
                }
            }
            ByteClass::PrivateUseSymbol => {
                summary.symbols += 1;
                if debug {
                    out.push(SYMBOL_PLACEHOLDER);
                }
            }
            ByteClass::Invalid => {
                summary.bytes_dropped += 1;
            }
            ByteClass::Ascii
            | ByteClass::Utf8Lead2
            | ByteClass::Utf8Lead3
            | ByteClass::Utf8Lead4 => {
                // continuation bytes were found so all are within `payload`
                out.extend_from_slice(&payload[at..at + class.consumed()]);
            }
        }
        at += class.consumed();
    }
    // the continuation checks admit some sequences strict UTF-8 rejects
    // (overlong forms, surrogates), those become U+FFFD
    let text: String = match String::from_utf8(out) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };
    defx!("return {:?}", text);

    text
}
