//! RLE block codec
//!
//! ## Block Layout
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬───────────────────┐
//! │ "RLE"(3) │ Prim (1) │ Alt (1)  │ Reserved (4) │ Compressed stream │
//! └──────────┴──────────┴──────────┴──────────────┴───────────────────┘
//! ```
//!
//! In the stream, a byte equal to the active primary sentinel starts a
//! three-byte token `[primary, count, value]` expanding to `count` copies of
//! `value`. The token `[primary, 0, alternate]` is not a run: it swaps the
//! two sentinels, and the swap holds for the rest of the stream. Every other
//! byte is a literal.

use base64::Engine;

use crate::error::{Result, SlamError};

/// Block tag
pub const MAGIC: &[u8; 3] = b"RLE";

/// Offset of the primary sentinel (the alternate follows it)
pub const SENTINEL_OFFSET: usize = 3;

/// Opaque header bytes between the sentinels and the stream
pub const RESERVED_SIZE: usize = 4;

/// Offset of the compressed stream
pub const HEADER_SIZE: usize = SENTINEL_OFFSET + 2 + RESERVED_SIZE;

/// Shortest run the reference encoder emits as a token
const MIN_RUN: usize = 4;

/// Decode base64 text and decompress the block it holds
pub fn decode_base64_block(text: &str) -> Result<Vec<u8>> {
    let decoded = if text.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = text.split_ascii_whitespace().collect();
        base64::engine::general_purpose::STANDARD.decode(compact)
    } else {
        base64::engine::general_purpose::STANDARD.decode(text)
    };
    let block =
        decoded.map_err(|e| SlamError::Decode(format!("invalid base64 block: {}", e)))?;

    decompress(&block)
}

/// Decompress a raw RLE block into a flat byte sequence
pub fn decompress(block: &[u8]) -> Result<Vec<u8>> {
    if block.len() < HEADER_SIZE || !block.starts_with(MAGIC) {
        let tag = &block[..block.len().min(MAGIC.len())];
        return Err(SlamError::Decode(format!("wrong RLE header {:?}", tag)));
    }

    let mut primary = block[SENTINEL_OFFSET];
    let mut alternate = block[SENTINEL_OFFSET + 1];
    let stream = &block[HEADER_SIZE..];

    let mut output = Vec::with_capacity(stream.len() * 2);
    let mut pos = 0;

    while pos < stream.len() {
        let byte = stream[pos];

        if byte == primary {
            let (count, value) = match (stream.get(pos + 1), stream.get(pos + 2)) {
                (Some(&count), Some(&value)) => (count, value),
                _ => {
                    return Err(SlamError::Decode(format!(
                        "truncated run at offset {}",
                        HEADER_SIZE + pos
                    )))
                }
            };

            if count == 0 && value == alternate {
                std::mem::swap(&mut primary, &mut alternate);
            } else {
                output.resize(output.len() + count as usize, value);
            }
            pos += 2;
        } else {
            output.push(byte);
        }
        pos += 1;
    }

    Ok(output)
}

/// Compress bytes into an RLE block using the given `[primary, alternate]`
/// sentinels
///
/// Reference encoder: never emits a sentinel swap, so every byte equal to
/// the primary sentinel is written as a run token.
pub fn compress(data: &[u8], sentinels: [u8; 2]) -> Vec<u8> {
    let primary = sentinels[0];

    let mut block = Vec::with_capacity(HEADER_SIZE + data.len());
    block.extend_from_slice(MAGIC);
    block.extend_from_slice(&sentinels);
    block.extend_from_slice(&[0u8; RESERVED_SIZE]);

    let mut i = 0;
    while i < data.len() {
        let value = data[i];
        let mut run = 1;
        while i + run < data.len() && data[i + run] == value && run < u8::MAX as usize {
            run += 1;
        }

        if run >= MIN_RUN || value == primary {
            block.extend_from_slice(&[primary, run as u8, value]);
        } else {
            block.extend(std::iter::repeat(value).take(run));
        }
        i += run;
    }

    block
}

/// Compress and base64-encode, producing text `decode_base64_block` accepts
pub fn encode_base64_block(data: &[u8], sentinels: [u8; 2]) -> String {
    base64::engine::general_purpose::STANDARD.encode(compress(data, sentinels))
}
