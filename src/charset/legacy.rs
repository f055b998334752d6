//! Single and multi byte character sets backed by the WHATWG encodings of `encoding_rs`.

use encoding_rs::{DecoderResult, Encoding, EncoderResult};

use super::{Decoded, Encoded};

/// Decodes the first character of `src`. The decoders of `encoding_rs` work on streams, so we feed
/// them ever longer prefixes until one of them forms a complete character.
pub fn decode(encoding: &'static Encoding, mbmaxlen: usize, src: &[u8]) -> Decoded {
    if src.is_empty() {
        return Decoded::Incomplete;
    }
    let mut utf8 = [0u8; 32];
    for len in 1..=mbmaxlen.min(src.len()) {
        let mut decoder = encoding.new_decoder_without_bom_handling();
        let (result, _read, written) =
            decoder.decode_to_utf8_without_replacement(&src[..len], &mut utf8, true);
        if !matches!(result, DecoderResult::InputEmpty) {
            continue;
        }
        let text = match std::str::from_utf8(&utf8[..written]) {
            Ok(text) => text,
            Err(_) => return Decoded::Illegal,
        };
        let mut chars = text.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Decoded::Char { ch, len },
            // Some Big5 sequences decode into a base character followed by a combining mark.
            _ => Decoded::Unmapped { len },
        };
    }
    if src.len() < mbmaxlen {
        Decoded::Incomplete
    } else {
        Decoded::Illegal
    }
}

pub fn encode(encoding: &'static Encoding, ch: char, dst: &mut [u8]) -> Encoded {
    let mut utf8 = [0u8; 4];
    let mut bytes = [0u8; 8];
    let mut encoder = encoding.new_encoder();
    let (result, _read, written) =
        encoder.encode_from_utf8_without_replacement(ch.encode_utf8(&mut utf8), &mut bytes, true);
    match result {
        EncoderResult::InputEmpty if written <= dst.len() => {
            dst[..written].copy_from_slice(&bytes[..written]);
            Encoded::Written(written)
        }
        EncoderResult::InputEmpty => Encoded::Full,
        EncoderResult::Unmappable(_) => Encoded::Unrepresentable,
        EncoderResult::OutputFull => Encoded::Full,
    }
}
