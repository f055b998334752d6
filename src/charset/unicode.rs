use super::{Decoded, Encoded};

/// Decodes UTF-8, rejecting characters longer than `max_len` bytes.
pub fn decode_utf8(src: &[u8], max_len: usize) -> Decoded {
    let window = &src[..src.len().min(4)];
    let valid_up_to = match std::str::from_utf8(window) {
        Ok(_) => window.len(),
        Err(e) if e.valid_up_to() > 0 => e.valid_up_to(),
        // No valid character at the start. `error_len` is `None` if the input has been cut short
        // in the middle of a character.
        Err(e) => {
            return match e.error_len() {
                None => Decoded::Incomplete,
                Some(_) => Decoded::Illegal,
            }
        }
    };
    let Some(ch) = std::str::from_utf8(&window[..valid_up_to])
        .ok()
        .and_then(|text| text.chars().next())
    else {
        return Decoded::Incomplete;
    };
    let len = ch.len_utf8();
    if len > max_len {
        // Well formed, but outside of the basic multilingual plane.
        Decoded::Unmapped { len }
    } else {
        Decoded::Char { ch, len }
    }
}

pub fn encode_utf8(ch: char, max_len: usize, dst: &mut [u8]) -> Encoded {
    let len = ch.len_utf8();
    if len > max_len {
        return Encoded::Unrepresentable;
    }
    if dst.len() < len {
        return Encoded::Full;
    }
    ch.encode_utf8(&mut dst[..len]);
    Encoded::Written(len)
}

pub fn decode_ucs2(src: &[u8]) -> Decoded {
    let [high, low, ..] = *src else {
        return Decoded::Incomplete;
    };
    match char::from_u32(u32::from(u16::from_be_bytes([high, low]))) {
        Some(ch) => Decoded::Char { ch, len: 2 },
        // Surrogates have no meaning in UCS-2
        None => Decoded::Unmapped { len: 2 },
    }
}

pub fn encode_ucs2(ch: char, dst: &mut [u8]) -> Encoded {
    let Ok(unit) = u16::try_from(u32::from(ch)) else {
        return Encoded::Unrepresentable;
    };
    put(&unit.to_be_bytes(), dst)
}

/// Decodes UTF-16 with the byte order given by `to_unit`.
pub fn decode_utf16(src: &[u8], to_unit: fn([u8; 2]) -> u16) -> Decoded {
    let [a, b, ..] = *src else {
        return Decoded::Incomplete;
    };
    let first = to_unit([a, b]);
    let pair;
    let units: &[u16] = match first {
        0xD800..=0xDBFF => {
            let [_, _, c, d, ..] = *src else {
                return Decoded::Incomplete;
            };
            pair = [first, to_unit([c, d])];
            &pair
        }
        _ => std::slice::from_ref(&first),
    };
    match char::decode_utf16(units.iter().copied()).next() {
        Some(Ok(ch)) => Decoded::Char {
            ch,
            len: ch.len_utf16() * 2,
        },
        // Unpaired surrogate. Skip the offending unit.
        _ => Decoded::Unmapped { len: 2 },
    }
}

pub fn encode_utf16(ch: char, dst: &mut [u8], to_bytes: fn(u16) -> [u8; 2]) -> Encoded {
    let mut units = [0u16; 2];
    let units = ch.encode_utf16(&mut units);
    let mut bytes = [0u8; 4];
    for (index, unit) in units.iter().enumerate() {
        bytes[index * 2..index * 2 + 2].copy_from_slice(&to_bytes(*unit));
    }
    put(&bytes[..units.len() * 2], dst)
}

pub fn decode_utf32(src: &[u8]) -> Decoded {
    let [a, b, c, d, ..] = *src else {
        return Decoded::Incomplete;
    };
    match char::from_u32(u32::from_be_bytes([a, b, c, d])) {
        Some(ch) => Decoded::Char { ch, len: 4 },
        None => Decoded::Unmapped { len: 4 },
    }
}

pub fn encode_utf32(ch: char, dst: &mut [u8]) -> Encoded {
    put(&u32::from(ch).to_be_bytes(), dst)
}

fn put(bytes: &[u8], dst: &mut [u8]) -> Encoded {
    if dst.len() < bytes.len() {
        return Encoded::Full;
    }
    dst[..bytes.len()].copy_from_slice(bytes);
    Encoded::Written(bytes.len())
}

#[cfg(test)]
mod tests {
    use crate::charset::{Charset, Decoded, Encoded};

    #[test]
    fn utf8_character_lengths() {
        assert_eq!(
            Decoded::Char { ch: 'ä', len: 2 },
            Charset::Utf8mb4.decode("äb".as_bytes())
        );
        assert_eq!(
            Decoded::Char { ch: '😀', len: 4 },
            Charset::Utf8mb4.decode("😀".as_bytes())
        );
    }

    #[test]
    fn utf8mb3_does_not_know_supplementary_planes() {
        assert_eq!(
            Decoded::Unmapped { len: 4 },
            Charset::Utf8mb3.decode("😀".as_bytes())
        );
        assert_eq!(
            Encoded::Unrepresentable,
            Charset::Utf8mb3.encode('😀', &mut [0u8; 4])
        );
    }

    #[test]
    fn truncated_and_illegal_utf8() {
        // First two bytes of 'ä' followed by nothing
        assert_eq!(Decoded::Incomplete, Charset::Utf8mb4.decode(&[0xE2, 0x82]));
        // Stray continuation byte
        assert_eq!(Decoded::Illegal, Charset::Utf8mb4.decode(&[0x80, b'a']));
    }

    #[test]
    fn utf16_surrogate_pairs() {
        let bytes = [0xD8, 0x3D, 0xDE, 0x00];
        assert_eq!(
            Decoded::Char { ch: '😀', len: 4 },
            Charset::Utf16.decode(&bytes)
        );
        assert_eq!(Decoded::Incomplete, Charset::Utf16.decode(&bytes[..3]));
        // High surrogate followed by a regular character
        assert_eq!(
            Decoded::Unmapped { len: 2 },
            Charset::Utf16.decode(&[0xD8, 0x3D, 0x00, 0x41])
        );

        let mut buf = [0u8; 4];
        assert_eq!(Encoded::Written(4), Charset::Utf16le.encode('😀', &mut buf));
        assert_eq!([0x3D, 0xD8, 0x00, 0xDE], buf);
        assert_eq!(Encoded::Full, Charset::Utf16le.encode('😀', &mut buf[..2]));
    }

    #[test]
    fn ucs2_is_limited_to_the_basic_plane() {
        assert_eq!(
            Decoded::Char { ch: 'A', len: 2 },
            Charset::Ucs2.decode(&[0x00, 0x41])
        );
        assert_eq!(
            Decoded::Unmapped { len: 2 },
            Charset::Ucs2.decode(&[0xD8, 0x00])
        );
        assert_eq!(
            Encoded::Unrepresentable,
            Charset::Ucs2.encode('😀', &mut [0u8; 4])
        );
    }

    #[test]
    fn utf32_rejects_values_beyond_unicode() {
        assert_eq!(
            Decoded::Char { ch: 'A', len: 4 },
            Charset::Utf32.decode(&[0, 0, 0, 0x41])
        );
        assert_eq!(
            Decoded::Unmapped { len: 4 },
            Charset::Utf32.decode(&[0, 0x11, 0, 0])
        );
    }
}
