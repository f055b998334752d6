//! Character sets of MySQL connections and the conversion between them.
//!
//! Every character set is able to decode a single character from the start of a byte slice into a
//! Unicode scalar value, and to encode a single scalar value into a byte slice. Converting text
//! between two character sets is built on top of these two primitives, see [`transcode`].

mod legacy;
mod transcode;
mod unicode;

pub use self::transcode::{transcode, transcode_into, CharSink, Transcoded};

/// Outcome of decoding the first character of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A character consisting of `len` bytes has been decoded.
    Char { ch: char, len: usize },
    /// The first `len` bytes form a well formed sequence, which however has no Unicode mapping.
    Unmapped { len: usize },
    /// The input does not start with a valid sequence.
    Illegal,
    /// The input ends in the middle of a character (or is empty).
    Incomplete,
}

/// Outcome of encoding a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// The character has been written using the given number of bytes (or code units).
    Written(usize),
    /// The character has no representation in the target encoding.
    Unrepresentable,
    /// Not enough room left in the output to hold the character. Nothing has been written.
    Full,
}

/// Character set of a MySQL connection, identified by its MySQL name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// Raw bytes. Every byte maps to the code point of the same value.
    Binary,
    /// 7 Bit US ASCII.
    Ascii,
    /// MySQL `latin1`, which is in fact Windows code page 1252.
    Latin1,
    Latin2,
    Cp1250,
    Cp1251,
    Cp1256,
    Cp1257,
    Koi8r,
    Greek,
    Hebrew,
    /// `utf8` (alias `utf8mb3`). UTF-8 restricted to the basic multilingual plane.
    Utf8mb3,
    Utf8mb4,
    /// UCS-2, big endian.
    Ucs2,
    /// UTF-16, big endian.
    Utf16,
    Utf16le,
    /// UTF-32, big endian.
    Utf32,
    Sjis,
    Cp932,
    Ujis,
    Eucjpms,
    Gbk,
    Gb18030,
    Big5,
    Euckr,
}

const ALL: [Charset; 25] = [
    Charset::Binary,
    Charset::Ascii,
    Charset::Latin1,
    Charset::Latin2,
    Charset::Cp1250,
    Charset::Cp1251,
    Charset::Cp1256,
    Charset::Cp1257,
    Charset::Koi8r,
    Charset::Greek,
    Charset::Hebrew,
    Charset::Utf8mb3,
    Charset::Utf8mb4,
    Charset::Ucs2,
    Charset::Utf16,
    Charset::Utf16le,
    Charset::Utf32,
    Charset::Sjis,
    Charset::Cp932,
    Charset::Ujis,
    Charset::Eucjpms,
    Charset::Gbk,
    Charset::Gb18030,
    Charset::Big5,
    Charset::Euckr,
];

impl Charset {
    /// Looks up a character set by the name MySQL uses for it, e.g. `utf8mb4`. Case insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("utf8") {
            return Some(Charset::Utf8mb3);
        }
        ALL.iter()
            .copied()
            .find(|charset| charset.name().eq_ignore_ascii_case(name))
    }

    /// Name of the character set as known to MySQL.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Binary => "binary",
            Charset::Ascii => "ascii",
            Charset::Latin1 => "latin1",
            Charset::Latin2 => "latin2",
            Charset::Cp1250 => "cp1250",
            Charset::Cp1251 => "cp1251",
            Charset::Cp1256 => "cp1256",
            Charset::Cp1257 => "cp1257",
            Charset::Koi8r => "koi8r",
            Charset::Greek => "greek",
            Charset::Hebrew => "hebrew",
            Charset::Utf8mb3 => "utf8mb3",
            Charset::Utf8mb4 => "utf8mb4",
            Charset::Ucs2 => "ucs2",
            Charset::Utf16 => "utf16",
            Charset::Utf16le => "utf16le",
            Charset::Utf32 => "utf32",
            Charset::Sjis => "sjis",
            Charset::Cp932 => "cp932",
            Charset::Ujis => "ujis",
            Charset::Eucjpms => "eucjpms",
            Charset::Gbk => "gbk",
            Charset::Gb18030 => "gb18030",
            Charset::Big5 => "big5",
            Charset::Euckr => "euckr",
        }
    }

    /// Maximum number of bytes a single character occupies.
    pub fn mbmaxlen(self) -> usize {
        match self {
            Charset::Binary
            | Charset::Ascii
            | Charset::Latin1
            | Charset::Latin2
            | Charset::Cp1250
            | Charset::Cp1251
            | Charset::Cp1256
            | Charset::Cp1257
            | Charset::Koi8r
            | Charset::Greek
            | Charset::Hebrew => 1,
            Charset::Ucs2 | Charset::Sjis | Charset::Cp932 | Charset::Gbk | Charset::Big5 => 2,
            Charset::Euckr => 2,
            Charset::Utf8mb3 | Charset::Ujis | Charset::Eucjpms => 3,
            Charset::Utf8mb4 | Charset::Utf16 | Charset::Utf16le | Charset::Utf32 => 4,
            Charset::Gb18030 => 4,
        }
    }

    /// Decodes the first character of `src`.
    pub fn decode(self, src: &[u8]) -> Decoded {
        match self {
            Charset::Binary => match src.first() {
                Some(&byte) => Decoded::Char {
                    ch: char::from(byte),
                    len: 1,
                },
                None => Decoded::Incomplete,
            },
            Charset::Ascii => match src.first() {
                Some(&byte) if byte.is_ascii() => Decoded::Char {
                    ch: char::from(byte),
                    len: 1,
                },
                Some(_) => Decoded::Illegal,
                None => Decoded::Incomplete,
            },
            Charset::Utf8mb3 => unicode::decode_utf8(src, 3),
            Charset::Utf8mb4 => unicode::decode_utf8(src, 4),
            Charset::Ucs2 => unicode::decode_ucs2(src),
            Charset::Utf16 => unicode::decode_utf16(src, u16::from_be_bytes),
            Charset::Utf16le => unicode::decode_utf16(src, u16::from_le_bytes),
            Charset::Utf32 => unicode::decode_utf32(src),
            legacy => legacy::decode(legacy.encoding_rs(), legacy.mbmaxlen(), src),
        }
    }

    /// Encodes `ch` into the beginning of `dst`.
    pub fn encode(self, ch: char, dst: &mut [u8]) -> Encoded {
        match self {
            Charset::Binary => match u8::try_from(u32::from(ch)) {
                Ok(byte) => put_byte(byte, dst),
                Err(_) => Encoded::Unrepresentable,
            },
            Charset::Ascii if ch.is_ascii() => put_byte(ch as u8, dst),
            Charset::Ascii => Encoded::Unrepresentable,
            Charset::Utf8mb3 => unicode::encode_utf8(ch, 3, dst),
            Charset::Utf8mb4 => unicode::encode_utf8(ch, 4, dst),
            Charset::Ucs2 => unicode::encode_ucs2(ch, dst),
            Charset::Utf16 => unicode::encode_utf16(ch, dst, u16::to_be_bytes),
            Charset::Utf16le => unicode::encode_utf16(ch, dst, u16::to_le_bytes),
            Charset::Utf32 => unicode::encode_utf32(ch, dst),
            legacy => legacy::encode(legacy.encoding_rs(), ch, dst),
        }
    }

    /// The WHATWG encoding implementing a non Unicode character set.
    fn encoding_rs(self) -> &'static encoding_rs::Encoding {
        match self {
            Charset::Latin2 => encoding_rs::ISO_8859_2,
            Charset::Cp1250 => encoding_rs::WINDOWS_1250,
            Charset::Cp1251 => encoding_rs::WINDOWS_1251,
            Charset::Cp1256 => encoding_rs::WINDOWS_1256,
            Charset::Cp1257 => encoding_rs::WINDOWS_1257,
            Charset::Koi8r => encoding_rs::KOI8_R,
            Charset::Greek => encoding_rs::ISO_8859_7,
            Charset::Hebrew => encoding_rs::ISO_8859_8,
            Charset::Sjis | Charset::Cp932 => encoding_rs::SHIFT_JIS,
            Charset::Ujis | Charset::Eucjpms => encoding_rs::EUC_JP,
            Charset::Gbk => encoding_rs::GBK,
            Charset::Gb18030 => encoding_rs::GB18030,
            Charset::Big5 => encoding_rs::BIG5,
            Charset::Euckr => encoding_rs::EUC_KR,
            // Includes `Latin1`. The Unicode sets never reach this.
            _ => encoding_rs::WINDOWS_1252,
        }
    }
}

fn put_byte(byte: u8, dst: &mut [u8]) -> Encoded {
    match dst.first_mut() {
        Some(slot) => {
            *slot = byte;
            Encoded::Written(1)
        }
        None => Encoded::Full,
    }
}

#[cfg(test)]
mod tests {
    use super::{Charset, Decoded, Encoded};

    #[test]
    fn lookup_by_name() {
        assert_eq!(Some(Charset::Utf8mb4), Charset::from_name("UTF8MB4"));
        assert_eq!(Some(Charset::Utf8mb3), Charset::from_name("utf8"));
        assert_eq!(Some(Charset::Latin1), Charset::from_name("latin1"));
        assert_eq!(None, Charset::from_name("klingon"));
    }

    #[test]
    fn latin1_is_windows_1252() {
        // 0x80 is the euro sign in cp1252, but a control character in ISO 8859-1
        assert_eq!(
            Decoded::Char { ch: '€', len: 1 },
            Charset::Latin1.decode(&[0x80])
        );
        let mut buf = [0u8; 1];
        assert_eq!(Encoded::Written(1), Charset::Latin1.encode('€', &mut buf));
        assert_eq!(0x80, buf[0]);
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        assert_eq!(Decoded::Illegal, Charset::Ascii.decode(&[0xE4]));
        assert_eq!(Encoded::Unrepresentable, Charset::Ascii.encode('ä', &mut [0u8; 4]));
    }

    #[test]
    fn binary_maps_bytes_to_code_points() {
        assert_eq!(
            Decoded::Char { ch: 'ÿ', len: 1 },
            Charset::Binary.decode(&[0xFF])
        );
        assert_eq!(Encoded::Unrepresentable, Charset::Binary.encode('€', &mut [0u8; 4]));
    }

    #[test]
    fn multi_byte_legacy_character() {
        // 'あ' in Shift_JIS
        assert_eq!(
            Decoded::Char { ch: 'あ', len: 2 },
            Charset::Sjis.decode(&[0x82, 0xA0, b'x'])
        );
        // Lead byte without trail byte
        assert_eq!(Decoded::Incomplete, Charset::Sjis.decode(&[0x82]));
        let mut buf = [0u8; 2];
        assert_eq!(Encoded::Written(2), Charset::Sjis.encode('あ', &mut buf));
        assert_eq!([0x82, 0xA0], buf);
        assert_eq!(Encoded::Full, Charset::Sjis.encode('あ', &mut buf[..1]));
    }

    #[test]
    fn single_byte_legacy_without_mapping() {
        // 0xA1 is not assigned in ISO 8859-8
        assert_eq!(Decoded::Illegal, Charset::Hebrew.decode(&[0xA1]));
        assert_eq!(Encoded::Unrepresentable, Charset::Hebrew.encode('€', &mut [0u8; 4]));
    }

    #[test]
    fn nothing_to_decode() {
        assert_eq!(Decoded::Incomplete, Charset::Latin1.decode(&[]));
        assert_eq!(Decoded::Incomplete, Charset::Utf8mb4.decode(&[]));
        assert_eq!(Decoded::Incomplete, Charset::Binary.decode(&[]));
    }
}
