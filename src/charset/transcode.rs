use super::{Charset, Decoded, Encoded};

/// Receives the characters produced by [`transcode_into`].
pub trait CharSink {
    /// Appends `ch` to the output. Must not write anything unless it returns
    /// [`Encoded::Written`].
    fn put(&mut self, ch: char) -> Encoded;
}

/// Result of a conversion between two character sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transcoded {
    /// Number of source bytes consumed.
    pub read: usize,
    /// Number of bytes written to the destination.
    pub written: usize,
    /// Number of characters which have been replaced with `?`, either because they are not valid
    /// in the source character set, or because they can not be represented in the destination.
    pub errors: usize,
}

/// Decodes `src` character by character and hands each one to `sink`. Stops once the input is
/// exhausted, the input ends in the middle of a character or the sink is full. A character is
/// only counted as read if the sink accepted it, so the returned number of consumed bytes always
/// ends on a character boundary.
///
/// Returns the number of bytes consumed and the number of substituted characters.
pub fn transcode_into(src: &[u8], from: Charset, sink: &mut impl CharSink) -> (usize, usize) {
    let mut read = 0;
    let mut errors = 0;
    while read < src.len() {
        let (ch, len, invalid) = match from.decode(&src[read..]) {
            Decoded::Char { ch, len } => (ch, len, false),
            Decoded::Unmapped { len } => ('?', len, true),
            Decoded::Illegal => ('?', 1, true),
            Decoded::Incomplete => break,
        };
        let substituted = match sink.put(ch) {
            Encoded::Written(_) => invalid,
            Encoded::Unrepresentable if ch != '?' => match sink.put('?') {
                Encoded::Written(_) => true,
                _ => break,
            },
            _ => break,
        };
        read += len;
        if substituted {
            errors += 1;
        }
    }
    (read, errors)
}

/// Converts `src` from one character set into another, writing as many complete characters into
/// `dst` as fit.
///
/// # Example
///
/// ```
/// use odbc_marshal::{transcode, Charset};
///
/// let mut dst = [0u8; 16];
/// let result = transcode("Grüße".as_bytes(), Charset::Utf8mb4, Charset::Latin1, &mut dst);
/// assert_eq!(7, result.read);
/// assert_eq!(b"Gr\xFC\xDFe", &dst[..result.written]);
/// assert_eq!(0, result.errors);
/// ```
pub fn transcode(src: &[u8], from: Charset, to: Charset, dst: &mut [u8]) -> Transcoded {
    let mut sink = ByteSink {
        charset: to,
        dst,
        written: 0,
    };
    let (read, errors) = transcode_into(src, from, &mut sink);
    Transcoded {
        read,
        written: sink.written,
        errors,
    }
}

struct ByteSink<'a> {
    charset: Charset,
    dst: &'a mut [u8],
    written: usize,
}

impl CharSink for ByteSink<'_> {
    fn put(&mut self, ch: char) -> Encoded {
        let result = self.charset.encode(ch, &mut self.dst[self.written..]);
        if let Encoded::Written(len) = result {
            self.written += len;
        }
        result
    }
}
