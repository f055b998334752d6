use log::debug;

use crate::{
    buffers::{Indicator, TargetBuffer},
    charset::{transcode_into, CharSink, Decoded, Encoded},
    session::Session,
    sql_result::SqlResult,
    Charset,
};

use super::{Chunk, ReadPosition, Source};

/// Code unit of a wide character string. `SQLWCHAR` is UTF-16 on Windows and with most driver
/// managers, but UTF-32 with some builds of iODBC.
pub trait WideUnit: Copy {
    const SPACE: Self;
    const NUL: Self;

    /// Number of units needed to represent `ch`.
    fn len_of(ch: char) -> usize;

    /// Writes `ch` into `dst`, which is exactly [`Self::len_of`] units long.
    fn encode(ch: char, dst: &mut [Self]);
}

impl WideUnit for u16 {
    const SPACE: Self = b' ' as u16;
    const NUL: Self = 0;

    fn len_of(ch: char) -> usize {
        ch.len_utf16()
    }

    fn encode(ch: char, dst: &mut [Self]) {
        ch.encode_utf16(dst);
    }
}

impl WideUnit for u32 {
    const SPACE: Self = b' ' as u32;
    const NUL: Self = 0;

    fn len_of(_ch: char) -> usize {
        1
    }

    fn encode(ch: char, dst: &mut [Self]) {
        dst[0] = u32::from(ch);
    }
}

/// Writes characters into the units of the application buffer, but never more than `limit` units.
/// Without memory, the units are only counted.
struct UnitSink<'a, U> {
    units: Option<&'a mut [U]>,
    limit: usize,
    written: usize,
}

impl<U: WideUnit> CharSink for UnitSink<'_, U> {
    fn put(&mut self, ch: char) -> Encoded {
        let len = U::len_of(ch);
        if self.written + len > self.limit {
            return Encoded::Full;
        }
        if let Some(units) = self.units.as_deref_mut() {
            U::encode(ch, &mut units[self.written..self.written + len]);
        }
        self.written += len;
        Encoded::Written(len)
    }
}

/// Like [`super::read_text`], but converts the value from the character set of the connection
/// into wide characters.
///
/// The declared buffer length and [`Chunk::written`] are measured in code units, while the read
/// position and the indicator refer to bytes of the source value. Since no character set needs
/// less than one byte per code unit, the indicator is an upper bound for the number of units
/// required to hold the rest of the value. A character is never split across two calls. If it
/// does not fit completely, it is left for the next call.
pub fn read_wide<U: WideUnit>(
    position: &mut ReadPosition,
    source: Source<'_>,
    charset: Charset,
    mut target: TargetBuffer<'_, U>,
    session: &Session,
) -> SqlResult<Chunk> {
    let declared = target.declared();
    let mut capacity = declared.saturating_sub(1);
    let mut src = source.bytes;
    let mut fill = source.fill_length;
    if session.max_length != 0 {
        capacity = capacity.min(session.max_length);
        src = &src[..src.len().min(session.max_length)];
        fill = fill.min(session.max_length);
    }
    if !session.pad_space || fill < src.len() {
        fill = src.len();
    }

    let offset = if declared == 0 {
        position.offset()
    } else {
        match position.resume(fill) {
            Some(offset) => offset,
            None => return SqlResult::NoData,
        }
    };
    let src = src.get(offset..).unwrap_or_default();
    let remaining = fill.saturating_sub(offset);

    let mut sink = UnitSink {
        units: target.slice_mut(),
        limit: capacity,
        written: 0,
    };
    let (mut consumed, mut substitutions) = transcode_into(src, charset, &mut sink);
    // The value ends in the middle of a character, e.g. because `max_length` cut it short. The
    // leftover bytes are delivered as a single `?`.
    if consumed < src.len()
        && charset.decode(&src[consumed..]) == Decoded::Incomplete
        && matches!(sink.put('?'), Encoded::Written(_))
    {
        consumed = src.len();
        substitutions += 1;
    }
    let mut written = sink.written;
    let units = sink.units;
    // Padding only starts once all of the actual value has been delivered. One space for every
    // byte of fill length.
    let padding = if consumed == src.len() {
        remaining.saturating_sub(src.len()).min(capacity - written)
    } else {
        0
    };
    if let Some(units) = units {
        units[written..written + padding].fill(U::SPACE);
        units[written + padding] = U::NUL;
    }
    written += padding;
    consumed += padding;

    if declared != 0 {
        *position = ReadPosition::Offset(offset + consumed);
    }

    let truncated = declared == 0 || consumed < remaining;
    if truncated {
        debug!("Returned {written} characters from offset {offset}");
    }
    SqlResult::success(
        Chunk {
            indicator: Indicator::Length(remaining),
            written,
            truncated,
            substitutions,
        },
        truncated || substitutions != 0,
    )
}

#[cfg(test)]
mod tests {
    use widestring::{U16String, U32String};

    use crate::{
        buffers::{Indicator, TargetBuffer},
        get_data::{ReadPosition, Source},
        session::Session,
        sql_result::SqlResult,
        Charset,
    };

    use super::read_wide;

    #[test]
    fn utf8_to_utf16() {
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0xFFFFu16; 8];
        let result = read_wide(
            &mut position,
            Source::new("Grüße".as_bytes()),
            Charset::Utf8mb4,
            TargetBuffer::from_slice(&mut buf),
            &Session::default(),
        );
        let chunk = match result {
            SqlResult::Success(chunk) => chunk,
            other => panic!("Expected success, got {other:?}"),
        };
        assert_eq!(5, chunk.written);
        assert_eq!(Indicator::Length(7), chunk.indicator);
        assert_eq!(U16String::from_str("Grüße").as_slice(), &buf[..5]);
        assert_eq!(0, buf[5]);
    }

    #[test]
    fn latin1_to_utf32() {
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u32; 4];
        let result = read_wide(
            &mut position,
            Source::new(&[b'a', 0xE4, 0x80]),
            Charset::Latin1,
            TargetBuffer::from_slice(&mut buf),
            &Session::default(),
        );
        assert!(matches!(result, SqlResult::Success(_)));
        assert_eq!(U32String::from_str("aä€").as_slice(), &buf[..3]);
    }

    #[test]
    fn surrogate_pair_is_never_split() {
        let session = Session::default();
        let source = Source::new("a😀".as_bytes());
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u16; 4];

        // Room for two units plus terminator. The emoji would need the second and third unit.
        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        let chunk = match result {
            SqlResult::SuccessWithInfo(chunk) => chunk,
            other => panic!("Expected truncation, got {other:?}"),
        };
        assert_eq!(1, chunk.written);
        assert_eq!(Indicator::Length(5), chunk.indicator);
        assert_eq!([u16::from(b'a'), 0], buf[..2]);
        assert_eq!(ReadPosition::Offset(1), position);

        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        let chunk = match result {
            SqlResult::Success(chunk) => chunk,
            other => panic!("Expected success, got {other:?}"),
        };
        assert_eq!(2, chunk.written);
        assert_eq!(Indicator::Length(4), chunk.indicator);
        assert_eq!(U16String::from_str("😀").as_slice(), &buf[..2]);

        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        assert_eq!(SqlResult::NoData, result);
    }

    #[test]
    fn substitutions_are_reported() {
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u16; 8];
        let result = read_wide(
            &mut position,
            Source::new(&[b'a', 0xFF, b'b']),
            Charset::Utf8mb4,
            TargetBuffer::from_slice(&mut buf),
            &Session::default(),
        );
        let chunk = match result {
            SqlResult::SuccessWithInfo(chunk) => chunk,
            other => panic!("Expected warning, got {other:?}"),
        };
        assert!(!chunk.truncated);
        assert_eq!(1, chunk.substitutions);
        assert_eq!(U16String::from_str("a?b").as_slice(), &buf[..3]);
    }

    #[test]
    fn value_ending_in_partial_character() {
        let session = Session::default();
        // 'a', 'b' and the first two bytes of '€'
        let source = Source::new(b"ab\xE2\x82");
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u16; 16];

        let target = TargetBuffer::from_slice(&mut buf);
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        let chunk = match result {
            SqlResult::SuccessWithInfo(chunk) => chunk,
            other => panic!("Expected warning, got {other:?}"),
        };
        assert!(!chunk.truncated);
        assert_eq!(1, chunk.substitutions);
        assert_eq!(Indicator::Length(4), chunk.indicator);
        assert_eq!(U16String::from_str("ab?").as_slice(), &buf[..chunk.written]);
        assert_eq!(0, buf[3]);

        let target = TargetBuffer::from_slice(&mut buf);
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        assert_eq!(SqlResult::NoData, result);
    }

    #[test]
    fn max_length_splitting_a_character() {
        let session = Session {
            max_length: 2,
            ..Session::default()
        };
        // 'ä' takes two bytes, only the first one is within the limit.
        let source = Source::new("aä".as_bytes());
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u16; 16];

        let target = TargetBuffer::from_slice(&mut buf);
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        let chunk = match result {
            SqlResult::SuccessWithInfo(chunk) => chunk,
            other => panic!("Expected warning, got {other:?}"),
        };
        assert!(!chunk.truncated);
        assert_eq!(2, chunk.written);
        assert_eq!(Indicator::Length(2), chunk.indicator);
        assert_eq!(U16String::from_str("a?").as_slice(), &buf[..2]);

        let target = TargetBuffer::from_slice(&mut buf);
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        assert_eq!(SqlResult::NoData, result);
    }

    #[test]
    fn partial_character_waits_for_room() {
        let session = Session::default();
        let source = Source::new(b"ab\xE2");
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u16; 4];

        // Room for "ab" only
        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        let chunk = result.unwrap();
        assert!(chunk.truncated);
        assert_eq!(0, chunk.substitutions);
        assert_eq!(ReadPosition::Offset(2), position);

        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_wide(&mut position, source, Charset::Utf8mb4, target, &session);
        let chunk = result.unwrap();
        assert!(!chunk.truncated);
        assert_eq!(1, chunk.substitutions);
        assert_eq!(u16::from(b'?'), buf[0]);
    }

    #[test]
    fn padding_terminates() {
        let session = Session {
            pad_space: true,
            ..Session::default()
        };
        let source = Source::new(b"ab").with_fill_length(4);
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u16; 4];

        let target = TargetBuffer::new(Some(&mut buf[..]), 4).unwrap();
        let result = read_wide(&mut position, source, Charset::Latin1, target, &session);
        assert!(matches!(result, SqlResult::SuccessWithInfo(_)));
        assert_eq!(U16String::from_str("ab ").as_slice(), &buf[..3]);
        assert_eq!(0, buf[3]);

        let target = TargetBuffer::new(Some(&mut buf[..]), 4).unwrap();
        let result = read_wide(&mut position, source, Charset::Latin1, target, &session);
        let chunk = match result {
            SqlResult::Success(chunk) => chunk,
            other => panic!("Expected success, got {other:?}"),
        };
        assert_eq!(Indicator::Length(1), chunk.indicator);
        assert_eq!([u16::from(b' '), 0], buf[..2]);

        let target = TargetBuffer::new(Some(&mut buf[..]), 4).unwrap();
        let result = read_wide(&mut position, source, Charset::Latin1, target, &session);
        assert_eq!(SqlResult::NoData, result);
    }

    #[test]
    fn length_only() {
        let mut position = ReadPosition::NotStarted;
        let result = read_wide::<u16>(
            &mut position,
            Source::new(b"hello"),
            Charset::Latin1,
            TargetBuffer::length_only(),
            &Session::default(),
        );
        assert_eq!(Indicator::Length(5), result.unwrap().indicator);
        assert_eq!(ReadPosition::NotStarted, position);
    }
}
