use log::debug;

use crate::{
    buffers::{Indicator, TargetBuffer},
    session::Session,
    sql_result::SqlResult,
};

use super::{Chunk, ReadPosition};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Delivers binary data as text for applications asking for `SQL_C_CHAR`. Every byte is written as
/// two upper case hexadecimal digits, followed by a terminating zero.
///
/// The indicator reports the number of hex digits left, i.e. twice the number of bytes. Binary
/// values are never padded.
pub fn read_hex(
    position: &mut ReadPosition,
    bytes: &[u8],
    mut target: TargetBuffer<'_, u8>,
    session: &Session,
) -> SqlResult<Chunk> {
    let declared = target.declared();
    let mut capacity = declared;
    let mut src = bytes;
    if session.max_length != 0 {
        let limit = session.max_length.saturating_add(1);
        capacity = capacity.min(limit);
        src = &src[..src.len().min(limit / 2)];
    }

    let Some(offset) = position.resume(src.len()) else {
        return SqlResult::NoData;
    };
    let src = &src[offset..];
    // Two digits per byte, plus the terminator
    let length = if capacity == 0 {
        0
    } else {
        ((capacity - 1) / 2).min(src.len())
    };

    if let Some(buf) = target.slice_mut() {
        for (byte, digits) in src[..length].iter().zip(buf.chunks_exact_mut(2)) {
            digits[0] = HEX_DIGITS[usize::from(byte >> 4)];
            digits[1] = HEX_DIGITS[usize::from(byte & 0x0F)];
        }
        buf[length * 2] = 0;
    }
    if declared != 0 {
        *position = ReadPosition::Offset(offset + length);
    }

    let truncated = declared == 0 || length < src.len();
    if truncated {
        debug!("Returned {} characters from offset {offset}", length * 2);
    }
    SqlResult::success(
        Chunk {
            indicator: Indicator::Length(src.len() * 2),
            written: length * 2,
            truncated,
            substitutions: 0,
        },
        truncated,
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        buffers::{Indicator, TargetBuffer},
        get_data::ReadPosition,
        session::Session,
        sql_result::SqlResult,
    };

    use super::read_hex;

    #[test]
    fn two_calls() {
        let session = Session::default();
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0xFFu8; 8];

        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_hex(&mut position, &[0xAB, 0xCD], target, &session);
        let chunk = match result {
            SqlResult::SuccessWithInfo(chunk) => chunk,
            other => panic!("Expected truncation, got {other:?}"),
        };
        assert_eq!(Indicator::Length(4), chunk.indicator);
        assert_eq!(b"AB\0", &buf[..3]);

        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_hex(&mut position, &[0xAB, 0xCD], target, &session);
        let chunk = match result {
            SqlResult::Success(chunk) => chunk,
            other => panic!("Expected success, got {other:?}"),
        };
        assert_eq!(Indicator::Length(2), chunk.indicator);
        assert_eq!(b"CD\0", &buf[..3]);

        let target = TargetBuffer::new(Some(&mut buf[..]), 3).unwrap();
        let result = read_hex(&mut position, &[0xAB, 0xCD], target, &session);
        assert_eq!(SqlResult::NoData, result);
    }

    #[test]
    fn odd_capacity_wastes_a_byte() {
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u8; 5];
        let result = read_hex(
            &mut position,
            &[0x01, 0x2F],
            TargetBuffer::from_slice(&mut buf),
            &Session::default(),
        );
        assert!(matches!(result, SqlResult::Success(_)));
        assert_eq!(b"012F\0", &buf);
    }

    #[test]
    fn truncated_with_odd_capacity() {
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u8; 5];
        let result = read_hex(
            &mut position,
            &[1, 2, 3],
            TargetBuffer::from_slice(&mut buf),
            &Session::default(),
        );
        assert!(matches!(result, SqlResult::SuccessWithInfo(_)));
        assert_eq!(ReadPosition::Offset(2), position);
    }

    #[test]
    fn length_only() {
        let mut position = ReadPosition::NotStarted;
        let result = read_hex(
            &mut position,
            &[1, 2, 3],
            TargetBuffer::length_only(),
            &Session::default(),
        );
        assert_eq!(Indicator::Length(6), result.unwrap().indicator);
        assert_eq!(ReadPosition::NotStarted, position);
    }

    #[test]
    fn max_length_clamps_source() {
        let session = Session {
            max_length: 3,
            ..Session::default()
        };
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u8; 16];
        let result = read_hex(
            &mut position,
            &[1, 2, 3, 4],
            TargetBuffer::from_slice(&mut buf),
            &session,
        );
        // Room for three digits and the terminator, so only one byte fits
        assert!(matches!(result, SqlResult::SuccessWithInfo(_)));
        assert_eq!(Indicator::Length(4), result.unwrap().indicator);
        assert_eq!(b"01\0", &buf[..3]);
    }

    #[test]
    fn largest_max_length_is_no_limit() {
        let session = Session {
            max_length: usize::MAX,
            ..Session::default()
        };
        let mut position = ReadPosition::NotStarted;
        let mut buf = [0u8; 8];
        let result = read_hex(
            &mut position,
            &[0xAB, 0xCD],
            TargetBuffer::from_slice(&mut buf),
            &session,
        );
        assert!(matches!(result, SqlResult::Success(_)));
        assert_eq!(b"ABCD\0", &buf[..5]);
    }
}
