use log::debug;

use crate::{
    buffers::{Indicator, TargetBuffer},
    session::Session,
    sql_result::SqlResult,
};

use super::{Chunk, ReadPosition, Source};

/// Copies the next part of `source` into `target`, starting where the previous call on `position`
/// left off.
///
/// Text values (`binary == false`) are terminated with a zero byte, so one byte of the declared
/// buffer length is reserved for the terminator. Binary values use the complete buffer and are
/// only terminated if there is room left. If the session asks for padding, the value is extended
/// with spaces up to the fill length of `source`.
///
/// A declared buffer length of zero only reports the length of the value and leaves `position`
/// untouched.
pub fn read_text(
    position: &mut ReadPosition,
    source: Source<'_>,
    mut target: TargetBuffer<'_, u8>,
    session: &Session,
    binary: bool,
) -> SqlResult<Chunk> {
    let declared = target.declared();
    let mut capacity = if binary {
        declared
    } else {
        declared.saturating_sub(1)
    };
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
    let length = remaining.min(capacity);

    if let Some(buf) = target.slice_mut() {
        let copied = src.len().min(length);
        buf[..copied].copy_from_slice(&src[..copied]);
        buf[copied..length].fill(b' ');
        if !binary || length != capacity {
            buf[length] = 0;
        }
    }
    if declared != 0 {
        *position = ReadPosition::Offset(offset + length);
    }

    let truncated = declared == 0 || capacity < remaining;
    if truncated {
        debug!("Returned {length} characters from offset {offset}");
    }
    SqlResult::success(
        Chunk {
            indicator: Indicator::Length(remaining),
            written: length,
            truncated,
            substitutions: 0,
        },
        truncated,
    )
}
