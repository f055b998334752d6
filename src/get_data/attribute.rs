use crate::{buffers::clamp_small_int, sql_result::SqlResult, Error};

/// `SQL_NTS`. Passed as buffer length, it states the buffer is large enough to hold the string.
pub const NTS: i16 = -3;

/// Copies a driver owned string, e.g. a column name or the value of a connection attribute, into an
/// application buffer and terminates it with zero.
///
/// Returns the length of `src` in bytes. The result is [`SqlResult::SuccessWithInfo`] if `src`
/// has been truncated to fit into the buffer.
///
/// # Errors
///
/// [`Error::InvalidBufferLength`] for negative buffer lengths other than [`NTS`].
pub fn copy_str_data(
    buffer: Option<&mut [u8]>,
    buffer_length: i16,
    src: &str,
) -> Result<SqlResult<i16>, Error> {
    let capacity = match buffer_length {
        NTS => src.len(),
        negative if negative < 0 => {
            return Err(Error::InvalidBufferLength {
                length: negative.into(),
            })
        }
        length => usize::from(length.unsigned_abs()).saturating_sub(1),
    };

    if let Some(buffer) = buffer.filter(|buffer| !buffer.is_empty()) {
        let len = src.len().min(capacity).min(buffer.len() - 1);
        buffer[..len].copy_from_slice(&src.as_bytes()[..len]);
        buffer[len] = 0;
    }

    Ok(SqlResult::success(
        clamp_small_int(src.len()),
        src.len() > capacity,
    ))
}
