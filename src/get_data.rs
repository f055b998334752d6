//! Chunked retrieval of a single value into application buffers.
//!
//! ODBC applications may fetch large values piecewise by calling `SQLGetData` repeatedly on the
//! same column. Each call continues where the previous one stopped, which is tracked by a
//! [`ReadPosition`]. Every reader reports the length of what is left of the value (including the
//! part delivered by the call itself) in the returned [`Chunk`], and [`SqlResult::NoData`] once the
//! value has been delivered completely.

mod attribute;
mod hex;
mod narrow;
mod position;
mod wide;

pub use self::{
    attribute::copy_str_data,
    hex::read_hex,
    narrow::read_text,
    position::ReadPosition,
    wide::{read_wide, WideUnit},
};

use crate::{buffers::Indicator, diagnostics::Warning};

/// A value as delivered by the server, together with the length it should be presented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source<'a> {
    bytes: &'a [u8],
    fill_length: usize,
}

impl<'a> Source<'a> {
    /// Presents `bytes` as they are.
    pub fn new(bytes: &'a [u8]) -> Self {
        Source {
            bytes,
            fill_length: bytes.len(),
        }
    }

    /// Source of unknown length (`SQL_NTS`). Only the bytes up to the first zero are part of the
    /// value.
    pub fn nul_terminated(bytes: &'a [u8]) -> Self {
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self::new(&bytes[..len])
    }

    /// Length the value is padded to with spaces, if the session asks for padding. Values of fixed
    /// length `CHAR` columns are padded up to the display size of the column.
    pub fn with_fill_length(self, fill_length: usize) -> Self {
        Source {
            fill_length,
            ..self
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Describes what a single read delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Length of the value which has been left before this call, or [`Indicator::Null`].
    pub indicator: Indicator,
    /// Number of bytes (or code units) written by this call, excluding the terminating zero. For
    /// calls with a length but without memory, this is the number which would have been written.
    pub written: usize,
    /// `true` if parts of the value are left for subsequent calls.
    pub truncated: bool,
    /// Number of characters which had to be replaced with `?`.
    pub substitutions: usize,
}

impl Chunk {
    /// Chunk reported for a `NULL` value.
    pub fn null() -> Self {
        Chunk {
            indicator: Indicator::Null,
            written: 0,
            truncated: false,
            substitutions: 0,
        }
    }

    /// The diagnostics the driver attaches to a `SQL_SUCCESS_WITH_INFO` for this chunk.
    pub fn warnings(&self) -> impl Iterator<Item = Warning> {
        let truncated = self.truncated.then(|| Warning::Truncated {
            remaining: self.indicator.length().unwrap_or(0),
        });
        let substituted = (self.substitutions > 0).then_some(Warning::CharacterSubstitution {
            count: self.substitutions,
        });
        truncated.into_iter().chain(substituted)
    }
}

#[cfg(test)]
mod tests {
    use crate::{buffers::Indicator, diagnostics::Warning};

    use super::{Chunk, Source};

    #[test]
    fn nul_terminated_source() {
        assert_eq!(b"abc", Source::nul_terminated(b"abc\0def").bytes());
        assert_eq!(b"abc", Source::nul_terminated(b"abc").bytes());
    }

    #[test]
    fn warnings_of_a_chunk() {
        let chunk = Chunk {
            indicator: Indicator::Length(7),
            written: 3,
            truncated: true,
            substitutions: 2,
        };
        let warnings: Vec<_> = chunk.warnings().collect();
        assert_eq!(
            vec![
                Warning::Truncated { remaining: 7 },
                Warning::CharacterSubstitution { count: 2 }
            ],
            warnings
        );
        assert_eq!(0, Chunk::null().warnings().count());
    }
}
