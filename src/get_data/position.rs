/// Tracks how much of a value has already been delivered to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPosition {
    /// Nothing has been read yet. Reset whenever the cursor moves to another row.
    #[default]
    NotStarted,
    /// Number of source bytes delivered by earlier calls.
    Offset(usize),
}

impl ReadPosition {
    /// Forget about any progress, e.g. because the cursor moved on to the next row.
    pub fn reset(&mut self) {
        *self = ReadPosition::NotStarted;
    }

    /// Number of bytes already delivered. `0` if the read has not been started.
    pub fn offset(self) -> usize {
        match self {
            ReadPosition::NotStarted => 0,
            ReadPosition::Offset(offset) => offset,
        }
    }

    /// Offset the next read starts from, or `None` if all of `length` has been delivered by
    /// earlier calls. A read which has not been started always starts at `0`, even for empty
    /// values.
    pub(super) fn resume(self, length: usize) -> Option<usize> {
        match self {
            ReadPosition::NotStarted => Some(0),
            ReadPosition::Offset(offset) if offset >= length => None,
            ReadPosition::Offset(offset) => Some(offset),
        }
    }
}
