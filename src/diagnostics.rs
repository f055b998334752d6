use std::fmt;

/// A five character SQLSTATE code. The first two characters indicate the class, the next three the
/// subclass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct State(pub [u8; 5]);

impl State {
    /// General warning. Reported if characters had to be substituted during conversion between
    /// character sets.
    pub const GENERAL_WARNING: State = State(*b"01000");
    /// String or binary data returned for a column resulted in the truncation of nonblank character
    /// or non-NULL binary data. If it was a string value, it was right-truncated.
    pub const STRING_DATA_RIGHT_TRUNCATION: State = State(*b"01004");
    pub const RESTRICTED_DATA_TYPE_ATTRIBUTE_VIOLATION: State = State(*b"07006");
    pub const INVALID_DESCRIPTOR_INDEX: State = State(*b"07009");
    pub const INVALID_DATETIME_FORMAT: State = State(*b"22007");
    pub const INVALID_CURSOR_STATE: State = State(*b"24000");
    pub const INVALID_STRING_OR_BUFFER_LENGTH: State = State(*b"HY090");

    /// View status code as string slice for displaying. SQLSTATEs always consist of ASCII
    /// characters, anything else is shown as `?????`.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("?????")
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition attached to an otherwise successful read, which the driver reports as a diagnostic
/// record alongside `SQL_SUCCESS_WITH_INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// The value did not fit into the buffer. `remaining` is the length of the value, not counting
    /// anything returned by earlier calls.
    Truncated { remaining: usize },
    /// `count` characters could not be represented in the target character set and have been
    /// replaced with `?`.
    CharacterSubstitution { count: usize },
}

impl Warning {
    pub fn state(&self) -> State {
        match self {
            Warning::Truncated { .. } => State::STRING_DATA_RIGHT_TRUNCATION,
            Warning::CharacterSubstitution { .. } => State::GENERAL_WARNING,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Truncated { remaining } => write!(
                f,
                "State: {}, String data, right truncated. {remaining} bytes have been left.",
                self.state()
            ),
            Warning::CharacterSubstitution { count } => write!(
                f,
                "State: {}, {count} characters could not be converted and have been replaced \
                with '?'.",
                self.state()
            ),
        }
    }
}
