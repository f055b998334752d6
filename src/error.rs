use thiserror::Error as ThisError;

use crate::{diagnostics::State, CDataType};

#[derive(Debug, ThisError, PartialEq, Eq)]
/// Failure of a data retrieval call. Each variant corresponds to the SQLSTATE the driver reports
/// to the application, see [`Error::state`].
pub enum Error {
    /// The application passed a negative buffer length, which is not one of the special values
    /// understood for the argument.
    #[error(
        "Invalid string or buffer length: {length}. The buffer length passed to the driver must \
        not be negative."
    )]
    InvalidBufferLength { length: isize },
    /// The application referred to a column which does not exist in the result set. Column
    /// numbers are one based.
    #[error(
        "Invalid descriptor index. Column number {column_number} is out of range. The result set \
        has {num_cols} columns."
    )]
    InvalidColumnNumber { column_number: u16, num_cols: u16 },
    /// Data has been requested before the first or after the last row of the result set.
    #[error("Invalid cursor state. The cursor is not positioned on a row.")]
    NoCurrentRow,
    /// The value of the column can not be delivered in the requested C type.
    #[error(
        "Restricted data type attribute violation. Column {column_number} can not be converted to \
        the C type {c_type:?}."
    )]
    UnsupportedConversion { column_number: u16, c_type: CDataType },
    /// The text of a temporal value could not be understood as a date, time or timestamp.
    #[error("Invalid datetime format: '{text}'.")]
    InvalidDatetimeFormat { text: String },
}

impl Error {
    /// SQLSTATE the driver reports for this error.
    pub fn state(&self) -> State {
        match self {
            Error::InvalidBufferLength { .. } => State::INVALID_STRING_OR_BUFFER_LENGTH,
            Error::InvalidColumnNumber { .. } => State::INVALID_DESCRIPTOR_INDEX,
            Error::NoCurrentRow => State::INVALID_CURSOR_STATE,
            Error::UnsupportedConversion { .. } => State::RESTRICTED_DATA_TYPE_ATTRIBUTE_VIOLATION,
            Error::InvalidDatetimeFormat { .. } => State::INVALID_DATETIME_FORMAT,
        }
    }
}
