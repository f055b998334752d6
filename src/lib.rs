//! # ODBC marshal
//!
//! The data marshaling core of a MySQL ODBC driver. The server describes result set columns using
//! the native MySQL type vocabulary and delivers values as text in the character set of the
//! connection. ODBC applications on the other hand ask for SQL data types, and fetch values into
//! buffers of their own choosing, as narrow or wide text, binary data, or date and time structs.
//! This crate bridges the two:
//!
//! * [`classify`] maps a column onto SQL data type, precision, display size and transfer length.
//! * [`transcode`] converts text between the MySQL character sets.
//! * [`get_data`] delivers values piecewise into application buffers, the way `SQLGetData` does.
//! * [`ResultSet`] ties it together. It resolves default column bindings once the metadata of the
//!   result is known and dispatches reads to the matching reader.
//!
//! Nothing in here performs I/O. The caller is expected to hold the connection lock.
//!
//! ```
//! use odbc_marshal::{
//!     field::{ColumnDescriptor, FieldType},
//!     ResultSet, Session,
//! };
//!
//! let mut result_set = ResultSet::new(Session::default());
//! result_set.materialize(
//!     vec![ColumnDescriptor::new("greeting", FieldType::VarString, 20)],
//!     vec![vec![Some(b"hello".to_vec())]],
//! );
//! result_set.fetch();
//! let mut text = Vec::new();
//! assert!(result_set.get_text(1, &mut text).unwrap());
//! assert_eq!(b"hello", text.as_slice());
//! ```

mod charset;
mod column_description;
mod data_type;
mod diagnostics;
mod error;
mod logging;
mod result_set;
mod session;
mod sql_result;
mod type_map;

pub mod buffers;
pub mod field;
pub mod get_data;
pub mod temporal;

pub use self::{
    charset::{transcode, transcode_into, CharSink, Charset, Decoded, Encoded, Transcoded},
    column_description::{ColumnDescription, Nullability},
    data_type::{CDataType, SqlDataType},
    diagnostics::{State, Warning},
    error::Error,
    logging::log_warnings,
    result_set::{Binding, ResultSet, Row, Target},
    session::{OdbcVersion, Session, FLAG_NO_BIGINT, FLAG_PAD_SPACE, FLAG_ZERO_DATE_TO_MIN},
    sql_result::SqlResult,
    type_map::{classify, ColumnType},
};
// Reexports
pub use widestring::{U16Str, U16String, U32Str, U32String};
