use std::cmp::max;

use log::trace;

use crate::{
    field::{ColumnDescriptor, FieldType},
    session::{OdbcVersion, Session},
    SqlDataType,
};

/// Describes how a native column is presented to the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnType {
    /// SQL data type reported by `SQLDescribeCol`.
    pub data_type: SqlDataType,
    /// Number of bytes needed to hold a value in its canonical C representation
    /// (`SQL_DESC_OCTET_LENGTH`).
    pub transfer_length: usize,
    /// Column size. For character columns the maximum number of characters, for numeric types the
    /// number of digits.
    pub precision: usize,
    /// Maximum number of characters required to display data from the column.
    pub display_size: usize,
    /// Name of the native type, e.g. `bigint unsigned`. Reported as `SQL_DESC_TYPE_NAME`.
    pub type_name: String,
}

/// Maps a native column onto the ODBC type vocabulary.
///
/// Transfer length, precision and display size start out as the larger of declared and observed
/// length and are refined per type. The result only depends on the descriptor and the session.
pub fn classify(field: &ColumnDescriptor, session: &Session) -> ColumnType {
    let base = max(field.length, field.max_length);
    let mut transfer_length = base;
    let mut precision = base;
    let mut display_size = base;

    let odbc3 = session.odbc_version == OdbcVersion::Odbc3;
    let unsigned = field.is_unsigned();
    let binary = field.is_binary();
    // Length in characters, falling back to `default` for columns without declared length.
    let char_length = |default: usize| match (field.length, session.charset) {
        (0, _) => default,
        (length, Some(charset)) => length / charset.mbmaxlen(),
        (length, None) => length,
    };

    let (data_type, type_name) = match field.field_type {
        FieldType::Bit => {
            transfer_length = 1;
            (SqlDataType::BIT, "bit".to_owned())
        }
        FieldType::Decimal | FieldType::NewDecimal => {
            display_size = base
                .saturating_sub(usize::from(!unsigned))
                .saturating_sub(usize::from(field.decimals > 0));
            precision = display_size;
            (SqlDataType::DECIMAL, "decimal".to_owned())
        }
        FieldType::Tiny => {
            transfer_length = 1;
            if field.flags.numeric {
                (SqlDataType::TINYINT, with_sign("tinyint", unsigned))
            } else {
                (SqlDataType::CHAR, with_sign("char", unsigned))
            }
        }
        FieldType::Short => {
            transfer_length = 2;
            (SqlDataType::SMALLINT, with_sign("smallint", unsigned))
        }
        FieldType::Int24 => {
            transfer_length = 4;
            (SqlDataType::INTEGER, with_sign("mediumint", unsigned))
        }
        FieldType::Long => {
            transfer_length = 4;
            (SqlDataType::INTEGER, with_sign("integer", unsigned))
        }
        FieldType::LongLong => {
            let type_name = with_sign("bigint", unsigned);
            transfer_length = 20;
            if session.no_bigint {
                (SqlDataType::INTEGER, type_name)
            } else {
                transfer_length = if unsigned { 20 } else { 19 };
                precision = transfer_length;
                (SqlDataType::BIGINT, type_name)
            }
        }
        FieldType::Float => {
            transfer_length = 4;
            (SqlDataType::REAL, with_sign("float", unsigned))
        }
        FieldType::Double => {
            transfer_length = 8;
            (SqlDataType::DOUBLE, with_sign("double", unsigned))
        }
        FieldType::Null => (SqlDataType::VARCHAR, "null".to_owned()),
        FieldType::Year => {
            transfer_length = 2;
            (SqlDataType::SMALLINT, "year".to_owned())
        }
        FieldType::Timestamp | FieldType::DateTime => {
            // Size of the timestamp struct
            transfer_length = 16;
            precision = 19;
            display_size = 19;
            let name = if field.field_type == FieldType::Timestamp {
                "timestamp"
            } else {
                "datetime"
            };
            let data_type = if odbc3 {
                SqlDataType::TYPE_TIMESTAMP
            } else {
                SqlDataType::TIMESTAMP
            };
            (data_type, name.to_owned())
        }
        FieldType::NewDate | FieldType::Date => {
            // Size of the date struct
            transfer_length = 6;
            precision = 10;
            display_size = 10;
            let data_type = if odbc3 {
                SqlDataType::TYPE_DATE
            } else {
                SqlDataType::DATE
            };
            (data_type, "date".to_owned())
        }
        FieldType::Time => {
            // Size of the time struct
            transfer_length = 6;
            precision = 8;
            display_size = 8;
            let data_type = if odbc3 {
                SqlDataType::TYPE_TIME
            } else {
                SqlDataType::TIME
            };
            (data_type, "time".to_owned())
        }
        FieldType::String => {
            if binary {
                (SqlDataType::BINARY, "binary".to_owned())
            } else {
                let length = char_length(255);
                transfer_length = length;
                precision = length;
                display_size = length;
                (SqlDataType::CHAR, "char".to_owned())
            }
        }
        FieldType::VarChar | FieldType::VarString => {
            let length = char_length(255);
            transfer_length = length;
            precision = length;
            display_size = length;
            (SqlDataType::VARCHAR, "varchar".to_owned())
        }
        FieldType::TinyBlob | FieldType::Blob | FieldType::MediumBlob | FieldType::LongBlob => {
            let (default_length, blob_name, text_name) = match field.field_type {
                FieldType::TinyBlob => (255, "tinyblob", "tinytext"),
                FieldType::Blob => (65_535, "blob", "text"),
                FieldType::MediumBlob => ((1 << 24) - 1, "mediumblob", "mediumtext"),
                _ => (i32::MAX as usize, "longblob", "longtext"),
            };
            let length = char_length(default_length);
            transfer_length = length;
            precision = length;
            display_size = length;
            if binary {
                (SqlDataType::LONGVARBINARY, blob_name.to_owned())
            } else {
                (SqlDataType::LONGVARCHAR, text_name.to_owned())
            }
        }
        FieldType::Enum => (SqlDataType::CHAR, "enum".to_owned()),
        FieldType::Set => (SqlDataType::CHAR, "set".to_owned()),
        FieldType::Geometry => (SqlDataType::LONGVARBINARY, "blob".to_owned()),
    };

    let column_type = ColumnType {
        data_type,
        // Even an empty column occupies at least one byte, e.g. for the terminating zero.
        transfer_length: max(transfer_length, 1),
        precision,
        display_size,
        type_name,
    };
    trace!("Classified column '{}' as {:?}", field.name, column_type);
    column_type
}

fn with_sign(name: &str, unsigned: bool) -> String {
    if unsigned {
        format!("{name} unsigned")
    } else {
        name.to_owned()
    }
}
