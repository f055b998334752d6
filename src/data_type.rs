//! The ODBC side of the type vocabulary. SQL data types describe columns to the application, C data
//! types describe the in memory representation the application wants a value to be delivered in.

use std::mem::size_of;

use crate::temporal::{Date, Time, Timestamp};

/// SQL data type code as reported by `SQLDescribeCol` or `SQLColAttribute`. Modelled as a newtype
/// rather than an enumeration, since applications and driver managers may pass codes this crate
/// does not know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SqlDataType(pub i16);

impl SqlDataType {
    pub const UNKNOWN_TYPE: SqlDataType = SqlDataType(0);
    /// `Char(n)`. Character string of fixed length.
    pub const CHAR: SqlDataType = SqlDataType(1);
    pub const NUMERIC: SqlDataType = SqlDataType(2);
    /// `Decimal(p,s)`. Signed, exact, numeric value with a precision of at least p and scale s.
    pub const DECIMAL: SqlDataType = SqlDataType(3);
    /// 32 Bit Integer
    pub const INTEGER: SqlDataType = SqlDataType(4);
    /// 16 Bit Integer
    pub const SMALLINT: SqlDataType = SqlDataType(5);
    pub const FLOAT: SqlDataType = SqlDataType(6);
    /// Signed, approximate, numeric value with a binary precision 24.
    pub const REAL: SqlDataType = SqlDataType(7);
    /// Signed, approximate, numeric value with a binary precision 53.
    pub const DOUBLE: SqlDataType = SqlDataType(8);
    /// ODBC 2.x date. Replaced by [`Self::TYPE_DATE`] in ODBC 3.
    pub const DATE: SqlDataType = SqlDataType(9);
    /// ODBC 2.x time. Replaced by [`Self::TYPE_TIME`] in ODBC 3.
    pub const TIME: SqlDataType = SqlDataType(10);
    /// ODBC 2.x timestamp. Replaced by [`Self::TYPE_TIMESTAMP`] in ODBC 3.
    pub const TIMESTAMP: SqlDataType = SqlDataType(11);
    /// `Varchar(n)`. Variable length character string.
    pub const VARCHAR: SqlDataType = SqlDataType(12);
    pub const TYPE_DATE: SqlDataType = SqlDataType(91);
    pub const TYPE_TIME: SqlDataType = SqlDataType(92);
    pub const TYPE_TIMESTAMP: SqlDataType = SqlDataType(93);
    /// Variable length character data. Maximum length is data source dependent.
    pub const LONGVARCHAR: SqlDataType = SqlDataType(-1);
    /// Fixed length binary data.
    pub const BINARY: SqlDataType = SqlDataType(-2);
    pub const VARBINARY: SqlDataType = SqlDataType(-3);
    /// Variable length binary data. Maximum length is data source dependent.
    pub const LONGVARBINARY: SqlDataType = SqlDataType(-4);
    /// Exact numeric value with precision 19 (if signed) or 20 (if unsigned) and scale 0.
    pub const BIGINT: SqlDataType = SqlDataType(-5);
    pub const TINYINT: SqlDataType = SqlDataType(-6);
    /// Single bit binary data.
    pub const BIT: SqlDataType = SqlDataType(-7);
    pub const WCHAR: SqlDataType = SqlDataType(-8);
    pub const WVARCHAR: SqlDataType = SqlDataType(-9);
    pub const WLONGVARCHAR: SqlDataType = SqlDataType(-10);

    /// `true` for `BINARY`, `VARBINARY` and `LONGVARBINARY`.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            SqlDataType::BINARY | SqlDataType::VARBINARY | SqlDataType::LONGVARBINARY
        )
    }
}

/// The C data type is specified in the `SQLBindCol` and `SQLGetData` functions with the TargetType
/// argument. It identifies the buffer layout the application expects.
#[repr(i16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CDataType {
    /// Narrow text, terminated by a zero byte.
    Char = 1,
    Numeric = 2,
    /// 32 Bit signed integer (`SQL_C_LONG`)
    Long = 4,
    /// 16 Bit signed integer (`SQL_C_SHORT`)
    Short = 5,
    Float = 7,
    Double = 8,
    /// ODBC 2.x date struct
    Date = 9,
    /// ODBC 2.x time struct
    Time = 10,
    /// ODBC 2.x timestamp struct
    Timestamp = 11,
    TypeDate = 91,
    TypeTime = 92,
    TypeTimestamp = 93,
    /// Use the C type associated with the SQL type of the column.
    Default = 99,
    Binary = -2,
    Bit = -7,
    TinyInt = -6,
    /// Wide text. UTF-16 or UTF-32 code units, depending on the platform `SQLWCHAR`.
    WChar = -8,
    SShort = -15,
    SLong = -16,
    UShort = -17,
    ULong = -18,
    SBigInt = -25,
    STinyInt = -26,
    UBigInt = -27,
    UTinyInt = -28,
}

impl CDataType {
    /// Number of bytes a buffer of this C type needs to hold a value.
    ///
    /// Fixed sized types report their in memory size, independent of `length`. Variadic types
    /// (text and binary) report `length` unchanged.
    pub fn bind_length(self, length: usize) -> usize {
        match self {
            CDataType::Bit | CDataType::TinyInt | CDataType::STinyInt | CDataType::UTinyInt => 1,
            CDataType::Short | CDataType::SShort | CDataType::UShort => 2,
            CDataType::Long | CDataType::SLong | CDataType::ULong => size_of::<i32>(),
            CDataType::Float => size_of::<f32>(),
            CDataType::Double => size_of::<f64>(),
            CDataType::Date | CDataType::TypeDate => size_of::<Date>(),
            CDataType::Time | CDataType::TypeTime => size_of::<Time>(),
            CDataType::Timestamp | CDataType::TypeTimestamp => size_of::<Timestamp>(),
            CDataType::SBigInt | CDataType::UBigInt => size_of::<i64>(),
            CDataType::Char
            | CDataType::WChar
            | CDataType::Binary
            | CDataType::Numeric
            | CDataType::Default => length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CDataType;

    #[test]
    fn fixed_sized_bind_lengths_ignore_requested_length() {
        assert_eq!(1, CDataType::Bit.bind_length(100));
        assert_eq!(2, CDataType::Short.bind_length(100));
        assert_eq!(4, CDataType::Long.bind_length(100));
        assert_eq!(8, CDataType::Double.bind_length(100));
        assert_eq!(6, CDataType::TypeDate.bind_length(100));
        assert_eq!(6, CDataType::Time.bind_length(100));
        assert_eq!(16, CDataType::Timestamp.bind_length(100));
        assert_eq!(8, CDataType::UBigInt.bind_length(100));
    }

    #[test]
    fn variadic_bind_lengths_are_passed_through() {
        assert_eq!(42, CDataType::Char.bind_length(42));
        assert_eq!(42, CDataType::Binary.bind_length(42));
    }
}
