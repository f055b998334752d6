use crate::Charset;

/// Pad `CHAR` columns to their full display length (Connector/ODBC option bit).
pub const FLAG_PAD_SPACE: u32 = 1 << 9;
/// Report `BIGINT` columns as `INTEGER` (Connector/ODBC option bit).
pub const FLAG_NO_BIGINT: u32 = 1 << 14;
/// Deliver `0000-00-00` dates as the smallest valid ODBC date instead of failing (Connector/ODBC
/// option bit).
pub const FLAG_ZERO_DATE_TO_MIN: u32 = 1 << 24;

/// ODBC version declared by the application with `SQL_ATTR_ODBC_VERSION`. Only affects which codes
/// are reported for temporal column types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OdbcVersion {
    /// ODBC 2.x. Temporal columns are reported as `SQL_DATE`, `SQL_TIME` and `SQL_TIMESTAMP`.
    Odbc2,
    /// ODBC 3.x. Temporal columns are reported as `SQL_TYPE_DATE`, `SQL_TYPE_TIME` and
    /// `SQL_TYPE_TIMESTAMP`.
    #[default]
    Odbc3,
}

/// Connection level settings consumed by the type mapper and the value readers. The driver owns one
/// of these per connection and passes it explicitly into every call, so nothing in this crate
/// reaches out to shared connection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session {
    /// Pad values of fixed length character columns with spaces up to their display size.
    pub pad_space: bool,
    /// `SQL_ATTR_MAX_LENGTH`. Upper bound for the number of bytes returned for character and
    /// binary values. `0` means no limit.
    pub max_length: usize,
    /// Report 64 Bit integer columns as 32 Bit `SQL_INTEGER`, for applications which can not cope
    /// with `SQL_BIGINT`.
    pub no_bigint: bool,
    /// Replace zero months and days in temporal values with `1` rather than rejecting them.
    pub zero_date_to_min: bool,
    pub odbc_version: OdbcVersion,
    /// Character set of the connection. `None` if the client library did not report one, in which
    /// case column lengths are taken as byte lengths.
    pub charset: Option<Charset>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            pad_space: false,
            max_length: 0,
            no_bigint: false,
            zero_date_to_min: false,
            odbc_version: OdbcVersion::Odbc3,
            charset: None,
        }
    }
}

impl Session {
    /// Creates a session from the `OPTION` bitmask of a Connector/ODBC data source. Bits not
    /// relevant for data retrieval are ignored.
    pub fn from_options(options: u32) -> Self {
        Session {
            pad_space: options & FLAG_PAD_SPACE != 0,
            no_bigint: options & FLAG_NO_BIGINT != 0,
            zero_date_to_min: options & FLAG_ZERO_DATE_TO_MIN != 0,
            ..Session::default()
        }
    }

    /// Character set text values are decoded from. Falls back to `latin1`, the server default, if
    /// the connection did not report one.
    pub fn charset_or_default(&self) -> Charset {
        self.charset.unwrap_or(Charset::Latin1)
    }
}

#[cfg(test)]
mod tests {
    use super::{OdbcVersion, Session, FLAG_NO_BIGINT, FLAG_PAD_SPACE};

    #[test]
    fn options_bitmask() {
        // 3 = FLAG_FIELD_LENGTH | FLAG_FOUND_ROWS, which do not concern retrieval.
        let session = Session::from_options(3 | FLAG_PAD_SPACE | FLAG_NO_BIGINT);

        assert!(session.pad_space);
        assert!(session.no_bigint);
        assert!(!session.zero_date_to_min);
        assert_eq!(0, session.max_length);
        assert_eq!(OdbcVersion::Odbc3, session.odbc_version);
    }
}
