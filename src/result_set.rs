use log::{debug, warn};

use crate::{
    buffers::TargetBuffer,
    column_description::{ColumnDescription, Nullability},
    field::{ColumnDescriptor, FieldType},
    get_data::{read_hex, read_text, read_wide, Chunk, ReadPosition, Source},
    logging::log_warnings,
    session::Session,
    sql_result::SqlResult,
    temporal::{parse_date, parse_time, parse_timestamp, time_as_hhmmss, Date, Time, Timestamp},
    type_map::{classify, ColumnType},
    CDataType, Charset, Error,
};

/// A row of a materialized result set. `None` represents `NULL`.
pub type Row = Vec<Option<Vec<u8>>>;

/// Application buffer for [`ResultSet::get_data`], tagged with the C type the value should be
/// delivered as.
#[derive(Debug)]
pub enum Target<'a> {
    /// `SQL_C_CHAR`. Binary columns are delivered as hexadecimal digits.
    Char(TargetBuffer<'a, u8>),
    /// `SQL_C_BINARY`
    Binary(TargetBuffer<'a, u8>),
    /// `SQL_C_WCHAR` with a 16 Bit `SQLWCHAR`.
    WChar16(TargetBuffer<'a, u16>),
    /// `SQL_C_WCHAR` with a 32 Bit `SQLWCHAR`.
    WChar32(TargetBuffer<'a, u32>),
}

/// A column bound by the application with `SQLBindCol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// C type values are delivered as. [`CDataType::Default`] until the result set metadata is
    /// known.
    pub target_type: CDataType,
    /// Size of the bound buffer in bytes. For fixed sized C types this is the size of the type,
    /// independent of what the application declared.
    pub buffer_length: usize,
}

/// The result of a query, buffered completely on the client side, together with the column
/// bindings and per column read positions of a statement.
#[derive(Debug)]
pub struct ResultSet {
    session: Session,
    /// `false` until the server reported the metadata of the result.
    linked: bool,
    fields: Vec<ColumnDescriptor>,
    column_types: Vec<ColumnType>,
    /// C type each column is delivered as, if bound with [`CDataType::Default`].
    default_c_types: Vec<CDataType>,
    /// Indexed by column number minus one. `None` for unbound columns.
    bindings: Vec<Option<Binding>>,
    rows: Vec<Row>,
    /// Index of the current row. `None` before the first call to fetch.
    current: Option<usize>,
    positions: Vec<ReadPosition>,
}

impl ResultSet {
    /// A result set without metadata. Columns may already be bound.
    pub fn new(session: Session) -> Self {
        ResultSet {
            session,
            linked: false,
            fields: Vec::new(),
            column_types: Vec::new(),
            default_c_types: Vec::new(),
            bindings: Vec::new(),
            rows: Vec::new(),
            current: None,
            positions: Vec::new(),
        }
    }

    /// Attaches the metadata and the rows reported by the server.
    pub fn materialize(&mut self, fields: Vec<ColumnDescriptor>, rows: Vec<Row>) {
        self.rows = rows;
        self.current = None;
        self.link_fields(fields);
    }

    /// Attaches column metadata, e.g. for the result of a catalog function, which has been
    /// assembled by the driver rather than reported by the server.
    pub fn link_fields(&mut self, fields: Vec<ColumnDescriptor>) {
        self.column_types = fields
            .iter()
            .map(|field| classify(field, &self.session))
            .collect();
        self.default_c_types = fields
            .iter()
            .map(|field| field.field_type.default_c_type())
            .collect();
        self.positions = vec![ReadPosition::NotStarted; fields.len()];
        self.fields = fields;
        self.linked = true;
        self.fix_result_types();
    }

    /// Number of columns. `0` until the metadata is known.
    pub fn num_result_cols(&self) -> u16 {
        self.fields.len().try_into().unwrap_or(u16::MAX)
    }

    /// Resolves the C type of every column bound with [`CDataType::Default`] and makes room for a
    /// binding of every column. Explicitly requested C types are left alone, so calling this
    /// repeatedly has no further effect.
    pub fn fix_result_types(&mut self) {
        if self.bindings.is_empty() {
            // Nothing bound yet
            return;
        }
        if self.bindings.len() < self.fields.len() {
            self.bindings.resize(self.fields.len(), None);
        }
        for (binding, &default) in self.bindings.iter_mut().zip(&self.default_c_types) {
            if let Some(binding) = binding {
                if binding.target_type == CDataType::Default {
                    debug!("Resolved default C type to {default:?}");
                    binding.target_type = default;
                    binding.buffer_length = default.bind_length(binding.buffer_length);
                }
            }
        }
    }

    /// Binds a column of the result set. Column numbers start at `1`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidColumnNumber`] for column `0` or, once the metadata is known, for columns
    ///   beyond the last one.
    /// * [`Error::InvalidBufferLength`] if `buffer_length` is negative.
    pub fn bind_col(
        &mut self,
        column_number: u16,
        target_type: CDataType,
        buffer_length: isize,
    ) -> Result<(), Error> {
        if column_number == 0 || (self.linked && usize::from(column_number) > self.fields.len()) {
            return Err(Error::InvalidColumnNumber {
                column_number,
                num_cols: self.num_result_cols(),
            });
        }
        let buffer_length = usize::try_from(buffer_length)
            .map_err(|_| Error::InvalidBufferLength {
                length: buffer_length,
            })?;
        let index = usize::from(column_number - 1);
        if self.bindings.len() <= index {
            self.bindings.resize(index + 1, None);
        }
        self.bindings[index] = Some(Binding {
            target_type,
            buffer_length: target_type.bind_length(buffer_length),
        });
        if self.linked {
            self.fix_result_types();
        }
        Ok(())
    }

    /// Removes all column bindings.
    pub fn unbind_cols(&mut self) {
        self.bindings.clear();
    }

    /// Binding of the column. `None` if the column is not bound.
    pub fn binding(&self, column_number: u16) -> Option<Binding> {
        let index = usize::from(column_number.checked_sub(1)?);
        self.bindings.get(index).copied().flatten()
    }

    /// C type a column bound with [`CDataType::Default`] is delivered as.
    pub fn default_c_type(&self, column_number: u16) -> Result<CDataType, Error> {
        let index = self.column_index(column_number)?;
        Ok(self.default_c_types[index])
    }

    /// How the column is presented to the application.
    pub fn column_type(&self, column_number: u16) -> Result<&ColumnType, Error> {
        let index = self.column_index(column_number)?;
        Ok(&self.column_types[index])
    }

    /// Name, type, size and nullability of a column as reported by `SQLDescribeCol`.
    pub fn describe_col(&self, column_number: u16) -> Result<ColumnDescription, Error> {
        let index = self.column_index(column_number)?;
        let field = &self.fields[index];
        let column_type = &self.column_types[index];
        Ok(ColumnDescription {
            name: field.name.clone(),
            data_type: column_type.data_type,
            column_size: column_type.precision,
            decimal_digits: field.decimals.into(),
            nullability: if field.flags.not_null {
                Nullability::NoNulls
            } else {
                Nullability::Nullable
            },
        })
    }

    /// Moves the cursor to the next row and resets the read positions of all columns.
    /// [`SqlResult::NoData`] if there are no more rows.
    pub fn fetch(&mut self) -> SqlResult<()> {
        let next = self.current.map_or(0, |current| current + 1);
        self.current = Some(next.min(self.rows.len()));
        for position in &mut self.positions {
            position.reset();
        }
        if next < self.rows.len() {
            SqlResult::Success(())
        } else {
            SqlResult::NoData
        }
    }

    /// Delivers (the next part of) the value of a column in the current row. Repeated calls on the
    /// same column continue where the previous one ended, until [`SqlResult::NoData`] signals that
    /// the complete value has been delivered.
    pub fn get_data(
        &mut self,
        column_number: u16,
        target: Target<'_>,
    ) -> Result<SqlResult<Chunk>, Error> {
        let index = self.column_index(column_number)?;
        let row = self.current_row()?;
        let Some(value) = self.rows[row][index].as_deref() else {
            return Ok(SqlResult::Success(Chunk::null()));
        };
        let field = &self.fields[index];
        let column_type = &self.column_types[index];
        let position = &mut self.positions[index];
        let session = &self.session;

        let binary = column_type.data_type.is_binary();
        let mut source = Source::new(value);
        if field.field_type == FieldType::String && !binary {
            source = source.with_fill_length(column_type.display_size);
        }
        let charset = if binary {
            Charset::Binary
        } else {
            session.charset_or_default()
        };

        let result = match target {
            Target::Char(buffer) if binary => read_hex(position, value, buffer, session),
            Target::Char(buffer) => read_text(position, source, buffer, session, false),
            Target::Binary(buffer) => read_text(position, Source::new(value), buffer, session, true),
            Target::WChar16(buffer) => read_wide(position, source, charset, buffer, session),
            Target::WChar32(buffer) => read_wide(position, source, charset, buffer, session),
        };
        if let SqlResult::SuccessWithInfo(chunk) = &result {
            log_warnings(column_number, chunk.warnings());
        }
        Ok(result)
    }

    /// Like [`Self::get_data`], but with the C type passed as a code, the way `SQLGetData`
    /// receives it. [`CDataType::Default`] is resolved using the type of the column.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedConversion`] for C types other than narrow text and binary.
    pub fn get_data_as(
        &mut self,
        column_number: u16,
        target_type: CDataType,
        buffer: Option<&mut [u8]>,
        buffer_length: isize,
    ) -> Result<SqlResult<Chunk>, Error> {
        let target_type = match target_type {
            CDataType::Default => self.default_c_type(column_number)?,
            other => other,
        };
        let buffer = TargetBuffer::new(buffer, buffer_length)?;
        let target = match target_type {
            CDataType::Char => Target::Char(buffer),
            CDataType::Binary => Target::Binary(buffer),
            c_type => {
                return Err(Error::UnsupportedConversion {
                    column_number,
                    c_type,
                })
            }
        };
        self.get_data(column_number, target)
    }

    /// Retrieves the complete value of a column as narrow text. Binary values are delivered as
    /// hexadecimal digits.
    ///
    /// # Return
    ///
    /// `true` indicates that the value has not been `NULL` and the value has been placed in `buf`.
    /// `false` indicates that the value is `NULL`. The buffer is cleared in that case.
    pub fn get_text(&mut self, column_number: u16, buf: &mut Vec<u8>) -> Result<bool, Error> {
        self.get_variadic(column_number, buf, |buffer| Target::Char(buffer))
    }

    /// Retrieves the complete value of a column as UTF-16.
    pub fn get_wide_text(&mut self, column_number: u16, buf: &mut Vec<u16>) -> Result<bool, Error> {
        self.get_variadic(column_number, buf, |buffer| Target::WChar16(buffer))
    }

    /// Retrieves the complete value of a column as bytes.
    pub fn get_binary(&mut self, column_number: u16, buf: &mut Vec<u8>) -> Result<bool, Error> {
        self.get_variadic(column_number, buf, |buffer| Target::Binary(buffer))
    }

    fn get_variadic<U: Copy + Default>(
        &mut self,
        column_number: u16,
        buf: &mut Vec<U>,
        to_target: fn(TargetBuffer<'_, U>) -> Target<'_>,
    ) -> Result<bool, Error> {
        buf.clear();
        // Large enough for most values. Otherwise the indicator tells us how much is missing.
        let mut window = 256;
        loop {
            let start = buf.len();
            buf.resize(start + window, U::default());
            let target = to_target(TargetBuffer::from_slice(&mut buf[start..]));
            match self.get_data(column_number, target)? {
                SqlResult::NoData => {
                    buf.truncate(start);
                    return Ok(true);
                }
                SqlResult::Success(chunk) | SqlResult::SuccessWithInfo(chunk) => {
                    if chunk.indicator.is_null() {
                        buf.clear();
                        return Ok(false);
                    }
                    buf.truncate(start + chunk.written);
                    if !chunk.truncated {
                        return Ok(true);
                    }
                    if chunk.written == 0 {
                        // Another call would not get any further.
                        warn!(
                            "Column {column_number}: Retrieval stalled with {:?} left.",
                            chunk.indicator
                        );
                        return Ok(true);
                    }
                    // Room for the rest and a terminating zero
                    window = chunk.indicator.length().unwrap_or(window) + 1;
                }
            }
        }
    }

    /// Date value of a column in the current row. `None` for `NULL` and for the zero date
    /// `0000-00-00`, unless the session raises zero dates to the smallest valid date.
    pub fn get_date(&self, column_number: u16) -> Result<Option<Date>, Error> {
        let zero_to_min = self.session.zero_date_to_min;
        self.get_temporal(column_number, CDataType::TypeDate, |field_type, text| {
            match field_type {
                FieldType::Timestamp | FieldType::DateTime => {
                    parse_timestamp(text, zero_to_min).map(|ts| ts.date())
                }
                _ => parse_date(text, zero_to_min),
            }
        })
    }

    /// Time value of a column in the current row. `None` for `NULL`.
    pub fn get_time(&self, column_number: u16) -> Result<Option<Time>, Error> {
        self.get_temporal(column_number, CDataType::TypeTime, |field_type, text| {
            match field_type {
                FieldType::Time => Some(parse_time(text)),
                FieldType::Timestamp | FieldType::DateTime => {
                    parse_timestamp(text, true).map(|ts| ts.time())
                }
                _ => time_as_hhmmss(text).and_then(Time::from_hhmmss),
            }
        })
    }

    /// Timestamp value of a column in the current row. `None` for `NULL` and for the zero date
    /// `0000-00-00 00:00:00`, unless the session raises zero dates to the smallest valid date.
    pub fn get_timestamp(&self, column_number: u16) -> Result<Option<Timestamp>, Error> {
        let zero_to_min = self.session.zero_date_to_min;
        self.get_temporal(column_number, CDataType::TypeTimestamp, |field_type, text| {
            match field_type {
                FieldType::Date | FieldType::NewDate => {
                    parse_date(text, zero_to_min).map(|date| Timestamp {
                        year: date.year,
                        month: date.month,
                        day: date.day,
                        ..Timestamp::default()
                    })
                }
                _ => parse_timestamp(text, zero_to_min),
            }
        })
    }

    fn get_temporal<T>(
        &self,
        column_number: u16,
        c_type: CDataType,
        parse: impl FnOnce(FieldType, &[u8]) -> Option<T>,
    ) -> Result<Option<T>, Error> {
        let index = self.column_index(column_number)?;
        let row = self.current_row()?;
        let field = &self.fields[index];
        let unsupported = field.field_type == FieldType::Time && c_type == CDataType::TypeTimestamp;
        if unsupported || self.column_types[index].data_type.is_binary() {
            return Err(Error::UnsupportedConversion {
                column_number,
                c_type,
            });
        }
        let Some(text) = self.rows[row][index].as_deref() else {
            return Ok(None);
        };
        match parse(field.field_type, text) {
            Some(value) => Ok(Some(value)),
            // MySQL uses zero dates in place of invalid ones. They are reported as NULL.
            None if is_zero_date(text) => Ok(None),
            None => Err(Error::InvalidDatetimeFormat {
                text: String::from_utf8_lossy(text).into_owned(),
            }),
        }
    }

    fn column_index(&self, column_number: u16) -> Result<usize, Error> {
        if column_number == 0 || usize::from(column_number) > self.fields.len() {
            Err(Error::InvalidColumnNumber {
                column_number,
                num_cols: self.num_result_cols(),
            })
        } else {
            Ok(usize::from(column_number - 1))
        }
    }

    fn current_row(&self) -> Result<usize, Error> {
        match self.current {
            Some(row) if row < self.rows.len() => Ok(row),
            _ => Err(Error::NoCurrentRow),
        }
    }
}

/// `true` for `0000-00-00`, `00:00:00` and the like.
fn is_zero_date(text: &[u8]) -> bool {
    let mut digits = text.iter().filter(|b| b.is_ascii_digit()).peekable();
    digits.peek().is_some() && digits.all(|&b| b == b'0')
}
