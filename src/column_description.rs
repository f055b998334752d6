use crate::SqlDataType;

/// Indicates whether a column may hold `NULL` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nullability {
    /// Indicates that we do not know whether the column is Nullable or not.
    Unknown,
    /// The column may hold NULL values.
    Nullable,
    /// The column can not hold NULL values.
    NoNulls,
}

/// Describes the type and attributes of a column, as reported by `SQLDescribeCol`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnDescription {
    /// Column name. May be empty if unavailable.
    pub name: String,
    /// Type of the column
    pub data_type: SqlDataType,
    /// Size of column element
    pub column_size: usize,
    pub decimal_digits: i16,
    /// Indicates wether the column is nullable or not.
    pub nullability: Nullability,
}

impl Default for ColumnDescription {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: SqlDataType::UNKNOWN_TYPE,
            column_size: 0,
            decimal_digits: 0,
            nullability: Nullability::Unknown,
        }
    }
}

impl ColumnDescription {
    /// `true` if the column is `Nullable` or it is not know whether the column is nullable. `false`
    /// if and only if the column is `NoNulls`.
    pub fn could_be_nullable(&self) -> bool {
        match self.nullability {
            Nullability::Nullable | Nullability::Unknown => true,
            Nullability::NoNulls => false,
        }
    }
}
