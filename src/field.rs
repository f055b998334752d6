//! Column metadata as reported by the MySQL client library.

use crate::CDataType;

/// `NOT_NULL_FLAG` in the field flags of the MySQL client protocol.
pub const NOT_NULL_FLAG: u32 = 1;
/// `UNSIGNED_FLAG` in the field flags of the MySQL client protocol.
pub const UNSIGNED_FLAG: u32 = 32;
/// `BINARY_FLAG` in the field flags of the MySQL client protocol.
pub const BINARY_FLAG: u32 = 128;
/// `NUM_FLAG` in the field flags of the MySQL client protocol.
pub const NUM_FLAG: u32 = 32768;

/// Native column type tag (`enum_field_types`) of the MySQL client protocol.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Decimal = 0,
    Tiny = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    LongLong = 8,
    Int24 = 9,
    Date = 10,
    Time = 11,
    DateTime = 12,
    Year = 13,
    NewDate = 14,
    /// Never actually sent by the server, `VarString` is used instead.
    VarChar = 15,
    Bit = 16,
    NewDecimal = 246,
    Enum = 247,
    Set = 248,
    TinyBlob = 249,
    MediumBlob = 250,
    LongBlob = 251,
    Blob = 252,
    VarString = 253,
    String = 254,
    Geometry = 255,
}

impl FieldType {
    /// Creates a field type from the tag reported by the client library.
    ///
    /// # Panics
    ///
    /// If the tag is not part of the MySQL type vocabulary. The client library only ever reports
    /// the tags above, so an unknown tag indicates corrupted metadata rather than a user error.
    pub fn from_raw(tag: u8) -> Self {
        match tag {
            0 => FieldType::Decimal,
            1 => FieldType::Tiny,
            2 => FieldType::Short,
            3 => FieldType::Long,
            4 => FieldType::Float,
            5 => FieldType::Double,
            6 => FieldType::Null,
            7 => FieldType::Timestamp,
            8 => FieldType::LongLong,
            9 => FieldType::Int24,
            10 => FieldType::Date,
            11 => FieldType::Time,
            12 => FieldType::DateTime,
            13 => FieldType::Year,
            14 => FieldType::NewDate,
            15 => FieldType::VarChar,
            16 => FieldType::Bit,
            246 => FieldType::NewDecimal,
            247 => FieldType::Enum,
            248 => FieldType::Set,
            249 => FieldType::TinyBlob,
            250 => FieldType::MediumBlob,
            251 => FieldType::LongBlob,
            252 => FieldType::Blob,
            253 => FieldType::VarString,
            254 => FieldType::String,
            255 => FieldType::Geometry,
            other => panic!(
                "Unknown MySQL field type tag '{other}'. The client library reported a column \
                type which is not part of the MySQL type vocabulary. This is not an error in the \
                application, but hints at corrupted result set metadata or a mismatch between the \
                client library and this driver."
            ),
        }
    }

    /// `true` for the types the server marks with `NUM_FLAG`.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Decimal
                | FieldType::NewDecimal
                | FieldType::Tiny
                | FieldType::Short
                | FieldType::Long
                | FieldType::Float
                | FieldType::Double
                | FieldType::LongLong
                | FieldType::Int24
                | FieldType::Year
                | FieldType::Timestamp
        )
    }

    /// The C type bound columns of this native type default to.
    ///
    /// 64 Bit integers are delivered as text. Reading them into an `SQLBIGINT` is left to
    /// applications which explicitly ask for it.
    pub fn default_c_type(self) -> CDataType {
        match self {
            FieldType::Bit => CDataType::Bit,
            FieldType::Tiny => CDataType::TinyInt,
            FieldType::Year | FieldType::Short => CDataType::Short,
            FieldType::Int24 | FieldType::Long => CDataType::Long,
            FieldType::Float => CDataType::Float,
            FieldType::Double => CDataType::Double,
            FieldType::Timestamp | FieldType::DateTime => CDataType::Timestamp,
            FieldType::NewDate | FieldType::Date => CDataType::Date,
            FieldType::Time => CDataType::Time,
            FieldType::Blob
            | FieldType::TinyBlob
            | FieldType::MediumBlob
            | FieldType::LongBlob => CDataType::Binary,
            FieldType::LongLong
            | FieldType::Decimal
            | FieldType::NewDecimal
            | FieldType::Null
            | FieldType::VarChar
            | FieldType::VarString
            | FieldType::String
            | FieldType::Enum
            | FieldType::Set
            | FieldType::Geometry => CDataType::Char,
        }
    }
}

/// The subset of MySQL field flags relevant for mapping column types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldFlags {
    pub not_null: bool,
    pub unsigned: bool,
    /// Column holds binary data (binary collation or a blob type).
    pub binary: bool,
    pub numeric: bool,
}

impl FieldFlags {
    /// Extracts the flags from the bitmask reported by the client library.
    pub fn from_bits(bits: u32) -> Self {
        FieldFlags {
            not_null: bits & NOT_NULL_FLAG != 0,
            unsigned: bits & UNSIGNED_FLAG != 0,
            binary: bits & BINARY_FLAG != 0,
            numeric: bits & NUM_FLAG != 0,
        }
    }
}

/// Describes a column of a materialized result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name or alias. May be empty.
    pub name: String,
    pub field_type: FieldType,
    /// Declared length of the column in bytes.
    pub length: usize,
    /// Length of the longest value in the result set, in bytes.
    pub max_length: usize,
    pub flags: FieldFlags,
    /// Number of digits after the radix.
    pub decimals: u8,
}

impl ColumnDescriptor {
    /// A signed, non binary column of the given type and declared length. Numeric types are
    /// flagged as numeric, like the server would.
    pub fn new(name: impl Into<String>, field_type: FieldType, length: usize) -> Self {
        ColumnDescriptor {
            name: name.into(),
            field_type,
            length,
            max_length: 0,
            flags: FieldFlags {
                numeric: field_type.is_numeric(),
                ..FieldFlags::default()
            },
            decimals: 0,
        }
    }

    /// `true` if the values of this column are binary rather than text.
    pub fn is_binary(&self) -> bool {
        self.flags.binary
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags.unsigned
    }
}
