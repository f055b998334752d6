/// Outcome of a successful data retrieval call. Variants hold the same meaning as the ODBC return
/// codes of the same name. Errors are reported through [`crate::Error`] instead.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SqlResult<T> {
    /// The function has been executed successfully.
    Success(T),
    /// The function has been executed successfully. There have been warnings, e.g. the value has
    /// been truncated.
    SuccessWithInfo(T),
    /// No more data is available. Returned once all of a value has been delivered.
    NoData,
}

impl<T> SqlResult<T> {
    /// Wraps `value` in [`Self::Success`] or, if `with_info` is `true`, in
    /// [`Self::SuccessWithInfo`].
    pub fn success(value: T, with_info: bool) -> Self {
        if with_info {
            SqlResult::SuccessWithInfo(value)
        } else {
            SqlResult::Success(value)
        }
    }

    /// The value, unless this is [`Self::NoData`].
    pub fn value(self) -> Option<T> {
        match self {
            SqlResult::Success(v) | SqlResult::SuccessWithInfo(v) => Some(v),
            SqlResult::NoData => None,
        }
    }

    pub fn unwrap(self) -> T {
        match self {
            SqlResult::Success(v) | SqlResult::SuccessWithInfo(v) => v,
            SqlResult::NoData => panic!("Unwraping SqlResult::NoData"),
        }
    }
}
