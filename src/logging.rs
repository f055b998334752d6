use log::{debug, warn, Level};

use crate::diagnostics::Warning;

/// Logs the warnings the driver reports alongside `SQL_SUCCESS_WITH_INFO`. Truncation is the
/// expected way to fetch large values piecewise and is therefore only logged at debug level. Lost
/// characters are a warning.
pub fn log_warnings(column_number: u16, warnings: impl IntoIterator<Item = Warning>) {
    if log::max_level() < Level::Warn {
        // Early return to safe work creating all these log records in case we would not log
        // anything.
        return;
    }

    for warning in warnings {
        match warning {
            Warning::Truncated { .. } => debug!("Column {column_number}: {warning}"),
            Warning::CharacterSubstitution { .. } => warn!("Column {column_number}: {warning}"),
        }
    }
}
