use crate::types::enso::{CalendarMonth, WindowCode};
use std::fmt;
use thiserror::Error;

/// Why a (year, month) pair could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteCause {
    /// One of the month's three windows has no value.
    MissingWindow(WindowCode),
    /// The windows are present but their mean is NaN or infinite.
    NonFinite,
}

impl fmt::Display for IncompleteCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteCause::MissingWindow(window) => write!(f, "window {} is missing", window),
            IncompleteCause::NonFinite => write!(f, "anomaly mean is not a finite number"),
        }
    }
}

/// Failure to classify a single (year, month) pair. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassificationError {
    #[error("Incomplete data for {month} {year}: {cause}")]
    DataIncomplete {
        year: i32,
        month: CalendarMonth,
        cause: IncompleteCause,
    },
}
