use core::fmt;

use crate::state::Mode;

/// Errors reported by the macro engine.
///
/// None of them is fatal: the engine logs and absorbs each one where it occurs
/// and only hands them out from operations a host calls directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TdmError {
    /// The requested mode change is not an edge of the transition table
    InvalidTransition { from: Mode, to: Mode },
    /// The active macro reached its neighbor's end
    BufferFull,
    /// The deferred queue has no free entry
    SchedulerFull,
}

impl fmt::Display for TdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdmError::InvalidTransition { from, to } => write!(f, "invalid transition: {:?} -> {:?}", from, to),
            TdmError::BufferFull => f.write_str("macro buffer full"),
            TdmError::SchedulerFull => f.write_str("deferred queue full"),
        }
    }
}

impl core::error::Error for TdmError {}
