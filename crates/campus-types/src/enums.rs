//! Enumeration types for campus participation records.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Recorded outcome of a student's participation in an event.
///
/// Attendance is current status, not a log: re-marking a student replaces
/// the previous outcome for the same student and event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AttendanceStatus {
    /// The student attended. Only this status unlocks feedback.
    Present,
    /// The student was registered but did not attend.
    Absent,
}

impl AttendanceStatus {
    /// The canonical lowercase name used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    /// Whether this status counts as attendance.
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`AttendanceStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttendanceStatus(pub String);

impl fmt::Display for UnknownAttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status must be either \"present\" or \"absent\", got \"{}\"",
            self.0
        )
    }
}

impl std::error::Error for UnknownAttendanceStatus {}

impl FromStr for AttendanceStatus {
    type Err = UnknownAttendanceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(UnknownAttendanceStatus(other.to_owned())),
        }
    }
}
