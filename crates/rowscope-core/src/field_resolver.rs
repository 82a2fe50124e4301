//! Aliased field resolution - a logical field may live under several physical columns

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Group name used when a record has no value for a grouped dimension.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Column holding the email address. Never aliased.
pub const EMAIL_FIELD: &str = "email";

/// Logical fields that source files spell under more than one column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    DisplayName,
    Contact,
    Location,
    Building,
}

impl LogicalField {
    pub const ALL: [LogicalField; 4] = [
        LogicalField::DisplayName,
        LogicalField::Contact,
        LogicalField::Location,
        LogicalField::Building,
    ];

    /// Physical columns to check, highest priority first.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::DisplayName => &["name", "name_2"],
            LogicalField::Contact => &["phone", "landline", "whatsappnumber"],
            LogicalField::Location => &["location", "location_2"],
            LogicalField::Building => &["building", "building_2", "building_3", "building_4"],
        }
    }

    /// Resolved value of this field for `record`.
    pub fn resolve(self, record: &Record) -> Option<&str> {
        resolve_field(record, self.aliases())
    }

    /// Resolved value, or [`UNKNOWN_GROUP`] when nothing matched.
    pub fn resolve_or_unknown(self, record: &Record) -> &str {
        self.resolve(record).unwrap_or(UNKNOWN_GROUP)
    }
}

/// Returns the trimmed value of the first candidate that is present and
/// non-blank. Field names are matched exactly.
pub fn resolve_field<'a, S: AsRef<str>>(record: &'a Record, candidates: &[S]) -> Option<&'a str> {
    candidates.iter().find_map(|field| {
        record
            .get(field.as_ref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}
