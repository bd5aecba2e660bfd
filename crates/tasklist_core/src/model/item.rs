//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical record for one user-entered list entry.
//! - Own the persisted wire shape (`id`, `text`, `completed`, `dueDate`).
//!
//! # Invariants
//! - `id` is stable and never reused for another item in the same list.
//! - `text` is non-empty after trim.
//! - Absent `due_date` means the item carries no time tracking.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a list item.
///
/// Serialized as a JSON number. New ids are creation-time epoch
/// milliseconds, bumped when needed to stay strictly increasing.
pub type ItemId = i64;

/// Validation errors for item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Text is empty or whitespace-only.
    BlankText,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "item text must not be blank"),
        }
    }
}

impl Error for ItemValidationError {}

/// One entry in the ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Serialized as RFC 3339 under `dueDate`; omitted when `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "due_date_format"
    )]
    pub due_date: Option<DateTime<Utc>>,
}

impl Item {
    /// Creates an active item with trimmed text.
    ///
    /// `due_date` is cut to whole milliseconds, the precision it is stored at.
    ///
    /// # Errors
    /// - Returns [`ItemValidationError::BlankText`] when `text` trims to empty.
    pub fn new(
        id: ItemId,
        text: impl AsRef<str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            id,
            text: text.as_ref().trim().to_string(),
            completed: false,
            due_date: due_date.map(|due| due.trunc_subsecs(3)),
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks invariants for records arriving from storage or callers.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.text.trim().is_empty() {
            return Err(ItemValidationError::BlankText);
        }
        Ok(())
    }

    /// Returns whether the item still counts toward the active total.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// `dueDate` codec.
///
/// Writes RFC 3339 with millisecond precision. Reads RFC 3339, the
/// `datetime-local` input shape (`YYYY-MM-DDTHH:MM[:SS]`, taken as UTC) and
/// explicit `null`.
pub(crate) mod due_date_format {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(due) => {
                serializer.serialize_str(&due.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) => parse_due_date(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid dueDate `{text}`"))),
        }
    }

    /// Parses one stored or user-entered due timestamp, cut to milliseconds.
    pub fn parse_due_date(text: &str) -> Option<DateTime<Utc>> {
        let trimmed = text.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(parsed.with_timezone(&Utc).trunc_subsecs(3));
        }
        LOCAL_INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|naive| naive.and_utc())
    }
}

pub use due_date_format::parse_due_date;
