//! Filter modes for list views.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::item::Item;

/// Selects which items a view yields, by completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    /// Returns whether `item` is visible under this mode.
    pub fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Unknown filter label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterMode(pub String);

impl Display for UnknownFilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter mode `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownFilterMode {}

impl FromStr for FilterMode {
    type Err = UnknownFilterMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilterMode(other.to_string())),
        }
    }
}
