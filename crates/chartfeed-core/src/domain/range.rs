use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Relative range selectors offered by the chart toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeToken {
    #[serde(rename = "24H")]
    Day,
    #[serde(rename = "1W")]
    Week,
    #[serde(rename = "1M")]
    Month,
    #[serde(rename = "3M")]
    Quarter,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "ALL")]
    All,
}

impl RangeToken {
    pub const ALL_TOKENS: [Self; 6] = [
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::YearToDate,
        Self::All,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24H",
            Self::Week => "1W",
            Self::Month => "1M",
            Self::Quarter => "3M",
            Self::YearToDate => "YTD",
            Self::All => "ALL",
        }
    }
}

impl Display for RangeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeToken {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "24H" => Ok(Self::Day),
            "1W" => Ok(Self::Week),
            "1M" => Ok(Self::Month),
            "3M" => Ok(Self::Quarter),
            "YTD" => Ok(Self::YearToDate),
            "ALL" => Ok(Self::All),
            other => Err(ValidationError::InvalidRange {
                value: other.to_owned(),
            }),
        }
    }
}
