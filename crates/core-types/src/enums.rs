use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The lookback window an analysis run covers.
///
/// The engine itself never truncates data by period; the window is applied by
/// the data collaborator that supplies the price series. The period travels
/// with the report so consumers know what the numbers describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
}

impl LookbackPeriod {
    /// The short code used by data providers and on the command line
    /// (e.g. "1y", "6mo").
    pub fn code(&self) -> &'static str {
        match self {
            LookbackPeriod::OneMonth => "1mo",
            LookbackPeriod::ThreeMonths => "3mo",
            LookbackPeriod::SixMonths => "6mo",
            LookbackPeriod::OneYear => "1y",
            LookbackPeriod::TwoYears => "2y",
            LookbackPeriod::FiveYears => "5y",
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LookbackPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1mo" => Ok(LookbackPeriod::OneMonth),
            "3mo" => Ok(LookbackPeriod::ThreeMonths),
            "6mo" => Ok(LookbackPeriod::SixMonths),
            "1y" => Ok(LookbackPeriod::OneYear),
            "2y" => Ok(LookbackPeriod::TwoYears),
            "5y" => Ok(LookbackPeriod::FiveYears),
            other => Err(format!(
                "unknown period '{other}' (expected one of: 1mo, 3mo, 6mo, 1y, 2y, 5y)"
            )),
        }
    }
}
