use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rolling analysis windows, measured in trading days.
///
/// Each window carries a slice length (how many trailing daily rows it
/// covers) and a minimum-days requirement below which the window is absent
/// for a ticker rather than computed from thin data. The two longest windows
/// accept partial history (60 of 90 days, 180 of 252) so that instruments
/// listed mid-year still qualify.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AnalysisWindow {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "last_3_days")]
    Last3Days,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_1_year")]
    LastYear,
}

impl AnalysisWindow {
    pub const ALL: [AnalysisWindow; 6] = [
        AnalysisWindow::Today,
        AnalysisWindow::Last3Days,
        AnalysisWindow::Last7Days,
        AnalysisWindow::Last30Days,
        AnalysisWindow::Last3Months,
        AnalysisWindow::LastYear,
    ];

    /// Trailing daily rows the window covers.
    pub fn slice_days(&self) -> usize {
        match self {
            AnalysisWindow::Today => 1,
            AnalysisWindow::Last3Days => 3,
            AnalysisWindow::Last7Days => 7,
            AnalysisWindow::Last30Days => 30,
            AnalysisWindow::Last3Months => 90,
            AnalysisWindow::LastYear => 252,
        }
    }

    /// Minimum daily rows required for the window to be present.
    pub fn min_days(&self) -> usize {
        match self {
            AnalysisWindow::Today => 1,
            AnalysisWindow::Last3Days => 3,
            AnalysisWindow::Last7Days => 7,
            AnalysisWindow::Last30Days => 30,
            AnalysisWindow::Last3Months => 60,
            AnalysisWindow::LastYear => 180,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisWindow::Today => "today",
            AnalysisWindow::Last3Days => "last_3_days",
            AnalysisWindow::Last7Days => "last_7_days",
            AnalysisWindow::Last30Days => "last_30_days",
            AnalysisWindow::Last3Months => "last_3_months",
            AnalysisWindow::LastYear => "last_1_year",
        }
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AnalysisWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisWindow::ALL
            .into_iter()
            .find(|w| w.label() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown analysis window: {}", s))
    }
}
