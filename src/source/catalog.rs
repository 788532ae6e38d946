//! Wire shapes of the upstream JSON listings. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::types::agency::Agency;
pub use crate::types::identifiers::RawTitleNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleInfo {
    pub number: RawTitleNumber,
    #[serde(default)]
    pub latest_issue_date: Option<String>,
}

impl TitleInfo {
    pub fn new(number: u32, latest_issue_date: impl Into<String>) -> Self {
        Self {
            number: RawTitleNumber::Number(i64::from(number)),
            latest_issue_date: Some(latest_issue_date.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlesResponse {
    pub titles: Vec<TitleInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgenciesResponse {
    pub agencies: Vec<Agency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionsResponse {
    pub ecfr_corrections: Vec<CorrectionRecord>,
}
