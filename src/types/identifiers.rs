use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A CFR title number (1..=50 upstream, but never validated here).
///
/// Deserializes from an integer or a numeric string; serializes as an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTitleNumber", into = "u32")]
pub struct TitleNumber(u32);

impl TitleNumber {
    pub fn new(number: u32) -> Self {
        TitleNumber(number)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<TitleNumber> for u32 {
    fn from(title: TitleNumber) -> u32 {
        title.0
    }
}

impl TryFrom<RawTitleNumber> for TitleNumber {
    type Error = String;

    fn try_from(raw: RawTitleNumber) -> Result<Self, Self::Error> {
        raw.as_title()
            .ok_or_else(|| format!("`{raw}` is not a title number"))
    }
}

/// Title numbers arrive as integers or strings depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTitleNumber {
    Number(i64),
    Text(String),
}

impl RawTitleNumber {
    pub fn as_title(&self) -> Option<TitleNumber> {
        match self {
            RawTitleNumber::Number(n) => u32::try_from(*n).ok().map(TitleNumber::new),
            RawTitleNumber::Text(s) => s.trim().parse::<u32>().ok().map(TitleNumber::new),
        }
    }
}

impl fmt::Display for RawTitleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTitleNumber::Number(n) => write!(f, "{n}"),
            RawTitleNumber::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for TitleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version marker of a title snapshot, as published upstream (`YYYY-MM-DD`).
///
/// Kept as an opaque string: it is only ever compared and echoed back into
/// document URLs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueDate(String);

impl IssueDate {
    pub fn new(date: impl Into<String>) -> Self {
        IssueDate(date.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache key: one parsed document per (title, issue date).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    pub title: TitleNumber,
    pub issue_date: IssueDate,
}

impl DocumentKey {
    pub fn new(title: TitleNumber, issue_date: IssueDate) -> Self {
        Self { title, issue_date }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "title-{}@{}", self.title, self.issue_date)
    }
}

/// Content hash of a fetched document body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self::from_hasher(hasher)
    }

    /// Finish an incremental hash, for bodies that were streamed.
    pub fn from_hasher(hasher: Sha256) -> Self {
        let hex = hex::encode(hasher.finalize());
        ContentDigest(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
