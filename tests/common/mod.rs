#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Mutex;
use std::time::Duration;

use cfr_tally::source::{CatalogSource, CorrectionRecord, DocumentFetcher, FetchError, TitleInfo};
use cfr_tally::types::{Agency, CfrReference, DocumentKey, HierarchyLevel, IssueDate, TitleNumber};

pub const ISSUE_DATE: &str = "2025-01-15";

pub fn key(title: u32) -> DocumentKey {
    DocumentKey::new(TitleNumber::new(title), IssueDate::new(ISSUE_DATE))
}

pub fn reference(title: u32, levels: &[(HierarchyLevel, &str)]) -> CfrReference {
    levels
        .iter()
        .fold(CfrReference::new(TitleNumber::new(title)), |r, (level, label)| {
            r.with(*level, *label)
        })
}

pub fn part(title: u32, label: &str) -> CfrReference {
    reference(title, &[(HierarchyLevel::Part, label)])
}

/// A `DIV8` section element with one paragraph.
pub fn section(n: &str, text: &str) -> String {
    format!(r#"<DIV8 N="{n}" TYPE="SECTION"><P>{text}</P></DIV8>"#)
}

/// A `DIV5` part element wrapping the given children.
pub fn part_div(n: &str, children: &[String]) -> String {
    format!(r#"<DIV5 N="{n}" TYPE="PART">{}</DIV5>"#, children.join("\n"))
}

/// A title document with everything under one chapter `I`.
pub fn title_doc(title: u32, parts: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ECFR>
  <DIV1 N="{title}" TYPE="TITLE">
    <DIV3 N="I" TYPE="CHAPTER">
      {}
    </DIV3>
  </DIV1>
</ECFR>"#,
        parts.join("\n")
    )
}

/// In-memory stand-in for the upstream API that counts document fetches.
#[derive(Default)]
pub struct FakeUpstream {
    pub titles: Vec<TitleInfo>,
    pub agencies: Vec<Agency>,
    pub corrections: Vec<CorrectionRecord>,
    pub documents: HashMap<DocumentKey, String>,
    pub failing: Vec<DocumentKey>,
    pub catalog_down: bool,
    pub delay: Option<Duration>,
    fetches: Mutex<HashMap<DocumentKey, usize>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: u32, xml: String) -> Self {
        self.titles.push(TitleInfo::new(title, ISSUE_DATE));
        self.documents.insert(key(title), xml);
        self
    }

    pub fn with_agency(mut self, agency: Agency) -> Self {
        self.agencies.push(agency);
        self
    }

    pub fn failing(mut self, title: u32) -> Self {
        self.failing.push(key(title));
        self
    }

    pub fn fetches(&self, key: &DocumentKey) -> usize {
        self.fetches.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    fn down(&self, what: &str) -> FetchError {
        FetchError::Status {
            url: format!("fake://{what}"),
            status: 503,
        }
    }
}

impl DocumentFetcher for FakeUpstream {
    fn fetch_document(&self, key: &DocumentKey) -> Result<Box<dyn Read + Send>, FetchError> {
        *self.fetches.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.failing.contains(key) {
            return Err(self.down(&key.to_string()));
        }
        match self.documents.get(key) {
            Some(xml) => Ok(Box::new(Cursor::new(xml.clone().into_bytes()))),
            None => Err(FetchError::Status {
                url: format!("fake://{key}"),
                status: 404,
            }),
        }
    }
}

impl CatalogSource for FakeUpstream {
    fn fetch_titles(&self) -> Result<Vec<TitleInfo>, FetchError> {
        if self.catalog_down {
            return Err(self.down("titles"));
        }
        Ok(self.titles.clone())
    }

    fn fetch_agencies(&self) -> Result<Vec<Agency>, FetchError> {
        if self.catalog_down {
            return Err(self.down("agencies"));
        }
        Ok(self.agencies.clone())
    }

    fn fetch_corrections(&self) -> Result<Vec<CorrectionRecord>, FetchError> {
        if self.catalog_down {
            return Err(self.down("corrections"));
        }
        Ok(self.corrections.clone())
    }
}
