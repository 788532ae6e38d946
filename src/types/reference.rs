use serde::{Deserialize, Serialize};

use super::identifiers::TitleNumber;

/// Structural levels below a title, in canonical (outermost first) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HierarchyLevel {
    Subtitle,
    Chapter,
    Subchapter,
    Part,
    Subpart,
    Section,
}

impl HierarchyLevel {
    pub const CANONICAL: [HierarchyLevel; 6] = [
        HierarchyLevel::Subtitle,
        HierarchyLevel::Chapter,
        HierarchyLevel::Subchapter,
        HierarchyLevel::Part,
        HierarchyLevel::Subpart,
        HierarchyLevel::Section,
    ];

    /// Value of the `TYPE` attribute that marks a node of this level.
    pub fn node_type(&self) -> &'static str {
        match self {
            HierarchyLevel::Subtitle => "SUBTITLE",
            HierarchyLevel::Chapter => "CHAPTER",
            HierarchyLevel::Subchapter => "SUBCHAP",
            HierarchyLevel::Part => "PART",
            HierarchyLevel::Subpart => "SUBPART",
            HierarchyLevel::Section => "SECTION",
        }
    }
}

/// A structural locator into one title.
///
/// Levels are independent options; any subset may be present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CfrReference {
    pub title: TitleNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subchapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl CfrReference {
    pub fn new(title: TitleNumber) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    pub fn with(mut self, level: HierarchyLevel, label: impl Into<String>) -> Self {
        let label = Some(label.into());
        match level {
            HierarchyLevel::Subtitle => self.subtitle = label,
            HierarchyLevel::Chapter => self.chapter = label,
            HierarchyLevel::Subchapter => self.subchapter = label,
            HierarchyLevel::Part => self.part = label,
            HierarchyLevel::Subpart => self.subpart = label,
            HierarchyLevel::Section => self.section = label,
        }
        self
    }

    pub fn level(&self, level: HierarchyLevel) -> Option<&str> {
        let value = match level {
            HierarchyLevel::Subtitle => &self.subtitle,
            HierarchyLevel::Chapter => &self.chapter,
            HierarchyLevel::Subchapter => &self.subchapter,
            HierarchyLevel::Part => &self.part,
            HierarchyLevel::Subpart => &self.subpart,
            HierarchyLevel::Section => &self.section,
        };
        value.as_deref()
    }

    /// Present levels in canonical order, with their labels.
    pub fn trail(&self) -> impl Iterator<Item = (HierarchyLevel, &str)> + '_ {
        HierarchyLevel::CANONICAL
            .iter()
            .filter_map(move |level| self.level(*level).map(|label| (*level, label)))
    }

    pub fn is_empty(&self) -> bool {
        self.trail().next().is_none()
    }
}
