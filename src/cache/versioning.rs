use crate::source::catalog::TitleInfo;
use crate::types::identifiers::{DocumentKey, IssueDate, TitleNumber};

/// Latest issue date per title, fixed for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleVersions {
    entries: Vec<(TitleNumber, Option<IssueDate>)>,
}

impl TitleVersions {
    /// Entries whose number cannot be read as a title are dropped. Order is
    /// preserved so that the first listing of a title wins.
    pub fn from_titles(titles: &[TitleInfo]) -> Self {
        let entries = titles
            .iter()
            .filter_map(|info| {
                let number = info.number.as_title()?;
                let date = info
                    .latest_issue_date
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(IssueDate::new);
                Some((number, date))
            })
            .collect();
        Self { entries }
    }

    /// `None` means "no current version": callers skip the title.
    pub fn resolve(&self, title: TitleNumber) -> Option<&IssueDate> {
        self.entries
            .iter()
            .find(|(number, _)| *number == title)
            .and_then(|(_, date)| date.as_ref())
    }

    pub fn key_for(&self, title: TitleNumber) -> Option<DocumentKey> {
        self.resolve(title)
            .map(|date| DocumentKey::new(title, date.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
