use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// one parsed feed entry. keywords are filled in downstream, never by the parser.

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResultRecord {
    pub title: String,
    pub id: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub pdf_url: Option<String>,
    pub published: String,
    pub keywords: BTreeSet<String>,
}

impl ResultRecord {
    pub fn new(
        title: String,
        id: String,
        abstract_text: String,
        authors: Vec<String>,
        pdf_url: Option<String>,
        published: String,
    ) -> Self {
        ResultRecord {
            title,
            id,
            abstract_text,
            authors,
            pdf_url,
            published,
            keywords: BTreeSet::new(),
        }
    }

    /// The published-or-updated timestamp, if it is valid RFC 3339.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

/// Records from one bounded request, indexed by position within the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBatch {
    pub cursor: usize,
    pub entries: Vec<(usize, ResultRecord)>,
}

impl PageBatch {
    pub fn new(cursor: usize, records: Vec<ResultRecord>) -> Self {
        PageBatch {
            cursor,
            entries: records.into_iter().enumerate().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.entries.iter().map(|(_, record)| record)
    }
}

impl IntoIterator for PageBatch {
    type Item = (usize, ResultRecord);
    type IntoIter = std::vec::IntoIter<(usize, ResultRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
