use tracing::warn;

use crate::{
    config::ArxivConfig,
    error::{ArxivError, Result},
    model::ResultRecord,
    xml::{Element, Namespace, XmlEnvelope},
};

/// Maps feed entries to [`ResultRecord`]s.
///
/// Oddly shaped entries still produce a record; missing text fields become
/// empty strings and a missing PDF link becomes `None`.
#[derive(Debug, Clone)]
pub struct ResultRecordParser {
    abs_prefix: String,
    error_id_prefix: String,
}

impl ResultRecordParser {
    pub fn new(abs_prefix: &str, error_id_prefix: &str) -> Self {
        ResultRecordParser {
            abs_prefix: abs_prefix.to_string(),
            error_id_prefix: error_id_prefix.to_string(),
        }
    }

    pub fn from_config(config: &ArxivConfig) -> Self {
        Self::new(&config.abs_prefix, &config.error_id_prefix)
    }

    pub fn parse(&self, xml: &str) -> Result<Vec<ResultRecord>> {
        let envelope = XmlEnvelope::parse(xml)?;
        Ok(self.parse_envelope(&envelope))
    }

    pub fn parse_envelope(&self, envelope: &XmlEnvelope) -> Vec<ResultRecord> {
        envelope
            .root()
            .children(Namespace::Atom, "entry")
            .map(|entry| self.parse_entry(entry))
            .collect()
    }

    /// Reads `opensearch:totalResults` from the document root.
    pub fn total_results(&self, envelope: &XmlEnvelope) -> Result<usize> {
        let text = envelope
            .root()
            .child_text(Namespace::OpenSearch, "totalResults")
            .ok_or_else(|| ArxivError::MalformedResponse("missing totalResults".to_string()))?;
        text.parse().map_err(|_| {
            ArxivError::MalformedResponse(format!("totalResults is not an integer: {:?}", text))
        })
    }

    /// Summary text of the first entry of an error envelope.
    pub fn parse_error_envelope(&self, xml: &str) -> Result<Option<String>> {
        let envelope = XmlEnvelope::parse(xml)?;
        Ok(error_summary(&envelope))
    }

    /// Error message when a successful response is really an error entry,
    /// recognized by its id living under the service's error namespace.
    pub fn embedded_error(&self, envelope: &XmlEnvelope) -> Option<String> {
        let entry = envelope.root().child(Namespace::Atom, "entry")?;
        let id = entry.child_text(Namespace::Atom, "id")?;
        if id.starts_with(&self.error_id_prefix) {
            error_summary(envelope)
        } else {
            None
        }
    }

    fn parse_entry(&self, entry: &Element) -> ResultRecord {
        let text = |tag: &str| entry.child_text(Namespace::Atom, tag).unwrap_or_default().to_string();

        let raw_id = text("id");
        let id = raw_id
            .strip_prefix(self.abs_prefix.as_str())
            .map(String::from)
            .unwrap_or(raw_id);

        // latest update wins over the original publication date.
        let published = entry
            .children(Namespace::Atom, "updated")
            .last()
            .map(|updated| updated.text().to_string())
            .unwrap_or_else(|| text("published"));

        let pdf_url = entry
            .children(Namespace::Atom, "link")
            .find(|link| link.attribute("title").is_some_and(|title| !title.is_empty()))
            .and_then(|link| link.attribute("href"))
            .map(String::from);

        let authors = entry
            .children(Namespace::Atom, "author")
            .filter_map(|author| match author.child(Namespace::Atom, "name") {
                Some(name) => Some(name.text().to_string()),
                None => {
                    warn!(entry = %id, "skipping author without a name");
                    None
                }
            })
            .collect();

        ResultRecord::new(text("title"), id, text("summary"), authors, pdf_url, published)
    }
}

impl Default for ResultRecordParser {
    fn default() -> Self {
        Self::from_config(&ArxivConfig::default())
    }
}

fn error_summary(envelope: &XmlEnvelope) -> Option<String> {
    envelope
        .root()
        .child(Namespace::Atom, "entry")?
        .child_text(Namespace::Atom, "summary")
        .map(String::from)
}
