use crate::model::ResultRecord;

pub struct Formatter;

impl Formatter {
    pub fn to_readme(rank: usize, data: &ResultRecord) -> String {
        let published = data
            .published_at()
            .map(|dt| dt.format("%Y.%m.%d").to_string())
            .unwrap_or_else(|| data.published.clone());
        let link = data.pdf_url.as_deref().unwrap_or("no pdf");
        format!(
            "### {}. {}\n_{}_<br/>\n{}<br/>\n_Published: {}_, arXiv:{}, [{}]({})\n\n",
            rank,
            collapse_whitespace(&data.title),
            data.authors.join(", "),
            collapse_whitespace(&data.abstract_text),
            published,
            data.id,
            link,
            link
        )
    }

    pub fn to_jsonl(data: &ResultRecord) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(data)?;
        line.push('\n');
        Ok(line)
    }
}

// titles and abstracts come wrapped at fixed columns.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
