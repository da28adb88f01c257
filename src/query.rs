use std::{collections::BTreeSet, fmt};

use crate::{
    config::ArxivConfig,
    error::{ArxivError, Result},
};

const TITLE_CODE: &str = "ti";
const AUTHOR_CODE: &str = "au";
const ABSTRACT_CODE: &str = "abs";

/// Search predicates plus the starting pagination window.
///
/// The filter fragment depends only on the term groups; pagination is appended
/// per request by [`QuerySpec::window_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    title_terms: BTreeSet<String>,
    author_terms: BTreeSet<String>,
    abstract_terms: BTreeSet<String>,
    id_terms: BTreeSet<String>,
    start: usize,
    max_results: usize,
}

impl QuerySpec {
    pub fn builder() -> QuerySpecBuilder {
        QuerySpecBuilder::default()
    }

    pub fn title_terms(&self) -> &BTreeSet<String> {
        &self.title_terms
    }

    pub fn author_terms(&self) -> &BTreeSet<String> {
        &self.author_terms
    }

    pub fn abstract_terms(&self) -> &BTreeSet<String> {
        &self.abstract_terms
    }

    pub fn id_terms(&self) -> &BTreeSet<String> {
        &self.id_terms
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn is_empty(&self) -> bool {
        self.title_terms.is_empty()
            && self.author_terms.is_empty()
            && self.abstract_terms.is_empty()
            && self.id_terms.is_empty()
    }

    /// Filter fragment without host, path or pagination. Empty means "browse all".
    pub fn render(&self) -> String {
        let filters = [
            (TITLE_CODE, &self.title_terms),
            (AUTHOR_CODE, &self.author_terms),
            (ABSTRACT_CODE, &self.abstract_terms),
        ]
        .iter()
        .flat_map(|(code, terms)| {
            terms
                .iter()
                .map(move |term| format!("{}:{}", code, urlencoding::encode(term)))
        })
        .collect::<Vec<_>>();

        let search_query = if filters.is_empty() {
            None
        } else {
            Some(format!("search_query={}", filters.join("+AND+")))
        };
        let id_list = if self.id_terms.is_empty() {
            None
        } else {
            Some(format!(
                "id_list={}",
                self.id_terms
                    .iter()
                    .map(|id| urlencoding::encode(id))
                    .collect::<Vec<_>>()
                    .join(",")
            ))
        };

        match (search_query, id_list) {
            (Some(search), Some(ids)) => format!("{}&{}", search, ids),
            (Some(search), None) => search,
            (None, Some(ids)) => ids,
            (None, None) => String::new(),
        }
    }

    /// Base endpoint followed by the filter fragment.
    pub fn url(&self, config: &ArxivConfig) -> String {
        format!("{}{}", config.query_url, self.render())
    }

    /// Full request URL for one bounded window.
    pub fn window_url(&self, config: &ArxivConfig, start: usize, size: usize) -> String {
        let url = self.url(config);
        let separator = if url.ends_with('?') || url.ends_with('&') {
            ""
        } else {
            "&"
        };
        // `max_results` is what the service reads; `max_result` is ignored and pins pages at 10.
        format!("{}{}start={}&max_results={}", url, separator, start, size)
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone)]
pub struct QuerySpecBuilder {
    title_terms: BTreeSet<String>,
    author_terms: BTreeSet<String>,
    abstract_terms: BTreeSet<String>,
    id_terms: BTreeSet<String>,
    start: usize,
    max_results: usize,
    allow_empty: bool,
}

impl Default for QuerySpecBuilder {
    fn default() -> Self {
        QuerySpecBuilder {
            title_terms: BTreeSet::new(),
            author_terms: BTreeSet::new(),
            abstract_terms: BTreeSet::new(),
            id_terms: BTreeSet::new(),
            start: 0,
            max_results: 10,
            allow_empty: true,
        }
    }
}

fn insert_term(terms: &mut BTreeSet<String>, term: &str) {
    let term = term.trim();
    if !term.is_empty() {
        terms.insert(term.to_string());
    }
}

impl QuerySpecBuilder {
    pub fn title(mut self, term: &str) -> Self {
        insert_term(&mut self.title_terms, term);
        self
    }

    pub fn author(mut self, term: &str) -> Self {
        insert_term(&mut self.author_terms, term);
        self
    }

    pub fn abstract_term(mut self, term: &str) -> Self {
        insert_term(&mut self.abstract_terms, term);
        self
    }

    pub fn id(mut self, term: &str) -> Self {
        insert_term(&mut self.id_terms, term);
        self
    }

    pub fn titles<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms.into_iter().fold(self, |b, t| b.title(t.as_ref()))
    }

    pub fn authors<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms.into_iter().fold(self, |b, t| b.author(t.as_ref()))
    }

    pub fn abstracts<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms.into_iter().fold(self, |b, t| b.abstract_term(t.as_ref()))
    }

    pub fn ids<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms.into_iter().fold(self, |b, t| b.id(t.as_ref()))
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Whether a spec with no terms at all (browse everything) is accepted.
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn build(self) -> Result<QuerySpec> {
        if self.max_results == 0 {
            return Err(ArxivError::InvalidQuerySpec(
                "max_results must be positive".to_string(),
            ));
        }
        let spec = QuerySpec {
            title_terms: self.title_terms,
            author_terms: self.author_terms,
            abstract_terms: self.abstract_terms,
            id_terms: self.id_terms,
            start: self.start,
            max_results: self.max_results,
        };
        if !self.allow_empty && spec.is_empty() {
            return Err(ArxivError::InvalidQuerySpec(
                "at least one title, author, abstract or id term is required".to_string(),
            ));
        }
        Ok(spec)
    }
}
