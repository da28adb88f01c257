use tracing::{debug, info, warn};

use crate::{
    config::ArxivConfig,
    error::{ArxivError, Result},
    model::PageBatch,
    parser::ResultRecordParser,
    query::QuerySpec,
    transport::{Transport, TransportResponse},
    xml::XmlEnvelope,
};

/// Walks a query's result window one bounded request at a time.
///
/// [`retrieve`](Self::retrieve) makes one request to learn the total result
/// count, then hands back a lazy [`Pages`] iterator. Nothing is retried.
#[derive(Debug)]
pub struct PaginatedRetriever<T: Transport> {
    transport: T,
    config: ArxivConfig,
    parser: ResultRecordParser,
    query: QuerySpec,
}

impl<T: Transport> PaginatedRetriever<T> {
    pub fn new(transport: T, config: ArxivConfig, query: QuerySpec) -> Result<Self> {
        if query.max_results() > config.max_page_size {
            return Err(ArxivError::InvalidQuerySpec(format!(
                "page size {} exceeds the service ceiling of {}",
                query.max_results(),
                config.max_page_size
            )));
        }
        let parser = ResultRecordParser::from_config(&config);
        Ok(PaginatedRetriever {
            transport,
            config,
            parser,
            query,
        })
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// Fetches the first window and reads the total result count.
    ///
    /// A service-reported error ends the retrieval here with
    /// [`ArxivError::ServiceReported`].
    pub fn retrieve(self) -> Result<Pages<T>> {
        let start = self.query.start();
        let envelope = self.fetch_envelope(start)?;
        let total = self.parser.total_results(&envelope)?;
        info!(query = %self.query, total, "search matched");

        Ok(Pages {
            retriever: self,
            first: Some(envelope),
            cursor: start,
            total,
            done: false,
        })
    }

    fn fetch_envelope(&self, start: usize) -> Result<XmlEnvelope> {
        let size = self.query.max_results();
        let url = self.query.window_url(&self.config, start, size);
        debug!(start, size, "requesting window");
        let response = self.transport.get(&url)?;
        if !response.ok {
            return Err(self.classify_failure(response));
        }

        let envelope = XmlEnvelope::parse(&response.body)?;
        if let Some(message) = self.parser.embedded_error(&envelope) {
            warn!(%message, "service reported an error");
            return Err(ArxivError::ServiceReported { message });
        }
        Ok(envelope)
    }

    fn classify_failure(&self, response: TransportResponse) -> ArxivError {
        match self.parser.parse_error_envelope(&response.body) {
            Ok(Some(message)) => {
                warn!(status = response.status, %message, "service reported an error");
                ArxivError::ServiceReported { message }
            }
            _ => ArxivError::Transport {
                status: Some(response.status),
                detail: response.status_text,
            },
        }
    }
}

/// Lazy, finite sequence of page batches. Each `next()` issues at most one
/// request; iteration ends after the window passes the total or on the first error.
#[derive(Debug)]
pub struct Pages<T: Transport> {
    retriever: PaginatedRetriever<T>,
    first: Option<XmlEnvelope>,
    cursor: usize,
    total: usize,
    done: bool,
}

impl<T: Transport> Pages<T> {
    pub fn total_results(&self) -> usize {
        self.total
    }

    /// Window start of the next page to be produced.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<T: Transport> Iterator for Pages<T> {
    type Item = Result<PageBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let cursor = self.cursor;
        // the metadata response already holds the first window.
        let envelope = match self.first.take() {
            Some(envelope) => Ok(envelope),
            None => self.retriever.fetch_envelope(cursor),
        };
        let batch = envelope.map(|envelope| {
            PageBatch::new(cursor, self.retriever.parser.parse_envelope(&envelope))
        });

        match self.cursor.checked_add(self.retriever.query.max_results()) {
            Some(next) if batch.is_ok() && next <= self.total => self.cursor = next,
            Some(next) => {
                self.cursor = next;
                self.done = true;
            }
            // a window past usize::MAX is past any total too.
            None => self.done = true,
        }
        if let Ok(batch) = &batch {
            debug!(cursor, records = batch.len(), "page ready");
        }
        Some(batch)
    }
}

impl<T: Transport> std::iter::FusedIterator for Pages<T> {}
