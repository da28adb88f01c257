//! Query construction and paginated retrieval for the arXiv search API.
//!
//! ```no_run
//! use arxives::{ArxivConfig, HttpTransport, PaginatedRetriever, QuerySpec};
//!
//! # fn main() -> arxives::Result<()> {
//! let config = ArxivConfig::default();
//! let query = QuerySpec::builder().title("transformer").author("vaswani").build()?;
//! let transport = HttpTransport::new(&config)?;
//! for page in PaginatedRetriever::new(transport, config, query)?.retrieve()? {
//!     for (i, record) in page? {
//!         println!("{} {}", i, record.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod parser;
pub mod query;
pub mod retriever;
pub mod transport;
pub mod xml;

pub use config::ArxivConfig;
pub use error::{ArxivError, Result};
pub use model::{PageBatch, ResultRecord};
pub use parser::ResultRecordParser;
pub use query::{QuerySpec, QuerySpecBuilder};
pub use retriever::{PaginatedRetriever, Pages};
pub use transport::{HttpTransport, Transport, TransportResponse};
