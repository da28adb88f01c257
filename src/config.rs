use std::{env, time::Duration};

use crate::error::{ArxivError, Result};

const ENV_FILE: &str = "arxives.env";

pub const DEFAULT_QUERY_URL: &str = "http://export.arxiv.org/api/query?";
pub const DEFAULT_ABS_PREFIX: &str = "http://arxiv.org/abs/";
pub const DEFAULT_ERROR_ID_PREFIX: &str = "http://arxiv.org/api/errors";

#[derive(Debug, Clone)]
pub struct ArxivConfig {
    pub query_url: String,
    pub abs_prefix: String,
    pub error_id_prefix: String,
    pub page_size: usize,
    pub max_page_size: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        ArxivConfig {
            query_url: String::from(DEFAULT_QUERY_URL),
            abs_prefix: String::from(DEFAULT_ABS_PREFIX),
            error_id_prefix: String::from(DEFAULT_ERROR_ID_PREFIX),
            page_size: 10,
            max_page_size: 2000,
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ArxivConfig {
    /// Config pointing at a different endpoint, e.g. a local mock server.
    pub fn with_query_url(query_url: &str) -> Self {
        ArxivConfig {
            query_url: query_url.to_string(),
            ..Self::default()
        }
    }

    /// Reads overrides from the environment, after loading `arxives.env` if present.
    pub fn from_env() -> Result<Self> {
        // the env file is optional; plain environment variables still apply.
        let _ = dotenvy::from_filename(ENV_FILE);
        let defaults = Self::default();

        let config = ArxivConfig {
            query_url: env::var("ARXIV_QUERY_URL").unwrap_or(defaults.query_url),
            abs_prefix: env::var("ARXIV_ABS_PREFIX").unwrap_or(defaults.abs_prefix),
            error_id_prefix: env::var("ARXIV_ERROR_ID_PREFIX").unwrap_or(defaults.error_id_prefix),
            page_size: get_positive_from_env("ARXIV_PAGE_SIZE")?.unwrap_or(defaults.page_size),
            max_page_size: get_positive_from_env("ARXIV_MAX_PAGE_SIZE")?
                .unwrap_or(defaults.max_page_size),
            timeout: get_positive_from_env("ARXIV_TIMEOUT_SECS")?
                .map(|secs| Duration::from_secs(secs as u64))
                .unwrap_or(defaults.timeout),
            user_agent: env::var("ARXIV_USER_AGENT").unwrap_or(defaults.user_agent),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size > self.max_page_size {
            return Err(ArxivError::Config(format!(
                "page size {} exceeds the service ceiling of {}",
                self.page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

fn get_positive_from_env(key: &str) -> Result<Option<usize>> {
    let raw = match env::var(key) {
        Ok(raw) => raw,
        Err(_) => return Ok(None),
    };
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| ArxivError::Config(format!("failed to parse {} as an integer: {:?}", key, raw)))?;
    if value == 0 {
        return Err(ArxivError::Config(format!("{} must be positive", key)));
    }
    Ok(Some(value))
}
