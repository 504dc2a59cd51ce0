/// Daily quote retrieval
///
/// One quote is kept per calendar day. The first request of a day makes a
/// single attempt against the remote quote service and falls back to the
/// built-in cave wisdom on any failure; later requests reuse the stored record.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::config::QuotesConfig;
use crate::domain::DailyQuote;
use crate::storage::{QuoteStorage, StorageError};

/// Errors from the remote quote service
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Quote service answered with status {0}")]
    Status(u16),

    #[error("Quote service returned an empty quote")]
    EmptyQuote,
}

/// Quote payload as served by the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteQuote {
    pub content: String,
    #[serde(default)]
    pub author: String,
}

/// Anything that can produce a fresh quote
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> Result<RemoteQuote, QuoteError>;
}

/// Client for a quotable-style `GET /random` endpoint
pub struct QuotableClient {
    client: reqwest::Client,
    endpoint: String,
    min_length: u32,
    max_length: u32,
}

impl QuotableClient {
    pub fn new(config: &QuotesConfig) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            min_length: config.min_length,
            max_length: config.max_length,
        })
    }
}

#[async_trait]
impl QuoteSource for QuotableClient {
    async fn fetch(&self) -> Result<RemoteQuote, QuoteError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("minLength", self.min_length), ("maxLength", self.max_length)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let quote: RemoteQuote = resp.json().await?;
        if quote.content.trim().is_empty() {
            return Err(QuoteError::EmptyQuote);
        }
        Ok(quote)
    }
}

/// Return the quote for `today`, fetching or falling back only when none is stored
///
/// Passing no source skips the remote attempt entirely (offline mode).
pub async fn todays_quote<S>(
    storage: &S,
    source: Option<&dyn QuoteSource>,
    today: NaiveDate,
) -> Result<DailyQuote, StorageError>
where
    S: QuoteStorage + ?Sized,
{
    if let Some(existing) = storage.get_quote(today)? {
        return Ok(existing);
    }

    let quote = match source {
        Some(source) => match source.fetch().await {
            Ok(remote) => {
                let author = match remote.author.trim() {
                    "" => "Unknown".to_string(),
                    author => author.to_string(),
                };
                DailyQuote::remote(today, remote.content.trim().to_string(), author)
            }
            Err(e) => {
                tracing::warn!("Quote fetch failed, using cave wisdom: {}", e);
                DailyQuote::fallback(today)
            }
        },
        None => DailyQuote::fallback(today),
    };

    storage.insert_quote(&quote)
}

/// Delete quotes older than `retention_days` before `today`
pub fn cleanup_old_quotes<S>(
    storage: &S,
    today: NaiveDate,
    retention_days: u32,
) -> Result<usize, StorageError>
where
    S: QuoteStorage + ?Sized,
{
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN);
    storage.delete_quotes_before(cutoff)
}
