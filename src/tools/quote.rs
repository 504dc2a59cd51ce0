/// Tool for the daily quote
///
/// This module implements the daily_quote MCP tool.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::DailyQuote;
use crate::quotes::{cleanup_old_quotes, todays_quote, QuoteSource};
use crate::storage::QuoteStorage;
use crate::ServerError;

/// Response carrying today's quote
#[derive(Debug, Serialize)]
pub struct DailyQuoteResponse {
    pub success: bool,
    pub quote: DailyQuote,
    pub message: String,
}

/// Return today's quote, purging records past the retention window first
pub async fn daily_quote<S: QuoteStorage>(
    storage: &S,
    source: Option<&dyn QuoteSource>,
    today: NaiveDate,
    retention_days: u32,
) -> Result<DailyQuoteResponse, ServerError> {
    cleanup_old_quotes(storage, today, retention_days)?;
    let quote = todays_quote(storage, source, today).await?;

    let message = format!("💬 \"{}\" ({})", quote.content, quote.author);
    Ok(DailyQuoteResponse {
        success: true,
        quote,
        message,
    })
}
