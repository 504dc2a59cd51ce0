/// Daily quote records
///
/// One quote per calendar day, either fetched from a remote service or taken
/// from the built-in cave wisdom list when the fetch is not possible.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a daily quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteOrigin {
    Remote,
    Fallback,
}

/// The quote shown for a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub content: String,
    pub author: String,
    pub fetched_at: DateTime<Utc>,
    pub origin: QuoteOrigin,
}

impl DailyQuote {
    pub fn remote(date: NaiveDate, content: String, author: String) -> Self {
        Self {
            date,
            content,
            author,
            fetched_at: Utc::now(),
            origin: QuoteOrigin::Remote,
        }
    }

    /// Pick an offline quote for `date`
    ///
    /// The choice is keyed on the day so the same date always yields the same
    /// wisdom.
    pub fn fallback(date: NaiveDate) -> Self {
        let index = date.num_days_from_ce().rem_euclid(CAVE_WISDOM.len() as i32) as usize;
        let (content, author) = CAVE_WISDOM[index];
        Self {
            date,
            content: content.to_string(),
            author: author.to_string(),
            fetched_at: Utc::now(),
            origin: QuoteOrigin::Fallback,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.origin == QuoteOrigin::Remote
    }
}

/// Offline quotes used when the remote service is unavailable
pub const CAVE_WISDOM: [(&str, &str); 5] = [
    (
        "Strong cave person make fire every day, not just when cold.",
        "Ancient Cave Wisdom",
    ),
    (
        "Many small rocks build big mountain. Many small habits build strong caveman.",
        "Chief Grok",
    ),
    (
        "Hunt mammoth one step at a time, or mammoth hunt you.",
        "Wise Cave Elder",
    ),
    (
        "Sharp spear comes from many sharpenings. Sharp mind comes from many learnings.",
        "Tribal Shaman",
    ),
    (
        "Cave person who wait for perfect weather never leave cave.",
        "Nomad Oog",
    ),
];
