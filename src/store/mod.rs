//! Schemaless document persistence.
//!
//! Documents are JSON objects grouped into collections. Time-series
//! collections (food entries, weight records) are keyed by `id` and queried by
//! `user_id` plus a time window; profiles are keyed by `user_id` alone.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

/// Upper bound for `days` query windows, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    FoodEntries,
    WeightRecords,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::FoodEntries => "food_entries",
            Collection::WeightRecords => "weight_records",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

/// Envelope fields the store indexes on; they are also written into the document.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub id: Uuid,
    pub user_id: String,
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub end_inclusive: bool,
}

impl TimeWindow {
    /// `[now - days, now]`. `days` is clamped to `±MAX_WINDOW_DAYS`.
    pub fn trailing_days(now: OffsetDateTime, days: i64) -> Self {
        let days = days.clamp(-MAX_WINDOW_DAYS, MAX_WINDOW_DAYS);
        Self {
            start: now - Duration::days(days),
            end: now,
            end_inclusive: true,
        }
    }

    /// `[date 00:00 UTC, next day 00:00 UTC)`.
    pub fn calendar_day(date: Date) -> anyhow::Result<Self> {
        let next = date
            .next_day()
            .ok_or_else(|| anyhow::anyhow!("no calendar day after {}", date))?;
        Ok(Self {
            start: date.midnight().assume_utc(),
            end: next.midnight().assume_utc(),
            end_inclusive: false,
        })
    }

    pub fn contains(&self, t: OffsetDateTime) -> bool {
        if t < self.start {
            return false;
        }
        if self.end_inclusive {
            t <= self.end
        } else {
            t < self.end
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, meta: DocumentMeta, doc: Value)
        -> anyhow::Result<()>;

    async fn find_in_window(
        &self,
        collection: Collection,
        user_id: &str,
        window: TimeWindow,
        order: SortOrder,
    ) -> anyhow::Result<Vec<Value>>;

    /// Returns the stored profile, inserting `default_doc` first if there is none.
    async fn find_or_insert_profile(&self, user_id: &str, default_doc: Value)
        -> anyhow::Result<Value>;

    /// Shallow-merges `patch` into the profile, creating it if missing.
    /// Returns `true` when an existing profile was updated.
    async fn merge_profile(&self, user_id: &str, patch: Map<String, Value>)
        -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn trailing_window_includes_both_ends() {
        let now = datetime!(2024-05-10 12:00 UTC);
        let w = TimeWindow::trailing_days(now, 7);
        assert_eq!(w.start, datetime!(2024-05-03 12:00 UTC));
        assert!(w.contains(now));
        assert!(w.contains(w.start));
        assert!(!w.contains(w.start - Duration::SECOND));
        assert!(!w.contains(now + Duration::SECOND));
    }

    #[test]
    fn negative_window_is_empty() {
        let now = datetime!(2024-05-10 12:00 UTC);
        let w = TimeWindow::trailing_days(now, -1);
        assert!(!w.contains(now));
        assert!(!w.contains(now - Duration::HOUR));
    }

    #[test]
    fn huge_window_is_clamped() {
        let now = datetime!(2024-05-10 12:00 UTC);
        let w = TimeWindow::trailing_days(now, i64::MAX);
        assert_eq!(w.start, now - Duration::days(MAX_WINDOW_DAYS));
    }

    #[test]
    fn calendar_day_excludes_next_midnight() {
        let w = TimeWindow::calendar_day(date!(2024 - 02 - 29)).unwrap();
        assert!(w.contains(datetime!(2024-02-29 00:00 UTC)));
        assert!(w.contains(datetime!(2024-02-29 23:59:59 UTC)));
        assert!(!w.contains(datetime!(2024-03-01 00:00 UTC)));
        assert!(!w.contains(datetime!(2024-02-28 23:59:59 UTC)));
    }

    #[test]
    fn calendar_day_at_end_of_range_fails() {
        assert!(TimeWindow::calendar_day(Date::MAX).is_err());
    }
}
