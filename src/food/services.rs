use anyhow::Context;
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::dto::{DailySummary, FoodEntry, NewFoodEntry};
use crate::error::ApiError;
use crate::nutrition::sum_nutrients;
use crate::state::AppState;
use crate::store::{Collection, DocumentMeta, SortOrder, TimeWindow};

pub const GOAL_CALORIES: i64 = 2000;
pub const GOAL_CARBS: i64 = 250;
pub const GOAL_PROTEIN: i64 = 150;
pub const GOAL_FAT: i64 = 65;

pub async fn save_food_entry(
    st: &AppState,
    user_id: String,
    body: NewFoodEntry,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let entry = body.into_entry(id, OffsetDateTime::now_utc(), user_id);
    let meta = DocumentMeta {
        id,
        user_id: entry.user_id.clone(),
        recorded_at: entry.timestamp,
    };
    let doc = serde_json::to_value(&entry).context("serialize food entry")?;
    st.store.insert(Collection::FoodEntries, meta, doc).await?;
    debug!(%id, user_id = %entry.user_id, "food entry saved");
    Ok(id)
}

async fn entries_in(st: &AppState, user_id: &str, window: TimeWindow) -> anyhow::Result<Vec<FoodEntry>> {
    let docs = st
        .store
        .find_in_window(Collection::FoodEntries, user_id, window, SortOrder::NewestFirst)
        .await?;
    docs.into_iter()
        .map(|d| serde_json::from_value(d).context("decode food entry"))
        .collect()
}

/// Entries from the last `days` days, newest first.
pub async fn list_food_entries(
    st: &AppState,
    user_id: &str,
    days: i64,
) -> anyhow::Result<Vec<FoodEntry>> {
    let window = TimeWindow::trailing_days(OffsetDateTime::now_utc(), days);
    entries_in(st, user_id, window).await
}

pub fn parse_day(raw: &str) -> Result<Date, ApiError> {
    Date::parse(
        raw,
        format_description!("[year]-[month padding:none]-[day padding:none]"),
    )
        .map_err(|_| ApiError::InvalidDate(raw.to_string()))
}

/// Totals for one UTC calendar day; `date` defaults to today.
pub async fn daily_summary(
    st: &AppState,
    user_id: &str,
    date: Option<&str>,
) -> Result<DailySummary, ApiError> {
    let day = match date {
        Some(raw) => parse_day(raw)?,
        None => OffsetDateTime::now_utc().date(),
    };
    let window = TimeWindow::calendar_day(day)?;
    let entries = entries_in(st, user_id, window).await?;
    let totals = sum_nutrients(entries.iter().map(|e| e.nutrition.as_ref()));

    Ok(DailySummary {
        date: format_day(day)?,
        totals,
        entries_count: entries.len(),
        goal_calories: GOAL_CALORIES,
        goal_carbs: GOAL_CARBS,
        goal_protein: GOAL_PROTEIN,
        goal_fat: GOAL_FAT,
    })
}

fn format_day(day: Date) -> anyhow::Result<String> {
    day.format(format_description!("[year]-[month]-[day]"))
        .context("format date")
}
