use anyhow::Context;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::dto::{NewWeightRecord, WeightRecord};
use crate::state::AppState;
use crate::store::{Collection, DocumentMeta, SortOrder, TimeWindow};

pub async fn save_weight(
    st: &AppState,
    user_id: String,
    body: NewWeightRecord,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let record = body.into_record(id, OffsetDateTime::now_utc(), user_id);
    let meta = DocumentMeta {
        id,
        user_id: record.user_id.clone(),
        recorded_at: record.timestamp,
    };
    let doc = serde_json::to_value(&record).context("serialize weight record")?;
    st.store.insert(Collection::WeightRecords, meta, doc).await?;
    debug!(%id, user_id = %record.user_id, "weight saved");
    Ok(id)
}

/// Records from the last `days` days, oldest first.
pub async fn weight_history(
    st: &AppState,
    user_id: &str,
    days: i64,
) -> anyhow::Result<Vec<WeightRecord>> {
    let window = TimeWindow::trailing_days(OffsetDateTime::now_utc(), days);
    st.store
        .find_in_window(Collection::WeightRecords, user_id, window, SortOrder::OldestFirst)
        .await?
        .into_iter()
        .map(|d| serde_json::from_value(d).context("decode weight record"))
        .collect()
}
