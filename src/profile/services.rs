use anyhow::Context;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::debug;

use super::dto::{ProfileUpdate, UserProfile};
use crate::state::AppState;

pub fn default_profile(user_id: &str, now: OffsetDateTime) -> UserProfile {
    UserProfile {
        user_id: user_id.to_string(),
        name: Some("User".into()),
        age: Some(30_i64.into()),
        height: Some(170.0_f64.into()),
        goal_weight: Some(70.0_f64.into()),
        activity_level: Some("moderate".into()),
        daily_calorie_goal: Some(2000_i64.into()),
        created_at: Some(now),
        updated_at: None,
        extra: Default::default(),
    }
}

pub async fn get_or_create_profile(st: &AppState, user_id: &str) -> anyhow::Result<UserProfile> {
    let fallback = serde_json::to_value(default_profile(user_id, OffsetDateTime::now_utc()))
        .context("serialize default profile")?;
    let doc = st.store.find_or_insert_profile(user_id, fallback).await?;
    serde_json::from_value(doc).context("decode user profile")
}

/// Merges the present fields into the stored profile. Returns whether an
/// existing profile was modified (`false` when this call created it).
pub async fn update_profile(
    st: &AppState,
    user_id: String,
    mut update: ProfileUpdate,
) -> anyhow::Result<bool> {
    // Server-owned timestamps are not client-writable.
    update.extra.remove("created_at");
    update.extra.remove("updated_at");
    update.user_id = Some(user_id.clone());

    let Value::Object(mut patch) = serde_json::to_value(&update).context("serialize profile update")?
    else {
        anyhow::bail!("profile update did not serialize to an object");
    };
    let now = OffsetDateTime::now_utc().format(&Rfc3339).context("format timestamp")?;
    patch.insert("updated_at".into(), Value::String(now));

    let modified = st.store.merge_profile(&user_id, patch).await?;
    debug!(%user_id, modified, "profile merged");
    Ok(modified)
}
