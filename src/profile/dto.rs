use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::fields::FreeText;
use crate::nutrition::Quantity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FreeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<FreeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_calorie_goal: Option<Quantity>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /api/update-user-profile`; only present fields are written.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FreeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<FreeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_calorie_goal: Option<Quantity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub success: bool,
    pub modified: bool,
}
