use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::fields::FreeText;
use crate::nutrition::Quantity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<FreeText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewWeightRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub weight: Option<Quantity>,
    #[serde(default)]
    pub unit: Option<FreeText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewWeightRecord {
    pub fn into_record(mut self, id: Uuid, timestamp: OffsetDateTime, user_id: String) -> WeightRecord {
        self.extra.remove("id");
        self.extra.remove("timestamp");
        WeightRecord {
            id,
            timestamp,
            user_id,
            weight: self.weight,
            unit: self.unit,
            extra: self.extra,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
    #[serde(default = "default_days")]
    pub days: i64,
}
fn default_days() -> i64 { 30 }
