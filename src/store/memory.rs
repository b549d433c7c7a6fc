use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Collection, DocumentMeta, DocumentStore, SortOrder, TimeWindow};

/// Process-local store used in tests and when no `DATABASE_URL` is configured.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<Collection, Vec<(DocumentMeta, Value)>>>,
    profiles: RwLock<HashMap<String, Map<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        meta: DocumentMeta,
        doc: Value,
    ) -> anyhow::Result<()> {
        let mut documents = self.documents.write().await;
        documents.entry(collection).or_default().push((meta, doc));
        Ok(())
    }

    async fn find_in_window(
        &self,
        collection: Collection,
        user_id: &str,
        window: TimeWindow,
        order: SortOrder,
    ) -> anyhow::Result<Vec<Value>> {
        let documents = self.documents.read().await;
        let mut hits: Vec<&(DocumentMeta, Value)> = documents
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(meta, _)| meta.user_id == user_id && window.contains(meta.recorded_at))
                    .collect()
            })
            .unwrap_or_default();

        match order {
            SortOrder::OldestFirst => hits.sort_by_key(|(meta, _)| meta.recorded_at),
            SortOrder::NewestFirst => {
                hits.sort_by(|(a, _), (b, _)| b.recorded_at.cmp(&a.recorded_at))
            }
        }
        Ok(hits.into_iter().map(|(_, doc)| doc.clone()).collect())
    }

    async fn find_or_insert_profile(
        &self,
        user_id: &str,
        default_doc: Value,
    ) -> anyhow::Result<Value> {
        let Value::Object(default_doc) = default_doc else {
            anyhow::bail!("profile document must be a JSON object");
        };
        let mut profiles = self.profiles.write().await;
        let doc = profiles.entry(user_id.to_string()).or_insert(default_doc);
        Ok(Value::Object(doc.clone()))
    }

    async fn merge_profile(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> anyhow::Result<bool> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(user_id) {
            Some(doc) => {
                doc.extend(patch);
                Ok(true)
            }
            None => {
                profiles.insert(user_id.to_string(), patch);
                Ok(false)
            }
        }
    }
}
