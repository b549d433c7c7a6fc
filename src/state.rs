use crate::config::AppConfig;
use crate::recognition::{client::SpoonacularClient, FoodRecognizer};
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub recognizer: Arc<dyn FoodRecognizer>,
}

impl AppState {
    /// Connects the configured backends. Returns the Postgres store separately
    /// so the caller can run migrations on it.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, Option<PgDocumentStore>)> {
        let config = Arc::new(config);

        let (store, pg) = match &config.database_url {
            Some(url) => {
                let pg = PgDocumentStore::connect(url).await?;
                (Arc::new(pg.clone()) as Arc<dyn DocumentStore>, Some(pg))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; documents are kept in memory only");
                (Arc::new(MemoryDocumentStore::new()) as Arc<dyn DocumentStore>, None)
            }
        };

        if config.recognition.api_key.is_none() {
            tracing::warn!("SPOONACULAR_API_KEY not set; recognition calls will be rejected upstream");
        }
        let recognizer =
            Arc::new(SpoonacularClient::from_config(&config.recognition)) as Arc<dyn FoodRecognizer>;

        Ok((Self::from_parts(config, store, recognizer), pg))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn DocumentStore>,
        recognizer: Arc<dyn FoodRecognizer>,
    ) -> Self {
        Self {
            config,
            store,
            recognizer,
        }
    }

    /// In-memory store and a recognizer whose upstream is always down.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with(|_| {})
    }

    #[cfg(test)]
    pub fn fake_with(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        use crate::recognition::{dto::Classification, RecognitionError};
        use async_trait::async_trait;
        use bytes::Bytes;
        use serde_json::{Map, Value};

        struct DownRecognizer;
        #[async_trait]
        impl FoodRecognizer for DownRecognizer {
            async fn classify(&self, _image: Bytes) -> Result<Classification, RecognitionError> {
                Err(RecognitionError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
            }
            async fn recipe_nutrition(
                &self,
                _recipe_id: i64,
            ) -> Result<Map<String, Value>, RecognitionError> {
                Err(RecognitionError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
            }
        }

        let mut config = AppConfig::from_lookup(|_| None).expect("empty config is valid");
        tweak(&mut config);

        Self::from_parts(
            Arc::new(config),
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(DownRecognizer),
        )
    }
}
