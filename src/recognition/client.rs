use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::{dto::Classification, FoodRecognizer, RecognitionError};
use crate::config::RecognitionConfig;

/// Spoonacular food image analysis and recipe nutrition endpoints.
#[derive(Clone)]
pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SpoonacularClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(cfg: &RecognitionConfig) -> Self {
        Self::new(cfg.base_url.clone(), cfg.api_key.clone())
    }

    fn with_key(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.query(&[("apiKey", key)]),
            None => req,
        }
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, RecognitionError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(RecognitionError::Status(status));
        }
        let body = resp.bytes().await.map_err(RecognitionError::Transport)?;
        serde_json::from_slice(&body).map_err(|e| RecognitionError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FoodRecognizer for SpoonacularClient {
    async fn classify(&self, image: Bytes) -> Result<Classification, RecognitionError> {
        let part = Part::bytes(image.to_vec())
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(RecognitionError::Transport)?;
        let form = Form::new().part("file", part);

        let url = format!("{}/food/images/analyze", self.base_url);
        let resp = self
            .with_key(self.http.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(RecognitionError::Transport)?;
        debug!(status = %resp.status(), "image analyze response");
        Self::read_json(resp).await
    }

    async fn recipe_nutrition(
        &self,
        recipe_id: i64,
    ) -> Result<Map<String, Value>, RecognitionError> {
        let url = format!("{}/recipes/{}/nutritionWidget.json", self.base_url, recipe_id);
        let resp = self
            .with_key(self.http.get(&url))
            .send()
            .await
            .map_err(RecognitionError::Transport)?;
        debug!(status = %resp.status(), recipe_id, "nutrition widget response");
        Self::read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn classify_posts_image_with_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/food/images/analyze"))
            .and(query_param("apiKey", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "category": { "name": "pizza", "probability": 0.97 },
                "recipes": [{ "id": 42, "title": "Margherita" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SpoonacularClient::new(server.uri(), Some("secret".into()));
        let c = client.classify(Bytes::from_static(b"jpeg")).await.unwrap();
        let category = c.category.clone().unwrap();
        assert_eq!(category.name.as_deref(), Some("pizza"));
        assert_eq!(c.first_recipe_id(), Some(42));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/food/images/analyze"))
            .respond_with(ResponseTemplate::new(402))
            .mount(&server)
            .await;

        let client = SpoonacularClient::new(server.uri(), None);
        let err = client.classify(Bytes::from_static(b"jpeg")).await.unwrap_err();
        assert!(matches!(err, RecognitionError::Status(s) if s.as_u16() == 402));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/7/nutritionWidget.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = SpoonacularClient::new(server.uri(), None);
        let err = client.recipe_nutrition(7).await.unwrap_err();
        assert!(matches!(err, RecognitionError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = SpoonacularClient::new("http://127.0.0.1:9", None);
        let err = client.classify(Bytes::from_static(b"jpeg")).await.unwrap_err();
        assert!(matches!(err, RecognitionError::Transport(_)));
    }
}
