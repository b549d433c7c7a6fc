use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::{dto::RecognitionResult, RecognitionError};

/// What to do when the classification call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FallbackPolicy {
    /// Answer with [`mock_result`] when the service is unreachable or returns
    /// a non-success status. Malformed success bodies still surface.
    MockPayload,
    /// Surface every failure.
    Surface,
}

impl FromStr for FallbackPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::MockPayload),
            "off" | "none" => Ok(Self::Surface),
            other => anyhow::bail!("unknown recognition fallback '{}', expected 'mock' or 'off'", other),
        }
    }
}

impl FallbackPolicy {
    pub fn apply(
        self,
        outcome: Result<RecognitionResult, RecognitionError>,
        image: &[u8],
    ) -> Result<RecognitionResult, RecognitionError> {
        match (self, outcome) {
            (_, Ok(result)) => Ok(result),
            (
                FallbackPolicy::MockPayload,
                Err(e @ (RecognitionError::Status(_) | RecognitionError::Transport(_))),
            ) => {
                warn!(error = %e, "recognition failed, answering with mock payload");
                Ok(mock_result(image))
            }
            (_, Err(e)) => Err(e),
        }
    }
}

pub fn mock_nutrition() -> Map<String, Value> {
    [
        ("calories", "250"),
        ("carbs", "35g"),
        ("protein", "12g"),
        ("fat", "8g"),
        ("fiber", "4g"),
        ("sugar", "15g"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
    .collect()
}

pub fn mock_result(image: &[u8]) -> RecognitionResult {
    RecognitionResult::new("Food".into(), 0.85, mock_nutrition(), Vec::new(), image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::dto::Classification;

    fn real_result() -> RecognitionResult {
        RecognitionResult::from_classification(Classification::default(), Map::new(), b"img")
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("mock".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::MockPayload);
        assert_eq!("OFF".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Surface);
        assert!("maybe".parse::<FallbackPolicy>().is_err());
    }

    #[test]
    fn success_passes_through() {
        let r = FallbackPolicy::MockPayload.apply(Ok(real_result()), b"img").unwrap();
        assert_eq!(r.category, "Unknown");
    }

    #[test]
    fn status_failure_becomes_mock() {
        let r = FallbackPolicy::MockPayload
            .apply(Err(RecognitionError::Status(reqwest::StatusCode::PAYMENT_REQUIRED)), b"img")
            .unwrap();
        assert_eq!(r.category, "Food");
        assert_eq!(r.probability, 0.85);
        assert_eq!(r.nutrition, mock_nutrition());
        assert!(r.recipes.is_empty());
        assert_eq!(r.image_data, "aW1n");
    }

    #[test]
    fn decode_failure_is_never_masked() {
        let err = FallbackPolicy::MockPayload
            .apply(Err(RecognitionError::Decode("bad".into())), b"img")
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Decode(_)));
    }

    #[test]
    fn surface_policy_keeps_errors() {
        let err = FallbackPolicy::Surface
            .apply(Err(RecognitionError::Status(reqwest::StatusCode::BAD_GATEWAY)), b"img")
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Status(_)));
    }
}
