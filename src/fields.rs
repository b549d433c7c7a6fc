use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field that is normally a string. Other JSON values are kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreeText {
    Text(String),
    Other(Value),
}

impl FreeText {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FreeText::Text(s) => Some(s),
            FreeText::Other(_) => None,
        }
    }
}

impl From<&str> for FreeText {
    fn from(s: &str) -> Self {
        FreeText::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_and_other_values_both_parse() {
        let t: FreeText = serde_json::from_value(json!("kg")).unwrap();
        assert_eq!(t.as_str(), Some("kg"));

        let o: FreeText = serde_json::from_value(json!({ "name": "pizza" })).unwrap();
        assert!(o.as_str().is_none());
        assert_eq!(serde_json::to_value(&o).unwrap(), json!({ "name": "pizza" }));
    }
}
