//! Nutrition values as clients send them, and the daily totals fold.
//!
//! Quantities arrive as free text ("25g", "95", "1.3g") or bare JSON numbers.
//! [`parse_quantity`] is the single place that turns text into a number.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

lazy_static! {
    static ref NON_DIGIT_RE: Regex = Regex::new(r"[^0-9]").unwrap();
}

/// Best-effort integer extraction from free text.
///
/// Every character that is not an ASCII digit is dropped and the remaining
/// digits are read as one integer. Decimal points are dropped too, so
/// `"1.3g"` reads as 13, not 1. Text with no digits reads as 0, and values
/// too large for `i64` saturate.
pub fn parse_quantity(raw: &str) -> i64 {
    let digits = NON_DIGIT_RE.replace_all(raw, "");
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().unwrap_or(i64::MAX)
}

/// A single nutrient amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(Number),
    Text(String),
    Other(Value),
}

impl Quantity {
    /// Integer amount: text goes through [`parse_quantity`], fractional
    /// numbers are truncated toward zero, anything else counts as 0.
    pub fn amount(&self) -> i64 {
        match self {
            Quantity::Text(s) => parse_quantity(s),
            Quantity::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i
                } else if n.as_u64().is_some() {
                    i64::MAX
                } else {
                    // `as` saturates and maps NaN to 0
                    n.as_f64().map(|f| f.trunc() as i64).unwrap_or(0)
                }
            }
            Quantity::Other(_) => 0,
        }
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity::Text(s.to_string())
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Quantity::Number(n.into())
    }
}

impl From<f64> for Quantity {
    fn from(f: f64) -> Self {
        match Number::from_f64(f) {
            Some(n) => Quantity::Number(n),
            None => Quantity::Other(Value::Null),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<Quantity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `nutrition` field of a food entry: an object of quantities, or
/// anything else the client sent, stored untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutritionField {
    Facts(NutritionFacts),
    Unstructured(Value),
}

impl NutritionField {
    pub fn facts(&self) -> Option<&NutritionFacts> {
        match self {
            NutritionField::Facts(f) => Some(f),
            NutritionField::Unstructured(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NutrientTotals {
    pub total_calories: i64,
    pub total_carbs: i64,
    pub total_protein: i64,
    pub total_fat: i64,
    pub total_fiber: i64,
}

impl NutrientTotals {
    pub fn add(&mut self, facts: &NutritionFacts) {
        fn amount(q: &Option<Quantity>) -> i64 {
            q.as_ref().map(Quantity::amount).unwrap_or(0)
        }
        self.total_calories = self.total_calories.saturating_add(amount(&facts.calories));
        self.total_carbs = self.total_carbs.saturating_add(amount(&facts.carbs));
        self.total_protein = self.total_protein.saturating_add(amount(&facts.protein));
        self.total_fat = self.total_fat.saturating_add(amount(&facts.fat));
        self.total_fiber = self.total_fiber.saturating_add(amount(&facts.fiber));
    }
}

/// Sums the nutrition of every entry; entries without structured facts add nothing.
pub fn sum_nutrients<'a, I>(fields: I) -> NutrientTotals
where
    I: IntoIterator<Item = Option<&'a NutritionField>>,
{
    let mut totals = NutrientTotals::default();
    for facts in fields.into_iter().flatten().filter_map(NutritionField::facts) {
        totals.add(facts);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(v: Value) -> NutritionField {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn parse_quantity_strips_non_digits() {
        assert_eq!(parse_quantity("25g"), 25);
        assert_eq!(parse_quantity("95"), 95);
        assert_eq!(parse_quantity(" 1,200 kcal"), 1200);
        assert_eq!(parse_quantity("-5g"), 5);
    }

    #[test]
    fn parse_quantity_drops_decimal_point() {
        assert_eq!(parse_quantity("1.3g"), 13);
        assert_eq!(parse_quantity("0.5g"), 5);
        assert_eq!(parse_quantity("0.3g"), 3);
    }

    #[test]
    fn parse_quantity_without_digits_is_zero() {
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("g"), 0);
        assert_eq!(parse_quantity("n/a"), 0);
    }

    #[test]
    fn parse_quantity_saturates() {
        assert_eq!(parse_quantity("99999999999999999999999g"), i64::MAX);
    }

    #[test]
    fn numeric_quantities() {
        assert_eq!(Quantity::Number(95.into()).amount(), 95);
        assert_eq!(Quantity::Number(Number::from_f64(12.7).unwrap()).amount(), 12);
        assert_eq!(Quantity::Number(Number::from_f64(-2.9).unwrap()).amount(), -2);
        assert_eq!(Quantity::Number(u64::MAX.into()).amount(), i64::MAX);
        assert_eq!(Quantity::Other(json!(true)).amount(), 0);
    }

    #[test]
    fn nutrition_field_shapes() {
        let f = field(json!({ "calories": "250", "protein": 12, "sodium": "5mg" }));
        let facts = f.facts().unwrap();
        assert_eq!(facts.calories, Some("250".into()));
        assert_eq!(facts.protein, Some(Quantity::Number(12.into())));
        assert_eq!(facts.extra.get("sodium"), Some(&json!("5mg")));

        assert!(field(json!("lots")).facts().is_none());
        assert!(field(json!([1, 2])).facts().is_none());
    }

    #[test]
    fn facts_keep_unknown_keys_on_serialize() {
        let f = field(json!({ "calories": "250", "bad": [{ "title": "Sugar" }] }));
        let back = serde_json::to_value(&f).unwrap();
        assert_eq!(back, json!({ "calories": "250", "bad": [{ "title": "Sugar" }] }));
    }

    #[test]
    fn sums_calories() {
        let a = field(json!({ "calories": "105" }));
        let b = field(json!({ "calories": "350" }));
        let totals = sum_nutrients([Some(&a), Some(&b)]);
        assert_eq!(totals.total_calories, 455);
    }

    #[test]
    fn sums_protein_with_truncated_decimals() {
        assert_eq!(parse_quantity("1.3g"), 13);
        let a = field(json!({ "protein": "1.3g" }));
        let b = field(json!({ "protein": "35g" }));
        let totals = sum_nutrients([Some(&a), Some(&b)]);
        assert_eq!(totals.total_protein, 48);
    }

    #[test]
    fn missing_and_unstructured_nutrition_add_nothing() {
        let full = field(json!({
            "calories": "95", "carbs": "25g", "protein": "0.5g", "fat": "0.3g", "fiber": "4g"
        }));
        let junk = field(json!("unknown"));
        let nulls = field(json!({ "calories": null }));
        let totals = sum_nutrients([Some(&full), Some(&junk), Some(&nulls), None]);
        assert_eq!(
            totals,
            NutrientTotals {
                total_calories: 95,
                total_carbs: 25,
                total_protein: 5,
                total_fat: 3,
                total_fiber: 4,
            }
        );
    }
}
