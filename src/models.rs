use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const FALLBACK_NOTE: &str = "Model returned non-JSON output; please confirm manually.";

// Scan request body as sent by the frontend. Missing or mistyped fields
// are left empty and reported by validation instead of by the extractor.
#[derive(Deserialize, Default, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanRequest {
    pub image_base64: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

// Validated image, lives for a single request
#[derive(Debug, Clone)]
pub struct ImageSubmission {
    pub data: String, // base64 payload without any data-URL prefix
    pub mime_type: ImageMime,
}

// Normalized answer returned to the frontend. Read leniently: missing
// fields get defaults and numbers may arrive as strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(default = "default_detected", deserialize_with = "detected_or_true")]
    pub detected: bool,
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<FoodItem>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "totals_if_object"
    )]
    pub totals: Option<NutritionTotals>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_if_present"
    )]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub parse_error: Option<String>,
}

impl ScanResult {
    // Terminal safety net when the model output cannot be used
    pub fn fallback(parse_error: impl Into<String>) -> Self {
        Self {
            detected: true,
            items: Vec::new(),
            totals: None,
            notes: Some(FALLBACK_NOTE.to_string()),
            parse_error: Some(parse_error.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FoodItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NutritionTotals {
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat: f64,
}

fn default_detected() -> bool {
    true
}

fn detected_or_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(detected) => detected,
        _ => true,
    })
}

// Anything that is not an array becomes empty; entries that are not objects are skipped
fn items_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<FoodItem>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn totals_if_object<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<NutritionTotals>, D::Error> {
    Ok(match Value::deserialize(d)? {
        totals @ Value::Object(_) => serde_json::from_value(totals).ok(),
        _ => None,
    })
}

fn string_if_present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

// Accepts 12, 12.5, "12" and "12 g"; anything else is 0
fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace() || c == '%')
            .parse()
            .unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_detected_defaults_to_true() {
        let result: ScanResult = serde_json::from_value(json!({ "items": [] })).unwrap();
        assert!(result.detected);

        let result: ScanResult = serde_json::from_value(json!({ "detected": false })).unwrap();
        assert!(!result.detected);
    }

    #[test]
    fn non_array_items_become_empty() {
        let result: ScanResult =
            serde_json::from_value(json!({ "detected": true, "items": "rice" })).unwrap();
        assert!(result.items.is_empty());
    }

    #[test]
    fn item_fields_are_read_leniently() {
        let result: ScanResult = serde_json::from_value(json!({
            "items": [
                {
                    "name": "Apple",
                    "quantity": 1,
                    "confidence": "85",
                    "calories": "95 kcal",
                    "protein": 0.5,
                    "carbs": null
                },
                "not an item"
            ],
            "totals": { "calories": 95, "protein": 0.5, "carbs": 25, "fat": 0.3 },
            "notes": "single fruit"
        }))
        .unwrap();

        assert_eq!(result.items.len(), 1);
        let apple = &result.items[0];
        assert_eq!(apple.name, "Apple");
        assert_eq!(apple.quantity, "1");
        assert_eq!(apple.confidence, 85.0);
        assert_eq!(apple.calories, 95.0);
        assert_eq!(apple.carbs, 0.0);
        assert_eq!(apple.fat, 0.0);
        assert_eq!(result.totals.as_ref().map(|t| t.carbs), Some(25.0));
        assert_eq!(result.notes.as_deref(), Some("single fruit"));
        assert_eq!(result.parse_error, None);
    }

    #[test]
    fn fallback_serializes_parse_error_in_camel_case() {
        let body = serde_json::to_value(ScanResult::fallback("boom")).unwrap();
        assert_eq!(
            body,
            json!({
                "detected": true,
                "items": [],
                "notes": FALLBACK_NOTE,
                "parseError": "boom"
            })
        );
    }

    #[test]
    fn only_jpeg_and_png_are_accepted() {
        assert_eq!(ImageMime::parse("image/jpeg"), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::parse("image/png"), Some(ImageMime::Png));
        assert_eq!(ImageMime::parse("image/gif"), None);
        assert_eq!(ImageMime::parse("IMAGE/JPEG"), None);
    }
}
