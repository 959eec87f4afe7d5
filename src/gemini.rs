// Gemini generateContent client, returns the raw reply body

use std::time::Instant;

use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ScanError;
use crate::metrics::UPSTREAM_LATENCY;
use crate::models::ImageSubmission;

pub const SCAN_PROMPT: &str = r#"You are a nutrition assistant. Identify every food or drink visible in this photo and estimate its nutrition.

Respond with ONLY a JSON object, no prose and no Markdown, using exactly this schema:
{
  "detected": boolean,            // false when the photo contains no food
  "items": [
    {
      "name": string,             // common name of the food
      "quantity": string,         // estimated portion, e.g. "1 cup" or "150 g"
      "confidence": number,       // 0-100, how sure you are about this item
      "calories": number,         // kcal
      "protein": number,          // grams
      "carbs": number,            // grams
      "fat": number               // grams
    }
  ],
  "totals": { "calories": number, "protein": number, "carbs": number, "fat": number },
  "notes": string                 // short caveats about the estimate
}

If no food is visible return {"detected": false, "items": [], "totals": {"calories": 0, "protein": 0, "carbs": 0, "fat": 0}, "notes": "No food detected"}."#;

// Fixed generation parameters
pub const TEMPERATURE: f64 = 0.4;
pub const TOP_K: u32 = 32;
pub const TOP_P: f64 = 1.0;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

// Gemini API request format
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InlineData<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn for_image(image: &'a ImageSubmission) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: SCAN_PROMPT },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.as_str(),
                            data: &image.data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Secret<String>,
}

impl GeminiClient {
    pub fn new(http: Client, base_url: &str, model: &str, api_key: Secret<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    // The credential travels as the `key` query parameter
    fn endpoint(&self) -> Result<Url, ScanError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&url, &[("key", self.api_key.expose_secret().as_str())])
            .map_err(|e| ScanError::Internal(format!("invalid Gemini endpoint: {e}")))
    }

    // Calls the model once and returns the reply body on a 2xx status.
    pub async fn generate(&self, image: &ImageSubmission) -> Result<String, ScanError> {
        let request = GenerateContentRequest::for_image(image);
        let start_time = Instant::now();

        debug!(
            model = %self.model,
            mime_type = image.mime_type.as_str(),
            payload_len = image.data.len(),
            "Sending image to Gemini"
        );

        let response = self
            .http
            .post(self.endpoint()?)
            .json(&request)
            .send()
            .await
            .map_err(ScanError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ScanError::from_transport);
        UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

        if !status.is_success() {
            return Err(ScanError::upstream(status.as_u16(), &body.unwrap_or_default()));
        }

        let body = body?;
        info!(
            model = %self.model,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Gemini replied"
        );
        Ok(body)
    }
}
