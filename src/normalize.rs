// Lenient extraction of a ScanResult from a Gemini reply.
// The model often wraps its JSON in Markdown fences or prose.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::metrics::PARSE_FALLBACKS;
use crate::models::ScanResult;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Gemini response is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Gemini response has no candidates")]
    NoCandidates,

    #[error("Gemini candidate has no content parts")]
    NoParts,

    #[error("Gemini content part has no text")]
    NoText,

    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("Model output is not a valid scan result: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

// Gemini API response format, only the parts we read
#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

// Turns a raw reply body into a result. Never fails.
pub fn scan_result_from_reply(body: &str) -> ScanResult {
    match model_text(body).and_then(|text| parse_scan_json(&text)) {
        Ok(result) => result,
        Err(err) => {
            PARSE_FALLBACKS.inc();
            warn!(error = %err, "Falling back to default scan result");
            ScanResult::fallback(err.to_string())
        }
    }
}

// Text of the first part of the first candidate
pub fn model_text(body: &str) -> Result<String, ShapeError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(ShapeError::Envelope)?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ShapeError::NoCandidates)?;

    let part = candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .ok_or(ShapeError::NoParts)?;

    part.text.ok_or(ShapeError::NoText)
}

pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

// First `{` through last `}`; not a real brace matcher
pub fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_scan_json(text: &str) -> Result<ScanResult, ShapeError> {
    let cleaned = strip_code_fences(text);
    let span = json_object_span(&cleaned).ok_or(ShapeError::NoJsonObject)?;
    serde_json::from_str(span).map_err(ShapeError::InvalidJson)
}
