use crate::error::ScanError;
use crate::models::{ImageMime, ImageSubmission, ScanRequest};

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const MIME_TYPE_ERROR: &str = "mimeType must be one of: image/jpeg, image/png";
pub const IMAGE_REQUIRED_ERROR: &str = "imageBase64 is required";
pub const IMAGE_TOO_LARGE_ERROR: &str = "Image too large (max 10MB)";

// Removes a leading `data:image/<subtype>;base64,` prefix, if any.
pub fn strip_data_url(image: &str) -> &str {
    let Some(rest) = image.strip_prefix("data:image/") else {
        return image;
    };
    match rest.split_once(";base64,") {
        Some((subtype, payload))
            if !subtype.is_empty()
                && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            payload
        }
        _ => image,
    }
}

// Size of the decoded bytes, estimated without decoding
pub fn estimated_decoded_size(base64: &str) -> usize {
    base64.len() * 3 / 4
}

impl ScanRequest {
    // Checks every field and reports all problems at once.
    pub fn validate(self) -> Result<ImageSubmission, ScanError> {
        let mut errors = Vec::new();

        let mime_type = self.mime_type.as_deref().and_then(ImageMime::parse);
        if mime_type.is_none() {
            errors.push(MIME_TYPE_ERROR.to_string());
        }

        let raw = self.image_base64.unwrap_or_default();
        let data = strip_data_url(&raw);
        if data.is_empty() {
            errors.push(IMAGE_REQUIRED_ERROR.to_string());
        }
        if estimated_decoded_size(data) > MAX_IMAGE_BYTES {
            errors.push(IMAGE_TOO_LARGE_ERROR.to_string());
        }

        match mime_type {
            Some(mime_type) if errors.is_empty() => Ok(ImageSubmission {
                data: data.to_string(),
                mime_type,
            }),
            _ => Err(ScanError::Validation(errors)),
        }
    }
}
