//! Image reference validator: HTTP(S) URLs and base64 data URIs

use crate::validators::value::is_absent_or_blank;
use crate::validators::*;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, alphabet};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Accepts unpadded payloads and stray trailing bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?:)([/|.|\w|\s|-])*\.(?:jpeg|jpg|gif|png)??(?:&?[^=&]*=[^=&]*)*")
        .expect("image url pattern is valid")
});

static BASE64_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/.*;base64").expect("data uri pattern is valid"));

fn image_mismatch() -> String {
    format!("{}: base64 string or data uri or URL", TYPE_MISMATCH)
}

/// Normalize a base64 data URI
///
/// Returns `None` when the payload is not valid base64. A payload that
/// survives a decode/encode round trip is re-labelled as PNG; anything else
/// is returned untouched.
fn normalize_data_uri(uri: &str) -> Option<String> {
    let (_, payload) = uri.split_once(',')?;
    let decoded = LENIENT.decode(payload).ok()?;
    if STANDARD.encode(decoded) == payload {
        Some(format!("{}{}", PNG_DATA_URI_PREFIX, payload))
    } else {
        Some(uri.to_string())
    }
}

/// Accepts image URLs and base64 image data URIs
pub struct ImageUrlValidator;

impl Validator for ImageUrlValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        _inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let invalid = || {
            ValidationResponse::invalid(
                config.default_or(Value::String(String::new())),
                image_mismatch(),
            )
        };

        if is_absent_or_blank(value) {
            if config.is_required() {
                return invalid();
            }
            return ValidationResponse::valid(value.clone());
        }

        let Value::String(text) = value else {
            return invalid();
        };

        let trimmed = text.trim();
        if IMAGE_URL.is_match(trimmed) {
            return ValidationResponse::valid(Value::String(trimmed.to_string()));
        }

        if BASE64_IMAGE.is_match(text) {
            return match normalize_data_uri(text) {
                Some(normalized) => ValidationResponse::valid(Value::String(normalized)),
                None => {
                    debug!("Data URI payload is not valid base64");
                    invalid()
                }
            };
        }

        invalid()
    }

    fn name(&self) -> &str {
        "image_url"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::ImageUrl
    }
}
