//! Inbound request parsing.
//!
//! Parsing is lenient: a malformed, empty or non-object body is treated as
//! an empty mapping and then fails the required-field check.

use serde_json::{Map, Value};

use crate::ise::signing::IseParams;
use crate::ise::types::{IseForm, ProxyError};

pub const DEFAULT_LANGUAGE: &str = "en_us";
pub const DEFAULT_CATEGORY: &str = "read_sentence";

/// A validated assessment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IseRequest {
    /// Base64 audio, exactly as received.
    pub audio: String,
    pub text: String,
    /// `None` when the caller sent an explicit `null`.
    pub language: Option<String>,
    pub category: Option<String>,
}

impl IseRequest {
    /// Parse and validate a raw JSON body.
    pub fn from_json_body(raw: &[u8]) -> Result<Self, ProxyError> {
        let fields: Map<String, Value> = serde_json::from_slice(raw).unwrap_or_default();
        Self::from_fields(&fields)
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, ProxyError> {
        let audio = required_str(fields, "audio").ok_or(ProxyError::MissingFields)?;
        let text = required_str(fields, "text").ok_or(ProxyError::MissingFields)?;

        Ok(Self {
            audio: audio.to_owned(),
            text: text.to_owned(),
            language: optional_str(fields, "language", DEFAULT_LANGUAGE),
            category: optional_str(fields, "category", DEFAULT_CATEGORY),
        })
    }

    /// Parameters carried in the signed `X-Param` header.
    pub fn params(&self) -> IseParams {
        IseParams::nullable(self.language.clone(), self.category.clone())
    }

    /// Form body for the upstream call.
    pub fn into_form(self) -> IseForm {
        IseForm {
            audio: self.audio,
            text: self.text,
        }
    }
}

fn required_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

// Absent and non-string values fall back to the default; null stays null.
fn optional_str(fields: &Map<String, Value>, key: &str, default: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        _ => Some(default.to_owned()),
    }
}
