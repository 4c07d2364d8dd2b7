//! iFlytek request signing.
//!
//! ```text
//! X-Param    = base64(json({aue, language, category, result_level}))
//! X-CurTime  = unix seconds, decimal
//! X-CheckSum = md5_hex(api_key + X-CurTime + X-Param)
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

pub const AUE_RAW: &str = "raw";
pub const RESULT_LEVEL_COMPLETE: &str = "complete";

/// Application credentials issued by iFlytek.
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
        }
    }
}

// Never print the API key.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Parameters encoded into `X-Param`. Field order is the wire order.
/// `None` encodes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IseParams {
    pub aue: String,
    pub language: Option<String>,
    pub category: Option<String>,
    pub result_level: String,
}

impl IseParams {
    pub fn new(language: &str, category: &str) -> Self {
        Self::nullable(Some(language.to_string()), Some(category.to_string()))
    }

    pub fn nullable(language: Option<String>, category: Option<String>) -> Self {
        Self {
            aue: AUE_RAW.to_string(),
            language,
            category,
            result_level: RESULT_LEVEL_COMPLETE.to_string(),
        }
    }

    /// Base64 of the JSON encoding.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }
}

/// Authentication headers for one upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub app_id: String,
    pub cur_time: String,
    pub param: String,
    pub checksum: String,
}

/// MD5 hex digest of `api_key || cur_time || x_param`.
pub fn checksum(api_key: &str, cur_time: &str, x_param: &str) -> String {
    let mut input = Vec::with_capacity(api_key.len() + cur_time.len() + x_param.len());
    input.extend_from_slice(api_key.as_bytes());
    input.extend_from_slice(cur_time.as_bytes());
    input.extend_from_slice(x_param.as_bytes());
    format!("{:x}", md5::compute(input))
}

/// Build the signed headers for `params` at `cur_time` (unix seconds).
pub fn sign(
    credentials: &Credentials,
    params: &IseParams,
    cur_time: u64,
) -> Result<SignedHeaders, serde_json::Error> {
    let param = params.encode()?;
    let cur_time = cur_time.to_string();
    let checksum = checksum(&credentials.api_key, &cur_time, &param);

    Ok(SignedHeaders {
        app_id: credentials.app_id.clone(),
        cur_time,
        param,
        checksum,
    })
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_PARAM: &str = "eyJhdWUiOiJyYXciLCJsYW5ndWFnZSI6ImVuX3VzIiwiY2F0ZWdvcnkiOiJyZWFkX3NlbnRlbmNlIiwicmVzdWx0X2xldmVsIjoiY29tcGxldGUifQ==";

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            checksum("test-api-key", "1700000000", "abc"),
            "aee83ac4e176779018fdd9c3971ce19a"
        );
    }

    #[test]
    fn test_checksum_is_deterministic_and_sensitive() {
        let a = checksum("key", "1700000000", DEFAULT_PARAM);
        assert_eq!(a, checksum("key", "1700000000", DEFAULT_PARAM));
        assert_eq!(a.len(), 32);

        assert_ne!(a, checksum("kez", "1700000000", DEFAULT_PARAM));
        assert_ne!(a, checksum("key", "1700000001", DEFAULT_PARAM));
        assert_ne!(a, checksum("key", "1700000000", &DEFAULT_PARAM.replace('e', "f")));
        assert_eq!(
            checksum("test-api-key", "1700000001", "abc"),
            "e206557a21caa6ff2fcf6048760caac1"
        );
    }

    #[test]
    fn test_default_param_encoding() {
        let params = IseParams::new("en_us", "read_sentence");
        assert_eq!(params.encode().unwrap(), DEFAULT_PARAM);
    }

    #[test]
    fn test_param_round_trip() {
        let encoded = IseParams::new("zh_cn", "read_chapter").encode().unwrap();
        let decoded: serde_json::Value =
            serde_json::from_slice(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(
            decoded,
            serde_json::json!({
                "aue": "raw",
                "language": "zh_cn",
                "category": "read_chapter",
                "result_level": "complete"
            })
        );
    }

    #[test]
    fn test_sign() {
        let creds = Credentials::new("app-123", "test-api-key");
        let signed = sign(&creds, &IseParams::new("en_us", "read_sentence"), 1_700_000_000).unwrap();

        assert_eq!(signed.app_id, "app-123");
        assert_eq!(signed.cur_time, "1700000000");
        assert_eq!(signed.param, DEFAULT_PARAM);
        assert_eq!(
            signed.checksum,
            checksum("test-api-key", "1700000000", DEFAULT_PARAM)
        );
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = Credentials::new("app", "super-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("app"));
        assert!(!printed.contains("super-secret"));
    }
}
