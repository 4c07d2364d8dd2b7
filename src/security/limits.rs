//! Payload limits.
//!
//! The audio cap is measured on the base64 text as received, not on the
//! decoded bytes. Callers budget for the ~4/3 expansion themselves.

use crate::ise::ProxyError;

/// Maximum accepted length of the `audio` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioLimit {
    /// 0 = unlimited.
    max_bytes: usize,
}

impl AudioLimit {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn max_bytes(&self) -> Option<usize> {
        (self.max_bytes > 0).then_some(self.max_bytes)
    }

    /// Reject `audio` whose UTF-8 length exceeds the limit.
    pub fn check(&self, audio: &str) -> Result<(), ProxyError> {
        match self.max_bytes() {
            Some(limit) if audio.len() > limit => Err(ProxyError::AudioTooLarge {
                len: audio.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary() {
        let limit = AudioLimit::new(8);
        assert!(limit.check("QUJDQUJD").is_ok());
        assert!(limit.check("QUJD").is_ok());
        assert!(matches!(
            limit.check("QUJDQUJDQ"),
            Err(ProxyError::AudioTooLarge { len: 9, limit: 8 })
        ));
    }

    #[test]
    fn test_zero_means_unlimited() {
        let limit = AudioLimit::unlimited();
        assert_eq!(limit.max_bytes(), None);
        assert!(limit.check(&"A".repeat(10_000_000)).is_ok());
    }

    #[test]
    fn test_measures_encoded_bytes() {
        // "é" is two bytes in UTF-8.
        let limit = AudioLimit::new(3);
        assert!(limit.check("éA").is_ok());
        assert!(limit.check("éé").is_err());
    }
}
