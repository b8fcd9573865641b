//! Export configuration.

/// Environment variable overriding the default JPEG quality.
pub const JPEG_QUALITY_ENV: &str = "DARKROOM_JPEG_QUALITY";

/// JPEG quality used when a request does not specify one.
const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// 1..=100.
    pub default_jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ExportConfig {
    /// Build a config from an arbitrary variable lookup. Values that do not
    /// parse or fall outside 1..=100 log a warning and keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_jpeg_quality = match lookup(JPEG_QUALITY_ENV) {
            Some(raw) => match raw.trim().parse::<u8>() {
                Ok(q) if (1..=100).contains(&q) => q,
                _ => {
                    tracing::warn!("ignoring {JPEG_QUALITY_ENV}='{raw}', expected 1..=100");
                    DEFAULT_JPEG_QUALITY
                }
            },
            None => DEFAULT_JPEG_QUALITY,
        };
        Self {
            default_jpeg_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quality() {
        assert_eq!(ExportConfig::from_lookup(|_| None).default_jpeg_quality, 95);
    }

    #[test]
    fn test_quality_override() {
        let config = ExportConfig::from_lookup(|_| Some("80".to_string()));
        assert_eq!(config.default_jpeg_quality, 80);
    }

    #[test]
    fn test_out_of_range_quality_ignored() {
        for raw in ["0", "101", "high"] {
            let config = ExportConfig::from_lookup(|_| Some(raw.to_string()));
            assert_eq!(config.default_jpeg_quality, 95, "value {raw}");
        }
    }
}
