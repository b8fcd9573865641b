//! Runtime configuration for render backend selection and preview caching.

use std::str::FromStr;

/// Environment variable choosing the preferred backend (`gpu` or `cpu`).
pub const BACKEND_ENV: &str = "DARKROOM_BACKEND";
/// Environment variable overriding the preview frame cache capacity.
pub const FRAME_CACHE_ENV: &str = "DARKROOM_FRAME_CACHE";

/// Default number of rendered preview frames kept per source image.
const DEFAULT_FRAME_CACHE: usize = 8;

/// Which backend the application should try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// wgpu compute, falling back to the CPU when unavailable.
    #[default]
    Gpu,
    /// Cached CPU pipeline only.
    Cpu,
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpu" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown backend '{other}', expected 'gpu' or 'cpu'")),
        }
    }
}

/// Runtime configuration for the render crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Preferred backend.
    pub backend: BackendPreference,
    /// Rendered frames kept by each `PreviewRenderer`; 0 disables caching.
    pub frame_cache_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl RenderConfig {
    /// Build a config from an arbitrary variable lookup.
    ///
    /// Unparsable values log a warning and keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend = match lookup(BACKEND_ENV) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("ignoring {BACKEND_ENV}: {e}");
                BackendPreference::default()
            }),
            None => BackendPreference::default(),
        };
        let frame_cache_capacity = match lookup(FRAME_CACHE_ENV) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!("ignoring {FRAME_CACHE_ENV}='{raw}': {e}");
                DEFAULT_FRAME_CACHE
            }),
            None => DEFAULT_FRAME_CACHE,
        };
        Self {
            backend,
            frame_cache_capacity,
        }
    }

    /// CPU-only config, mostly for tests and headless servers.
    pub fn cpu() -> Self {
        Self {
            backend: BackendPreference::Cpu,
            frame_cache_capacity: DEFAULT_FRAME_CACHE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = RenderConfig::from_lookup(|_| None);
        assert_eq!(config.backend, BackendPreference::Gpu);
        assert_eq!(config.frame_cache_capacity, DEFAULT_FRAME_CACHE);
    }

    #[test]
    fn test_reads_overrides() {
        let config = RenderConfig::from_lookup(|key| match key {
            BACKEND_ENV => Some(" CPU ".to_string()),
            FRAME_CACHE_ENV => Some("3".to_string()),
            _ => None,
        });
        assert_eq!(config.backend, BackendPreference::Cpu);
        assert_eq!(config.frame_cache_capacity, 3);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = RenderConfig::from_lookup(|key| match key {
            BACKEND_ENV => Some("vulkan".to_string()),
            FRAME_CACHE_ENV => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config, RenderConfig::from_lookup(|_| None));
    }
}
