//! Engine configuration loaded from `findbase.toml`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::Error;
use crate::extract::PropertySet;
use crate::resolver::Strictness;
use crate::trust::{DEFAULT_TRUST, TrustMap};

/// Tunables for the region engine and matcher. Everything has a sensible
/// default; a config file only needs the keys it overrides.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Distinct paths the file cache retains before evicting.
    pub cache_capacity: usize,
    /// Trust weight for partial-fingerprint keys without an override.
    pub default_trust: f32,
    /// How supplied-versus-derived region disagreements surface.
    pub strictness: Strictness,
    /// Per-key trust overrides for partial fingerprints.
    pub trust: BTreeMap<String, f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        return Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            default_trust: DEFAULT_TRUST,
            strictness: Strictness::default(),
            trust: BTreeMap::new(),
        };
    }
}

impl EngineConfig {
    /// Load config from `findbase.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join("findbase.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        return Ok(toml::from_str(&content)?);
    }

    /// Build the trust map this config describes: the default weight plus
    /// partial-fingerprint overrides.
    pub fn trust_map(&self) -> TrustMap {
        let mut map = TrustMap::new(self.default_trust);
        for (key, weight) in &self.trust {
            map.set(PropertySet::PartialFingerprint, key, *weight);
        }
        return map;
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;
    use crate::extract::PropertySet;
    use crate::resolver::Strictness;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.strictness, Strictness::Strict);
        assert!(config.trust.is_empty());
    }

    #[test]
    fn file_overrides_selected_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("findbase.toml"),
            "cache_capacity = 4\nstrictness = \"permissive\"\n\n[trust]\n\"flaky/v1\" = 0.25\n",
        )
        .unwrap();

        let config = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(config.cache_capacity, 4);
        assert_eq!(config.strictness, Strictness::Permissive);

        let trust = config.trust_map();
        assert!((trust.trust(PropertySet::PartialFingerprint, "flaky/v1") - 0.25).abs() < f32::EPSILON);
        assert!((trust.trust(PropertySet::PartialFingerprint, "other") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("findbase.toml"), "cache_capacity = \"lots\"\n").unwrap();
        assert!(EngineConfig::load(dir.path()).is_err());
    }
}
