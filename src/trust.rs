//! Trust weights for partially-reliable identity signals.

use std::collections::HashMap;

use crate::extract::PropertySet;

/// Weight assigned to keys with no configured override.
pub const DEFAULT_TRUST: f32 = 1.0;

/// Maps `(property set, key)` to a confidence weight in `[0, 1]`, used to
/// weight partial-fingerprint votes during matching. Read-only while a
/// comparison is in flight; rebuilt per run when tools supply calibration.
#[derive(Debug, Clone)]
pub struct TrustMap {
    default_trust: f32,
    weights: HashMap<(PropertySet, String), f32>,
}

impl Default for TrustMap {
    /// Every key fully trusted.
    fn default() -> Self {
        return Self::new(DEFAULT_TRUST);
    }
}

impl TrustMap {
    /// An empty map with the given default weight, clamped to `[0, 1]`.
    pub fn new(default_trust: f32) -> Self {
        return Self {
            default_trust: default_trust.clamp(0.0, 1.0),
            weights: HashMap::new(),
        };
    }

    /// Set the weight for one key, clamped to `[0, 1]`.
    pub fn set(&mut self, property_set: PropertySet, key: &str, weight: f32) {
        self.weights
            .insert((property_set, key.to_string()), weight.clamp(0.0, 1.0));
    }

    /// The weight for a key; absent keys resolve to the default.
    pub fn trust(&self, property_set: PropertySet, key: &str) -> f32 {
        return self
            .weights
            .get(&(property_set, key.to_string()))
            .copied()
            .unwrap_or(self.default_trust);
    }

    /// The default weight applied to unconfigured keys.
    pub fn default_trust(&self) -> f32 {
        return self.default_trust;
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_TRUST, TrustMap};
    use crate::extract::PropertySet;

    #[test]
    fn unknown_keys_get_the_default() {
        let trust = TrustMap::default();
        assert!((trust.trust(PropertySet::PartialFingerprint, "anything") - DEFAULT_TRUST).abs() < f32::EPSILON);
    }

    #[test]
    fn configured_keys_override_the_default() {
        let mut trust = TrustMap::default();
        trust.set(PropertySet::PartialFingerprint, "flaky/v1", 0.25);
        assert!((trust.trust(PropertySet::PartialFingerprint, "flaky/v1") - 0.25).abs() < f32::EPSILON);
        assert!((trust.trust(PropertySet::Fingerprint, "flaky/v1") - DEFAULT_TRUST).abs() < f32::EPSILON);
    }

    #[test]
    fn weights_clamp_to_the_unit_interval() {
        let mut trust = TrustMap::new(7.0);
        assert!((trust.default_trust() - 1.0).abs() < f32::EPSILON);
        trust.set(PropertySet::PartialFingerprint, "neg", -3.0);
        assert!((trust.trust(PropertySet::PartialFingerprint, "neg") - 0.0).abs() < f32::EPSILON);
    }
}
