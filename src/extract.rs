//! Identity component extraction: decompose one finding into an ordered
//! sequence of named, typed identity facts for comparison and display.

use std::collections::BTreeMap;

use crate::model::{Finding, Run};
use crate::region::Region;

/// Which family of identity signal a component belongs to. Trust weights are
/// keyed by `(PropertySet, key)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertySet {
    /// Intrinsic finding facts: identifier, message, snippet.
    Base,
    /// An exact fingerprint entry. Authoritative when comparable.
    Fingerprint,
    /// A partial fingerprint entry. Individually unreliable.
    PartialFingerprint,
    /// A free-form tool property.
    Property,
}

/// One extracted identity fact. Immutable value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatComponent {
    /// Name of the fact within its property set.
    pub key: String,
    /// Which location of the finding the fact describes, or empty for
    /// location-nonspecific facts.
    pub location_specifier: String,
    /// Family of identity signal.
    pub property_set: PropertySet,
    /// Rule the owning finding violated.
    pub rule_id: String,
    /// The fact's value.
    pub value: String,
}

/// Borrowed view over one finding and the run that produced it. Constructed
/// fresh per comparison; owns nothing.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedFinding<'a> {
    finding: &'a Finding,
    run: &'a Run,
}

impl<'a> ExtractedFinding<'a> {
    /// View `finding` in the context of its owning `run`.
    pub fn new(run: &'a Run, finding: &'a Finding) -> Self {
        return Self { finding, run };
    }

    /// The finding's per-run identifier, if any.
    pub fn identifier(&self) -> Option<&'a str> {
        return self.finding.id.as_deref();
    }

    /// Identifier of the violated rule.
    pub fn rule_id(&self) -> &'a str {
        return &self.finding.rule_id;
    }

    /// The rendered message (literal or template-substituted).
    pub fn rendered_message(&self) -> Option<String> {
        return self.finding.rendered_message(self.run);
    }

    /// Exact fingerprints keyed by scheme.
    pub fn fingerprints(&self) -> &'a BTreeMap<String, String> {
        return &self.finding.fingerprints;
    }

    /// Partial fingerprints keyed by scheme.
    pub fn partial_fingerprints(&self) -> &'a BTreeMap<String, String> {
        return &self.finding.partial_fingerprints;
    }

    /// Free-form tool properties.
    pub fn properties(&self) -> &'a BTreeMap<String, serde_json::Value> {
        return &self.finding.properties;
    }

    /// The first location's region.
    pub fn first_region(&self) -> Option<&'a Region> {
        return self.finding.first_region();
    }

    /// The first non-empty snippet across the finding's locations.
    pub fn first_snippet(&self) -> Option<&'a str> {
        return self.finding.first_snippet();
    }
}

/// Decompose a finding into its identity components, in a fixed order:
/// identifier, rendered message, exact fingerprints, partial fingerprints,
/// first snippet, free-form properties. Each component appears only when the
/// underlying field is non-empty. The order matters for reproducible
/// display output, not for matching. A `None` finding yields no components.
pub fn extract(
    result: Option<&ExtractedFinding<'_>>,
    location_specifier: &str,
) -> Vec<WhatComponent> {
    let Some(result) = result else {
        return Vec::new();
    };

    let mut components = Vec::new();
    let component = |property_set: PropertySet, key: &str, value: String| {
        return WhatComponent {
            key: key.to_string(),
            location_specifier: location_specifier.to_string(),
            property_set,
            rule_id: result.rule_id().to_string(),
            value,
        };
    };

    if let Some(id) = result.identifier() {
        components.push(component(PropertySet::Base, "Id", id.to_string()));
    }

    if let Some(message) = result.rendered_message()
        && !message.is_empty()
    {
        components.push(component(PropertySet::Base, "Message", message));
    }

    for (key, value) in result.fingerprints() {
        components.push(component(PropertySet::Fingerprint, key, value.clone()));
    }

    for (key, value) in result.partial_fingerprints() {
        components.push(component(PropertySet::PartialFingerprint, key, value.clone()));
    }

    if let Some(snippet) = result.first_snippet() {
        components.push(component(
            PropertySet::Base,
            "Location.Snippet",
            snippet.to_string(),
        ));
    }

    for (key, value) in result.properties() {
        components.push(component(PropertySet::Property, key, value.to_string()));
    }

    return components;
}
