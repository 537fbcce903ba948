//! The findings record model: the fields the matcher and region resolver
//! read. The full log format belongs to the producing tools; this model
//! deliberately carries only what the core consumes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::region::Region;

/// One analysis run: the tool's rule metadata plus its findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Run {
    /// The findings this run produced.
    pub findings: Vec<Finding>,
    /// Rule metadata, including message templates.
    pub rules: Vec<Rule>,
    /// Name of the producing tool, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl Run {
    /// Parse a run from JSON content.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the content is not a valid run.
    pub fn parse(content: &str) -> Result<Self, Error> {
        return Ok(serde_json::from_str(content)?);
    }

    /// Read and parse a run from a JSON log on disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the log doesn't exist,
    /// `Error::Io` for other read failures,
    /// or `Error::InvalidLog` if the content cannot be decoded.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content).map_err(|e| {
            return Error::InvalidLog {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
        });
    }

    /// Look up a rule by identifier.
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        return self.rules.iter().find(|rule| return rule.id == id);
    }
}

/// Rule metadata. Message templates are keyed by template id and may contain
/// `{0}`-style placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rule {
    /// Rule identifier, e.g. `CA2101`.
    pub id: String,
    /// Message templates keyed by template id.
    pub message_templates: BTreeMap<String, String>,
}

/// One reported finding: a rule violation at one or more locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Finding {
    /// Exact fingerprints: authoritative identity strings, keyed by scheme.
    pub fingerprints: BTreeMap<String, String>,
    /// Per-run identifier. Tools often regenerate these between runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Locations the violation was observed at; the first is primary.
    pub locations: Vec<Location>,
    /// The finding's message, literal or template-addressed.
    pub message: Message,
    /// Partial fingerprints: individually unreliable identity signals.
    pub partial_fingerprints: BTreeMap<String, String>,
    /// Free-form tool properties.
    pub properties: BTreeMap<String, serde_json::Value>,
    /// Identifier of the violated rule.
    pub rule_id: String,
}

impl Finding {
    /// The region of the first location, if any.
    pub fn first_region(&self) -> Option<&Region> {
        return self.locations.first().and_then(|loc| return loc.region.as_ref());
    }

    /// The first non-empty snippet across all locations.
    pub fn first_snippet(&self) -> Option<&str> {
        return self
            .locations
            .iter()
            .filter_map(|loc| return loc.region.as_ref())
            .filter_map(|region| return region.snippet.as_deref())
            .find(|snippet| return !snippet.is_empty());
    }

    /// Render the finding's message: the literal text when present,
    /// otherwise the rule template named by the message id with `{0}`-style
    /// placeholders substituted from the arguments. Placeholders without a
    /// corresponding argument are left in place.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded placeholder regex is invalid (compile-time
    /// invariant).
    pub fn rendered_message(&self, run: &Run) -> Option<String> {
        if let Some(text) = &self.message.text {
            return Some(text.clone());
        }
        let template_id = self.message.id.as_deref()?;
        let template = run.rule(&self.rule_id)?.message_templates.get(template_id)?;

        let pattern = Regex::new(r"\{(\d+)\}").expect("valid regex");
        let rendered = pattern.replace_all(template, |caps: &regex::Captures<'_>| {
            let index: usize = caps[1].parse().unwrap_or(usize::MAX);
            return match self.message.arguments.get(index) {
                Some(argument) => argument.clone(),
                None => caps[0].to_string(),
            };
        });
        return Some(rendered.into_owned());
    }
}

/// Where a finding was observed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    /// Path of the artifact containing the violation.
    pub path: PathBuf,
    /// The region within the artifact, possibly partially specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

/// A finding message: literal text, or a template reference plus arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    /// Arguments substituted into template placeholders.
    pub arguments: Vec<String>,
    /// Template id, resolved against the rule's message templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Literal message text. Takes precedence over the template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Finding, Location, Message, Rule, Run};
    use crate::region::Region;
    use std::collections::BTreeMap;

    fn run_with_template(template: &str) -> Run {
        let mut message_templates = BTreeMap::new();
        message_templates.insert("default".to_string(), template.to_string());
        Run {
            rules: vec![Rule {
                id: "R001".to_string(),
                message_templates,
            }],
            ..Run::default()
        }
    }

    fn template_finding(arguments: &[&str]) -> Finding {
        Finding {
            message: Message {
                arguments: arguments.iter().map(|a| a.to_string()).collect(),
                id: Some("default".to_string()),
                ..Message::default()
            },
            rule_id: "R001".to_string(),
            ..Finding::default()
        }
    }

    #[test]
    fn literal_text_takes_precedence() {
        let run = run_with_template("unused");
        let mut finding = template_finding(&[]);
        finding.message.text = Some("literal".to_string());
        assert_eq!(finding.rendered_message(&run).as_deref(), Some("literal"));
    }

    #[test]
    fn template_substitutes_indexed_arguments() {
        let run = run_with_template("variable '{0}' shadows '{1}'");
        let finding = template_finding(&["x", "y"]);
        assert_eq!(
            finding.rendered_message(&run).as_deref(),
            Some("variable 'x' shadows 'y'")
        );
    }

    #[test]
    fn missing_argument_leaves_placeholder() {
        let run = run_with_template("saw {0} and {3}");
        let finding = template_finding(&["x"]);
        assert_eq!(finding.rendered_message(&run).as_deref(), Some("saw x and {3}"));
    }

    #[test]
    fn unknown_rule_or_template_renders_nothing() {
        let run = Run::default();
        let finding = template_finding(&[]);
        assert_eq!(finding.rendered_message(&run), None);
    }

    #[test]
    fn first_snippet_skips_empty_snippets() {
        let empty = Region { snippet: Some(String::new()), ..Region::default() };
        let populated = Region {
            snippet: Some("let x = 1;".to_string()),
            ..Region::default()
        };

        let finding = Finding {
            locations: vec![
                Location { path: "a.rs".into(), region: Some(empty) },
                Location { path: "a.rs".into(), region: Some(populated) },
            ],
            ..Finding::default()
        };
        assert_eq!(finding.first_snippet(), Some("let x = 1;"));
    }

    #[test]
    fn run_json_round_trips() {
        let json = r#"{
            "tool": "findbase-test",
            "rules": [{"id": "R001", "messageTemplates": {"default": "bad {0}"}}],
            "findings": [{
                "ruleId": "R001",
                "message": {"id": "default", "arguments": ["call"]},
                "fingerprints": {"v1": "abc"},
                "partialFingerprints": {"contextHash/v1": "def"},
                "locations": [{"path": "src/lib.rs", "region": {"charOffset": 6, "charLength": 5}}]
            }]
        }"#;
        let run = Run::parse(json).unwrap();
        assert_eq!(run.findings.len(), 1);
        let finding = &run.findings[0];
        assert_eq!(finding.rendered_message(&run).as_deref(), Some("bad call"));
        assert_eq!(finding.first_region().unwrap().char_offset, Some(6));

        let back = Run::parse(&serde_json::to_string(&run).unwrap()).unwrap();
        assert_eq!(back.findings[0].fingerprints.get("v1").map(String::as_str), Some("abc"));
    }
}
