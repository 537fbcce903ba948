//! Pairwise finding identity: do two findings from different runs describe
//! the same underlying issue?
//!
//! The decision runs in tiers of decreasing confidence, each short-circuiting
//! the rest. Absent signals never fail a comparison; they advance it to the
//! next tier. The only hard non-match is a contradiction between exact
//! fingerprints, which are authoritative when comparable.

use crate::extract::{ExtractedFinding, PropertySet};
use crate::trust::TrustMap;

/// Placeholder substituted for the start line in canonicalized messages.
const START_LINE_MARK: &str = "~SL~";
/// Placeholder substituted for the start column in canonicalized messages.
const START_COLUMN_MARK: &str = "~SC~";
/// Placeholder substituted for the end line in canonicalized messages.
const END_LINE_MARK: &str = "~EL~";
/// Placeholder substituted for the end column in canonicalized messages.
const END_COLUMN_MARK: &str = "~EC~";

/// Whether two findings represent the same underlying issue.
///
/// Tiers, in order:
///
/// 1. Equal non-null identifiers match. Differing identifiers are
///    *inconclusive*, because tools routinely regenerate them per run.
/// 2. Exact fingerprints: over keys present in both maps, any equal value
///    matches; comparable keys with no equal value force a non-match.
/// 3. Partial fingerprints: votes over shared keys, weighted by trust.
///    When any weight was comparable, the verdict is whether at least half
///    the comparable weight matched.
/// 4. Fallback: canonicalized messages and first snippets must both agree.
///
/// Never panics and never returns an error; missing data simply advances
/// through the tiers. `None` on either side is no match.
pub fn matches(
    left: Option<&ExtractedFinding<'_>>,
    right: Option<&ExtractedFinding<'_>>,
    trust: &TrustMap,
) -> bool {
    let (Some(left), Some(right)) = (left, right) else {
        return false;
    };

    // Identifier tier.
    if let Some(left_id) = left.identifier()
        && Some(left_id) == right.identifier()
    {
        return true;
    }

    // Exact-fingerprint tier. Any shared key with an equal value is a
    // match; shared keys with only unequal values are a contradiction.
    let mut comparable_fingerprints = 0_usize;
    for (key, left_value) in left.fingerprints() {
        if let Some(right_value) = right.fingerprints().get(key) {
            comparable_fingerprints = comparable_fingerprints.saturating_add(1);
            if left_value == right_value {
                return true;
            }
        }
    }
    if comparable_fingerprints > 0 {
        return false;
    }

    // Partial-fingerprint tier: trust-weighted vote over shared keys.
    let mut comparable_weight = 0.0_f32;
    let mut matched_weight = 0.0_f32;
    for (key, left_value) in left.partial_fingerprints() {
        if let Some(right_value) = right.partial_fingerprints().get(key) {
            let weight = trust.trust(PropertySet::PartialFingerprint, key);
            comparable_weight += weight;
            if left_value == right_value {
                matched_weight += weight;
            }
        }
    }
    if comparable_weight > 0.0 {
        return matched_weight * 2.0 >= comparable_weight;
    }

    // Fallback tier: canonicalized message plus first snippet.
    return canonicalized_message(left) == canonicalized_message(right)
        && left.first_snippet() == right.first_snippet();
}

/// The rendered message with the first location's line and column numbers
/// replaced by fixed placeholders, so ordinary line-number drift between
/// runs doesn't defeat the fallback comparison.
fn canonicalized_message(result: &ExtractedFinding<'_>) -> Option<String> {
    let mut message = result.rendered_message()?;
    let Some(region) = result.first_region() else {
        return Some(message);
    };

    let substitutions = [
        (region.start_line, START_LINE_MARK),
        (region.start_column, START_COLUMN_MARK),
        (region.end_line, END_LINE_MARK),
        (region.end_column, END_COLUMN_MARK),
    ];
    for (value, mark) in substitutions {
        if let Some(value) = value {
            message = message.replace(&value.to_string(), mark);
        }
    }
    return Some(message);
}

#[cfg(test)]
mod tests {
    use super::matches;
    use crate::extract::{ExtractedFinding, PropertySet};
    use crate::model::{Finding, Location, Message, Run};
    use crate::region::Region;
    use crate::trust::TrustMap;

    fn finding(build: impl FnOnce(&mut Finding)) -> Finding {
        let mut finding = Finding {
            rule_id: "R001".to_string(),
            ..Finding::default()
        };
        build(&mut finding);
        finding
    }

    fn check(left: &Finding, right: &Finding, trust: &TrustMap) -> bool {
        let run = Run::default();
        matches(
            Some(&ExtractedFinding::new(&run, left)),
            Some(&ExtractedFinding::new(&run, right)),
            trust,
        )
    }

    #[test]
    fn equal_identifiers_match_regardless_of_everything_else() {
        let left = finding(|f| {
            f.id = Some("guid-1".to_string());
            f.fingerprints.insert("v1".to_string(), "aaa".to_string());
        });
        let right = finding(|f| {
            f.id = Some("guid-1".to_string());
            f.fingerprints.insert("v1".to_string(), "bbb".to_string());
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn differing_identifiers_are_inconclusive_not_fatal() {
        let left = finding(|f| {
            f.id = Some("guid-1".to_string());
            f.fingerprints.insert("v1".to_string(), "same".to_string());
        });
        let right = finding(|f| {
            f.id = Some("guid-2".to_string());
            f.fingerprints.insert("v1".to_string(), "same".to_string());
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn any_equal_exact_fingerprint_matches() {
        let left = finding(|f| {
            f.fingerprints.insert("v1".to_string(), "differs".to_string());
            f.fingerprints.insert("v2".to_string(), "same".to_string());
        });
        let right = finding(|f| {
            f.fingerprints.insert("v1".to_string(), "other".to_string());
            f.fingerprints.insert("v2".to_string(), "same".to_string());
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn contradicting_exact_fingerprints_force_non_match() {
        // Even though the partial fingerprints agree completely.
        let left = finding(|f| {
            f.fingerprints.insert("v1".to_string(), "aaa".to_string());
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        let right = finding(|f| {
            f.fingerprints.insert("v1".to_string(), "bbb".to_string());
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        assert!(!check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn disjoint_exact_fingerprint_keys_are_inconclusive() {
        let left = finding(|f| {
            f.fingerprints.insert("v1".to_string(), "aaa".to_string());
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        let right = finding(|f| {
            f.fingerprints.insert("v2".to_string(), "bbb".to_string());
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn empty_exact_map_falls_through_to_partial_fingerprints() {
        let left = finding(|f| {
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        let right = finding(|f| {
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn at_least_half_of_comparable_weight_must_match() {
        let left = finding(|f| {
            f.partial_fingerprints.insert("a".to_string(), "1".to_string());
            f.partial_fingerprints.insert("b".to_string(), "2".to_string());
            f.partial_fingerprints.insert("c".to_string(), "3".to_string());
        });

        // One of three fully-trusted keys agreeing is below half: no match.
        let right_one_third = finding(|f| {
            f.partial_fingerprints.insert("a".to_string(), "other".to_string());
            f.partial_fingerprints.insert("b".to_string(), "2".to_string());
            f.partial_fingerprints.insert("c".to_string(), "other".to_string());
        });
        assert!(!check(&left, &right_one_third, &TrustMap::default()));

        // All keys agreeing is a match.
        let right_agreeing = finding(|f| {
            f.partial_fingerprints.insert("a".to_string(), "1".to_string());
            f.partial_fingerprints.insert("b".to_string(), "2".to_string());
            f.partial_fingerprints.insert("c".to_string(), "3".to_string());
        });
        assert!(check(&left, &right_agreeing, &TrustMap::default()));
    }

    #[test]
    fn exactly_half_of_comparable_weight_matches() {
        let left = finding(|f| {
            f.partial_fingerprints.insert("a".to_string(), "1".to_string());
            f.partial_fingerprints.insert("b".to_string(), "2".to_string());
        });
        let right = finding(|f| {
            f.partial_fingerprints.insert("a".to_string(), "other".to_string());
            f.partial_fingerprints.insert("b".to_string(), "2".to_string());
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn trust_weights_tip_the_partial_vote() {
        let left = finding(|f| {
            f.partial_fingerprints.insert("stable".to_string(), "same".to_string());
            f.partial_fingerprints.insert("flaky".to_string(), "left".to_string());
        });
        let right = finding(|f| {
            f.partial_fingerprints.insert("stable".to_string(), "same".to_string());
            f.partial_fingerprints.insert("flaky".to_string(), "right".to_string());
        });

        // Fully trusted keys split the vote evenly: half matched, match.
        assert!(check(&left, &right, &TrustMap::default()));

        // Distrusting the stable key flips the verdict.
        let mut trust = TrustMap::default();
        trust.set(PropertySet::PartialFingerprint, "stable", 0.1);
        assert!(!check(&left, &right, &trust));
    }

    #[test]
    fn partial_verdict_preempts_the_fallback_tier() {
        // Messages agree, but the partial vote already decided non-match.
        let left = finding(|f| {
            f.message.text = Some("same message".to_string());
            f.partial_fingerprints.insert("hash".to_string(), "X".to_string());
        });
        let right = finding(|f| {
            f.message.text = Some("same message".to_string());
            f.partial_fingerprints.insert("hash".to_string(), "Y".to_string());
        });
        assert!(!check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn fallback_canonicalizes_line_numbers_in_messages() {
        let left = finding(|f| {
            f.message.text = Some("unused variable at line 12".to_string());
            f.locations.push(Location {
                path: "a.rs".into(),
                region: Some(Region {
                    snippet: Some("let unused = 1;".to_string()),
                    start_line: Some(12),
                    ..Region::default()
                }),
            });
        });
        let right = finding(|f| {
            f.message.text = Some("unused variable at line 97".to_string());
            f.locations.push(Location {
                path: "a.rs".into(),
                region: Some(Region {
                    snippet: Some("let unused = 1;".to_string()),
                    start_line: Some(97),
                    ..Region::default()
                }),
            });
        });
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn fallback_requires_snippets_to_agree() {
        let left = finding(|f| {
            f.message.text = Some("unused variable".to_string());
            f.locations.push(Location {
                path: "a.rs".into(),
                region: Some(Region {
                    snippet: Some("let a = 1;".to_string()),
                    ..Region::default()
                }),
            });
        });
        let right = finding(|f| {
            f.message.text = Some("unused variable".to_string());
            f.locations.push(Location {
                path: "a.rs".into(),
                region: Some(Region {
                    snippet: Some("let b = 2;".to_string()),
                    ..Region::default()
                }),
            });
        });
        assert!(!check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn findings_with_no_signals_at_all_match_vacuously() {
        let left = finding(|_| {});
        let right = finding(|_| {});
        assert!(check(&left, &right, &TrustMap::default()));
    }

    #[test]
    fn null_findings_never_match() {
        let run = Run::default();
        let left = finding(|_| {});
        let view = ExtractedFinding::new(&run, &left);
        assert!(!matches(Some(&view), None, &TrustMap::default()));
        assert!(!matches(None, None, &TrustMap::default()));
    }
}
