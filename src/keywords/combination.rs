use std::collections::BTreeSet;

use crate::keywords::config::StemSet;
use crate::keywords::single::{simple_matches, stems_in, CompoundMatches};
use crate::keywords::validate::{Match, Thresholds};
use crate::text::TokenSequence;

/// Simple and 2-token matches of one group, without overlap suppression.
fn group_matches<'a, 'c>(
    tokens: &'a TokenSequence,
    group: &'c StemSet,
) -> (BTreeSet<Match<'a>>, BTreeSet<&'c str>) {
    let mut matches = simple_matches(tokens, &group.simple);
    let compounds = CompoundMatches::find(tokens, &group.double);
    matches.extend(compounds.starts.iter().copied());
    (matches, compounds.stems)
}

/// Evaluate `A AND [B1 AND B2]`.
///
/// Hits from `group_b1` only count if `group_b2` has a hit as well, otherwise
/// both are discarded and the decision rests on `group_a` alone.
pub(crate) fn evaluate(
    tokens: &TokenSequence,
    group_a: &StemSet,
    group_b1: &StemSet,
    group_b2: &StemSet,
    thresholds: Thresholds,
) -> Option<BTreeSet<String>> {
    let (mut matches, used_a) = group_matches(tokens, group_a);
    let (mut matches_b, used_b1) = group_matches(tokens, group_b1);

    let with_b = if matches_b.is_empty() {
        false
    } else {
        let matches_b2 = simple_matches(tokens, &group_b2.simple);
        if matches_b2.is_empty() {
            log::trace!("discarding {} group B1 hits without group B2 hit", matches_b.len());
            matches_b.clear();
            false
        } else {
            matches_b.extend(matches_b2);
            true
        }
    };
    matches.extend(matches_b);

    if !thresholds.validate(&matches) {
        return None;
    }

    let mut matched: BTreeSet<String> = stems_in(&group_a.simple, &matches).cloned().collect();
    matched.extend(used_a.into_iter().map(str::to_string));
    if with_b {
        matched.extend(stems_in(&group_b1.simple, &matches).cloned());
        matched.extend(used_b1.into_iter().map(str::to_string));
        matched.extend(stems_in(&group_b2.simple, &matches).cloned());
    }
    Some(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn group(stems: &[&str], max_parts: usize) -> StemSet {
        StemSet::parse(stems, max_parts, "group").unwrap()
    }

    fn soft_drugs() -> (StemSet, StemSet, StemSet) {
        (
            group(&["weich droge", "soft drug", "entkriminalisierung"], 2),
            group(&["cannabis", "hanf", "magic mushroom"], 2),
            group(&["legal", "entkriminalisierung"], 1),
        )
    }

    fn thresholds(min_frequency: usize, min_distance: usize) -> Thresholds {
        Thresholds {
            min_frequency,
            min_distance,
        }
    }

    #[test]
    fn b1_without_b2_is_discarded() {
        let (a, b1, b2) = soft_drugs();
        let tokens = tokenize("die soft drugs wie cannabis werden diskutiert");
        // A alone has one position, A + B1 would have two
        assert!(evaluate(&tokens, &a, &b1, &b2, thresholds(2, 1)).is_none());
    }

    #[test]
    fn b1_with_b2_counts() {
        let (a, b1, b2) = soft_drugs();
        let tokens = tokenize("die weiche droge cannabis soll legal werden");
        let matched = evaluate(&tokens, &a, &b1, &b2, thresholds(3, 4)).unwrap();
        assert_eq!(
            matched.into_iter().collect::<Vec<_>>(),
            vec!["cannabis", "legal", "weich droge"]
        );
    }

    #[test]
    fn a_alone_can_match() {
        let (a, b1, b2) = soft_drugs();
        let tokens = tokenize("soft drugs und die entkriminalisierung");
        let matched = evaluate(&tokens, &a, &b1, &b2, thresholds(2, 3)).unwrap();
        assert_eq!(
            matched.into_iter().collect::<Vec<_>>(),
            vec!["entkriminalisierung", "soft drug"]
        );
    }

    #[test]
    fn b_stems_not_reported_when_discarded() {
        let (a, b1, b2) = soft_drugs();
        // enough A hits, B1 present but no B2
        let tokens = tokenize("soft drugs hanf x y z weiche drogen");
        let matched = evaluate(&tokens, &a, &b1, &b2, thresholds(2, 5)).unwrap();
        assert!(!matched.contains("hanf"));
        assert!(matched.contains("soft drug"));
    }

    #[test]
    fn b2_alone_does_not_count() {
        let (a, b1, b2) = soft_drugs();
        let tokens = tokenize("legal legalisierung legalität");
        assert!(evaluate(&tokens, &a, &b1, &b2, thresholds(1, 0)).is_none());
    }
}
