use std::collections::BTreeSet;

use crate::keywords::config::{CompoundStem, StemSet};
use crate::keywords::validate::{Match, Thresholds};
use crate::text::TokenSequence;

/// All distinct tokens containing any of the `stems`.
pub(crate) fn simple_matches<'a>(tokens: &'a TokenSequence, stems: &[String]) -> BTreeSet<Match<'a>> {
    if stems.is_empty() {
        return BTreeSet::new();
    }
    tokens
        .distinct()
        .filter(|(_, token)| stems.iter().any(|stem| token.contains(stem.as_str())))
        .collect()
}

/// Hits of compound stems: where they start and which stems were used.
#[derive(Debug, Default)]
pub(crate) struct CompoundMatches<'a, 'c> {
    pub starts: BTreeSet<Match<'a>>,
    pub stems: BTreeSet<&'c str>,
}

impl<'a, 'c> CompoundMatches<'a, 'c> {
    pub fn find(tokens: &'a TokenSequence, compounds: &'c [CompoundStem]) -> Self {
        let mut found = CompoundMatches::default();
        if compounds.is_empty() {
            return found;
        }
        for (pos, token) in tokens.distinct() {
            for compound in compounds {
                if compound.matches_at(tokens, pos) {
                    found.starts.insert((pos, token));
                    found.stems.insert(compound.as_str());
                }
            }
        }
        found
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts_at(&self, pos: usize) -> bool {
        self.starts.iter().any(|(start, _)| *start == pos)
    }
}

/// The stems of `stems` that occur in any of the matched tokens.
pub(crate) fn stems_in<'s>(stems: &'s [String], matches: &BTreeSet<Match<'_>>) -> impl Iterator<Item = &'s String> + 's {
    let tokens: Vec<String> = matches.iter().map(|(_, token)| token.to_string()).collect();
    stems
        .iter()
        .filter(move |stem| tokens.iter().any(|token| token.contains(stem.as_str())))
}

/// Collect every match of simple, 2-token and 3-token stems.
///
/// A simple match on the second token of a 2-token compound is dropped, as is
/// a match on a 3-token compound's start or on the token right before it.
/// Matches on the inner tokens of a 3-token compound are kept, so a 2-token
/// stem nested in a 3-token stem (`green deal` in `eu green deal`) counts
/// as a second match.
pub(crate) fn collect<'a, 'c>(
    tokens: &'a TokenSequence,
    stems: &'c StemSet,
) -> (BTreeSet<Match<'a>>, BTreeSet<&'c str>) {
    let mut matches = simple_matches(tokens, &stems.simple);
    let mut used = BTreeSet::new();

    let doubles = CompoundMatches::find(tokens, &stems.double);
    if !doubles.is_empty() {
        matches.retain(|(pos, _)| *pos == 0 || !doubles.starts_at(pos - 1));
        matches.extend(doubles.starts.iter().copied());
        used.extend(doubles.stems);
    }

    let triples = CompoundMatches::find(tokens, &stems.triple);
    if !triples.is_empty() {
        matches.retain(|(pos, _)| !triples.starts_at(*pos) && !triples.starts_at(pos + 1));
        matches.extend(triples.starts.iter().copied());
        used.extend(triples.stems);
    }

    (matches, used)
}

/// Evaluate a flat list of simple and compound stems.
///
/// Returns the matched stems if the thresholds are met.
pub(crate) fn evaluate(
    tokens: &TokenSequence,
    stems: &StemSet,
    thresholds: Thresholds,
) -> Option<BTreeSet<String>> {
    let (matches, used) = collect(tokens, stems);
    if !thresholds.validate(&matches) {
        return None;
    }
    let mut matched: BTreeSet<String> = stems_in(&stems.simple, &matches).cloned().collect();
    matched.extend(used.into_iter().map(str::to_string));
    Some(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn stems(stems: &[&str]) -> StemSet {
        StemSet::parse(stems, 3, "keywords").unwrap()
    }

    fn positions(matches: &BTreeSet<Match<'_>>) -> Vec<usize> {
        matches.iter().map(|(pos, _)| *pos).collect()
    }

    #[test]
    fn simple_stems_match_substrings() {
        let tokens = tokenize("Die Asylpolitik der Regierung ist umstritten und die Migration steigt");
        let set = stems(&["asyl", "migration"]);
        let (matches, used) = collect(&tokens, &set);
        assert_eq!(
            matches.into_iter().collect::<Vec<_>>(),
            vec![(1, "asylpolitik"), (8, "migration")]
        );
        assert!(used.is_empty());
    }

    #[test]
    fn repeated_token_counts_once() {
        let tokens = tokenize("asyl a b c asyl d e asylrecht");
        let set = stems(&["asyl"]);
        let (matches, _) = collect(&tokens, &set);
        assert_eq!(positions(&matches), vec![0, 7]);
    }

    #[test]
    fn double_compound_suppresses_overlap() {
        let tokens = tokenize("ein bedingungslos einkommen ist");
        let set = stems(&["bedingungslos einkommen"]);
        let (matches, used) = collect(&tokens, &set);
        assert_eq!(matches.into_iter().collect::<Vec<_>>(), vec![(1, "bedingungslos")]);
        assert_eq!(used.into_iter().collect::<Vec<_>>(), vec!["bedingungslos einkommen"]);

        // the simple hit on the compound's second token is dropped
        let set = stems(&["einkommen", "bedingungslos einkommen"]);
        let (matches, _) = collect(&tokens, &set);
        assert_eq!(positions(&matches), vec![1]);
    }

    #[test]
    fn compound_lookahead_starts_at_first_occurrence() {
        let text = format!("bedingungslos x {}bedingungslos einkommen", "wort ".repeat(60));
        let tokens = tokenize(&text);
        let set = stems(&["grundeinkommen", "bedingungslos einkommen"]);
        let (matches, used) = collect(&tokens, &set);
        assert!(matches.is_empty());
        assert!(used.is_empty());
        assert!(evaluate(
            &tokens,
            &set,
            Thresholds {
                min_frequency: 1,
                min_distance: 0,
            },
        )
        .is_none());

        // without the earlier occurrence the compound is found
        let tokens = tokenize("x bedingungslos einkommen");
        let (matches, _) = collect(&tokens, &set);
        assert_eq!(positions(&matches), vec![1]);
    }

    #[test]
    fn triple_compound_suppresses_overlap() {
        let tokens = tokenize("der eu grüne deal kommt");
        let set = stems(&["eu", "eu grüne deal"]);
        let (matches, used) = collect(&tokens, &set);
        assert_eq!(matches.into_iter().collect::<Vec<_>>(), vec![(1, "eu")]);
        assert_eq!(used.into_iter().collect::<Vec<_>>(), vec!["eu grüne deal"]);

        // a simple match right before the triple's start is dropped as well
        let set = stems(&["der", "eu grüne deal"]);
        let (matches, _) = collect(&tokens, &set);
        assert_eq!(positions(&matches), vec![1]);

        // inner tokens of the triple keep their simple matches
        let set = stems(&["grüne", "eu grüne deal"]);
        let (matches, _) = collect(&tokens, &set);
        assert_eq!(positions(&matches), vec![1, 2]);
    }

    #[test]
    fn nested_double_counts_inside_triple() {
        let tokens = tokenize("das eu green deal");
        let set = stems(&["green deal", "eu green deal"]);
        let (matches, used) = collect(&tokens, &set);
        assert_eq!(positions(&matches), vec![1, 2]);
        assert_eq!(
            used.into_iter().collect::<Vec<_>>(),
            vec!["eu green deal", "green deal"]
        );

        let matched = evaluate(
            &tokens,
            &set,
            Thresholds {
                min_frequency: 2,
                min_distance: 1,
            },
        )
        .unwrap();
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn compound_at_end_of_text() {
        let tokens = tokenize("das thema ist green");
        let set = stems(&["green deal", "eu green deal"]);
        let (matches, used) = collect(&tokens, &set);
        assert!(matches.is_empty());
        assert!(used.is_empty());
    }

    #[test]
    fn triple_runs_past_end_of_text() {
        let tokens = tokenize("x y eu green");
        let set = stems(&["eu green deal"]);
        let (matches, used) = collect(&tokens, &set);
        assert!(matches.is_empty());
        assert!(used.is_empty());
        assert!(!set.triple()[0].matches_at(&tokens, 2));
    }

    #[test]
    fn matched_stems_cover_simple_and_compound() {
        let mut text = String::from("das grundeinkommen ");
        text.push_str(&"wort ".repeat(60));
        text.push_str("ein bedingungsloses einkommen");
        let tokens = tokenize(&text);
        let set = stems(&["grundeinkommen", "bedingungslos einkommen"]);
        let matched = evaluate(
            &tokens,
            &set,
            Thresholds {
                min_frequency: 2,
                min_distance: 50,
            },
        )
        .unwrap();
        assert_eq!(
            matched.into_iter().collect::<Vec<_>>(),
            vec!["bedingungslos einkommen".to_string(), "grundeinkommen".to_string()]
        );
    }
}
