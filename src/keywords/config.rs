use serde::{Deserialize, Serialize};

use crate::error::PressespiegelError;
use crate::text::TokenSequence;

/// Keywords as they appear in a topic's settings: either a flat list of stems
/// or the three groups of a combination query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    /// A flat list of simple and compound stems.
    Stems(Vec<String>),
    /// The groups `[A, B1, B2]` of a combination query.
    Combination(Vec<Vec<String>>),
}

/// A stem made of 2 or 3 whitespace separated parts that have to match
/// consecutive tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundStem {
    stem: String,
    parts: Vec<String>,
}

impl CompoundStem {
    /// The normalized stem, parts joined by a single space.
    pub fn as_str(&self) -> &str {
        &self.stem
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Whether the token at `pos` contains the first part, the token at
    /// `pos + 1` the second part and so on.
    ///
    /// A compound running past the end of the text never matches.
    pub fn matches_at(&self, tokens: &TokenSequence, pos: usize) -> bool {
        self.parts.iter().enumerate().all(|(offset, part)| {
            tokens
                .get(pos + offset)
                .map_or(false, |token| token.contains(part.as_str()))
        })
    }
}

/// The stems of one keyword list, split by the number of tokens they span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemSet {
    pub(crate) simple: Vec<String>,
    pub(crate) double: Vec<CompoundStem>,
    pub(crate) triple: Vec<CompoundStem>,
}

impl StemSet {
    /// Normalize and classify `stems`.
    ///
    /// Stems are lowercased, duplicates are dropped. `max_parts` bounds the
    /// number of tokens a single stem may span.
    pub(crate) fn parse<I, T>(stems: I, max_parts: usize, group: &str) -> Result<Self, PressespiegelError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut set = StemSet::default();
        for stem in stems {
            let parts: Vec<String> = stem
                .as_ref()
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect();

            match parts.len() {
                0 => {
                    return Err(PressespiegelError::configuration(format!(
                        "{} contains an empty keyword stem",
                        group
                    )))
                }
                n if n > max_parts => {
                    return Err(PressespiegelError::configuration(format!(
                        "keyword stem `{}` in {} spans {} tokens, at most {} are allowed",
                        stem.as_ref(),
                        group,
                        n,
                        max_parts
                    )))
                }
                1 => {
                    let simple = parts.into_iter().next().unwrap_or_default();
                    if !set.simple.contains(&simple) {
                        set.simple.push(simple);
                    }
                }
                n => {
                    let compound = CompoundStem {
                        stem: parts.join(" "),
                        parts,
                    };
                    let target = if n == 2 {
                        &mut set.double
                    } else {
                        &mut set.triple
                    };
                    if !target.contains(&compound) {
                        target.push(compound);
                    }
                }
            }
        }

        if set.is_empty() {
            return Err(PressespiegelError::configuration(format!(
                "{} has no keyword stems",
                group
            )));
        }
        Ok(set)
    }

    pub fn simple(&self) -> &[String] {
        &self.simple
    }

    pub fn double(&self) -> &[CompoundStem] {
        &self.double
    }

    pub fn triple(&self) -> &[CompoundStem] {
        &self.triple
    }

    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.double.is_empty() && self.triple.is_empty()
    }
}

/// Which matching strategy a [`KeywordConfig`] uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordMode {
    /// Plain and compound stems, any of which counts.
    Single(StemSet),
    /// `A AND [B1 AND B2]`: a hit from `group_b1` only counts together with a
    /// hit from `group_b2`.
    Combination {
        group_a: StemSet,
        group_b1: StemSet,
        group_b2: StemSet,
    },
}

/// Keyword policy of a topic.
///
/// Built once per topic and shared read-only by every matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordConfig {
    mode: KeywordMode,
    /// Minimum number of distinct matched token positions.
    min_frequency: usize,
    /// Minimum token distance between at least one pair of matches.
    min_distance: usize,
}

impl KeywordConfig {
    /// Default minimum number of matches.
    pub const DEFAULT_MIN_FREQUENCY: usize = 2;

    /// Default minimum token distance.
    pub const DEFAULT_MIN_DISTANCE: usize = 50;

    /// Convenience method to create a [`KeywordConfigBuilder`]
    #[inline]
    pub fn builder() -> KeywordConfigBuilder {
        KeywordConfigBuilder::default()
    }

    /// Build a config from settings-shaped keywords and thresholds.
    pub fn from_keywords(
        keywords: Keywords,
        min_frequency: usize,
        min_distance: usize,
    ) -> Result<Self, PressespiegelError> {
        KeywordConfig::builder()
            .keywords(keywords)
            .min_frequency(min_frequency)
            .min_distance(min_distance)
            .build()
    }

    pub fn mode(&self) -> &KeywordMode {
        &self.mode
    }

    pub fn min_frequency(&self) -> usize {
        self.min_frequency
    }

    pub fn min_distance(&self) -> usize {
        self.min_distance
    }

    pub fn is_combination(&self) -> bool {
        matches!(self.mode, KeywordMode::Combination { .. })
    }
}

#[derive(Debug, Default)]
pub struct KeywordConfigBuilder {
    /// The configured keyword stems.
    keywords: Option<Keywords>,
    /// Minimum number of distinct matched token positions.
    min_frequency: Option<usize>,
    /// Minimum token distance between at least one pair of matches.
    min_distance: Option<usize>,
}

impl KeywordConfigBuilder {
    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn stems<I, T>(self, stems: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.keywords(Keywords::Stems(
            stems.into_iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn combination<T: ToString>(self, group_a: &[T], group_b1: &[T], group_b2: &[T]) -> Self {
        let group = |g: &[T]| g.iter().map(ToString::to_string).collect();
        self.keywords(Keywords::Combination(vec![
            group(group_a),
            group(group_b1),
            group(group_b2),
        ]))
    }

    pub fn min_frequency(mut self, min_frequency: usize) -> Self {
        self.min_frequency = Some(min_frequency);
        self
    }

    pub fn min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = Some(min_distance);
        self
    }

    pub fn build(self) -> Result<KeywordConfig, PressespiegelError> {
        let min_frequency = self
            .min_frequency
            .unwrap_or(KeywordConfig::DEFAULT_MIN_FREQUENCY);
        if min_frequency < 1 {
            return Err(PressespiegelError::configuration(
                "minimum keyword frequency must be at least 1",
            ));
        }

        let mode = match self.keywords {
            None => {
                return Err(PressespiegelError::configuration(
                    "no keywords configured",
                ))
            }
            Some(Keywords::Stems(stems)) => KeywordMode::Single(StemSet::parse(stems, 3, "keywords")?),
            Some(Keywords::Combination(groups)) => {
                if groups.len() != 3 {
                    return Err(PressespiegelError::configuration(format!(
                        "a keyword combination needs exactly 3 groups, got {}",
                        groups.len()
                    )));
                }
                let mut groups = groups.into_iter();
                let mut next = || groups.next().unwrap_or_default();
                KeywordMode::Combination {
                    group_a: StemSet::parse(next(), 2, "group A")?,
                    group_b1: StemSet::parse(next(), 2, "group B1")?,
                    group_b2: StemSet::parse(next(), 1, "group B2")?,
                }
            }
        };

        Ok(KeywordConfig {
            mode,
            min_frequency,
            min_distance: self
                .min_distance
                .unwrap_or(KeywordConfig::DEFAULT_MIN_DISTANCE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn classify_stems() {
        let config = KeywordConfig::builder()
            .stems(vec!["Asyl", "bedingungslos  Einkommen", "eu grüne deal", "asyl"])
            .build()
            .unwrap();
        match config.mode() {
            KeywordMode::Single(stems) => {
                assert_eq!(stems.simple(), &["asyl".to_string()]);
                assert_eq!(stems.double()[0].as_str(), "bedingungslos einkommen");
                assert_eq!(stems.triple()[0].parts(), &["eu", "grüne", "deal"]);
            }
            _ => panic!("expected single mode"),
        }
        assert_eq!(config.min_frequency(), 2);
        assert_eq!(config.min_distance(), 50);
    }

    #[test]
    fn reject_invalid_configs() {
        let err = KeywordConfig::builder()
            .stems(vec!["asyl"])
            .min_frequency(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, PressespiegelError::Configuration { .. }));

        assert!(KeywordConfig::builder().stems(Vec::<String>::new()).build().is_err());
        assert!(KeywordConfig::builder().stems(vec!["  "]).build().is_err());
        assert!(KeywordConfig::builder().stems(vec!["a b c d"]).build().is_err());
        assert!(KeywordConfig::builder().build().is_err());
    }

    #[test]
    fn reject_invalid_combinations() {
        assert!(KeywordConfig::builder()
            .combination(&["weich droge"], &["cannabis"], &["legal droge"])
            .build()
            .is_err());
        assert!(KeywordConfig::builder()
            .combination(&["weich droge"], &[], &["legal"])
            .build()
            .is_err());
        assert!(KeywordConfig::builder()
            .keywords(Keywords::Combination(vec![vec!["a".into()], vec!["b".into()]]))
            .build()
            .is_err());

        let config = KeywordConfig::builder()
            .combination(&["soft drug"], &["magic mushroom", "thc"], &["legal"])
            .build()
            .unwrap();
        assert!(config.is_combination());
    }

    #[test]
    fn keywords_from_settings_json() {
        let flat: Keywords = serde_json::from_str(r#"["windkraft", "windrad"]"#).unwrap();
        assert_eq!(
            flat,
            Keywords::Stems(vec!["windkraft".into(), "windrad".into()])
        );
        let groups: Keywords =
            serde_json::from_str(r#"[["soft drug"], ["thc"], ["legal"]]"#).unwrap();
        assert!(matches!(groups, Keywords::Combination(ref g) if g.len() == 3));
    }

    #[test]
    fn compound_lookahead_is_bounded() {
        let stems = StemSet::parse(vec!["bedingungslos einkommen"], 3, "keywords").unwrap();
        let compound = &stems.double()[0];
        let tokens = tokenize("ein bedingungsloses einkommen ist bedingungslos");
        assert!(compound.matches_at(&tokens, 1));
        assert!(!compound.matches_at(&tokens, 0));
        assert!(!compound.matches_at(&tokens, 4));
        assert!(!compound.matches_at(&tokens, 10));
    }
}
