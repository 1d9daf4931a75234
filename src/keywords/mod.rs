//! Decide whether an article's text is relevant for a topic's keywords.
//!
//! A [`KeywordConfig`] either holds a flat list of simple and compound stems
//! or the three groups of a combination query. A stem matches every token
//! that contains it, compound stems match consecutive tokens. An article is
//! relevant if the matches cover at least `min_frequency` distinct token
//! positions and at least one pair of them is `min_distance` tokens apart.
//!
//! # Example
//!
//! ```rust
//! use pressespiegel::{KeywordConfig, KeywordMatcher};
//!
//! let config = KeywordConfig::builder()
//!     .stems(vec!["asyl", "migration"])
//!     .min_frequency(2)
//!     .min_distance(5)
//!     .build()
//!     .unwrap();
//! let matcher = KeywordMatcher::new(config);
//!
//! let decision = matcher.evaluate_text(
//!     "Die Asylpolitik der Regierung ist umstritten und die Migration steigt",
//! );
//! assert!(decision.is_match());
//! assert!(decision.matched_stems().contains("asyl"));
//! ```

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::text::TokenSequence;

pub use config::{CompoundStem, KeywordConfig, KeywordConfigBuilder, KeywordMode, Keywords, StemSet};
pub use validate::{Match, Thresholds};

mod combination;
mod config;
mod single;
mod validate;

/// Outcome of a single evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    is_match: bool,
    matched_stems: BTreeSet<String>,
}

impl Decision {
    /// A negative decision.
    pub fn no_match() -> Self {
        Decision::default()
    }

    fn matched(matched_stems: BTreeSet<String>) -> Self {
        Decision {
            is_match: true,
            matched_stems,
        }
    }

    pub fn is_match(&self) -> bool {
        self.is_match
    }

    /// The configured stems that triggered the match, empty for a negative
    /// decision.
    pub fn matched_stems(&self) -> &BTreeSet<String> {
        &self.matched_stems
    }

    /// The matched stems in the shape stored as an article's
    /// `query_keywords`, `None` for a negative decision.
    pub fn into_query_keywords(self) -> Option<Vec<String>> {
        if self.is_match {
            Some(self.matched_stems.into_iter().collect())
        } else {
            None
        }
    }
}

impl From<Option<BTreeSet<String>>> for Decision {
    fn from(matched: Option<BTreeSet<String>>) -> Self {
        matched.map(Decision::matched).unwrap_or_default()
    }
}

/// Evaluates token sequences against a [`KeywordConfig`].
///
/// Evaluation keeps no state between calls, a single matcher can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    config: KeywordConfig,
}

impl KeywordMatcher {
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_frequency: self.config.min_frequency(),
            min_distance: self.config.min_distance(),
        }
    }

    /// Decide whether the tokens satisfy the configured keyword policy.
    pub fn evaluate(&self, tokens: &TokenSequence) -> Decision {
        if tokens.is_empty() {
            return Decision::no_match();
        }
        let matched = match self.config.mode() {
            KeywordMode::Single(stems) => single::evaluate(tokens, stems, self.thresholds()),
            KeywordMode::Combination {
                group_a,
                group_b1,
                group_b2,
            } => combination::evaluate(tokens, group_a, group_b1, group_b2, self.thresholds()),
        };
        debug!(
            "keyword evaluation over {} tokens: {:?}",
            tokens.len(),
            matched
        );
        matched.into()
    }

    /// Tokenize `text` and evaluate it.
    pub fn evaluate_text(&self, text: &str) -> Decision {
        self.evaluate(&TokenSequence::tokenize(text))
    }
}

impl From<KeywordConfig> for KeywordMatcher {
    fn from(config: KeywordConfig) -> Self {
        KeywordMatcher::new(config)
    }
}
