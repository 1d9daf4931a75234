use fnv::FnvHashMap;
use std::ops::Deref;

/// The lowercased, whitespace separated words of an article's text.
///
/// Positions are resolved by value: every lookup of a token's position
/// yields the index of its first occurrence, so repeated tokens collapse onto
/// a single position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<String>,
    first_index: FnvHashMap<String, usize>,
}

impl TokenSequence {
    /// Lowercase the text and split it on runs of whitespace.
    pub fn tokenize(text: &str) -> Self {
        text.to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }

    /// The position of the first occurrence of `token`.
    pub fn first_index(&self, token: &str) -> Option<usize> {
        self.first_index.get(token).copied()
    }

    /// The token at `pos`, `None` if `pos` is out of bounds.
    pub fn get(&self, pos: usize) -> Option<&str> {
        self.tokens.get(pos).map(String::as_str)
    }

    /// Iterate over every distinct token together with the position of its
    /// first occurrence, in text order.
    pub fn distinct(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(pos, token)| self.first_index.get(token.as_str()) == Some(pos))
            .map(|(pos, token)| (pos, token.as_str()))
    }

    pub fn into_inner(self) -> Vec<String> {
        self.tokens
    }
}

impl From<Vec<String>> for TokenSequence {
    fn from(tokens: Vec<String>) -> Self {
        let mut first_index =
            FnvHashMap::with_capacity_and_hasher(tokens.len(), Default::default());
        for (pos, token) in tokens.iter().enumerate() {
            first_index.entry(token.clone()).or_insert(pos);
        }
        Self {
            tokens,
            first_index,
        }
    }
}

impl Deref for TokenSequence {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

/// Convenience function for [`TokenSequence::tokenize`].
pub fn tokenize(text: &str) -> TokenSequence {
    TokenSequence::tokenize(text)
}

/// Number of whitespace separated words in the text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
