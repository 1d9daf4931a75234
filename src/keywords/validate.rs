use std::collections::BTreeSet;

/// A matched token: its (first occurrence) position and the token itself.
pub type Match<'a> = (usize, &'a str);

/// Frequency and proximity thresholds every match set has to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min_frequency: usize,
    pub min_distance: usize,
}

impl Thresholds {
    /// Whether the matches reach `min_frequency` distinct positions and at
    /// least one pair of them lies `min_distance` or more tokens apart.
    pub fn validate(&self, matches: &BTreeSet<Match<'_>>) -> bool {
        let positions: BTreeSet<usize> = matches.iter().map(|(pos, _)| *pos).collect();
        if positions.len() < self.min_frequency {
            return false;
        }
        // the widest pair is formed by the outermost positions
        match (positions.iter().next(), positions.iter().next_back()) {
            (Some(first), Some(last)) if first != last => last - first >= self.min_distance,
            _ => false,
        }
    }
}
