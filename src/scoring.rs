//! Scores a candidate round. Lower is better.

use std::collections::HashMap;

use crate::history::FairnessHistory;
use crate::player::{partnership_score, Player};
use crate::round::Match;

/// Penalty weights of the assignment score.
///
/// Defaults rank repeated partners worst, then repeated opponents, then court repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Per unit of [`partnership_score`] for each same-team pair.
    pub partnership: u64,
    /// Per previous meeting of each cross-team pair.
    pub opponent: u64,
    /// Per previous visit of each player to the court they are put on.
    pub court: u64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            partnership: 10,
            opponent: 5,
            court: 3,
        }
    }
}

/// Looks players up by name.
pub(crate) type RosterIndex<'a> = HashMap<&'a str, &'a Player>;

pub(crate) fn index_roster(players: &[Player]) -> RosterIndex<'_> {
    players.iter().map(|p| (p.name.as_str(), p)).collect()
}

/// Scores complete rounds against a fixed roster and history.
pub struct AssignmentScorer<'a> {
    roster: RosterIndex<'a>,
    history: &'a FairnessHistory,
    weights: ScoringWeights,
}

impl<'a> AssignmentScorer<'a> {
    /// Creates a scorer over `players` and `history`.
    pub fn new(players: &'a [Player], history: &'a FairnessHistory, weights: ScoringWeights) -> Self {
        Self {
            roster: index_roster(players),
            history,
            weights,
        }
    }

    /// Weighted sum of repeated partnerships, repeated opponents and court stickiness.
    ///
    /// Names missing from the roster contribute no partnership penalty.
    pub fn score(&self, matches: &[Match]) -> u64 {
        let mut score = 0;
        for m in matches {
            for (a, b) in m.partner_pairs() {
                if let (Some(a), Some(b)) = (self.roster.get(a.as_str()), self.roster.get(b.as_str())) {
                    score += partnership_score(a, b) as u64 * self.weights.partnership;
                }
            }
            for (a, b) in m.opponent_pairs() {
                score += self.history.opponent_count(a, b) as u64 * self.weights.opponent;
            }
            for name in m.players() {
                score += self.history.court_usage(name, m.court) as u64 * self.weights.court;
            }
        }
        score
    }
}

/// One-shot form of [`AssignmentScorer::score`].
pub fn score_assignment(
    matches: &[Match],
    players: &[Player],
    history: &FairnessHistory,
    weights: ScoringWeights,
) -> u64 {
    AssignmentScorer::new(players, history, weights).score(matches)
}
