//! Court and opponent statistics derived from the rounds played so far.
//!
//! Partnerships are not derived here: they live on each [`Player`](crate::player::Player) and
//! survive roster edits, while court and opponent counts are recomputed from the full history on
//! every call.

use std::collections::HashMap;

use tracing::warn;

use crate::round::Round;

/// Per-player court usage and per-pair opponent counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FairnessHistory {
    courts: HashMap<String, HashMap<usize, u32>>,
    opponents: HashMap<String, HashMap<String, u32>>,
}

impl FairnessHistory {
    /// Aggregates every valid match of `rounds`.
    ///
    /// Malformed matches are skipped with a warning.
    pub fn from_rounds(rounds: &[Round]) -> Self {
        let mut history = Self::default();
        for round in rounds {
            for m in &round.matches {
                if let Err(e) = m.validate() {
                    warn!("Skipping malformed match in round {}: {e}", round.round);
                    continue;
                }
                for name in m.players() {
                    *history
                        .courts
                        .entry(name.clone())
                        .or_default()
                        .entry(m.court)
                        .or_default() += 1;
                }
                for (a, b) in m.opponent_pairs() {
                    history.add_opponents(a, b);
                    history.add_opponents(b, a);
                }
            }
        }
        history
    }

    fn add_opponents(&mut self, player: &str, opponent: &str) {
        *self
            .opponents
            .entry(player.to_owned())
            .or_default()
            .entry(opponent.to_owned())
            .or_default() += 1;
    }

    /// Times `name` has played on `court` (1-based).
    pub fn court_usage(&self, name: &str, court: usize) -> u32 {
        self.courts
            .get(name)
            .and_then(|usage| usage.get(&court))
            .copied()
            .unwrap_or(0)
    }

    /// Times `a` has played against `b`.
    pub fn opponent_count(&self, a: &str, b: &str) -> u32 {
        self.opponents
            .get(a)
            .and_then(|opponents| opponents.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// How unevenly `name` has used courts `1..=courts`. Higher is more uneven.
    ///
    /// The spread between the most and least used court, plus how far both stray from the mean.
    pub fn court_imbalance(&self, name: &str, courts: usize) -> f64 {
        if courts == 0 {
            return 0.0;
        }
        let usage: Vec<u32> = (1..=courts).map(|c| self.court_usage(name, c)).collect();
        let max = usage.iter().copied().max().unwrap_or(0) as f64;
        let min = usage.iter().copied().min().unwrap_or(0) as f64;
        let mean = usage.iter().map(|&u| u as f64).sum::<f64>() / courts as f64;
        (max - min) + (max - mean).abs() + (min - mean).abs()
    }
}
