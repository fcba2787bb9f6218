//! Players of a session and their partnership bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A roster entry and the statistics the engine keeps about it.
///
/// `name` is the identity of the player: two records with the same name are the same player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique name of the player.
    pub name: String,
    /// Number of rounds this player has been on court.
    #[serde(default)]
    pub games_played: u32,
    /// Number of the last round this player was on court, 0 if never.
    #[serde(default)]
    pub last_played_round: u32,
    /// How many times this player has been on the same team as each partner.
    ///
    /// Older snapshots may lack this field entirely, in which case it is empty.
    #[serde(default)]
    pub partnerships: BTreeMap<String, u32>,
}

impl Player {
    /// Creates a player with all counters at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            games_played: 0,
            last_played_round: 0,
            partnerships: BTreeMap::new(),
        }
    }

    /// Number of rounds played on the same team as `partner`.
    pub fn partnership_count(&self, partner: &str) -> u32 {
        self.partnerships.get(partner).copied().unwrap_or(0)
    }

    pub(crate) fn record_partner(&mut self, partner: &str) {
        *self.partnerships.entry(partner.to_owned()).or_default() += 1;
    }

    /// Sort key used to decide who plays next: fewest games first, then longest rest.
    pub(crate) fn priority(&self) -> (u32, u32) {
        (self.games_played, self.last_played_round)
    }
}

/// Partnership score of a pair (lower is better).
///
/// Both directions are summed, so a consistent roster counts each shared team twice.
pub fn partnership_score(a: &Player, b: &Player) -> u32 {
    a.partnership_count(&b.name) + b.partnership_count(&a.name)
}
