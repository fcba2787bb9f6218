//! Match and round records produced by the engine.

use std::collections::HashSet;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Largest number of players on one team (3v2 on a five player court).
pub const MAX_TEAM_SIZE: usize = 3;

/// One court of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// 1-based court number, unique within a round.
    pub court: usize,
    /// Names of the players of the first team.
    pub team_a: Vec<String>,
    /// Names of the players of the second team.
    pub team_b: Vec<String>,
}

impl Match {
    /// Every player on this court, team A first.
    pub fn players(&self) -> impl Iterator<Item = &String> {
        self.team_a.iter().chain(self.team_b.iter())
    }

    /// Number of players on this court.
    pub fn size(&self) -> usize {
        self.team_a.len() + self.team_b.len()
    }

    /// Every same-team pair of this match.
    pub fn partner_pairs(&self) -> impl Iterator<Item = (&String, &String)> {
        team_pairs(&self.team_a).chain(team_pairs(&self.team_b))
    }

    /// Every cross-team pair of this match, team A member first.
    pub fn opponent_pairs(&self) -> impl Iterator<Item = (&String, &String)> {
        self.team_a
            .iter()
            .flat_map(move |a| self.team_b.iter().map(move |b| (a, b)))
    }

    /// Checks the shape of this match.
    ///
    /// # Errors
    /// Returned when the court number is 0, a team is empty or larger than [`MAX_TEAM_SIZE`],
    /// the court holds more than five players, or a name appears twice.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.court == 0 {
            bail!("court numbers start at 1");
        }
        if self.team_a.is_empty() || self.team_b.is_empty() {
            bail!("court {} has an empty team", self.court);
        }
        if self.team_a.len() > MAX_TEAM_SIZE || self.team_b.len() > MAX_TEAM_SIZE {
            bail!(
                "court {} has a team of more than {MAX_TEAM_SIZE} players",
                self.court
            );
        }
        if self.size() > 5 {
            bail!("court {} holds {} players", self.court, self.size());
        }
        let mut seen = HashSet::new();
        for name in self.players() {
            if !seen.insert(name) {
                bail!("{name} appears twice on court {}", self.court);
            }
        }
        Ok(())
    }
}

fn team_pairs(team: &[String]) -> impl Iterator<Item = (&String, &String)> {
    team.iter()
        .enumerate()
        .flat_map(move |(i, a)| team[i + 1..].iter().map(move |b| (a, b)))
}

/// A finalized round: who played where, and who rested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based sequence number.
    pub round: u32,
    /// Matches ordered by court number.
    #[serde(default)]
    pub matches: Vec<Match>,
    /// Roster names that are not on any court this round.
    #[serde(default)]
    pub resting: Vec<String>,
}

impl Round {
    /// Names of everyone on court this round.
    pub fn playing(&self) -> impl Iterator<Item = &String> {
        self.matches.iter().flat_map(Match::players)
    }

    /// Checks every match and that nobody is on two courts or both on court and resting.
    ///
    /// # Errors
    /// Returned on the first structural problem found.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut courts = HashSet::new();
        let mut seen = HashSet::new();
        for m in &self.matches {
            m.validate()?;
            if !courts.insert(m.court) {
                bail!("round {} uses court {} twice", self.round, m.court);
            }
            for name in m.players() {
                if !seen.insert(name) {
                    bail!("{name} plays twice in round {}", self.round);
                }
            }
        }
        for name in &self.resting {
            if !seen.insert(name) {
                bail!("{name} is both resting and listed elsewhere in round {}", self.round);
            }
        }
        Ok(())
    }
}
