//! Caller-owned state of a session.
//!
//! A [`Session`] bundles the roster, the equipment counts and the rounds played so far. It is a
//! plain value: storing it (for instance as the JSON produced by [`Session::to_json`]) and
//! showing it are up to the caller.
//!
//! Snapshots from older versions may lack fields. Missing fields take their defaults, and
//! inconsistent counters are repaired on load (see [`Session::repair`]).

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::configuration::Configuration;
use crate::export::rounds_to_csv;
use crate::orchestrator::{generate_next_round, RoundNotGenerated, MIN_ROSTER};
use crate::player::Player;
use crate::rng::RandomSource;
use crate::round::Round;

fn default_rackets() -> usize {
    Configuration::new().number_of_rackets
}

fn default_courts() -> usize {
    Configuration::new().number_of_courts
}

/// Roster, equipment and history of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default = "default_rackets")]
    number_of_rackets: usize,
    #[serde(default = "default_courts")]
    number_of_courts: usize,
    #[serde(default)]
    rounds: Vec<Round>,
    #[serde(default)]
    current_round: usize,
}

impl Session {
    /// An empty session using the rackets and courts of `config`.
    pub fn new(config: &Configuration) -> Self {
        Self {
            players: vec![],
            number_of_rackets: config.number_of_rackets,
            number_of_courts: config.number_of_courts,
            rounds: vec![],
            current_round: 0,
        }
    }

    /// Loads a snapshot and repairs it.
    ///
    /// # Errors
    /// Returned when `json` is not a session snapshot.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut session: Session =
            serde_json::from_str(json).context("could not parse session snapshot")?;
        session.repair();
        Ok(session)
    }

    /// Serializes the session as a snapshot.
    ///
    /// # Errors
    /// Returned if serialization fails.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("could not serialize session")
    }

    /// Fixes counters that contradict the history. Returns whether anything changed.
    ///
    /// - Zero rackets or courts mean the value was never set and take the default.
    /// - The current round pointer cannot be past the last round.
    /// - Players cannot have played games when there is no round.
    pub fn repair(&mut self) -> bool {
        let mut repaired = false;

        if self.number_of_rackets == 0 {
            warn!("Session has no rackets, using {}", default_rackets());
            self.number_of_rackets = default_rackets();
            repaired = true;
        }
        if self.number_of_courts == 0 {
            warn!("Session has no courts, using {}", default_courts());
            self.number_of_courts = default_courts();
            repaired = true;
        }

        if self.current_round > self.rounds.len() {
            warn!(
                "Current round {} is past the {} recorded rounds, fixing it",
                self.current_round,
                self.rounds.len()
            );
            self.current_round = self.rounds.len();
            repaired = true;
        }

        if self.rounds.is_empty() && self.players.iter().any(|p| p.games_played > 0) {
            warn!("Players have games but there is no round, resetting player stats");
            for player in &mut self.players {
                player.games_played = 0;
                player.last_played_round = 0;
            }
            self.current_round = 0;
            repaired = true;
        }

        repaired
    }

    /// The rounds played so far as a CSV table, see [`rounds_to_csv`].
    ///
    /// # Errors
    /// Returned if the CSV writer fails.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        rounds_to_csv(&self.rounds)
    }

    /// Players of the session.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Rounds played so far.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Number of rackets.
    pub fn rackets(&self) -> usize {
        self.number_of_rackets
    }

    /// Number of courts.
    pub fn courts(&self) -> usize {
        self.number_of_courts
    }

    /// Sets the number of rackets.
    pub fn set_rackets(&mut self, value: usize) {
        self.number_of_rackets = value;
    }

    /// Sets the number of courts.
    pub fn set_courts(&mut self, value: usize) {
        self.number_of_courts = value;
    }

    /// Adds a player with fresh game counters. Returns false if the name is blank or taken.
    ///
    /// A returning player gets back the partnerships the rest of the roster still records with
    /// them, so partnership counts stay symmetric.
    pub fn add_player(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.players.iter().any(|p| p.name == name) {
            return false;
        }
        let mut player = Player::new(name);
        for other in &self.players {
            let count = other.partnership_count(name);
            if count > 0 {
                player.partnerships.insert(other.name.clone(), count);
            }
        }
        self.players.push(player);
        true
    }

    /// Removes a player from the roster. Past rounds keep their name.
    pub fn remove_player(&mut self, name: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.name != name);
        self.players.len() != before
    }

    /// Number of courts worth using for this roster and these rackets.
    pub fn recommended_courts(&self) -> usize {
        let players = self.players.len();
        if players < MIN_ROSTER {
            return 0;
        }
        let rackets = self.number_of_rackets;
        let mut courts = 3.min(players / 3).min(rackets / 3);
        if players >= 7 && rackets >= 7 {
            courts = courts.max(2);
        }
        if players >= 11 && rackets >= 11 {
            courts = courts.max(3);
        }
        courts
    }

    /// Engine configuration for this session's equipment, search settings from `base`.
    pub fn configuration(&self, base: &Configuration) -> Configuration {
        base.with_rackets(self.number_of_rackets)
            .with_courts(self.number_of_courts)
    }

    /// Generates the next round with default search settings and records it.
    ///
    /// # Errors
    /// Returned, with the session left untouched, when no round can be generated.
    pub fn generate_next_round<R: RandomSource>(
        &mut self,
        rng: &mut R,
    ) -> Result<&Round, RoundNotGenerated> {
        self.generate_next_round_with(&Configuration::new(), rng)
    }

    /// Same as [`generate_next_round`](Self::generate_next_round) with the search settings of
    /// `base`. Rackets and courts always come from the session.
    ///
    /// # Errors
    /// Returned, with the session left untouched, when no round can be generated.
    pub fn generate_next_round_with<R: RandomSource>(
        &mut self,
        base: &Configuration,
        rng: &mut R,
    ) -> Result<&Round, RoundNotGenerated> {
        let config = self.configuration(base);
        let next = generate_next_round(&self.players, &self.rounds, &config, rng)?;
        self.players = next.roster;
        self.rounds.push(next.round);
        self.current_round = self.rounds.len();
        Ok(&self.rounds[self.rounds.len() - 1])
    }

    /// The round being played, if any.
    pub fn current_round(&self) -> Option<&Round> {
        if self.current_round == 0 {
            return None;
        }
        self.rounds.get(self.current_round - 1)
    }

    /// Clears the rounds and every counter. The roster is kept.
    pub fn reset(&mut self) {
        info!("Resetting session of {} players", self.players.len());
        for player in &mut self.players {
            player.games_played = 0;
            player.last_played_round = 0;
            player.partnerships.clear();
        }
        self.rounds.clear();
        self.current_round = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Configuration::default())
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use crate::rng::SeededRandom;

    fn session(names: &[&str]) -> Session {
        let mut session = Session::default();
        for name in names {
            assert!(session.add_player(name));
        }
        session
    }

    #[test]
    fn names_are_trimmed_and_unique() {
        let mut session = session(&["Ana"]);
        assert!(!session.add_player("  Ana "));
        assert!(!session.add_player("   "));
        assert!(session.add_player(" Ben "));
        assert_eq!(session.players()[1].name, "Ben");
        assert!(session.remove_player("Ana"));
        assert!(!session.remove_player("Ana"));
        assert_eq!(session.players().len(), 1);
    }

    #[test]
    fn recommended_courts() {
        let mut s = session(&["a", "b"]);
        assert_eq!(s.recommended_courts(), 0);
        s.add_player("c");
        assert_eq!(s.recommended_courts(), 1);
        for name in ["d", "e", "f", "g"] {
            s.add_player(name);
        }
        // 7 players, 8 rackets
        assert_eq!(s.recommended_courts(), 2);
        s.set_rackets(4);
        assert_eq!(s.recommended_courts(), 1);
        for name in ["h", "i", "j", "k"] {
            s.add_player(name);
        }
        s.set_rackets(12);
        assert_eq!(s.recommended_courts(), 3);
    }

    #[test]
    fn old_snapshots_load_with_defaults() {
        let json = r#"{"players":[{"name":"Ana","gamesPlayed":0,"lastPlayedRound":0}]}"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.rackets(), 8);
        assert_eq!(session.courts(), 2);
        assert!(session.rounds().is_empty());
        assert!(session.players()[0].partnerships.is_empty());
        assert!(session.current_round().is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(Session::from_json("not json").is_err());
        assert!(Session::from_json(r#"{"players": 3}"#).is_err());
    }

    #[test]
    fn stats_without_rounds_are_reset() {
        let json = r#"{
            "players": [{"name":"Ana","gamesPlayed":4,"lastPlayedRound":4}],
            "numberOfRackets": 4,
            "numberOfCourts": 1,
            "rounds": [],
            "currentRound": 4
        }"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.players()[0].games_played, 0);
        assert_eq!(session.players()[0].last_played_round, 0);
        assert_eq!(session.rackets(), 4);
        assert!(session.current_round().is_none());
    }

    #[test]
    fn round_pointer_is_clamped() {
        let mut s = session(&["a", "b", "c", "d"]);
        s.generate_next_round(&mut SeededRandom::from_seed(1)).unwrap();
        s.current_round = 5;
        assert!(s.repair());
        assert_eq!(s.current_round().map(|r| r.round), Some(1));
        assert!(!s.repair());
    }

    #[test]
    fn generation_updates_the_session() {
        let mut s = session(&["a", "b", "c", "d", "e"]);
        s.set_courts(1);
        let round = s.generate_next_round(&mut SeededRandom::from_seed(8)).unwrap().clone();
        assert_eq!(round.round, 1);
        assert_eq!(s.current_round(), Some(&round));
        let total: u32 = s.players().iter().map(|p| p.games_played).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn failed_generation_changes_nothing() {
        let mut s = session(&["a", "b"]);
        let before = s.clone();
        assert_eq!(
            s.generate_next_round(&mut SeededRandom::from_seed(0)),
            Err(RoundNotGenerated::InsufficientPlayers { roster: 2 })
        );
        assert_eq!(s, before);
    }

    #[test]
    fn snapshot_round_trip_keeps_history() {
        let mut s = session(&["a", "b", "c", "d", "e", "f"]);
        let mut rng = SeededRandom::from_seed(3);
        s.generate_next_round(&mut rng).unwrap();
        s.generate_next_round(&mut rng).unwrap();
        let json = s.to_json().unwrap();
        assert!(json.contains("\"currentRound\":2"));
        assert!(json.contains("\"teamA\""));
        assert_eq!(Session::from_json(&json).unwrap(), s);
    }

    #[test]
    fn zero_equipment_takes_the_defaults() {
        let json = r#"{
            "players": [{"name":"a"},{"name":"b"},{"name":"c"},{"name":"d"}],
            "numberOfRackets": 0,
            "numberOfCourts": 0
        }"#;
        let mut s = Session::from_json(json).unwrap();
        assert_eq!(s.rackets(), 8);
        assert_eq!(s.courts(), 2);
        assert!(s.generate_next_round(&mut SeededRandom::from_seed(1)).is_ok());
    }

    #[test]
    fn returning_player_gets_partnerships_back() {
        let mut s = session(&["a", "b", "c", "d"]);
        s.set_courts(1);
        s.generate_next_round(&mut SeededRandom::from_seed(1)).unwrap();
        let partner = s
            .players()
            .iter()
            .find(|p| p.name != "a" && p.partnership_count("a") == 1)
            .unwrap()
            .name
            .clone();

        assert!(s.remove_player(&partner));
        assert!(s.add_player(&partner));

        let a = s.players().iter().find(|p| p.name == "a").unwrap();
        let back = s.players().iter().find(|p| p.name == partner).unwrap();
        assert_eq!(back.games_played, 0);
        assert_eq!(a.partnership_count(&partner), 1);
        assert_eq!(back.partnership_count("a"), 1);
        for p in s.players() {
            for q in s.players() {
                assert_eq!(p.partnership_count(&q.name), q.partnership_count(&p.name));
            }
        }
    }

    #[test]
    fn csv_has_a_row_per_match() {
        let mut s = session(&["a", "b", "c", "d", "e", "f", "g"]);
        let mut rng = SeededRandom::from_seed(4);
        s.generate_next_round(&mut rng).unwrap();
        s.generate_next_round(&mut rng).unwrap();
        let matches: usize = s.rounds().iter().map(|r| r.matches.len()).sum();
        let csv = s.to_csv().unwrap();
        assert_eq!(csv.lines().count(), matches + 1);
        assert!(csv.starts_with("Round,Court,"));
    }

    #[test]
    fn reset_keeps_the_roster() {
        let mut s = session(&["a", "b", "c", "d"]);
        s.generate_next_round(&mut SeededRandom::from_seed(1)).unwrap();
        s.reset();
        assert_eq!(s.players().len(), 4);
        assert!(s.rounds().is_empty());
        assert!(s
            .players()
            .iter()
            .all(|p| p.games_played == 0 && p.partnerships.is_empty()));
    }
}
