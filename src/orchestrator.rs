//! Generation of the next round of a session.
//!
//! [`generate_next_round`] is a pure transformer: it reads the roster and the history and returns
//! a new round with an updated copy of the roster. Nothing is mutated in place, so the caller can
//! keep the previous state and swap in the new one atomically.

use std::collections::HashSet;
use std::fmt::Display;

use tracing::{info, instrument, trace};

use crate::assignment_search::AssignmentSearch;
use crate::capacity::plan_distribution;
use crate::configuration::Configuration;
use crate::history::FairnessHistory;
use crate::player::Player;
use crate::rng::RandomSource;
use crate::round::{Match, Round};

/// Fewest players a session needs before rounds can be generated.
pub const MIN_ROSTER: usize = 3;

/// Why no round was produced. Nothing was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundNotGenerated {
    /// The roster has fewer than [`MIN_ROSTER`] players.
    InsufficientPlayers {
        /// Players on the roster.
        roster: usize,
    },
    /// No court could be filled with at least two players.
    NoUsableCourts {
        /// Players that could have played.
        playable: usize,
    },
}

impl Display for RoundNotGenerated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientPlayers { roster } => write!(
                f,
                "cannot generate a round yet: {roster} players, at least {MIN_ROSTER} needed"
            ),
            Self::NoUsableCourts { playable } => write!(
                f,
                "cannot generate a round yet: no court can be filled with {playable} players"
            ),
        }
    }
}

impl std::error::Error for RoundNotGenerated {}

/// A generated round and the roster with updated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRound {
    /// The new round, numbered after the last one of the history.
    pub round: Round,
    /// The roster, in its original order, with games, last round and partnerships updated.
    pub roster: Vec<Player>,
}

/// Generates the next round.
///
/// 1. Players are ordered by fewest games, then longest since they last played; ties are
///    shuffled.
/// 2. As many as rackets and courts allow are put on court (four per court, plus one extra
///    player who makes a 3v2), and at least two per court when the roster is large enough.
/// 3. Courts and teams are chosen by [`AssignmentSearch`].
/// 4. Everyone on court gets a game and a last played round; partners are recorded both ways.
///
/// # Errors
/// Returned when the roster has fewer than [`MIN_ROSTER`] players or no court can be filled.
#[instrument(skip_all, fields(roster = roster.len(), history = history.len()))]
pub fn generate_next_round<R: RandomSource>(
    roster: &[Player],
    history: &[Round],
    config: &Configuration,
    rng: &mut R,
) -> Result<NextRound, RoundNotGenerated> {
    if roster.len() < MIN_ROSTER {
        return Err(RoundNotGenerated::InsufficientPlayers {
            roster: roster.len(),
        });
    }
    trace!(?config);

    // 1. priority order, ties broken at random
    let mut order: Vec<&Player> = roster.iter().collect();
    order.sort_by_key(|p| p.priority());
    for group in order.chunk_by_mut(|a, b| a.priority() == b.priority()) {
        rng.shuffle(group);
    }

    // 2. how many can play, and on which courts
    let courts = config.number_of_courts;
    // one seat past full doubles lets a lone leftover join a court as 3v2
    let mut playable = roster
        .len()
        .min(config.number_of_rackets)
        .min(courts.saturating_mul(4).saturating_add(1));
    let minimum = courts.saturating_mul(2);
    if playable < minimum && roster.len() >= minimum {
        playable = minimum;
    }
    let court_sizes = plan_distribution(playable, courts);
    if court_sizes.is_empty() {
        return Err(RoundNotGenerated::NoUsableCourts { playable });
    }
    let on_court: usize = court_sizes.iter().sum();

    // 3. courts and teams
    let fairness = FairnessHistory::from_rounds(history);
    let search = AssignmentSearch::new(roster, &fairness, config);
    let matches = search.search(&order[..on_court], &court_sizes, rng);

    let round_number = history.len() as u32 + 1;
    let playing: HashSet<&str> = matches
        .iter()
        .flat_map(Match::players)
        .map(String::as_str)
        .collect();
    let resting: Vec<String> = order
        .iter()
        .filter(|p| !playing.contains(p.name.as_str()))
        .map(|p| p.name.clone())
        .collect();

    info!(
        "Round {round_number}: {} players, {} playing, {} courts used, {} resting, court sizes {court_sizes:?}",
        roster.len(),
        playing.len(),
        matches.len(),
        resting.len()
    );

    // 4. statistics
    let updated = apply_round(roster, &matches, round_number);

    Ok(NextRound {
        round: Round {
            round: round_number,
            matches,
            resting,
        },
        roster: updated,
    })
}

/// Copy of `roster` with the results of `matches` recorded.
fn apply_round(roster: &[Player], matches: &[Match], round_number: u32) -> Vec<Player> {
    let mut updated = roster.to_vec();
    let playing: HashSet<&str> = matches
        .iter()
        .flat_map(Match::players)
        .map(String::as_str)
        .collect();

    for player in updated.iter_mut() {
        if playing.contains(player.name.as_str()) {
            player.games_played += 1;
            player.last_played_round = round_number;
        }
    }

    for (a, b) in matches.iter().flat_map(Match::partner_pairs) {
        if let Some(player) = updated.iter_mut().find(|p| &p.name == a) {
            player.record_partner(b);
        }
        if let Some(player) = updated.iter_mut().find(|p| &p.name == b) {
            player.record_partner(a);
        }
    }
    updated
}
