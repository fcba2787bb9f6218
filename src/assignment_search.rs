//! Search for the court assignment of the players selected to play.
//!
//! A bounded number of candidate assignments is built, each is split into teams and scored,
//! and the lowest score wins. Two families of candidates are tried:
//!
//! - **Court rotation**: players who have used courts most unevenly pick first, and each court
//!   takes the players who have used it least. Later attempts apply a few random swaps between
//!   courts, kept only when they reduce court repetition.
//! - **Shuffled**: a random order, nudged so players drift away from courts they already know,
//!   then dealt to courts in sequence.

use tracing::{debug, warn};

use crate::configuration::Configuration;
use crate::history::FairnessHistory;
use crate::player::Player;
use crate::rng::RandomSource;
use crate::round::Match;
use crate::scoring::AssignmentScorer;
use crate::team_split::split_teams;

/// How far back a shuffled position looks for a better swap partner.
const SWAP_WINDOW: usize = 6;
/// Passes of court-aware swaps over a shuffled order.
const SHUFFLE_PASSES: usize = 3;
/// Most random court swaps applied to one rotation candidate.
const MAX_ROTATION_SWAPS: usize = 2;

/// Groups of indices into the playing list, group `i` going to court `i + 1`.
type Assignment = Vec<Vec<usize>>;

/// Finds the best assignment of players to courts for one round.
pub struct AssignmentSearch<'a> {
    history: &'a FairnessHistory,
    scorer: AssignmentScorer<'a>,
    rotation_candidates: usize,
    shuffled_candidates: usize,
}

/// Court usage of the playing players, precomputed for one search.
struct CourtUsage {
    /// `usage[player][court - 1]`
    usage: Vec<Vec<u32>>,
    imbalance: Vec<f64>,
}

impl CourtUsage {
    fn new(history: &FairnessHistory, playing: &[&Player], courts: usize) -> Self {
        let usage = playing
            .iter()
            .map(|p| (1..=courts).map(|c| history.court_usage(&p.name, c)).collect())
            .collect();
        let imbalance = playing
            .iter()
            .map(|p| history.court_imbalance(&p.name, courts))
            .collect();
        Self { usage, imbalance }
    }

    /// Visits of `player` to the court at `court_index` (0-based).
    fn get(&self, player: usize, court_index: usize) -> u32 {
        self.usage[player].get(court_index).copied().unwrap_or(0)
    }

    fn squared(&self, player: usize, court_index: usize) -> u64 {
        let u = self.get(player, court_index) as u64;
        u * u
    }
}

impl<'a> AssignmentSearch<'a> {
    /// Creates a search scoring against `roster` and `history`.
    pub fn new(roster: &'a [Player], history: &'a FairnessHistory, config: &Configuration) -> Self {
        Self {
            history,
            scorer: AssignmentScorer::new(roster, history, config.weights),
            rotation_candidates: config.rotation_candidates,
            shuffled_candidates: config.shuffled_candidates,
        }
    }

    /// Assigns `playing` to courts of `court_sizes` and returns the best scoring matches.
    ///
    /// If the sizes do not add up to the number of players, players are dealt to courts in the
    /// given order and that single candidate is returned.
    pub fn search<R: RandomSource>(
        &self,
        playing: &[&Player],
        court_sizes: &[usize],
        rng: &mut R,
    ) -> Vec<Match> {
        let identity: Vec<usize> = (0..playing.len()).collect();
        let total: usize = court_sizes.iter().sum();

        let mut candidates: Vec<Assignment> = vec![];
        if total != playing.len() {
            warn!(
                "{} players for courts of {court_sizes:?}, assigning sequentially",
                playing.len()
            );
        } else {
            let usage = CourtUsage::new(self.history, playing, court_sizes.len());
            for attempt in 0..self.rotation_candidates {
                candidates.push(rotation_candidate(&usage, court_sizes, attempt, rng));
            }
            for _ in 0..self.shuffled_candidates {
                let order = shuffled_order(&usage, court_sizes, rng);
                candidates.push(assign_sequentially(&order, court_sizes));
            }
        }
        if candidates.is_empty() {
            candidates.push(assign_sequentially(&identity, court_sizes));
        }

        let mut best: Option<(u64, Vec<Match>)> = None;
        for (n, candidate) in candidates.iter().enumerate() {
            let matches = to_matches(playing, candidate);
            let score = self.scorer.score(&matches);
            debug!(candidate = n, score, "scored candidate");
            if best.as_ref().map_or(true, |(best_score, _)| score < *best_score) {
                best = Some((score, matches));
            }
        }

        match best {
            Some((score, matches)) => {
                debug!(score, "best candidate");
                matches
            }
            None => vec![],
        }
    }
}

/// Builds one court-rotation candidate. Attempts 3 and later get random beneficial swaps.
fn rotation_candidate<R: RandomSource>(
    usage: &CourtUsage,
    court_sizes: &[usize],
    attempt: usize,
    rng: &mut R,
) -> Assignment {
    let mut ranked: Vec<usize> = (0..usage.imbalance.len()).collect();
    ranked.sort_by(|&a, &b| usage.imbalance[b].total_cmp(&usage.imbalance[a]));

    let mut taken = vec![false; ranked.len()];
    let mut assignment: Assignment = Vec::with_capacity(court_sizes.len());
    for (court_index, &size) in court_sizes.iter().enumerate() {
        let mut candidates: Vec<usize> = ranked.iter().copied().filter(|&p| !taken[p]).collect();
        candidates.sort_by(|&a, &b| {
            usage
                .get(a, court_index)
                .cmp(&usage.get(b, court_index))
                .then(usage.imbalance[b].total_cmp(&usage.imbalance[a]))
        });
        let group: Vec<usize> = candidates.into_iter().take(size).collect();
        for &p in &group {
            taken[p] = true;
        }
        assignment.push(group);
    }

    let swaps = MAX_ROTATION_SWAPS.min(attempt / 3);
    for _ in 0..swaps {
        try_court_swap(&mut assignment, usage, rng);
    }
    assignment
}

/// Swaps two random players on two random courts if that lowers their squared court usage.
fn try_court_swap<R: RandomSource>(assignment: &mut Assignment, usage: &CourtUsage, rng: &mut R) {
    let courts = assignment.len();
    if courts < 2 {
        return;
    }
    let c1 = rng.below(courts);
    let c2 = rng.below(courts);
    if c1 == c2 || assignment[c1].is_empty() || assignment[c2].is_empty() {
        return;
    }
    let i1 = rng.below(assignment[c1].len());
    let i2 = rng.below(assignment[c2].len());
    let (p1, p2) = (assignment[c1][i1], assignment[c2][i2]);

    let current = usage.squared(p1, c1) + usage.squared(p2, c2);
    let swapped = usage.squared(p1, c2) + usage.squared(p2, c1);
    if swapped < current {
        assignment[c1][i1] = p2;
        assignment[c2][i2] = p1;
    }
}

/// A random playing order, then a few passes of swaps that move players off familiar courts.
fn shuffled_order<R: RandomSource>(
    usage: &CourtUsage,
    court_sizes: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..usage.imbalance.len()).collect();
    rng.shuffle(&mut order);

    let court_of: Vec<usize> = court_sizes
        .iter()
        .enumerate()
        .flat_map(|(court_index, &size)| std::iter::repeat(court_index).take(size))
        .collect();
    let court_at = |position: usize| court_of.get(position).copied().unwrap_or(0);

    for _ in 0..SHUFFLE_PASSES {
        for i in (1..order.len()).rev() {
            let mut best: Option<(i64, usize)> = None;
            for j in i.saturating_sub(SWAP_WINDOW)..i {
                let (ci, cj) = (court_at(i), court_at(j));
                let current = usage.squared(order[i], ci) + usage.squared(order[j], cj);
                let swapped = usage.squared(order[i], cj) + usage.squared(order[j], ci);
                let delta = swapped as i64 - current as i64;
                if delta < 0 && best.map_or(true, |(d, _)| delta < d) {
                    best = Some((delta, j));
                }
            }
            if let Some((_, j)) = best {
                order.swap(i, j);
            }
        }
    }
    order
}

/// Deals `order` to courts in sequence.
fn assign_sequentially(order: &[usize], court_sizes: &[usize]) -> Assignment {
    let mut rest = order;
    court_sizes
        .iter()
        .map(|&size| {
            let (group, tail) = rest.split_at(size.min(rest.len()));
            rest = tail;
            group.to_vec()
        })
        .collect()
}

/// Splits every court into teams. Courts of unsupported size produce no match.
fn to_matches(playing: &[&Player], assignment: &Assignment) -> Vec<Match> {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(court_index, group)| {
            let players: Vec<&Player> = group.iter().map(|&p| playing[p]).collect();
            split_teams(&players).map(|teams| Match {
                court: court_index + 1,
                team_a: teams.team_a,
                team_b: teams.team_b,
            })
        })
        .collect()
}

#[cfg(test)]
mod assignment_search_tests {
    use std::collections::HashSet;

    use super::*;
    use crate::rng::SeededRandom;
    use crate::round::Round;

    /// Replays a fixed list of draws, modulo the requested bound.
    struct Scripted(Vec<usize>, usize);

    impl RandomSource for Scripted {
        fn below(&mut self, upper: usize) -> usize {
            let value = self.0[self.1 % self.0.len()];
            self.1 += 1;
            value % upper
        }
    }

    fn roster(n: usize) -> Vec<Player> {
        (1..=n).map(|i| Player::new(format!("P{i}"))).collect()
    }

    fn m(court: usize, a: &[&str], b: &[&str]) -> Match {
        Match {
            court,
            team_a: a.iter().map(|s| s.to_string()).collect(),
            team_b: b.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn sequential_dealing() {
        assert_eq!(
            assign_sequentially(&[4, 3, 2, 1, 0], &[3, 2]),
            vec![vec![4, 3, 2], vec![1, 0]]
        );
        assert_eq!(
            assign_sequentially(&[0, 1, 2], &[2, 2]),
            vec![vec![0, 1], vec![2]]
        );
    }

    #[test]
    fn everyone_is_placed_once() {
        let players = roster(9);
        let history = FairnessHistory::default();
        let config = Configuration::new();
        let search = AssignmentSearch::new(&players, &history, &config);
        let playing: Vec<&Player> = players.iter().collect();
        let matches = search.search(&playing, &[4, 5], &mut SeededRandom::from_seed(3));

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].court, 1);
        assert_eq!(matches[1].court, 2);
        assert_eq!(matches[0].size(), 4);
        assert_eq!(matches[1].size(), 5);
        let names: HashSet<&String> = matches.iter().flat_map(Match::players).collect();
        assert_eq!(names.len(), 9);
    }

    /// Three rounds of P1..P4 on court 1 and P5..P8 on court 2, same teams every time.
    fn sticky_session() -> (Vec<Player>, Vec<Round>) {
        let mut players = roster(8);
        for (a, b) in [(0, 1), (2, 3), (4, 5), (6, 7)] {
            for _ in 0..3 {
                let (name_a, name_b) = (players[a].name.clone(), players[b].name.clone());
                players[a].record_partner(&name_b);
                players[b].record_partner(&name_a);
            }
        }
        let rounds = (1..=3)
            .map(|r| Round {
                round: r,
                matches: vec![
                    m(1, &["P1", "P2"], &["P3", "P4"]),
                    m(2, &["P5", "P6"], &["P7", "P8"]),
                ],
                resting: vec![],
            })
            .collect();
        (players, rounds)
    }

    #[test]
    fn rotation_candidate_swaps_courts() {
        let (players, rounds) = sticky_session();
        let history = FairnessHistory::from_rounds(&rounds);
        let playing: Vec<&Player> = players.iter().collect();
        let usage = CourtUsage::new(&history, &playing, 2);
        let assignment = rotation_candidate(&usage, &[4, 4], 0, &mut SeededRandom::from_seed(1));
        assert_eq!(assignment, vec![vec![4, 5, 6, 7], vec![0, 1, 2, 3]]);
    }

    fn sticky_usage(players: &[Player], rounds: &[Round]) -> CourtUsage {
        let history = FairnessHistory::from_rounds(rounds);
        let playing: Vec<&Player> = players.iter().collect();
        CourtUsage::new(&history, &playing, 2)
    }

    #[test]
    fn court_swap_that_adds_repetition_is_refused() {
        let (players, rounds) = sticky_session();
        let usage = sticky_usage(&players, &rounds);
        let mut assignment = vec![vec![4, 5, 6, 7], vec![0, 1, 2, 3]];
        // courts 0 and 1, first player of each: P5 and P1 would go back to their usual court
        try_court_swap(&mut assignment, &usage, &mut Scripted(vec![0, 1, 0, 0], 0));
        assert_eq!(assignment, vec![vec![4, 5, 6, 7], vec![0, 1, 2, 3]]);
    }

    #[test]
    fn court_swap_that_removes_repetition_is_kept() {
        let (players, rounds) = sticky_session();
        let usage = sticky_usage(&players, &rounds);
        let mut assignment = vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]];
        try_court_swap(&mut assignment, &usage, &mut Scripted(vec![0, 1, 0, 0], 0));
        assert_eq!(assignment, vec![vec![4, 1, 2, 3], vec![0, 5, 6, 7]]);
    }

    #[test]
    fn court_swap_within_a_court_does_nothing() {
        let (players, rounds) = sticky_session();
        let usage = sticky_usage(&players, &rounds);
        let mut assignment = vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]];
        try_court_swap(&mut assignment, &usage, &mut Scripted(vec![1, 1, 0, 0], 0));
        assert_eq!(assignment, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
    }

    #[test]
    fn shuffled_order_leaves_familiar_courts() {
        let (players, rounds) = sticky_session();
        let usage = sticky_usage(&players, &rounds);
        // each draw picks j = i, so the shuffle keeps P1..P8 in place
        let mut rng = Scripted(vec![7, 6, 5, 4, 3, 2, 1], 0);
        let order = shuffled_order(&usage, &[4, 4], &mut rng);

        let mut courts = assign_sequentially(&order, &[4, 4]);
        for group in &mut courts {
            group.sort();
        }
        assert_eq!(courts, vec![vec![4, 5, 6, 7], vec![0, 1, 2, 3]]);
    }

    #[test]
    fn search_beats_repeating_the_last_round() {
        let (players, rounds) = sticky_session();
        let history = FairnessHistory::from_rounds(&rounds);
        let config = Configuration::new();
        let search = AssignmentSearch::new(&players, &history, &config);
        let playing: Vec<&Player> = players.iter().collect();
        let matches = search.search(&playing, &[4, 4], &mut SeededRandom::from_seed(11));

        let scorer = AssignmentScorer::new(&players, &history, config.weights);
        let best = scorer.score(&matches);
        assert!(best < scorer.score(&rounds[2].matches));
        // court rotation alone already scores 60 here
        assert!(best <= 60, "score {best}");
        for m in &matches {
            for (a, b) in m.partner_pairs() {
                let a = players.iter().find(|p| &p.name == a).unwrap();
                assert_eq!(a.partnership_count(b), 0, "{} partnered {b} again", a.name);
            }
        }
    }

    #[test]
    fn mismatched_sizes_fall_back_to_input_order() {
        let players = roster(6);
        let history = FairnessHistory::default();
        let config = Configuration::new();
        let search = AssignmentSearch::new(&players, &history, &config);
        let playing: Vec<&Player> = players.iter().collect();
        let matches = search.search(&playing, &[4], &mut SeededRandom::from_seed(0));

        assert_eq!(matches.len(), 1);
        let names: Vec<&str> = matches[0].players().map(String::as_str).collect();
        assert_eq!(names, vec!["P1", "P2", "P3", "P4"]);
    }

    #[test]
    fn zero_budget_still_produces_a_round() {
        let players = roster(4);
        let history = FairnessHistory::default();
        let config = Configuration::new()
            .with_rotation_candidates(0)
            .with_shuffled_candidates(0);
        let search = AssignmentSearch::new(&players, &history, &config);
        let playing: Vec<&Player> = players.iter().collect();
        let matches = search.search(&playing, &[4], &mut SeededRandom::from_seed(0));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].size(), 4);
    }

    #[test]
    fn shuffled_order_is_a_permutation() {
        let players = roster(10);
        let history = FairnessHistory::default();
        let playing: Vec<&Player> = players.iter().collect();
        let usage = CourtUsage::new(&history, &playing, 3);
        let mut order = shuffled_order(&usage, &[4, 4, 2], &mut SeededRandom::from_seed(5));
        order.sort();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }
}
