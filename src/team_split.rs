//! Splits the players of one court into two teams, avoiding repeated partnerships.

use crate::player::{partnership_score, Player};

/// The two sides of a court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teams {
    /// Larger (or equal) team.
    pub team_a: Vec<String>,
    /// Smaller (or equal) team.
    pub team_b: Vec<String>,
}

/// Splits a court of 2 to 5 players into 1v1, 2v1, 2v2 or 3v2.
///
/// Returns `None` for any other court size.
pub fn split_teams(players: &[&Player]) -> Option<Teams> {
    let team_a = match players.len() {
        2 => vec![0],
        3 => best_group(players, 2),
        4 => best_doubles(players),
        5 => best_group(players, 3),
        _ => return None,
    };
    let (a, b): (Vec<_>, Vec<_>) = (0..players.len()).partition(|i| team_a.contains(i));
    let names = |indices: Vec<usize>| -> Vec<String> {
        indices.into_iter().map(|i| players[i].name.clone()).collect()
    };
    Some(Teams {
        team_a: names(a),
        team_b: names(b),
    })
}

fn internal_score(players: &[&Player], group: &[usize]) -> u32 {
    let mut score = 0;
    for (n, &i) in group.iter().enumerate() {
        for &j in &group[n + 1..] {
            score += partnership_score(players[i], players[j]);
        }
    }
    score
}

/// Picks the `size` players with the fewest shared teams among themselves.
///
/// Groups are tried in lexicographic order and the first minimum wins.
fn best_group(players: &[&Player], size: usize) -> Vec<usize> {
    let mut best: Option<(u32, Vec<usize>)> = None;
    for group in combinations(players.len(), size) {
        let score = internal_score(players, &group);
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, group));
        }
    }
    best.map(|(_, group)| group).unwrap_or_default()
}

/// Of the three ways to pair four players, the one with the fewest repeated partnerships.
///
/// Tried in the order (0,1)(2,3), (0,2)(1,3), (0,3)(1,2); the first minimum wins.
fn best_doubles(players: &[&Player]) -> Vec<usize> {
    const PAIRINGS: [([usize; 2], [usize; 2]); 3] =
        [([0, 1], [2, 3]), ([0, 2], [1, 3]), ([0, 3], [1, 2])];

    let mut best = PAIRINGS[0].0;
    let mut best_score = u32::MAX;
    for (a, b) in PAIRINGS {
        let score = internal_score(players, &a) + internal_score(players, &b);
        if score < best_score {
            best_score = score;
            best = a;
        }
    }
    best.to_vec()
}

/// All `k`-element subsets of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            extend(i + 1, n, k, current, out);
            current.pop();
        }
    }

    let mut out = vec![];
    if k <= n {
        extend(0, n, k, &mut Vec::with_capacity(k), &mut out);
    }
    out
}
