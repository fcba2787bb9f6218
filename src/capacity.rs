//! Decides how many players go on each court.

/// Splits `playable` players over at most `courts` courts.
///
/// Courts are filled with doubles (4) first. Courts still empty then take 3 or 2 players, and a
/// single leftover player joins the last filled court, making it a 3v2. Courts that stay empty
/// are dropped, so the result may be shorter than `courts`.
///
/// Returns an empty list when fewer than two players can play or there is no court.
pub fn plan_distribution(playable: usize, courts: usize) -> Vec<usize> {
    if playable < 2 || courts < 1 {
        return vec![];
    }

    // a court needs two players, so more than playable / 2 courts can never be used
    let mut sizes = vec![0; courts.min(playable / 2)];
    let mut remaining = playable;

    for size in sizes.iter_mut() {
        if remaining < 4 {
            break;
        }
        *size = 4;
        remaining -= 4;
    }

    for size in sizes.iter_mut().filter(|size| **size == 0) {
        if remaining >= 3 {
            *size = 3;
            remaining -= 3;
        } else if remaining >= 2 {
            *size = 2;
            remaining -= 2;
        }
    }

    if remaining == 1 {
        if let Some(last) = sizes.iter_mut().rev().find(|size| **size > 0) {
            *last += 1;
        }
    }

    sizes.retain(|size| *size > 0);
    sizes
}
